//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Honors `RUST_LOG`; falls back to `info` when it is unset.
pub fn init() {
    let filters = std::env::var(env_logger::DEFAULT_FILTER_ENV).ok();
    builder(filters.as_deref()).init();
}

/// Logger builder with an `info` default, overridden by `filters`
///
/// `filters` uses the `RUST_LOG` syntax and is applied after the default, so a
/// plain level like `debug` replaces it.
pub fn builder(filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if let Some(filters) = filters {
        builder.parse_filters(filters);
    }
    builder
}
