//! Debug UI
//!
//! - [`ParameterStore`]: named, typed values bound to light and material fields
//! - [`DebugPanel`]: labelled widgets over store entries, with numeric limits
//!
//! All wiring is validated when a field is bound, so a panel that was built
//! successfully can only fail at edit time on an unknown label, a value of
//! the wrong kind, or a non-finite number.

pub mod panel;
pub mod params;

pub use panel::{DebugPanel, FieldKind, PanelField};
pub use params::{ParamKind, ParamTarget, ParamValue, Parameter, ParameterStore};

use crate::scene::SceneError;
use thiserror::Error;

/// Parameter and panel wiring errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    /// No parameter with this name
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A parameter name was registered twice
    #[error("Parameter already registered: {0}")]
    DuplicateParameter(String),

    /// A value or field does not match the parameter's kind
    #[error("Parameter '{name}' holds a {expected:?}, got a {found:?}")]
    KindMismatch {
        /// Parameter name
        name: String,
        /// Kind the parameter holds
        expected: ParamKind,
        /// Kind that was supplied
        found: ParamKind,
    },

    /// Numeric limits are unusable
    #[error("Invalid range for '{label}': min {min}, max {max}, step {step}")]
    InvalidRange {
        /// Field label
        label: String,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
        /// Step size
        step: f32,
    },

    /// Two fields share a label
    #[error("Duplicate field label: {0}")]
    DuplicateField(String),

    /// An edit names a label that was never bound
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A numeric edit is NaN or infinite
    #[error("Invalid value for '{label}': {value}")]
    InvalidValue {
        /// Field label
        label: String,
        /// Rejected input
        value: f32,
    },

    /// The parameter's target is missing from the scene
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}
