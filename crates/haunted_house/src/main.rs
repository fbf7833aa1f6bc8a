//! Headless haunted house
//!
//! Runs the diorama against a recording surface for the configured number of
//! frames. Usage: `haunted_house [config.ron|config.toml]`

use haunt_engine::assets::FileSource;
use haunt_engine::render::HeadlessSurface;
use haunt_engine::Engine;
use haunted_house::{HauntedConfig, HauntedHouseApp};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    haunt_engine::foundation::logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            HauntedConfig::load(&path)?
        }
        None => HauntedConfig::default(),
    };

    log::info!("Starting haunted house");
    let source = FileSource::new(&config.assets.root);
    let mut engine = Engine::new(HeadlessSurface::new(), config.engine_config())?;
    let mut app = HauntedHouseApp::new(config, source)?;
    engine.run(&mut app)?;

    log::info!("Drew {} frames", engine.surface().frames_drawn());
    Ok(())
}
