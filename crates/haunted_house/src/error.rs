//! Error type for the diorama

use haunt_engine::config::ConfigError;
use haunt_engine::render::RenderError;
use haunt_engine::scene::SceneError;
use haunt_engine::ui::PanelError;
use haunt_engine::AppError;
use thiserror::Error;

/// Everything that can stop the diorama
#[derive(Error, Debug)]
pub enum HauntedError {
    /// Bad or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene construction failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Parameter or panel wiring failed
    #[error("Panel error: {0}")]
    Panel(#[from] PanelError),

    /// The render surface failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The frame loop failed
    #[error("Engine error: {0}")]
    App(#[from] AppError),
}

impl From<HauntedError> for AppError {
    fn from(error: HauntedError) -> Self {
        match error {
            HauntedError::Config(e) => Self::Config(e),
            HauntedError::Scene(e) => Self::Scene(e),
            HauntedError::Panel(e) => Self::Panel(e),
            HauntedError::Render(e) => Self::Render(e),
            HauntedError::App(e) => e,
        }
    }
}
