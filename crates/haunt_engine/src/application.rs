//! Application trait and lifecycle management

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::render::host::{RenderError, RenderSurface, Viewport};
use crate::scene::SceneError;
use crate::ui::{PanelError, ParamValue};
use thiserror::Error;

/// Timing handed to [`Application::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the loop started
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub delta: f32,
    /// Zero-based frame number
    pub frame: u64,
}

/// Application lifecycle trait
///
/// Implement this to drive content from an [`Engine`](crate::Engine).
pub trait Application {
    /// Called once before the first frame with the initial viewport
    fn initialize(&mut self, viewport: &Viewport) -> Result<(), AppError>;

    /// Called every frame, after pending events were handled
    fn update(&mut self, time: FrameTime) -> Result<(), AppError>;

    /// Draw the current state
    fn render(&mut self, surface: &mut dyn RenderSurface) -> Result<(), AppError>;

    /// Handle an input or window event
    ///
    /// The viewport has already been updated when this sees a resize.
    fn handle_event(&mut self, event: &AppEvent, viewport: &Viewport) -> Result<(), AppError> {
        let _ = (event, viewport);
        Ok(())
    }

    /// Called when the loop ends
    fn cleanup(&mut self) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Render surface failure
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Scene graph misuse
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Parameter or panel wiring error
    #[error("Panel error: {0}")]
    Panel(#[from] PanelError),

    /// Asset error that could not be degraded
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}

/// Application events
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Output surface changed size
    Resized {
        /// New width in logical pixels
        width: u32,
        /// New height in logical pixels
        height: u32,
        /// Reported device pixel ratio
        device_pixel_ratio: f32,
    },

    /// Pointer moved with the primary button held
    PointerDrag {
        /// Horizontal movement in pixels
        dx: f32,
        /// Vertical movement in pixels
        dy: f32,
    },

    /// Mouse wheel
    Wheel {
        /// Vertical scroll delta; negative scrolls up
        delta_y: f32,
    },

    /// A debug panel field was changed
    PanelEdit {
        /// Field label
        label: String,
        /// Raw value from the widget
        value: ParamValue,
    },

    /// The debug panel header was clicked
    TogglePanel,

    /// Window close requested
    CloseRequested,
}
