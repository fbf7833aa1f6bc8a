//! Diorama configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Load with [`Config::load_from_file`]; the extension picks TOML or
//! RON.

use haunt_engine::config::{Config, ConfigError};
use haunt_engine::foundation::color::Color;
use haunt_engine::foundation::math::Vec3;
use haunt_engine::render::{ShadowSettings, TextOptions};
use haunt_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Number of matcap textures shipped with the scene
pub const MATCAP_COUNT: u32 = 8;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HauntedConfig {
    /// Output surface
    pub viewport: ViewportConfig,
    /// Atmosphere and props
    pub scene: SceneConfig,
    /// Point light shadow maps
    pub shadows: ShadowConfig,
    /// Camera and orbit controls
    pub camera: CameraConfig,
    /// Title text
    pub text: TextConfig,
    /// Asset location and loading
    pub assets: AssetConfig,
    /// Headless loop
    pub run: RunConfig,
}

/// Output surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Initial width in logical pixels
    pub width: u32,
    /// Initial height in logical pixels
    pub height: u32,
    /// Initial device pixel ratio
    pub device_pixel_ratio: f32,
    /// Cap on the applied pixel ratio
    pub max_pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: 1.0,
            max_pixel_ratio: 2.0,
        }
    }
}

/// Atmosphere and prop counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fog color
    pub fog_color: Color,
    /// Fog start distance
    pub fog_near: f32,
    /// Fog end distance
    pub fog_far: f32,
    /// Surface clear color
    pub clear_color: Color,
    /// Number of graves scattered around the house
    pub grave_count: usize,
    /// Seed for the grave layout; random when absent
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fog_color: Color::from_hex(0x0026_2837),
            fog_near: 1.0,
            fog_far: 13.0,
            clear_color: Color::from_hex(0x0026_2837),
            grave_count: 70,
            seed: None,
        }
    }
}

/// Shadow map settings shared by the door light and the ghosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Square shadow map resolution
    pub map_size: u32,
    /// Shadow camera far plane
    pub far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self { map_size: 256, far: 7.0 }
    }
}

impl ShadowConfig {
    /// As light shadow settings
    pub fn settings(&self) -> ShadowSettings {
        ShadowSettings::new(self.map_size, self.far)
    }
}

/// Camera and orbit control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Starting position
    pub position: [f32; 3],
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Ease orbit motion
    pub damping: bool,
    /// Fraction of pending orbit motion applied per frame
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            position: [5.0, 2.0, 6.0],
            near: 0.1,
            far: 2000.0,
            damping: true,
            damping_factor: 0.05,
        }
    }
}

impl CameraConfig {
    /// Starting position as a vector
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

/// Title text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// String to extrude
    pub content: String,
    /// Font asset path
    pub font: String,
    /// Which matcap (1-based) shades the text
    pub matcap: u32,
    /// Height of the text center above the ground
    pub elevation: f32,
    /// Glyph size
    pub size: f32,
    /// Extrusion depth
    pub depth: f32,
    /// Bevel depth past the faces
    pub bevel_thickness: f32,
    /// Bevel width past the outline
    pub bevel_size: f32,
    /// Bevel start offset
    pub bevel_offset: f32,
    /// Bevel rings
    pub bevel_segments: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: "HAUNTED HOUSE".to_string(),
            font: "fonts/block_regular.font.ron".to_string(),
            matcap: 2,
            elevation: 4.0,
            size: 0.5,
            depth: 0.2,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 4,
        }
    }
}

impl TextConfig {
    /// Extrusion options for the text geometry
    pub fn options(&self) -> TextOptions {
        TextOptions {
            size: self.size,
            depth: self.depth,
            bevel_enabled: self.bevel_segments > 0,
            bevel_thickness: self.bevel_thickness,
            bevel_size: self.bevel_size,
            bevel_offset: self.bevel_offset,
            bevel_segments: self.bevel_segments,
        }
    }
}

/// Asset settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory asset paths are relative to
    pub root: String,
    /// Load on worker threads instead of inline
    pub background: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: "static".to_string(),
            background: true,
        }
    }
}

/// Headless loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Frames to render before exiting; `None` runs until closed
    pub frames: Option<u64>,
    /// Frame pacing
    pub fps: Option<f32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: Some(600),
            fps: Some(60.0),
        }
    }
}

impl Config for HauntedConfig {}

impl HauntedConfig {
    /// Reject values the scene cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid(message));

        if self.viewport.max_pixel_ratio <= 0.0 {
            return invalid(format!("max pixel ratio must be positive, got {}", self.viewport.max_pixel_ratio));
        }
        if self.scene.fog_near > self.scene.fog_far {
            return invalid(format!(
                "fog near ({}) is beyond fog far ({})",
                self.scene.fog_near, self.scene.fog_far
            ));
        }
        if self.shadows.map_size == 0 {
            return invalid("shadow map size must be positive".to_string());
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got {} and {}",
                self.camera.near, self.camera.far
            ));
        }
        if !(0.0..=1.0).contains(&self.camera.damping_factor) {
            return invalid(format!("damping factor must be in [0, 1], got {}", self.camera.damping_factor));
        }
        if !(1..=MATCAP_COUNT).contains(&self.text.matcap) {
            return invalid(format!("matcap must be 1..={MATCAP_COUNT}, got {}", self.text.matcap));
        }
        Ok(())
    }

    /// Load from `path` and validate
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Frame loop settings for the engine
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            width: self.viewport.width,
            height: self.viewport.height,
            device_pixel_ratio: self.viewport.device_pixel_ratio,
            max_pixel_ratio: self.viewport.max_pixel_ratio,
            max_frames: self.run.frames,
            target_fps: self.run.fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HauntedConfig::default();
        config.validate().unwrap();
        assert_eq!(config.scene.grave_count, 70);
        assert_eq!(config.scene.fog_color.to_string(), "#262837");
        assert_eq!(config.shadows.settings(), ShadowSettings::new(256, 7.0));
        assert_eq!(config.text.options(), TextOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = std::env::temp_dir().join(format!("haunted_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.ron");
        std::fs::write(&path, "(scene: (grave_count: 12, seed: Some(7)), text: (matcap: 5))").unwrap();

        let config = HauntedConfig::load(&path).unwrap();
        assert_eq!(config.scene.grave_count, 12);
        assert_eq!(config.scene.seed, Some(7));
        assert_eq!(config.text.matcap, 5);
        assert_eq!(config.camera, CameraConfig::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = HauntedConfig::default();
        config.text.matcap = 9;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = HauntedConfig::default();
        config.scene.fog_near = 20.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_engine_config_mirrors_viewport() {
        let mut config = HauntedConfig::default();
        config.viewport.device_pixel_ratio = 3.0;
        let engine = config.engine_config();
        assert_eq!((engine.width, engine.height), (1280, 720));
        assert_eq!(engine.device_pixel_ratio, 3.0);
        assert_eq!(engine.max_frames, Some(600));
    }
}
