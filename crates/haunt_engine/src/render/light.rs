//! Lighting system

use crate::foundation::color::Color;

/// Light types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light from every direction
    Ambient,
    /// Parallel rays travelling from the light's position toward the origin
    Directional,
    /// Light radiating from a point
    Point {
        /// Range at which the light reaches zero; 0 means unlimited
        distance: f32,
        /// Falloff exponent
        decay: f32,
    },
}

/// Shadow map parameters of a shadow-casting light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    /// Square shadow map resolution in texels
    pub map_size: u32,
    /// Far plane of the shadow camera
    pub far: f32,
}

impl ShadowSettings {
    /// Shadow map of `map_size`² texels reaching out to `far`
    pub fn new(map_size: u32, far: f32) -> Self {
        Self { map_size, far }
    }
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 512,
            far: 500.0,
        }
    }
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light type
    pub kind: LightKind,
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Shadow map settings; `None` when the light casts no shadows
    pub shadow: Option<ShadowSettings>,
}

impl Light {
    /// Create an ambient light
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            shadow: None,
        }
    }

    /// Create a directional light
    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
            shadow: None,
        }
    }

    /// Create a point light with physically based decay
    pub fn point(color: Color, intensity: f32, distance: f32) -> Self {
        Self {
            kind: LightKind::Point { distance, decay: 2.0 },
            color,
            intensity,
            shadow: None,
        }
    }

    /// Enable shadow casting
    ///
    /// Ambient lights have no direction and ignore this.
    #[must_use]
    pub fn with_shadow(mut self, settings: ShadowSettings) -> Self {
        if self.kind == LightKind::Ambient {
            log::warn!("Ambient lights cannot cast shadows; ignoring shadow settings");
        } else {
            self.shadow = Some(settings);
        }
        self
    }

    /// Whether the light renders a shadow map
    pub fn casts_shadow(&self) -> bool {
        self.shadow.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_shadow() {
        let light = Light::point(Color::from_hex(0x00ff_7d46), 5.0, 7.0)
            .with_shadow(ShadowSettings::new(256, 7.0));
        assert!(light.casts_shadow());
        assert_eq!(light.shadow.unwrap().map_size, 256);
        assert_eq!(light.kind, LightKind::Point { distance: 7.0, decay: 2.0 });
    }

    #[test]
    fn test_ambient_never_casts() {
        let light = Light::ambient(Color::WHITE, 0.25).with_shadow(ShadowSettings::default());
        assert!(!light.casts_shadow());
    }
}
