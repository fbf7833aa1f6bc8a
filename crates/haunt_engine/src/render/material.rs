//! Material definitions
//!
//! Materials reference textures by handle. Nothing here waits on a texture:
//! a material is usable the moment it is built, and [`Material::resolved`]
//! strips out any map that has not (or will never) finish loading so the host
//! draws the surface untextured instead.

use crate::assets::{AssetServer, TextureHandle};
use crate::foundation::color::Color;
use crate::foundation::math::Vec2;

/// Texture coordinate wrapping outside 0..1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrapping {
    /// Clamp to the edge texel
    #[default]
    ClampToEdge,
    /// Tile the texture
    Repeat,
    /// Tile, mirroring every other repetition
    MirroredRepeat,
}

/// A texture plus how it is sampled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRef {
    /// The texture asset
    pub handle: TextureHandle,
    /// UV repeat factors
    pub repeat: Vec2,
    /// Wrapping along U
    pub wrap_s: Wrapping,
    /// Wrapping along V
    pub wrap_t: Wrapping,
}

impl TextureRef {
    /// Sample once across the surface, clamped
    pub fn new(handle: TextureHandle) -> Self {
        Self {
            handle,
            repeat: Vec2::new(1.0, 1.0),
            wrap_s: Wrapping::ClampToEdge,
            wrap_t: Wrapping::ClampToEdge,
        }
    }

    /// Tile `x` by `y` times with repeat wrapping on both axes
    #[must_use]
    pub fn tiled(mut self, x: f32, y: f32) -> Self {
        self.repeat = Vec2::new(x, y);
        self.wrap_s = Wrapping::Repeat;
        self.wrap_t = Wrapping::Repeat;
        self
    }
}

impl From<TextureHandle> for TextureRef {
    fn from(handle: TextureHandle) -> Self {
        Self::new(handle)
    }
}

/// Texture maps of a standard material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialMaps {
    /// Base color
    pub color: Option<TextureRef>,
    /// Opacity
    pub alpha: Option<TextureRef>,
    /// Ambient occlusion; sampled with the secondary UV channel
    pub ambient_occlusion: Option<TextureRef>,
    /// Vertex displacement
    pub displacement: Option<TextureRef>,
    /// Tangent-space normals
    pub normal: Option<TextureRef>,
    /// Metalness
    pub metalness: Option<TextureRef>,
    /// Roughness
    pub roughness: Option<TextureRef>,
}

impl MaterialMaps {
    fn slots_mut(&mut self) -> [&mut Option<TextureRef>; 7] {
        [
            &mut self.color,
            &mut self.alpha,
            &mut self.ambient_occlusion,
            &mut self.displacement,
            &mut self.normal,
            &mut self.metalness,
            &mut self.roughness,
        ]
    }

    /// Every bound texture
    pub fn iter(&self) -> impl Iterator<Item = &TextureRef> {
        [
            &self.color,
            &self.alpha,
            &self.ambient_occlusion,
            &self.displacement,
            &self.normal,
            &self.metalness,
            &self.roughness,
        ]
        .into_iter()
        .flatten()
    }

    /// Drop maps whose texture is not loaded
    fn retain_loaded(&mut self, assets: &AssetServer) {
        for slot in self.slots_mut() {
            if slot.is_some_and(|texture| assets.texture(texture.handle).is_none()) {
                *slot = None;
            }
        }
    }
}

/// Physically based material lit by scene lights
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    /// Base color, multiplied with the color map
    pub color: Color,
    /// Metalness factor
    pub metalness: f32,
    /// Roughness factor
    pub roughness: f32,
    /// Whether the surface is alpha blended
    pub transparent: bool,
    /// Displacement map scale in world units
    pub displacement_scale: f32,
    /// Texture maps
    pub maps: MaterialMaps,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            metalness: 0.0,
            roughness: 1.0,
            transparent: false,
            displacement_scale: 1.0,
            maps: MaterialMaps::default(),
        }
    }
}

impl StandardMaterial {
    /// Untextured material of one color
    pub fn colored(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Attach a base color texture
    #[must_use]
    pub fn with_color_map(mut self, texture: impl Into<TextureRef>) -> Self {
        self.maps.color = Some(texture.into());
        self
    }

    /// Attach an opacity texture
    #[must_use]
    pub fn with_alpha_map(mut self, texture: impl Into<TextureRef>) -> Self {
        self.maps.alpha = Some(texture.into());
        self
    }

    /// Attach an ambient occlusion texture
    #[must_use]
    pub fn with_ao_map(mut self, texture: impl Into<TextureRef>) -> Self {
        self.maps.ambient_occlusion = Some(texture.into());
        self
    }

    /// Attach a displacement texture with its scale
    #[must_use]
    pub fn with_displacement_map(mut self, texture: impl Into<TextureRef>, scale: f32) -> Self {
        self.maps.displacement = Some(texture.into());
        self.displacement_scale = scale;
        self
    }

    /// Attach a normal map texture
    #[must_use]
    pub fn with_normal_map(mut self, texture: impl Into<TextureRef>) -> Self {
        self.maps.normal = Some(texture.into());
        self
    }

    /// Attach a metalness texture
    #[must_use]
    pub fn with_metalness_map(mut self, texture: impl Into<TextureRef>) -> Self {
        self.maps.metalness = Some(texture.into());
        self
    }

    /// Attach a roughness texture
    #[must_use]
    pub fn with_roughness_map(mut self, texture: impl Into<TextureRef>) -> Self {
        self.maps.roughness = Some(texture.into());
        self
    }

    /// Enable alpha blending
    #[must_use]
    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }
}

/// Unlit material shaded from a matcap texture
#[derive(Debug, Clone, PartialEq)]
pub struct MatcapMaterial {
    /// Tint
    pub color: Color,
    /// The lighting-response texture
    pub matcap: Option<TextureRef>,
}

impl MatcapMaterial {
    /// Matcap material using `texture`
    pub fn new(texture: impl Into<TextureRef>) -> Self {
        Self {
            color: Color::WHITE,
            matcap: Some(texture.into()),
        }
    }
}

/// Any material the scene can draw with
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Lit physically based material
    Standard(StandardMaterial),
    /// Unlit matcap material
    Matcap(MatcapMaterial),
}

impl Material {
    /// Base color
    pub fn color(&self) -> Color {
        match self {
            Self::Standard(m) => m.color,
            Self::Matcap(m) => m.color,
        }
    }

    /// Replace the base color
    pub fn set_color(&mut self, color: Color) {
        match self {
            Self::Standard(m) => m.color = color,
            Self::Matcap(m) => m.color = color,
        }
    }

    /// Whether an ambient occlusion map is bound
    pub fn uses_ao_map(&self) -> bool {
        matches!(self, Self::Standard(m) if m.maps.ambient_occlusion.is_some())
    }

    /// Whether the surface is blended rather than opaque
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Standard(m) if m.transparent)
    }

    /// Every texture the material samples
    pub fn textures(&self) -> Vec<TextureRef> {
        match self {
            Self::Standard(m) => m.maps.iter().copied().collect(),
            Self::Matcap(m) => m.matcap.into_iter().collect(),
        }
    }

    /// Copy of this material with every unloaded texture removed
    ///
    /// Pending textures come back once they load; failed ones never do, so
    /// the surface keeps rendering with its flat color.
    pub fn resolved(&self, assets: &AssetServer) -> Self {
        let mut material = self.clone();
        match &mut material {
            Self::Standard(m) => m.maps.retain_loaded(assets),
            Self::Matcap(m) => {
                if m.matcap.is_some_and(|t| assets.texture(t.handle).is_none()) {
                    m.matcap = None;
                }
            }
        }
        material
    }
}

impl From<StandardMaterial> for Material {
    fn from(material: StandardMaterial) -> Self {
        Self::Standard(material)
    }
}

impl From<MatcapMaterial> for Material {
    fn from(material: MatcapMaterial) -> Self {
        Self::Matcap(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LoadMode, MemorySource};
    use std::io::Cursor;

    fn png() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_failed_maps_are_dropped() {
        let source = MemorySource::new().with("bricks/color.png", png());
        let mut assets = AssetServer::new(source, LoadMode::Inline);
        let color = assets.load_texture("bricks/color.png");
        let ao = assets.load_texture("bricks/ambientOcclusion.png");

        let material: Material = StandardMaterial::default()
            .with_color_map(color)
            .with_ao_map(ao)
            .into();

        // Before the queue is drained nothing is usable yet
        assert!(material.resolved(&assets).textures().is_empty());

        assets.poll();
        let resolved = material.resolved(&assets);
        assert_eq!(resolved.textures().len(), 1);
        assert!(!resolved.uses_ao_map());
        // The declared material keeps both maps
        assert!(material.uses_ao_map());
    }

    #[test]
    fn test_tiled_texture_repeats() {
        let mut assets = AssetServer::new(MemorySource::new(), LoadMode::Inline);
        let grass = TextureRef::new(assets.load_texture("grass/color.jpg")).tiled(8.0, 8.0);
        assert_eq!(grass.repeat, Vec2::new(8.0, 8.0));
        assert_eq!(grass.wrap_s, Wrapping::Repeat);
        assert_eq!(grass.wrap_t, Wrapping::Repeat);
    }

    #[test]
    fn test_set_color() {
        let mut bush: Material = StandardMaterial::colored("#89c854".parse().unwrap()).into();
        bush.set_color(Color::from_hex(0x00ff_0000));
        assert_eq!(bush.color().to_string(), "#ff0000");
    }
}
