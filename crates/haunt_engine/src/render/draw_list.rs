//! Per-frame draw list
//!
//! The flattened, resolved view of a scene that a render surface consumes:
//! world matrices instead of hierarchy, materials with unloaded textures
//! removed, lights with world positions. Opaque and transparent items are
//! kept apart; transparent ones are ordered back-to-front.

use crate::foundation::collections::{GeometryKey, NodeKey};
use crate::foundation::color::Color;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::light::Light;
use crate::render::material::Material;
use crate::scene::{Fog, ShadowFlags};

/// One mesh to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Node the mesh belongs to
    pub node: NodeKey,
    /// Object-to-world transform
    pub world: Mat4,
    /// Geometry in the scene's geometry table
    pub geometry: GeometryKey,
    /// Material as it should be drawn this frame
    pub material: Material,
    /// Shadow participation
    pub shadows: ShadowFlags,
}

impl DrawItem {
    /// World-space origin of the item
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.world[(0, 3)], self.world[(1, 3)], self.world[(2, 3)])
    }
}

/// A light resolved to world space
#[derive(Debug, Clone, PartialEq)]
pub struct LightInstance {
    /// Node the light belongs to
    pub node: NodeKey,
    /// World-space position
    pub position: Vec3,
    /// Light parameters
    pub light: Light,
}

/// Everything a surface needs to draw one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    /// Opaque meshes in traversal order
    pub opaque: Vec<DrawItem>,
    /// Blended meshes, farthest from the camera first
    pub transparent: Vec<DrawItem>,
    /// Lights in traversal order
    pub lights: Vec<LightInstance>,
    /// Distance fog
    pub fog: Option<Fog>,
    /// Color the surface is cleared to
    pub clear_color: Color,
}

impl DrawList {
    /// Total number of meshes
    pub fn item_count(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    /// Every mesh, opaque first
    pub fn items(&self) -> impl Iterator<Item = &DrawItem> {
        self.opaque.iter().chain(&self.transparent)
    }

    /// Number of lights that render a shadow map
    pub fn shadow_caster_lights(&self) -> usize {
        self.lights.iter().filter(|instance| instance.light.casts_shadow()).count()
    }

    /// Order blended items back-to-front as seen from `eye`
    pub fn sort_transparent(&mut self, eye: Vec3) {
        self.transparent.sort_by(|a, b| {
            let da = (a.world_position() - eye).norm_squared();
            let db = (b.world_position() - eye).norm_squared();
            db.total_cmp(&da)
        });
    }
}
