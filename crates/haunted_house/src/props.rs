//! Prop factory
//!
//! Pure constructors for every prop: geometry, material, shadow flags and the
//! fixed local transform. Nothing here touches the scene; the composer
//! decides what is shared and where it is attached.

use haunt_engine::assets::{Font, TextureHandle};
use haunt_engine::foundation::color::Color;
use haunt_engine::foundation::math::{
    constants::{HALF_PI, QUARTER_PI},
    Transform, Vec3,
};
use haunt_engine::render::{Geometry, MatcapMaterial, Material, StandardMaterial, TextGeometry};
use haunt_engine::scene::ShadowFlags;

use crate::config::TextConfig;
use crate::textures::{DoorTextures, SurfaceTextures};

/// Wall box width
pub const WALL_WIDTH: f32 = 4.0;
/// Wall box height
pub const WALL_HEIGHT: f32 = 2.5;
/// Wall box depth
pub const WALL_DEPTH: f32 = 4.0;
/// Roof cone base radius
pub const ROOF_RADIUS: f32 = 3.5;
/// Roof cone height
pub const ROOF_HEIGHT: f32 = 1.0;
/// Door plane edge length
pub const DOOR_SIZE: f32 = 2.2;
/// Gap between the door and the wall face
pub const DOOR_INSET: f32 = 0.01;
/// Ground plane edge length
pub const FLOOR_SIZE: f32 = 20.0;

/// Initial bush tint
pub const BUSH_COLOR: u32 = 0x0089_c854;

const ROOF_COLOR: u32 = 0x00b3_5f45;
const DOOR_SEGMENTS: u32 = 100;
const DOOR_DISPLACEMENT: f32 = 0.1;

/// Geometry, material and shadow flags of one mesh
#[derive(Debug, Clone)]
pub struct PropMesh {
    /// Triangles
    pub geometry: Geometry,
    /// Surface
    pub material: Material,
    /// Shadow participation
    pub shadows: ShadowFlags,
}

/// A single placed prop
#[derive(Debug, Clone)]
pub struct Prop {
    /// Node name
    pub name: &'static str,
    /// What to draw
    pub mesh: PropMesh,
    /// Where, relative to its parent
    pub transform: Transform,
}

fn surface_material(textures: &SurfaceTextures) -> StandardMaterial {
    StandardMaterial::default()
        .with_color_map(textures.color)
        .with_ao_map(textures.ambient_occlusion)
        .with_normal_map(textures.normal)
        .with_roughness_map(textures.roughness)
}

/// Brick walls, resting on the ground
pub fn walls(bricks: &SurfaceTextures) -> Prop {
    Prop {
        name: "walls",
        mesh: PropMesh {
            geometry: Geometry::box_geometry(WALL_WIDTH, WALL_HEIGHT, WALL_DEPTH).with_secondary_uv(),
            material: surface_material(bricks).into(),
            shadows: ShadowFlags::CAST,
        },
        transform: Transform::from_position(Vec3::new(0.0, WALL_HEIGHT / 2.0, 0.0)),
    }
}

/// Four-sided cone roof on top of the walls, turned to line up with them
pub fn roof() -> Prop {
    Prop {
        name: "roof",
        mesh: PropMesh {
            geometry: Geometry::cone(ROOF_RADIUS, ROOF_HEIGHT, 4),
            material: StandardMaterial::colored(Color::from_hex(ROOF_COLOR)).into(),
            shadows: ShadowFlags::CAST,
        },
        transform: Transform::from_position(Vec3::new(0.0, WALL_HEIGHT + ROOF_HEIGHT / 2.0, 0.0))
            .with_euler(0.0, QUARTER_PI, 0.0),
    }
}

/// Displaced, alpha-cut door just in front of the front wall
pub fn door(textures: &DoorTextures) -> Prop {
    let material = StandardMaterial::default()
        .with_color_map(textures.color)
        .with_alpha_map(textures.alpha)
        .with_ao_map(textures.ambient_occlusion)
        .with_displacement_map(textures.height, DOOR_DISPLACEMENT)
        .with_normal_map(textures.normal)
        .with_metalness_map(textures.metalness)
        .with_roughness_map(textures.roughness)
        .transparent();

    Prop {
        name: "door",
        mesh: PropMesh {
            geometry: Geometry::plane(DOOR_SIZE, DOOR_SIZE, DOOR_SEGMENTS, DOOR_SEGMENTS).with_secondary_uv(),
            material: material.into(),
            // Blended surfaces stay out of shadow maps
            shadows: ShadowFlags::empty(),
        },
        transform: Transform::from_position(Vec3::new(0.0, 1.0, WALL_DEPTH / 2.0 + DOOR_INSET)),
    }
}

/// Grass ground plane, laid flat; the only shadow receiver
pub fn floor(grass: &SurfaceTextures) -> Prop {
    Prop {
        name: "floor",
        mesh: PropMesh {
            geometry: Geometry::plane(FLOOR_SIZE, FLOOR_SIZE, 1, 1).with_secondary_uv(),
            material: surface_material(grass).into(),
            shadows: ShadowFlags::RECEIVE,
        },
        transform: Transform::identity().with_euler(-HALF_PI, 0.0, 0.0),
    }
}

/// Shared bush sphere and tint
pub fn bush(color: Color) -> PropMesh {
    PropMesh {
        geometry: Geometry::sphere(1.0, 16, 16),
        material: StandardMaterial::colored(color).into(),
        shadows: ShadowFlags::CAST,
    }
}

/// Scale and position of the five bushes around the door
pub const BUSH_PLACEMENTS: [(f32, [f32; 3]); 5] = [
    (0.5, [0.8, 0.2, 2.2]),
    (0.25, [1.4, 0.1, 2.2]),
    (0.4, [-0.8, 0.2, 2.2]),
    (0.15, [-1.0, 0.05, 2.6]),
    (0.9, [-1.6, 0.0, 1.8]),
];

/// Transforms of the five bushes
pub fn bush_transforms() -> impl Iterator<Item = Transform> {
    BUSH_PLACEMENTS
        .into_iter()
        .map(|(scale, position)| Transform::from_position(Vec3::from(position)).with_uniform_scale(scale))
}

/// Shared grave slab
pub fn grave(bricks: &SurfaceTextures) -> PropMesh {
    PropMesh {
        geometry: Geometry::box_geometry(0.6, 0.8, 0.2).with_secondary_uv(),
        material: surface_material(bricks).into(),
        shadows: ShadowFlags::CAST,
    }
}

/// Extruded title text, centered on its own origin and lifted into the sky
pub fn text(font: &Font, config: &TextConfig, matcap: TextureHandle) -> Prop {
    let mut geometry = TextGeometry::build(font, &config.content, &config.options());
    geometry.center();

    Prop {
        name: "text",
        mesh: PropMesh {
            geometry,
            material: MatcapMaterial::new(matcap).into(),
            shadows: ShadowFlags::CAST,
        },
        transform: Transform::from_position(Vec3::new(0.0, config.elevation, 0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use haunt_engine::assets::{AssetServer, LoadMode, MemorySource};

    use crate::textures::Textures;

    fn textures() -> Textures {
        let mut assets = AssetServer::new(MemorySource::new(), LoadMode::Inline);
        Textures::request(&mut assets)
    }

    #[test]
    fn test_ao_props_mirror_uvs() {
        let textures = textures();
        for mesh in [
            walls(&textures.bricks).mesh,
            door(&textures.door).mesh,
            floor(&textures.grass).mesh,
            grave(&textures.bricks),
        ] {
            assert!(mesh.material.uses_ao_map());
            assert!(mesh.geometry.has_mirrored_uv2());
        }
        assert!(!roof().mesh.material.uses_ao_map());
    }

    #[test]
    fn test_house_stacking() {
        let textures = textures();
        assert_relative_eq!(walls(&textures.bricks).transform.position.y, 1.25);
        assert_relative_eq!(roof().transform.position.y, 3.0);
        assert_relative_eq!(door(&textures.door).transform.position, Vec3::new(0.0, 1.0, 2.01));
    }

    #[test]
    fn test_shadow_roles() {
        let textures = textures();
        assert_eq!(floor(&textures.grass).mesh.shadows, ShadowFlags::RECEIVE);
        assert!(door(&textures.door).mesh.material.is_transparent());
        assert!(door(&textures.door).mesh.shadows.is_empty());
        assert_eq!(bush(Color::WHITE).shadows, ShadowFlags::CAST);
    }

    #[test]
    fn test_bush_transforms() {
        let transforms: Vec<_> = bush_transforms().collect();
        assert_eq!(transforms.len(), 5);
        assert_relative_eq!(transforms[3].scale, Vec3::repeat(0.15));
        assert_relative_eq!(transforms[4].position, Vec3::new(-1.6, 0.0, 1.8));
    }

    #[test]
    fn test_floor_lies_flat() {
        let textures = textures();
        let up = floor(&textures.grass).transform.rotation * Vec3::z();
        assert_relative_eq!(up, Vec3::y(), epsilon = 1e-6);
    }
}
