//! Texture sets
//!
//! Requests every texture the diorama uses up front. Handles are returned at
//! once; props are built against them immediately and pick the pixels up
//! whenever (or if ever) the loads finish.

use haunt_engine::assets::{AssetServer, TextureHandle};
use haunt_engine::render::TextureRef;

use crate::config::MATCAP_COUNT;

/// The door's seven maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorTextures {
    /// Base color
    pub color: TextureHandle,
    /// Cut-out mask
    pub alpha: TextureHandle,
    /// Ambient occlusion
    pub ambient_occlusion: TextureHandle,
    /// Height, used as displacement
    pub height: TextureHandle,
    /// Normals
    pub normal: TextureHandle,
    /// Metalness
    pub metalness: TextureHandle,
    /// Roughness
    pub roughness: TextureHandle,
}

impl DoorTextures {
    fn request(assets: &mut AssetServer) -> Self {
        let mut load = |map: &str| assets.load_texture(&format!("textures/door/{map}.jpg"));
        Self {
            color: load("color"),
            alpha: load("alpha"),
            ambient_occlusion: load("ambientOcclusion"),
            height: load("height"),
            normal: load("normal"),
            metalness: load("metalness"),
            roughness: load("roughness"),
        }
    }
}

/// Four-map surface set used by bricks and grass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTextures {
    /// Base color
    pub color: TextureRef,
    /// Ambient occlusion
    pub ambient_occlusion: TextureRef,
    /// Normals
    pub normal: TextureRef,
    /// Roughness
    pub roughness: TextureRef,
}

impl SurfaceTextures {
    fn request(assets: &mut AssetServer, set: &str) -> Self {
        let mut load = |map: &str| TextureRef::new(assets.load_texture(&format!("textures/{set}/{map}.jpg")));
        Self {
            color: load("color"),
            ambient_occlusion: load("ambientOcclusion"),
            normal: load("normal"),
            roughness: load("roughness"),
        }
    }

    /// The same set tiled `x` by `y` times with repeat wrapping
    #[must_use]
    pub fn tiled(self, x: f32, y: f32) -> Self {
        Self {
            color: self.color.tiled(x, y),
            ambient_occlusion: self.ambient_occlusion.tiled(x, y),
            normal: self.normal.tiled(x, y),
            roughness: self.roughness.tiled(x, y),
        }
    }
}

/// Every texture in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Textures {
    /// Door maps
    pub door: DoorTextures,
    /// Wall and grave maps
    pub bricks: SurfaceTextures,
    /// Ground maps, tiled 8 x 8
    pub grass: SurfaceTextures,
    /// Matcaps 1 through 8
    pub matcaps: Vec<TextureHandle>,
}

impl Textures {
    /// Request every texture
    pub fn request(assets: &mut AssetServer) -> Self {
        let door = DoorTextures::request(assets);
        let bricks = SurfaceTextures::request(assets, "bricks");
        let grass = SurfaceTextures::request(assets, "grass").tiled(8.0, 8.0);
        let matcaps = (1..=MATCAP_COUNT)
            .map(|index| assets.load_texture(&format!("matcaps/{index}.png")))
            .collect();
        log::debug!("Requested {} textures", assets.texture_count());

        Self {
            door,
            bricks,
            grass,
            matcaps,
        }
    }

    /// Matcap by 1-based index
    pub fn matcap(&self, index: u32) -> Option<TextureHandle> {
        let index = usize::try_from(index).ok()?.checked_sub(1)?;
        self.matcaps.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haunt_engine::assets::{LoadMode, MemorySource};
    use haunt_engine::render::Wrapping;

    #[test]
    fn test_request_paths() {
        let mut assets = AssetServer::new(MemorySource::new(), LoadMode::Inline);
        let textures = Textures::request(&mut assets);

        assert_eq!(assets.texture_count(), 7 + 4 + 4 + 8);
        assert_eq!(assets.texture_path(textures.door.height), Some("textures/door/height.jpg"));
        assert_eq!(
            assets.texture_path(textures.grass.ambient_occlusion.handle),
            Some("textures/grass/ambientOcclusion.jpg")
        );
        assert_eq!(assets.texture_path(textures.matcap(2).unwrap()), Some("matcaps/2.png"));
        assert!(textures.matcap(0).is_none());
        assert!(textures.matcap(9).is_none());
    }

    #[test]
    fn test_only_grass_is_tiled() {
        let mut assets = AssetServer::new(MemorySource::new(), LoadMode::Inline);
        let textures = Textures::request(&mut assets);
        assert_eq!(textures.grass.roughness.wrap_s, Wrapping::Repeat);
        assert_eq!(textures.grass.color.repeat.x, 8.0);
        assert_eq!(textures.bricks.color.wrap_t, Wrapping::ClampToEdge);
    }
}
