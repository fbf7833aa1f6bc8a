//! Scene composer
//!
//! Builds the whole diorama graph once at startup:
//!
//! ```text
//! Scene
//! ├── house (walls, roof, door, bushes, door light)
//! ├── graves (one shared mesh, many nodes)
//! ├── floor
//! ├── ambient, moon, ghost1..3
//! └── text (mounted later, once its font arrives)
//! ```
//!
//! The text is the only prop that waits on an asset: its geometry cannot be
//! built until the font is decoded, so it is attached exactly once, on the
//! first frame that sees the font ready. A font that fails to load leaves the
//! rest of the scene untouched.

use haunt_engine::assets::{AssetServer, FontHandle, LoadState, TextureHandle};
use haunt_engine::config::ConfigError;
use haunt_engine::foundation::color::Color;
use haunt_engine::foundation::math::{Transform, Vec3};
use haunt_engine::render::{Light, ShadowSettings};
use haunt_engine::scene::{
    Fog, GeometryKey, MaterialKey, NodeKey, NodeKind, Scene, SceneError, SceneNode, ShadowFlags,
};
use rand::Rng;

use crate::animator::{ghost_position, Ghost};
use crate::config::{HauntedConfig, TextConfig};
use crate::error::HauntedError;
use crate::graves::GraveLayout;
use crate::props::{self, Prop, PropMesh};
use crate::textures::Textures;

const MOONLIGHT: u32 = 0x00b9_d5ff;
const MOONLIGHT_INTENSITY: f32 = 0.25;
const DOOR_LIGHT_COLOR: u32 = 0x00ff_7d46;
const DOOR_LIGHT_INTENSITY: f32 = 5.0;
const DOOR_LIGHT_DISTANCE: f32 = 7.0;
const GHOST_INTENSITY: f32 = 2.0;
const GHOST_DISTANCE: f32 = 3.0;

/// Progress of the title text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMount {
    /// Font still loading
    Waiting(FontHandle),
    /// Text node attached
    Mounted(NodeKey),
    /// Font failed; the scene goes on without text
    Abandoned,
}

/// Keys of the nodes other systems address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseNodes {
    /// House group
    pub house: NodeKey,
    /// Brick walls
    pub walls: NodeKey,
    /// Roof cone
    pub roof: NodeKey,
    /// Door plane
    pub door: NodeKey,
    /// Bushes, in placement order
    pub bushes: Vec<NodeKey>,
    /// Graves group
    pub graves_group: NodeKey,
    /// Graves, in layout order
    pub graves: Vec<NodeKey>,
    /// Ground plane
    pub floor: NodeKey,
    /// Ambient light
    pub ambient: NodeKey,
    /// Directional moonlight
    pub moon: NodeKey,
    /// Light above the door
    pub door_light: NodeKey,
    /// Ghost lights, in [`Ghost::ALL`] order
    pub ghosts: [NodeKey; 3],
}

/// The composed diorama
#[derive(Debug)]
pub struct HouseScene {
    /// The scene graph
    pub scene: Scene,
    /// Addressable nodes
    pub nodes: HouseNodes,
    /// Material shared by every bush
    pub bush_material: MaterialKey,
    /// Grave placements the graves group was built from
    pub layout: GraveLayout,
    matcap: TextureHandle,
    text: TextMount,
}

fn place(
    scene: &mut Scene,
    parent: NodeKey,
    name: &str,
    mesh: PropMesh,
    transform: Transform,
) -> Result<NodeKey, SceneError> {
    let geometry = scene.add_geometry(mesh.geometry);
    let material = scene.add_material(mesh.material);
    place_shared(scene, parent, name, (geometry, material), mesh.shadows, transform)
}

fn place_prop(scene: &mut Scene, parent: NodeKey, prop: Prop) -> Result<NodeKey, SceneError> {
    place(scene, parent, prop.name, prop.mesh, prop.transform)
}

fn place_shared(
    scene: &mut Scene,
    parent: NodeKey,
    name: &str,
    (geometry, material): (GeometryKey, MaterialKey),
    shadows: ShadowFlags,
    transform: Transform,
) -> Result<NodeKey, SceneError> {
    let mut node = SceneNode::new(name, NodeKind::Mesh { geometry, material });
    node.transform = transform;
    node.shadows = shadows;
    let key = scene.spawn(node)?;
    scene.attach(key, parent)?;
    Ok(key)
}

fn add_light_at(
    scene: &mut Scene,
    parent: NodeKey,
    name: &str,
    light: Light,
    position: Vec3,
) -> Result<NodeKey, SceneError> {
    let key = scene.add_light(parent, name, light)?;
    scene.set_position(key, position)?;
    Ok(key)
}

impl HouseScene {
    /// Build the full static scene
    ///
    /// Textures may still be loading; `font` is mounted later by
    /// [`HouseScene::mount_text`].
    pub fn compose(
        config: &HauntedConfig,
        textures: &Textures,
        font: FontHandle,
        rng: &mut impl Rng,
    ) -> Result<Self, HauntedError> {
        let matcap = textures.matcap(config.text.matcap).ok_or_else(|| {
            ConfigError::Invalid(format!("no matcap number {}", config.text.matcap))
        })?;

        let mut scene = Scene::new();
        scene.fog = Some(Fog::linear(config.scene.fog_color, config.scene.fog_near, config.scene.fog_far));
        scene.background = config.scene.clear_color;
        let root = scene.root();

        // House
        let house = scene.add_group(root, "house")?;
        let walls = place_prop(&mut scene, house, props::walls(&textures.bricks))?;
        let roof = place_prop(&mut scene, house, props::roof())?;
        let door = place_prop(&mut scene, house, props::door(&textures.door))?;

        let bush = props::bush(Color::from_hex(props::BUSH_COLOR));
        let bush_geometry = scene.add_geometry(bush.geometry);
        let bush_material = scene.add_material(bush.material);
        let bushes = props::bush_transforms()
            .enumerate()
            .map(|(index, transform)| {
                let name = format!("bush{}", index + 1);
                place_shared(&mut scene, house, &name, (bush_geometry, bush_material), bush.shadows, transform)
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Graves
        let layout = GraveLayout::generate(rng, config.scene.grave_count);
        let graves_group = scene.add_group(root, "graves")?;
        let grave = props::grave(&textures.bricks);
        let grave_geometry = scene.add_geometry(grave.geometry);
        let grave_material = scene.add_material(grave.material);
        let graves = layout
            .placements()
            .iter()
            .map(|placement| {
                place_shared(
                    &mut scene,
                    graves_group,
                    "grave",
                    (grave_geometry, grave_material),
                    grave.shadows,
                    placement.transform(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let floor = place_prop(&mut scene, root, props::floor(&textures.grass))?;

        // Lights
        let moonlight = Color::from_hex(MOONLIGHT);
        let ambient = scene.add_light(root, "ambient", Light::ambient(moonlight, MOONLIGHT_INTENSITY))?;
        let moon = add_light_at(
            &mut scene,
            root,
            "moon",
            Light::directional(moonlight, MOONLIGHT_INTENSITY).with_shadow(ShadowSettings::default()),
            Vec3::new(0.0, 1.0, 0.0),
        )?;

        let shadow = config.shadows.settings();
        let door_light = add_light_at(
            &mut scene,
            house,
            "door light",
            Light::point(Color::from_hex(DOOR_LIGHT_COLOR), DOOR_LIGHT_INTENSITY, DOOR_LIGHT_DISTANCE)
                .with_shadow(shadow),
            Vec3::new(0.0, 2.5, 2.4),
        )?;

        let mut ghosts = [root; 3];
        for (slot, ghost) in ghosts.iter_mut().zip(Ghost::ALL) {
            *slot = add_light_at(
                &mut scene,
                root,
                ghost.name(),
                Light::point(ghost.color(), GHOST_INTENSITY, GHOST_DISTANCE).with_shadow(shadow),
                ghost_position(ghost, 0.0),
            )?;
        }

        log::info!(
            "Composed haunted house: {} nodes, {} graves",
            scene.node_count(),
            graves.len()
        );

        Ok(Self {
            scene,
            nodes: HouseNodes {
                house,
                walls,
                roof,
                door,
                bushes,
                graves_group,
                graves,
                floor,
                ambient,
                moon,
                door_light,
                ghosts,
            },
            bush_material,
            layout,
            matcap,
            text: TextMount::Waiting(font),
        })
    }

    /// Where the title text stands
    pub fn text_mount(&self) -> TextMount {
        self.text
    }

    /// Attach the title text if its font has arrived
    ///
    /// Returns true on the call that mounts it. Once mounted or abandoned this
    /// does nothing.
    pub fn mount_text(&mut self, assets: &AssetServer, config: &TextConfig) -> Result<bool, SceneError> {
        let TextMount::Waiting(handle) = self.text else {
            return Ok(false);
        };

        match assets.font_state(handle) {
            Some(LoadState::Pending) => Ok(false),
            Some(LoadState::Ready(font)) => {
                let root = self.scene.root();
                let key = place_prop(&mut self.scene, root, props::text(font, config, self.matcap))?;
                log::info!("Mounted title text {:?}", config.content);
                self.text = TextMount::Mounted(key);
                Ok(true)
            }
            Some(LoadState::Failed(error)) => {
                log::warn!("Title font failed to load ({error}); continuing without text");
                self.text = TextMount::Abandoned;
                Ok(false)
            }
            None => {
                log::warn!("Title font handle is unknown to the asset server; continuing without text");
                self.text = TextMount::Abandoned;
                Ok(false)
            }
        }
    }
}
