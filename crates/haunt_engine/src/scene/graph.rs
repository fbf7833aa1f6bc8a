//! Arena-backed scene graph

use slotmap::SlotMap;

use crate::assets::AssetServer;
use crate::foundation::collections::{GeometryKey, MaterialKey, NodeKey};
use crate::foundation::color::Color;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::camera::Camera;
use crate::render::draw_list::{DrawItem, DrawList, LightInstance};
use crate::render::geometry::Geometry;
use crate::render::light::Light;
use crate::render::material::Material;
use crate::scene::{Fog, NodeKind, SceneError, SceneNode};

/// The scene: a single-rooted node tree plus shared geometry and materials
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeKey, SceneNode>,
    geometries: SlotMap<GeometryKey, Geometry>,
    materials: SlotMap<MaterialKey, Material>,
    root: NodeKey,
    /// Distance fog
    pub fog: Option<Fog>,
    /// Clear color
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn translation(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)])
}

impl Scene {
    /// Empty scene with only a root group
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("Scene", NodeKind::Group));
        Self {
            nodes,
            geometries: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            root,
            fog: None,
            background: Color::rgb(0.0, 0.0, 0.0),
        }
    }

    /// The root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Register geometry for meshes to share
    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryKey {
        self.geometries.insert(geometry)
    }

    /// Registered geometry
    pub fn geometry(&self, key: GeometryKey) -> Option<&Geometry> {
        self.geometries.get(key)
    }

    /// Register a material for meshes to share
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialKey {
        self.materials.insert(material.into())
    }

    /// Registered material
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    /// Registered material, mutably; every mesh using it sees the change
    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    /// Insert a detached node; it is not drawn until attached
    pub fn spawn(&mut self, mut node: SceneNode) -> Result<NodeKey, SceneError> {
        if let NodeKind::Mesh { geometry, material } = node.kind {
            if !self.geometries.contains_key(geometry) {
                return Err(SceneError::UnknownGeometry(geometry));
            }
            if !self.materials.contains_key(material) {
                return Err(SceneError::UnknownMaterial(material));
            }
        }
        node.parent = None;
        node.children.clear();
        Ok(self.nodes.insert(node))
    }

    /// Make a detached node a child of `parent`
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) -> Result<(), SceneError> {
        if child == self.root {
            return Err(SceneError::RootNode);
        }
        let node = self.nodes.get(child).ok_or(SceneError::UnknownNode(child))?;
        if node.parent.is_some() {
            return Err(SceneError::AlreadyAttached(child));
        }
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }

        let mut ancestor = Some(parent);
        while let Some(key) = ancestor {
            if key == child {
                return Err(SceneError::Cycle { child, parent });
            }
            ancestor = self.nodes.get(key).and_then(|n| n.parent);
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(child);
        }
        Ok(())
    }

    fn add(&mut self, parent: NodeKey, node: SceneNode) -> Result<NodeKey, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let key = self.spawn(node)?;
        self.attach(key, parent)?;
        Ok(key)
    }

    /// Add an empty group under `parent`
    pub fn add_group(&mut self, parent: NodeKey, name: &str) -> Result<NodeKey, SceneError> {
        self.add(parent, SceneNode::new(name, NodeKind::Group))
    }

    /// Add a mesh under `parent`
    pub fn add_mesh(
        &mut self,
        parent: NodeKey,
        name: &str,
        geometry: GeometryKey,
        material: MaterialKey,
    ) -> Result<NodeKey, SceneError> {
        self.add(parent, SceneNode::new(name, NodeKind::Mesh { geometry, material }))
    }

    /// Add a light under `parent`
    pub fn add_light(&mut self, parent: NodeKey, name: &str, light: Light) -> Result<NodeKey, SceneError> {
        self.add(parent, SceneNode::new(name, NodeKind::Light(light)))
    }

    /// Look up a node
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Light payload of a light node
    pub fn light(&self, key: NodeKey) -> Result<&Light, SceneError> {
        self.nodes
            .get(key)
            .ok_or(SceneError::UnknownNode(key))?
            .light()
            .ok_or(SceneError::NotALight(key))
    }

    /// Mutable light payload of a light node
    pub fn light_mut(&mut self, key: NodeKey) -> Result<&mut Light, SceneError> {
        self.nodes
            .get_mut(key)
            .ok_or(SceneError::UnknownNode(key))?
            .light_mut()
            .ok_or(SceneError::NotALight(key))
    }

    /// Move a node within its parent
    pub fn set_position(&mut self, key: NodeKey, position: Vec3) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::UnknownNode(key))?;
        node.transform.position = position;
        Ok(())
    }

    /// Children of `key`, in insertion order
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map_or(&[], |node| node.children.as_slice())
    }

    /// Number of live nodes, root and detached nodes included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Object-to-world matrix of a node
    pub fn world_transform(&self, key: NodeKey) -> Option<Mat4> {
        let mut node = self.nodes.get(key)?;
        let mut world = node.transform.to_matrix();
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            world = parent.transform.to_matrix() * world;
            node = parent;
        }
        Some(world)
    }

    /// World-space origin of a node
    pub fn world_position(&self, key: NodeKey) -> Option<Vec3> {
        self.world_transform(key).map(|m| translation(&m))
    }

    /// Remove a node and all of its descendants; returns how many were removed
    ///
    /// Shared geometry and materials stay registered.
    pub fn remove_subtree(&mut self, key: NodeKey) -> Result<usize, SceneError> {
        if key == self.root {
            return Err(SceneError::RootNode);
        }
        let parent = self.nodes.get(key).ok_or(SceneError::UnknownNode(key))?.parent;
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|&child| child != key);
        }

        let mut removed = 0;
        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        log::debug!("Removed {removed} node(s) from the scene");
        Ok(removed)
    }

    /// Depth-first, parent-before-children walk of every attached node
    pub fn traverse(&self, mut visit: impl FnMut(NodeKey, &SceneNode, &Mat4)) {
        self.walk(false, &mut visit);
    }

    fn walk(&self, visible_only: bool, visit: &mut impl FnMut(NodeKey, &SceneNode, &Mat4)) {
        let mut stack = vec![(self.root, Mat4::identity())];
        while let Some((key, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if visible_only && !node.visible {
                continue;
            }
            let world = parent_world * node.transform.to_matrix();
            visit(key, node, &world);
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
    }

    /// First attached node named `name`
    pub fn find(&self, name: &str) -> Option<NodeKey> {
        let mut found = None;
        self.traverse(|key, node, _| {
            if found.is_none() && node.name == name {
                found = Some(key);
            }
        });
        found
    }

    /// Flatten the visible scene into a draw list for this frame
    pub fn draw_list(&self, assets: &AssetServer, camera: &Camera) -> DrawList {
        let mut list = DrawList {
            fog: self.fog,
            clear_color: self.background,
            ..DrawList::default()
        };

        self.walk(true, &mut |key, node: &SceneNode, world: &Mat4| match &node.kind {
            NodeKind::Group => {}
            NodeKind::Mesh { geometry, material } => {
                let Some(material) = self.materials.get(*material) else {
                    return;
                };
                let item = DrawItem {
                    node: key,
                    world: *world,
                    geometry: *geometry,
                    material: material.resolved(assets),
                    shadows: node.shadows,
                };
                if item.material.is_transparent() {
                    list.transparent.push(item);
                } else {
                    list.opaque.push(item);
                }
            }
            NodeKind::Light(light) => list.lights.push(LightInstance {
                node: key,
                position: translation(world),
                light: light.clone(),
            }),
        });

        list.sort_transparent(camera.position);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LoadMode, MemorySource};
    use crate::foundation::math::{constants::HALF_PI, Transform};
    use crate::render::material::StandardMaterial;
    use crate::scene::ShadowFlags;
    use approx::assert_relative_eq;

    fn scene_with_box() -> (Scene, GeometryKey, MaterialKey) {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(Geometry::box_geometry(1.0, 1.0, 1.0));
        let material = scene.add_material(StandardMaterial::default());
        (scene, geometry, material)
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let (mut scene, geometry, material) = scene_with_box();
        let house = scene.add_group(scene.root(), "house").unwrap();
        scene.node_mut(house).unwrap().transform = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        let walls = scene.add_mesh(house, "walls", geometry, material).unwrap();
        scene.set_position(walls, Vec3::new(0.0, 1.25, 0.0)).unwrap();

        assert_relative_eq!(scene.world_position(walls).unwrap(), Vec3::new(1.0, 1.25, 0.0));
        assert_eq!(scene.children(house), &[walls]);
        assert_eq!(scene.node(walls).unwrap().parent(), Some(house));
    }

    #[test]
    fn test_rotated_parent_rotates_children() {
        let mut scene = Scene::new();
        let floor = scene.add_group(scene.root(), "floor").unwrap();
        scene.node_mut(floor).unwrap().transform = Transform::identity().with_euler(-HALF_PI, 0.0, 0.0);
        let marker = scene.add_group(floor, "marker").unwrap();
        scene.set_position(marker, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(scene.world_position(marker).unwrap(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_attach_guards() {
        let mut scene = Scene::new();
        let text = scene.spawn(SceneNode::new("text", NodeKind::Group)).unwrap();
        assert!(scene.find("text").is_none());

        scene.attach(text, scene.root()).unwrap();
        assert_eq!(scene.find("text"), Some(text));
        assert_eq!(scene.attach(text, scene.root()), Err(SceneError::AlreadyAttached(text)));
        assert_eq!(scene.attach(scene.root(), text), Err(SceneError::RootNode));

        let a = scene.spawn(SceneNode::new("a", NodeKind::Group)).unwrap();
        let b = scene.add_group(a, "b").unwrap();
        assert_eq!(scene.attach(a, b), Err(SceneError::Cycle { child: a, parent: b }));
    }

    #[test]
    fn test_spawn_checks_mesh_references() {
        let (mut scene, geometry, material) = scene_with_box();
        // A key from another scene's table that this scene never issued
        let mut other = Scene::new();
        let foreign = (0..3).map(|_| other.add_material(StandardMaterial::default())).last().unwrap();

        let node = SceneNode::new("bad", NodeKind::Mesh { geometry, material: foreign });
        assert_eq!(scene.spawn(node), Err(SceneError::UnknownMaterial(foreign)));
        assert!(scene.add_mesh(scene.root(), "ok", geometry, material).is_ok());
    }

    #[test]
    fn test_remove_subtree() {
        let (mut scene, geometry, material) = scene_with_box();
        let graves = scene.add_group(scene.root(), "graves").unwrap();
        for i in 0..3 {
            scene.add_mesh(graves, &format!("grave {i}"), geometry, material).unwrap();
        }
        assert_eq!(scene.node_count(), 5);
        assert_eq!(scene.remove_subtree(graves), Ok(4));
        assert_eq!(scene.node_count(), 1);
        assert!(scene.children(scene.root()).is_empty());
        assert!(scene.geometry(geometry).is_some());
        assert_eq!(scene.remove_subtree(scene.root()), Err(SceneError::RootNode));
    }

    #[test]
    fn test_draw_list_splits_and_flags() {
        let (mut scene, geometry, material) = scene_with_box();
        let door_material = scene.add_material(StandardMaterial::default().transparent());
        let walls = scene.add_mesh(scene.root(), "walls", geometry, material).unwrap();
        scene.node_mut(walls).unwrap().shadows = ShadowFlags::CAST;
        let door = scene.add_mesh(scene.root(), "door", geometry, door_material).unwrap();
        let hidden = scene.add_mesh(scene.root(), "hidden", geometry, material).unwrap();
        scene.node_mut(hidden).unwrap().visible = false;
        let light = scene.add_light(walls, "lamp", Light::point(Color::WHITE, 1.0, 3.0)).unwrap();
        scene.set_position(light, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        scene.set_position(walls, Vec3::new(1.0, 0.0, 0.0)).unwrap();

        let assets = AssetServer::new(MemorySource::new(), LoadMode::Inline);
        let list = scene.draw_list(&assets, &Camera::default());

        assert_eq!(list.opaque.len(), 1);
        assert_eq!(list.opaque[0].node, walls);
        assert!(list.opaque[0].shadows.contains(ShadowFlags::CAST));
        assert_eq!(list.transparent.len(), 1);
        assert_eq!(list.transparent[0].node, door);
        assert_eq!(list.lights.len(), 1);
        assert_relative_eq!(list.lights[0].position, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_light_access() {
        let mut scene = Scene::new();
        let group = scene.add_group(scene.root(), "g").unwrap();
        let lamp = scene.add_light(group, "lamp", Light::ambient(Color::WHITE, 0.5)).unwrap();
        scene.light_mut(lamp).unwrap().intensity = 0.75;
        assert_eq!(scene.light(lamp).unwrap().intensity, 0.75);
        assert_eq!(scene.light(group), Err(SceneError::NotALight(group)));
    }
}
