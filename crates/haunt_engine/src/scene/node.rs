//! Scene nodes

use bitflags::bitflags;

use crate::foundation::collections::{GeometryKey, MaterialKey, NodeKey};
use crate::foundation::math::Transform;
use crate::render::light::Light;

bitflags! {
    /// Shadow participation of a mesh
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShadowFlags: u8 {
        /// Rendered into shadow maps
        const CAST = 1 << 0;
        /// Darkened by shadow maps
        const RECEIVE = 1 << 1;
    }
}

/// What a node contributes to the frame
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform, groups its children
    Group,
    /// Renderable geometry with a material
    Mesh {
        /// Shared geometry
        geometry: GeometryKey,
        /// Shared material
        material: MaterialKey,
    },
    /// Light source positioned by the node transform
    Light(Light),
}

/// A named entity in the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Human-readable name, not necessarily unique
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform,
    /// Payload
    pub kind: NodeKind,
    /// Shadow participation; only meaningful for meshes
    pub shadows: ShadowFlags,
    /// Hidden nodes and their subtrees are skipped when drawing
    pub visible: bool,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl SceneNode {
    /// Detached node
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            kind,
            shadows: ShadowFlags::empty(),
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Parent node, `None` for the root and detached nodes
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Light payload, if this is a light
    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Mutable light payload, if this is a light
    pub fn light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Material key, if this is a mesh
    pub fn material(&self) -> Option<MaterialKey> {
        match self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Whether the node casts shadows
    pub fn casts_shadow(&self) -> bool {
        self.shadows.contains(ShadowFlags::CAST)
    }

    /// Whether the node receives shadows
    pub fn receives_shadow(&self) -> bool {
        self.shadows.contains(ShadowFlags::RECEIVE)
    }
}
