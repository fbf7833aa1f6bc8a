//! Scene graph
//!
//! An arena-backed tree of [`SceneNode`]s addressed by stable [`NodeKey`]s.
//! The scene also owns the geometry and material tables that mesh nodes share
//! by key, so many nodes can draw with one geometry and one material.
//!
//! ```text
//! Scene (root)
//!  ├── house (group)
//!  │    ├── walls, roof, door, bushes (meshes)
//!  │    └── door light
//!  ├── graves (group)
//!  ├── floor
//!  └── lights
//! ```

mod graph;
mod node;

pub use graph::Scene;
pub use node::{NodeKind, SceneNode, ShadowFlags};

pub use crate::foundation::collections::{GeometryKey, MaterialKey, NodeKey};

use crate::foundation::color::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    /// Color distant surfaces fade to
    pub color: Color,
    /// Distance at which fog starts
    pub near: f32,
    /// Distance at which surfaces are fully fogged
    pub far: f32,
}

impl Fog {
    /// Fog fading from `near` to `far`
    pub fn linear(color: Color, near: f32, far: f32) -> Self {
        Self { color, near, far }
    }

    /// Fog amount at `distance`, 0 (clear) to 1 (fully fogged), smoothstepped
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance < self.near { 0.0 } else { 1.0 };
        }
        let t = ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }
}

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No node with this key
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeKey),

    /// No geometry with this key
    #[error("Unknown geometry: {0:?}")]
    UnknownGeometry(GeometryKey),

    /// No material with this key
    #[error("Unknown material: {0:?}")]
    UnknownMaterial(MaterialKey),

    /// The node already has a parent
    #[error("Node {0:?} is already attached")]
    AlreadyAttached(NodeKey),

    /// Attaching would make a node its own ancestor
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Node being attached
        child: NodeKey,
        /// Requested parent
        parent: NodeKey,
    },

    /// The root cannot be moved or removed
    #[error("Operation not allowed on the scene root")]
    RootNode,

    /// The node exists but is not a light
    #[error("Node {0:?} is not a light")]
    NotALight(NodeKey),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fog_factor() {
        let fog = Fog::linear(Color::from_hex(0x0026_2837), 1.0, 13.0);
        assert_eq!(fog.factor(0.5), 0.0);
        assert_relative_eq!(fog.factor(7.0), 0.5);
        assert_eq!(fog.factor(20.0), 1.0);
    }
}
