//! # Rendering System
//!
//! Renderer-agnostic description of what to draw.
//!
//! ## Architecture
//!
//! - **Geometry / Text**: CPU-side triangle meshes built from primitives or fonts
//! - **Material / Light**: surface and light parameters referencing textures by handle
//! - **Camera / Orbit**: perspective camera and the damped orbit helper that moves it
//! - **Draw list**: per-frame flattened snapshot handed to the host
//! - **Host**: the [`RenderSurface`] contract, viewport sizing, and a headless surface
//!
//! Rasterization, shadow map rendering and windowing belong to whatever
//! implements [`RenderSurface`].

pub mod camera;
pub mod draw_list;
pub mod geometry;
pub mod host;
pub mod light;
pub mod material;
pub mod orbit;
pub mod text;

pub use camera::Camera;
pub use draw_list::{DrawItem, DrawList, LightInstance};
pub use geometry::{Aabb, Geometry, Vertex};
pub use host::{HeadlessSurface, RenderError, RenderSurface, Viewport};
pub use light::{Light, LightKind, ShadowSettings};
pub use material::{MatcapMaterial, Material, MaterialMaps, StandardMaterial, TextureRef, Wrapping};
pub use orbit::{CameraRig, OrbitControls};
pub use text::{TextGeometry, TextOptions};
