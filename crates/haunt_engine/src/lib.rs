//! # Haunt Engine
//!
//! A small retained-mode scene library for lit, textured dioramas.
//!
//! ## Features
//!
//! - **Scene graph**: arena-backed node tree with shared geometry and materials
//! - **Asset streaming**: textures and fonts load off the frame cadence
//! - **Primitives**: box, plane, sphere, cone and extruded text geometry
//! - **Camera**: perspective camera with damped orbit controls
//! - **Debug panel**: typed parameter bindings validated at wiring time
//! - **Host contract**: any [`render::RenderSurface`] can draw the frames
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use haunt_engine::prelude::*;
//!
//! struct MyApp {
//!     scene: Scene,
//!     rig: CameraRig,
//!     assets: AssetServer,
//! }
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, _viewport: &Viewport) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _time: FrameTime) -> Result<(), AppError> {
//!         self.assets.poll();
//!         self.rig.update();
//!         Ok(())
//!     }
//!
//!     fn render(&mut self, surface: &mut dyn RenderSurface) -> Result<(), AppError> {
//!         let frame = self.scene.draw_list(&self.assets, &self.rig.camera);
//!         surface.draw(&frame, &self.rig.camera)?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     haunt_engine::foundation::logging::init();
//!     let mut app = MyApp {
//!         scene: Scene::new(),
//!         rig: CameraRig::new(Camera::default(), OrbitControls::default()),
//!         assets: AssetServer::new(FileSource::new("static"), LoadMode::Background),
//!     };
//!     let mut engine = Engine::new(HeadlessSurface::new(), EngineConfig::default())?;
//!     engine.run(&mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod ui;

mod application;
mod engine;

pub use application::{AppError, AppEvent, Application, FrameTime};
pub use engine::{Engine, EngineConfig};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetEvent, AssetServer, FileSource, FontHandle, LoadMode, MemorySource, TextureHandle},
        config::Config,
        foundation::{
            collections::{GeometryKey, MaterialKey, NodeKey},
            color::Color,
            math::{Mat4, Transform, Vec3},
            time::{Stopwatch, Timer},
        },
        render::{
            Camera, CameraRig, DrawList, Geometry, HeadlessSurface, Light, MatcapMaterial, Material, OrbitControls,
            RenderSurface, ShadowSettings, StandardMaterial, TextGeometry, TextOptions, TextureRef, Viewport,
        },
        scene::{Fog, NodeKind, Scene, SceneError, SceneNode, ShadowFlags},
        ui::{DebugPanel, PanelError, ParamTarget, ParamValue, ParameterStore},
        AppError, AppEvent, Application, Engine, EngineConfig, FrameTime,
    };
}
