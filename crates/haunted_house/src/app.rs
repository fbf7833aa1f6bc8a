//! The diorama application
//!
//! Owns the asset server, the composed scene, the debug controls, the camera
//! rig and the animator, and exposes them to the engine through
//! [`Application`].

use haunt_engine::assets::{AssetServer, AssetSource, LoadMode};
use haunt_engine::foundation::math::Vec3;
use haunt_engine::render::{Camera, CameraRig, OrbitControls, RenderSurface, Viewport};
use haunt_engine::{AppError, AppEvent, Application, FrameTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animator::Animator;
use crate::composer::{HouseScene, TextMount};
use crate::config::HauntedConfig;
use crate::error::HauntedError;
use crate::params::HouseControls;
use crate::textures::Textures;

/// The haunted house diorama
pub struct HauntedHouseApp {
    config: HauntedConfig,
    assets: AssetServer,
    house: HouseScene,
    controls: HouseControls,
    rig: CameraRig,
    animator: Animator,
}

impl HauntedHouseApp {
    /// Validate `config`, request every asset from `source` and compose the scene
    pub fn new(config: HauntedConfig, source: impl AssetSource + 'static) -> Result<Self, HauntedError> {
        config.validate()?;

        let mode = if config.assets.background {
            LoadMode::Background
        } else {
            LoadMode::Inline
        };
        let mut assets = AssetServer::new(source, mode);
        let textures = Textures::request(&mut assets);
        let font = assets.load_font(&config.text.font);

        let mut rng = match config.scene.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let house = HouseScene::compose(&config, &textures, font, &mut rng)?;
        let controls = HouseControls::wire(&house)?;
        let animator = Animator::new(house.nodes.ghosts);

        let viewport = Viewport::new(
            config.viewport.width,
            config.viewport.height,
            config.viewport.device_pixel_ratio,
            config.viewport.max_pixel_ratio,
        );
        let camera = Camera::perspective(
            config.camera.position(),
            config.camera.fov_degrees,
            viewport.aspect(),
            config.camera.near,
            config.camera.far,
        );
        let mut orbit = OrbitControls::damped(Vec3::zeros(), config.camera.damping_factor);
        orbit.enable_damping = config.camera.damping;
        let rig = CameraRig::new(camera, orbit);

        Ok(Self {
            config,
            assets,
            house,
            controls,
            rig,
            animator,
        })
    }

    /// Advance to `elapsed` seconds: settle finished loads, mount the text
    /// once its font is in, then move the ghosts and ease the camera
    pub fn frame(&mut self, elapsed: f32) -> Result<(), HauntedError> {
        for event in self.assets.poll() {
            log::trace!("Asset event {event:?}");
        }
        self.house.mount_text(&self.assets, &self.config.text)?;
        self.animator.advance(elapsed, &mut self.house.scene, &mut self.rig)?;
        Ok(())
    }

    /// React to input; `viewport` already reflects any resize
    pub fn handle_event(&mut self, event: &AppEvent, viewport: &Viewport) -> Result<(), HauntedError> {
        match event {
            AppEvent::Resized { .. } => {
                self.rig.camera.set_aspect_ratio(viewport.aspect());
            }
            AppEvent::PointerDrag { dx, dy } => {
                self.rig.controls.rotate_by_pixels(*dx, *dy, viewport.height as f32);
            }
            AppEvent::Wheel { delta_y } => self.rig.controls.dolly(*delta_y),
            AppEvent::PanelEdit { label, value } => {
                // One bad field write must not stop the diorama
                if let Err(error) = self.controls.edit(label, *value, &mut self.house.scene) {
                    log::warn!("Rejected panel edit {label:?}: {error}");
                }
            }
            AppEvent::TogglePanel => {
                let collapsed = self.controls.panel.toggle();
                log::debug!("Debug panel {}", if collapsed { "collapsed" } else { "expanded" });
            }
            AppEvent::CloseRequested => log::info!("Close requested"),
        }
        Ok(())
    }

    /// Extract this frame's draw list and hand it to `surface`
    pub fn render(&self, surface: &mut dyn RenderSurface) -> Result<(), HauntedError> {
        let frame = self.house.scene.draw_list(&self.assets, &self.rig.camera);
        surface.draw(&frame, &self.rig.camera)?;
        Ok(())
    }

    /// The composed scene
    pub fn house(&self) -> &HouseScene {
        &self.house
    }

    /// Parameter store and panel
    pub fn controls(&self) -> &HouseControls {
        &self.controls
    }

    /// Camera and orbit controls
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Camera and orbit controls, mutably
    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    /// The asset server
    pub fn assets(&self) -> &AssetServer {
        &self.assets
    }

    /// The asset server, mutably
    pub fn assets_mut(&mut self) -> &mut AssetServer {
        &mut self.assets
    }

    /// Whether the title text is in the scene
    pub fn text_mounted(&self) -> bool {
        matches!(self.house.text_mount(), TextMount::Mounted(_))
    }
}

impl Application for HauntedHouseApp {
    fn initialize(&mut self, viewport: &Viewport) -> Result<(), AppError> {
        self.rig.camera.set_aspect_ratio(viewport.aspect());
        log::info!(
            "Haunted house ready: {} textures requested, {} panel fields",
            self.assets.texture_count(),
            self.controls.panel.fields().len()
        );
        Ok(())
    }

    fn update(&mut self, time: FrameTime) -> Result<(), AppError> {
        Ok(self.frame(time.elapsed)?)
    }

    fn render(&mut self, surface: &mut dyn RenderSurface) -> Result<(), AppError> {
        Ok(Self::render(self, surface)?)
    }

    fn handle_event(&mut self, event: &AppEvent, viewport: &Viewport) -> Result<(), AppError> {
        Ok(Self::handle_event(self, event, viewport)?)
    }

    fn cleanup(&mut self) {
        log::info!("Haunted house shutting down");
    }
}
