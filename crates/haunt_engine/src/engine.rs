//! Core frame loop
//!
//! The engine is the render host: it owns the surface and the viewport,
//! queues events between frames, and calls the application once per frame
//! with a monotonic clock. Events never touch the clock, so a resize or an
//! edit cannot shift the animation.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::{AppError, AppEvent, Application, FrameTime};
use crate::foundation::time::{Stopwatch, Timer};
use crate::render::host::{RenderSurface, Viewport};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial width in logical pixels
    pub width: u32,
    /// Initial height in logical pixels
    pub height: u32,
    /// Initial device pixel ratio
    pub device_pixel_ratio: f32,
    /// Cap on the applied pixel ratio
    pub max_pixel_ratio: f32,
    /// Frames to run before stopping; `None` runs until closed
    pub max_frames: Option<u64>,
    /// Frame pacing; `None` runs as fast as possible
    pub target_fps: Option<f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: 1.0,
            max_pixel_ratio: 2.0,
            max_frames: None,
            target_fps: Some(60.0),
        }
    }
}

/// Main engine struct
pub struct Engine<S: RenderSurface> {
    surface: S,
    viewport: Viewport,
    events: VecDeque<AppEvent>,
    timer: Timer,
    clock: Stopwatch,
    config: EngineConfig,
    frame: u64,
    running: bool,
}

impl<S: RenderSurface> Engine<S> {
    /// Create an engine drawing to `surface`
    pub fn new(surface: S, config: EngineConfig) -> Result<Self, AppError> {
        log::info!("Initializing engine...");
        let viewport = Viewport::new(
            config.width,
            config.height,
            config.device_pixel_ratio,
            config.max_pixel_ratio,
        );
        let mut surface = surface;
        surface.configure(&viewport)?;

        Ok(Self {
            surface,
            viewport,
            events: VecDeque::new(),
            timer: Timer::new(),
            clock: Stopwatch::new(),
            config,
            frame: 0,
            running: true,
        })
    }

    /// Queue an event for the next frame
    pub fn push_event(&mut self, event: AppEvent) {
        self.events.push_back(event);
    }

    /// Current viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The render surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of frames run
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    fn dispatch_events<A: Application>(&mut self, app: &mut A) -> Result<(), AppError> {
        while let Some(event) = self.events.pop_front() {
            match event {
                AppEvent::Resized {
                    width,
                    height,
                    device_pixel_ratio,
                } => {
                    self.viewport.resize(width, height, device_pixel_ratio);
                    self.surface.configure(&self.viewport)?;
                }
                AppEvent::CloseRequested => self.quit(),
                _ => {}
            }
            app.handle_event(&event, &self.viewport)?;
        }
        Ok(())
    }

    /// Run one frame at an explicit time; hosts with their own clock use this
    pub fn run_frame_at<A: Application>(&mut self, app: &mut A, elapsed: f32) -> Result<(), AppError> {
        self.timer.update();
        self.dispatch_events(app)?;

        let time = FrameTime {
            elapsed,
            delta: self.timer.delta_time(),
            frame: self.frame,
        };
        app.update(time)?;
        app.render(&mut self.surface)?;
        self.frame += 1;
        Ok(())
    }

    /// Run one frame on the engine clock
    pub fn run_frame<A: Application>(&mut self, app: &mut A) -> Result<(), AppError> {
        if !self.clock.is_running() {
            self.clock.start();
        }
        let elapsed = self.clock.elapsed_secs();
        self.run_frame_at(app, elapsed)
    }

    /// Run the main loop until closed or the configured frame limit
    pub fn run<A: Application>(&mut self, app: &mut A) -> Result<(), AppError> {
        app.initialize(&self.viewport)?;
        log::info!("Starting main loop...");

        let pacing = self
            .config
            .target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));

        while self.running {
            if self.config.max_frames.is_some_and(|max| self.frame >= max) {
                break;
            }
            self.run_frame(app)?;
            if let Some(interval) = pacing {
                std::thread::sleep(interval);
            }
        }

        app.cleanup();
        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            self.frame,
            self.timer.average_fps()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::camera::Camera;
    use crate::render::draw_list::DrawList;
    use crate::render::host::HeadlessSurface;

    #[derive(Default)]
    struct Recorder {
        initialized: bool,
        times: Vec<f32>,
        events: Vec<AppEvent>,
        cleaned_up: bool,
    }

    impl Application for Recorder {
        fn initialize(&mut self, _viewport: &Viewport) -> Result<(), AppError> {
            self.initialized = true;
            Ok(())
        }

        fn update(&mut self, time: FrameTime) -> Result<(), AppError> {
            self.times.push(time.elapsed);
            Ok(())
        }

        fn render(&mut self, surface: &mut dyn RenderSurface) -> Result<(), AppError> {
            surface.draw(&DrawList::default(), &Camera::default())?;
            Ok(())
        }

        fn handle_event(&mut self, event: &AppEvent, _viewport: &Viewport) -> Result<(), AppError> {
            self.events.push(event.clone());
            Ok(())
        }

        fn cleanup(&mut self) {
            self.cleaned_up = true;
        }
    }

    fn config(frames: u64) -> EngineConfig {
        EngineConfig {
            max_frames: Some(frames),
            target_fps: None,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_run_stops_at_frame_limit() {
        let mut engine = Engine::new(HeadlessSurface::new(), config(3)).unwrap();
        let mut app = Recorder::default();
        engine.run(&mut app).unwrap();

        assert!(app.initialized && app.cleaned_up);
        assert_eq!(app.times.len(), 3);
        assert!(app.times.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(engine.surface().frames_drawn(), 3);
    }

    #[test]
    fn test_resize_reconfigures_surface() {
        let mut engine = Engine::new(HeadlessSurface::new(), config(1)).unwrap();
        let mut app = Recorder::default();
        let resize = AppEvent::Resized {
            width: 1024,
            height: 768,
            device_pixel_ratio: 3.0,
        };
        engine.push_event(resize.clone());
        engine.run_frame_at(&mut app, 1.5).unwrap();

        assert_eq!(engine.surface().size(), (1024, 768));
        assert_eq!(engine.surface().pixel_ratio(), 2.0);
        assert_eq!(app.events, vec![resize]);
        assert_eq!(app.times, vec![1.5]);
    }

    #[test]
    fn test_close_request_ends_loop() {
        let mut engine = Engine::new(HeadlessSurface::new(), config(100)).unwrap();
        engine.push_event(AppEvent::CloseRequested);
        let mut app = Recorder::default();
        engine.run(&mut app).unwrap();
        assert_eq!(engine.frame_count(), 1);
        assert!(!engine.is_running());
    }
}
