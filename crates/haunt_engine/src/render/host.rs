//! Render host contract
//!
//! A [`RenderSurface`] is whatever turns a [`DrawList`] into pixels. The
//! engine owns the [`Viewport`], pushes size changes to the surface, and hands
//! it one draw list per frame. [`HeadlessSurface`] is a surface that only
//! records what it was asked to do.

use crate::foundation::math::Mat4;
use crate::render::camera::Camera;
use crate::render::draw_list::DrawList;
use thiserror::Error;

/// Output size and pixel density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS-style logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
    /// Applied device pixel ratio
    pub pixel_ratio: f32,
    /// Upper bound on the applied pixel ratio
    pub max_pixel_ratio: f32,
}

impl Viewport {
    /// Viewport of the given size, device pixel ratio capped at `max_pixel_ratio`
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32, max_pixel_ratio: f32) -> Self {
        let mut viewport = Self {
            width,
            height,
            pixel_ratio: 1.0,
            max_pixel_ratio,
        };
        viewport.resize(width, height, device_pixel_ratio);
        viewport
    }

    /// Apply a new size and device pixel ratio
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = device_pixel_ratio.min(self.max_pixel_ratio);
        log::debug!("Viewport resized to {width}x{height} @ {:.2}x", self.pixel_ratio);
    }

    /// Width over height; 1 for a degenerate viewport
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Backing buffer size in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| (v as f32 * self.pixel_ratio).round() as u32;
        (scale(self.width), scale(self.height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0, 2.0)
    }
}

/// Render surface errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The surface can no longer be drawn to
    #[error("Surface lost: {0}")]
    SurfaceLost(String),
}

/// Something that can draw frames
pub trait RenderSurface {
    /// Adopt a new output size and pixel ratio
    fn configure(&mut self, viewport: &Viewport) -> Result<(), RenderError>;

    /// Draw one frame
    fn draw(&mut self, frame: &DrawList, camera: &Camera) -> Result<(), RenderError>;
}

/// Surface that records instead of drawing
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    size: (u32, u32),
    pixel_ratio: f32,
    frames_drawn: u64,
    last_frame: Option<DrawList>,
    last_view_projection: Option<Mat4>,
}

impl HeadlessSurface {
    /// Unconfigured surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Output size in logical pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Applied pixel ratio
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Number of frames drawn
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// The most recent draw list
    pub fn last_frame(&self) -> Option<&DrawList> {
        self.last_frame.as_ref()
    }

    /// Camera matrix of the most recent frame
    pub fn last_view_projection(&self) -> Option<Mat4> {
        self.last_view_projection
    }
}

impl RenderSurface for HeadlessSurface {
    fn configure(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        self.size = (viewport.width, viewport.height);
        self.pixel_ratio = viewport.pixel_ratio;
        Ok(())
    }

    fn draw(&mut self, frame: &DrawList, camera: &Camera) -> Result<(), RenderError> {
        self.frames_drawn += 1;
        if self.frames_drawn == 1 {
            log::debug!(
                "First headless frame: {} meshes, {} lights ({} shadow-mapped)",
                frame.item_count(),
                frame.lights.len(),
                frame.shadow_caster_lights()
            );
        }
        self.last_view_projection = Some(camera.view_projection_matrix());
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_is_capped() {
        let mut viewport = Viewport::default();
        viewport.resize(800, 600, 3.0);
        assert_eq!((viewport.width, viewport.height), (800, 600));
        assert_eq!(viewport.pixel_ratio, 2.0);
        assert_eq!(viewport.physical_size(), (1600, 1200));

        viewport.resize(800, 600, 1.5);
        assert_eq!(viewport.pixel_ratio, 1.5);
    }

    #[test]
    fn test_headless_records_configuration() {
        let mut surface = HeadlessSurface::new();
        let viewport = Viewport::new(640, 480, 2.5, 2.0);
        surface.configure(&viewport).unwrap();
        assert_eq!(surface.size(), (640, 480));
        assert_eq!(surface.pixel_ratio(), 2.0);
        assert_eq!(surface.frames_drawn(), 0);
    }

    #[test]
    fn test_degenerate_aspect() {
        let viewport = Viewport::new(100, 0, 1.0, 2.0);
        assert_eq!(viewport.aspect(), 1.0);
    }
}
