//! Orbit camera controls
//!
//! Rotates and dollies a [`Camera`] around a target point. Input accumulates
//! into a pending spherical delta; [`OrbitControls::update`] applies it once
//! per frame. With damping enabled only a fraction of the delta is applied
//! per update and the rest decays, which eases the camera to rest.

use crate::foundation::math::{constants::TAU, Vec3};
use crate::render::camera::Camera;

const EPSILON: f32 = 1e-6;

/// Spherical coordinates around the orbit target, Y up
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Azimuth measured from +Z toward +X
    theta: f32,
    /// Polar angle measured from +Y
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.norm();
        if radius == 0.0 {
            return Self { radius, theta: 0.0, phi: 0.0 };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Orbit controls state
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Point the camera orbits
    pub target: Vec3,
    /// Ease motion over several frames
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update when damping
    pub damping_factor: f32,
    /// Multiplier on pointer rotation
    pub rotate_speed: f32,
    /// Exponent on the per-notch dolly scale
    pub zoom_speed: f32,
    /// Closest allowed distance to the target
    pub min_distance: f32,
    /// Farthest allowed distance to the target
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::zeros(),
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    /// Damped controls orbiting `target`
    pub fn damped(target: Vec3, damping_factor: f32) -> Self {
        Self {
            target,
            enable_damping: true,
            damping_factor,
            ..Self::default()
        }
    }

    /// Queue a rotation from a pointer drag of `(dx, dy)` pixels
    ///
    /// A drag across the full viewport height turns the camera once around.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.rotate_left(TAU * dx / viewport_height * self.rotate_speed);
        self.rotate_up(TAU * dy / viewport_height * self.rotate_speed);
    }

    /// Queue an azimuth change
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Queue a polar angle change
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Queue a dolly from wheel motion; negative moves toward the target
    pub fn dolly(&mut self, wheel_delta: f32) {
        let step = 0.95_f32.powf(self.zoom_speed);
        if wheel_delta < 0.0 {
            self.scale *= step;
        } else if wheel_delta > 0.0 {
            self.scale /= step;
        }
    }

    /// Whether queued motion remains to be applied
    pub fn is_settled(&self) -> bool {
        self.delta_theta.abs() < EPSILON && self.delta_phi.abs() < EPSILON && self.scale == 1.0
    }

    /// Apply queued motion to `camera`; returns whether the camera moved
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_offset(offset);

        let factor = if self.enable_damping { self.damping_factor } else { 1.0 };
        spherical.theta += self.delta_theta * factor;
        spherical.phi += self.delta_phi * factor;
        spherical.phi = spherical.phi.clamp(EPSILON, std::f32::consts::PI - EPSILON);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let position = self.target + spherical.to_offset();
        let moved = (position - camera.position).norm_squared() > EPSILON;
        camera.set_position(position);
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        moved
    }
}

/// A camera driven by orbit controls
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// The camera being moved
    pub camera: Camera,
    /// Orbit input state
    pub controls: OrbitControls,
}

impl CameraRig {
    /// Pair a camera with controls; the camera is turned toward the orbit target
    pub fn new(mut camera: Camera, controls: OrbitControls) -> Self {
        camera.look_at(controls.target);
        Self { camera, controls }
    }

    /// Advance control easing by one frame
    pub fn update(&mut self) -> bool {
        let moved = self.controls.update(&mut self.camera);
        if moved {
            log::trace!("Camera moved to {:?}", self.camera.position);
        }
        moved
    }
}
