//! Grave layout
//!
//! Graves are scattered on an annulus around the house, outside its
//! footprint, each with a slight random tilt. The layout is plain data; the
//! composer turns it into nodes sharing one mesh.

use haunt_engine::foundation::math::{constants::TAU, Transform, Vec3};
use rand::Rng;

/// Inner radius of the grave annulus
pub const INNER_RADIUS: f32 = 3.5;
/// Width of the grave annulus
pub const RING_WIDTH: f32 = 6.0;
/// Height of every grave center
pub const GRAVE_HEIGHT: f32 = 0.3;
/// Largest tilt in either direction, in radians
pub const MAX_TILT: f32 = 0.2;

/// One grave's polar placement and tilt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravePlacement {
    /// Angle around the house, in radians
    pub angle: f32,
    /// Distance from the house center
    pub radius: f32,
    /// Tilt about Y
    pub rotation_y: f32,
    /// Tilt about Z
    pub rotation_z: f32,
}

impl GravePlacement {
    /// Sample one placement
    pub fn sample(rng: &mut impl Rng) -> Self {
        let angle = rng.gen::<f32>() * TAU;
        let radius = INNER_RADIUS + rng.gen::<f32>() * RING_WIDTH;
        let mut tilt = || (rng.gen::<f32>() - 0.5) * 2.0 * MAX_TILT;
        Self {
            angle,
            radius,
            rotation_y: tilt(),
            rotation_z: tilt(),
        }
    }

    /// Position in the graves group
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.angle.sin() * self.radius, GRAVE_HEIGHT, self.angle.cos() * self.radius)
    }

    /// Node transform
    pub fn transform(&self) -> Transform {
        Transform::from_position(self.position()).with_euler(0.0, self.rotation_y, self.rotation_z)
    }
}

/// The full set of graves, generated once
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraveLayout {
    placements: Vec<GravePlacement>,
}

impl GraveLayout {
    /// Sample `count` independent placements
    pub fn generate(rng: &mut impl Rng, count: usize) -> Self {
        let placements = (0..count).map(|_| GravePlacement::sample(rng)).collect();
        Self { placements }
    }

    /// Placements in generation order
    pub fn placements(&self) -> &[GravePlacement] {
        &self.placements
    }

    /// Number of graves
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether there are no graves
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_graves_stay_on_annulus() {
        let layout = GraveLayout::generate(&mut StdRng::seed_from_u64(42), 70);
        assert_eq!(layout.len(), 70);

        for placement in layout.placements() {
            let position = placement.position();
            let distance = position.x.hypot(position.z);
            assert!((INNER_RADIUS - 1e-4..=INNER_RADIUS + RING_WIDTH + 1e-4).contains(&distance));
            assert_eq!(position.y, GRAVE_HEIGHT);
            assert!(placement.rotation_y.abs() <= MAX_TILT);
            assert!(placement.rotation_z.abs() <= MAX_TILT);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let first = GraveLayout::generate(&mut StdRng::seed_from_u64(7), 10);
        let second = GraveLayout::generate(&mut StdRng::seed_from_u64(7), 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let placement = GravePlacement {
            angle: 0.0,
            radius: 5.0,
            rotation_y: 0.1,
            rotation_z: -0.1,
        };
        assert_relative_eq!(placement.position(), Vec3::new(0.0, 0.3, 5.0));
        assert_relative_eq!(placement.transform().position, placement.position());
    }

    #[test]
    fn test_zero_graves() {
        assert!(GraveLayout::generate(&mut StdRng::seed_from_u64(0), 0).is_empty());
    }
}
