//! Ghost animation
//!
//! Ghost positions are closed-form functions of elapsed time. Each frame the
//! animator overwrites the ghost light positions outright, so skipping or
//! repeating a frame never accumulates drift.

use haunt_engine::foundation::color::Color;
use haunt_engine::foundation::math::Vec3;
use haunt_engine::render::CameraRig;
use haunt_engine::scene::{NodeKey, Scene, SceneError};

/// The three wandering lights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ghost {
    /// Magenta, tight circle
    One,
    /// Yellow, wider circle running the other way
    Two,
    /// Blue, wobbling orbit
    Three,
}

impl Ghost {
    /// All ghosts in order
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// Initial light color
    pub fn color(self) -> Color {
        match self {
            Self::One => Color::from_hex(0x00ff_00ff),
            Self::Two => Color::from_hex(0x00ff_ff00),
            Self::Three => Color::from_hex(0x0000_00ff),
        }
    }

    /// Node name
    pub fn name(self) -> &'static str {
        match self {
            Self::One => "ghost1",
            Self::Two => "ghost2",
            Self::Three => "ghost3",
        }
    }
}

/// Position of `ghost` at `t` seconds
///
/// Ghost three's height is `tan(3t)` and blows up near `3t = π/2 + kπ`.
pub fn ghost_position(ghost: Ghost, t: f32) -> Vec3 {
    match ghost {
        Ghost::One => {
            let angle = t * 0.5;
            Vec3::new(angle.sin() * 4.0, (t * 3.0).sin(), angle.cos() * 4.0)
        }
        Ghost::Two => {
            let angle = -t * 0.3;
            Vec3::new(
                angle.sin() * 6.0,
                (t * 4.0).sin() + (t * 2.5).sin(),
                angle.cos() * 6.0,
            )
        }
        Ghost::Three => {
            let angle = t * 0.18;
            let wobble = t * 0.32;
            Vec3::new(
                angle.sin() * (7.0 + wobble.sin()),
                (t * 3.0).tan(),
                angle.cos() * (7.0 + wobble.cos()),
            )
        }
    }
}

/// Moves the ghost lights and eases the camera once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animator {
    ghosts: [NodeKey; 3],
}

impl Animator {
    /// Animate the given ghost light nodes, in [`Ghost::ALL`] order
    pub fn new(ghosts: [NodeKey; 3]) -> Self {
        Self { ghosts }
    }

    /// Pose the scene for `elapsed` seconds
    pub fn advance(&self, elapsed: f32, scene: &mut Scene, rig: &mut CameraRig) -> Result<(), SceneError> {
        for (ghost, node) in Ghost::ALL.into_iter().zip(self.ghosts) {
            scene.set_position(node, ghost_position(ghost, elapsed))?;
        }
        rig.update();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use haunt_engine::foundation::math::constants::PI;

    #[test]
    fn test_start_positions() {
        assert_relative_eq!(ghost_position(Ghost::One, 0.0), Vec3::new(0.0, 0.0, 4.0));
        assert_relative_eq!(ghost_position(Ghost::Two, 0.0), Vec3::new(0.0, 0.0, 6.0));
        assert_relative_eq!(ghost_position(Ghost::Three, 0.0), Vec3::new(0.0, 0.0, 8.0));
    }

    #[test]
    fn test_first_ghost_quarter_turn() {
        let position = ghost_position(Ghost::One, PI);
        assert_relative_eq!(position, Vec3::new(4.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_orbits() {
        for step in 0..500 {
            let t = step as f32 * 0.137;
            let one = ghost_position(Ghost::One, t);
            assert_relative_eq!(one.x.hypot(one.z), 4.0, epsilon = 1e-4);
            assert_relative_eq!(one.y, (3.0 * t).sin());

            let two = ghost_position(Ghost::Two, t);
            assert_relative_eq!(two.x.hypot(two.z), 6.0, epsilon = 1e-4);
            assert!(two.y.abs() <= 2.0);

            let three = ghost_position(Ghost::Three, t);
            let distance = three.x.hypot(three.z);
            assert!((6.0 - 1e-4..=8.0 + 1e-4).contains(&distance), "distance {distance} at t = {t}");
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(Ghost::One.color().to_string(), "#ff00ff");
        assert_eq!(Ghost::Two.color().to_string(), "#ffff00");
        assert_eq!(Ghost::Three.color().to_string(), "#0000ff");
    }
}
