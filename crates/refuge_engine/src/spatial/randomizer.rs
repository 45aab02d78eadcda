//! Random in-bounds placement

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GroundConfig;
use crate::foundation::math::Vec3;

/// Produces random positions on the ground plane
///
/// Positions stay within [`GroundConfig::spawn_extent`] so nothing is placed
/// on the very edge of the ground.
#[derive(Debug, Clone)]
pub struct SpatialRandomizer {
    rng: StdRng,
}

impl SpatialRandomizer {
    /// Create a randomizer; `None` seeds from entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Random position on `ground` at height `y`
    pub fn random_position(&mut self, ground: &GroundConfig, y: f32) -> Vec3 {
        let (half_x, half_z) = ground.spawn_extent();
        Vec3::new(self.symmetric(half_x), y, self.symmetric(half_z))
    }

    /// Uniform value in `[-extent, extent]`
    ///
    /// Non-positive and non-finite extents collapse to zero.
    pub fn symmetric(&mut self, extent: f32) -> f32 {
        if !extent.is_finite() || extent <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-extent..=extent)
    }
}

impl Default for SpatialRandomizer {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_stay_in_bounds() {
        let ground = GroundConfig { width: 100.0, depth: 60.0 };
        let mut randomizer = SpatialRandomizer::new(Some(11));

        for _ in 0..1000 {
            let position = randomizer.random_position(&ground, 2.0);
            assert!(position.x.abs() <= 47.5);
            assert!(position.z.abs() <= 28.5);
            assert_eq!(position.y, 2.0);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let ground = GroundConfig::default();
        let mut a = SpatialRandomizer::new(Some(42));
        let mut b = SpatialRandomizer::new(Some(42));

        for _ in 0..10 {
            assert_eq!(a.random_position(&ground, 0.0), b.random_position(&ground, 0.0));
        }
    }

    #[test]
    fn test_degenerate_ground() {
        let ground = GroundConfig { width: 0.0, depth: 0.0 };
        let mut randomizer = SpatialRandomizer::new(Some(1));
        assert_eq!(randomizer.random_position(&ground, 1.5), Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn test_non_finite_ground_places_at_origin() {
        let ground = GroundConfig { width: f32::NAN, depth: f32::INFINITY };
        let mut randomizer = SpatialRandomizer::new(Some(5));

        assert_eq!(randomizer.random_position(&ground, 0.0), Vec3::zeros());
        assert_eq!(randomizer.symmetric(f32::NAN), 0.0);
    }
}
