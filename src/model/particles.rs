use glam::Vec3;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::Transform;

/// Fixed point cloud that drifts by rotating as a whole about Y.
pub struct ParticleField {
    pub points: Vec<Vec3>,
    pub transform: Transform,
    /// Radians per tick
    pub drift_speed: f32,
}

impl ParticleField {
    /// Scatter `count` points uniformly in a cube of side `spread` centred on the origin.
    pub fn generate(count: usize, spread: f32, drift_speed: f32, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let half = spread / 2.0;
        let points = if half > 0.0 {
            (0..count)
                .map(|_| {
                    Vec3::new(
                        rng.gen_range(-half..half),
                        rng.gen_range(-half..half),
                        rng.gen_range(-half..half),
                    )
                })
                .collect()
        } else {
            vec![Vec3::ZERO; count]
        };

        Self { points, transform: Transform::default(), drift_speed }
    }

    pub fn tick(&mut self) {
        self.transform.rotation.y += self.drift_speed;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
