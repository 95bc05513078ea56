// src/goal.rs
//
// Goal sampling for the reacher task.
//
// - GoalSampler: deterministic seeded rejection sampler over the
//   configured region (full 3D or reduced y-z variant).
// - normalize: pure affine map from an absolute pose into the [-1, 1]
//   observation range, sharing the region parameters with the sampler.
//
// All sampling is deterministic given a seed.

use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{ConfigError, GoalRegion};
use crate::types::Pose;

/// Rejection draws allowed before sampling fails as a configuration
/// error. The documented region parameterizations accept well over half
/// of all draws, so hitting this budget means the constraints are
/// infeasible, not unlucky.
pub const MAX_SAMPLE_ATTEMPTS: usize = 10_000;

/// Deterministic goal sampler over a bounded region.
pub struct GoalSampler {
    region: GoalRegion,
    rng: ChaCha8Rng,
}

impl GoalSampler {
    /// Create a sampler over `region`, validating the geometry eagerly.
    pub fn new(region: GoalRegion, seed: u64) -> Result<Self, ConfigError> {
        region.validate()?;
        Ok(Self {
            region,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Reseed the RNG.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn region(&self) -> &GoalRegion {
        &self.region
    }

    /// Draw a goal inside the 3D region, at least `min_dist` from the
    /// region center.
    pub fn sample_point(&mut self) -> Result<Pose, ConfigError> {
        let r = self.region.radius;
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let dx = self.rng.gen_range(-r..=r);
            let offset = self.sample_yz_offset(dx);
            if offset.norm() >= self.region.min_dist {
                return Ok(self.region.center + offset);
            }
        }
        Err(ConfigError::SamplingExhausted {
            attempts: MAX_SAMPLE_ATTEMPTS,
        })
    }

    /// Draw a reduced 2-DoF goal: x pinned to the region center, (y, z)
    /// sampled under the same constraints.
    pub fn sample_simple_point(&mut self) -> Result<Pose, ConfigError> {
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let offset = self.sample_yz_offset(0.0);
            if offset.norm() >= self.region.min_dist {
                return Ok(self.region.center + offset);
            }
        }
        Err(ConfigError::SamplingExhausted {
            attempts: MAX_SAMPLE_ATTEMPTS,
        })
    }

    fn sample_yz_offset(&mut self, dx: f64) -> Vector3<f64> {
        let r = self.region.radius;
        let dy = if self.region.halfsphere {
            self.rng.gen_range(0.0..=r)
        } else {
            self.rng.gen_range(-r..=r)
        };
        let dz = self.rng.gen_range(0.0..=self.region.height);
        Vector3::new(dx, dy, dz)
    }

    /// Map an absolute pose into the [-1, 1] observation range.
    ///
    /// Deterministic and stateless: x and y are scaled by the radius
    /// around the center, z affinely maps [cz, cz+h] onto [-1, 1]. Every
    /// pose returned by the samplers lands inside [-1, 1]^3.
    pub fn normalize(&self, goal: &Pose) -> [f64; 3] {
        let c = &self.region.center;
        [
            (goal.x - c.x) / self.region.radius,
            (goal.y - c.y) / self.region.radius,
            2.0 * (goal.z - c.z) / self.region.height - 1.0,
        ]
    }
}
