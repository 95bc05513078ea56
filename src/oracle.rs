// src/oracle.rs
//
// Distance oracle between two body attachment points.
//
// The oracle never owns the bodies: it holds back-references (body
// identifiers) supplied by the orchestrating environment, and the
// environment rebinds the public fields after a hard reset replaces
// the bodies. Querying through a stale identifier fails with
// `WorldError::StaleBody`.

use crate::sim::{BodyId, World, WorldError};
use crate::types::Pose;

/// Separation query between attachment `link_a` on `body_a` and
/// attachment `link_b` on `body_b`.
///
/// The `goal` field is an informational mirror of the environment's
/// current goal; the authoritative copy lives on the environment.
#[derive(Debug, Clone)]
pub struct DistanceOracle {
    pub body_a: BodyId,
    pub link_a: usize,
    pub body_b: BodyId,
    pub link_b: usize,
    pub goal: Option<Pose>,
}

impl DistanceOracle {
    pub fn new(body_a: BodyId, link_a: usize, body_b: BodyId, link_b: usize) -> Self {
        Self {
            body_a,
            link_a,
            body_b,
            link_b,
            goal: None,
        }
    }

    /// Euclidean distance between the two attachment points, from live
    /// world positions.
    pub fn query(&self, world: &World) -> Result<f64, WorldError> {
        let a = world.attachment(self.body_a, self.link_a)?;
        let b = world.attachment(self.body_b, self.link_b)?;
        Ok((a - b).norm())
    }
}
