// src/observation.rs
//
// Observation schema for policy input.
//
// Design requirements (matching the task contract):
// - Every component normalized to [-1, 1]
// - Deterministic ordering (fixed vectors, no maps) for reproducibility
// - Serializable (serde) for telemetry, replay, and determinism tests

use serde::{Deserialize, Serialize};

/// State snapshot handed to the policy after a step or reset.
///
/// `qpos`/`qvel` carry the active joints only (6 in full mode, 4 in
/// simple mode) and `goal` the active normalized goal components (3 or
/// 2), so the flat vector length is 15 or 10 respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Normalized joint angles of the active joints.
    pub qpos: Vec<f64>,
    /// Normalized joint velocities of the active joints.
    pub qvel: Vec<f64>,
    /// Normalized goal components carried in the observation.
    pub goal: Vec<f64>,
}

impl Observation {
    /// Flat policy input: angles, then velocities, then goal.
    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.qpos);
        out.extend_from_slice(&self.qvel);
        out.extend_from_slice(&self.goal);
        out
    }

    /// Flat observation length (2N + goal dims).
    pub fn len(&self) -> usize {
        self.qpos.len() + self.qvel.len() + self.goal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical JSON encoding, used by determinism tests to compare
    /// observation streams byte-for-byte.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
