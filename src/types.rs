// src/types.rs
//
// Common shared types for the reacher environment.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A 3D position (goal targets, body positions).
pub type Pose = Point3<f64>;

/// Number of actuated joints on the arm.
pub const JOINT_COUNT: usize = 6;

/// Joint subset driven in simple mode. Joints 0 and 3 are the two yaw
/// joints; holding them at zero keeps the arm in the y-z plane.
pub const SIMPLE_JOINTS: [usize; 4] = [1, 2, 4, 5];

/// Full vs. reduced control of the arm.
///
/// Simple mode drives only `SIMPLE_JOINTS` and drops the goal's x
/// component from the observation. Both the action scatter and the
/// observation projection are derived from the same table, so the two
/// can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    Full,
    Simple,
}

impl ControlMode {
    /// Number of action components the caller supplies.
    pub fn action_dim(self) -> usize {
        match self {
            ControlMode::Full => JOINT_COUNT,
            ControlMode::Simple => SIMPLE_JOINTS.len(),
        }
    }

    /// Number of goal components carried in the observation.
    pub fn goal_dims(self) -> usize {
        match self {
            ControlMode::Full => 3,
            ControlMode::Simple => 2,
        }
    }

    /// Flat observation length: joint angles + velocities + goal.
    pub fn observation_dim(self) -> usize {
        2 * self.action_dim() + self.goal_dims()
    }

    /// Joint indices the mode actuates and observes, in order.
    pub fn active_joints(self) -> &'static [usize] {
        const ALL: [usize; JOINT_COUNT] = [0, 1, 2, 3, 4, 5];
        match self {
            ControlMode::Full => &ALL,
            ControlMode::Simple => &SIMPLE_JOINTS,
        }
    }

    /// Indices of the normalized goal components kept in the observation.
    ///
    /// Simple mode pins the goal's x to the region center, so only the
    /// (y, z) components carry information.
    pub fn goal_components(self) -> &'static [usize] {
        match self {
            ControlMode::Full => &[0, 1, 2],
            ControlMode::Simple => &[1, 2],
        }
    }

    /// Scatter a mode-sized action into a full 6-joint command, excluded
    /// joints held at the neutral value. Components are clamped to [-1, 1].
    pub fn scatter(self, action: &[f64]) -> [f64; JOINT_COUNT] {
        let mut command = [0.0; JOINT_COUNT];
        for (slot, &joint) in self.active_joints().iter().enumerate() {
            command[joint] = action[slot].clamp(-1.0, 1.0);
        }
        command
    }
}

/// Joint angles and velocities in normalized [-1, 1] units.
///
/// Angles are normalized by the ±90° joint limit, velocities by the
/// velocity bound. This is the unit system shared by `act`, `set`, and
/// `observe` on the robot collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointState {
    pub qpos: [f64; JOINT_COUNT],
    pub qvel: [f64; JOINT_COUNT],
}

impl JointState {
    /// State with the given angles and zero velocities.
    pub fn at_rest(qpos: [f64; JOINT_COUNT]) -> Self {
        Self {
            qpos,
            qvel: [0.0; JOINT_COUNT],
        }
    }
}

impl Default for JointState {
    fn default() -> Self {
        Self::at_rest([0.0; JOINT_COUNT])
    }
}
