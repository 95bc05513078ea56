// src/sim/robot.rs
//
// Six-joint arm collaborator.
//
// Actuation is a bounded position servo: each joint tracks its target
// angle at up to `max_vel`, gaining speed at a rate set by `max_force`.
// Attachment points come from forward kinematics over a fixed
// yaw/pitch/pitch/yaw/pitch/pitch chain; the end-effector is the last
// chain point. The servo brakes instantly but accelerates gradually,
// which is why the environment's reset issues a warm-up command + tick
// before the first real step.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{UnitQuaternion, Vector3};

use crate::sim::world::{Body, BodyId, World, WorldError};
use crate::types::{JointState, Pose, JOINT_COUNT};

/// Joint travel limit. Commands and observations are normalized by this.
pub const JOINT_LIMIT_RAD: f64 = FRAC_PI_2;

/// Velocity normalization reference (rad/s). Fixed so that `set`,
/// `observe`, and telemetry share one unit system regardless of the
/// per-command velocity bound.
pub const VEL_NORM_RAD_S: f64 = 18.0;

/// Attachment index of the end-effector tip (last chain point).
pub const EFFECTOR_LINK: usize = 6;

/// Pedestal height from the world origin to the first joint.
pub(crate) const BASE_HEIGHT: f64 = 0.033;

/// Segment lengths between consecutive joints, base to tip.
pub(crate) const LINK_LENGTHS: [f64; JOINT_COUNT] = [0.055, 0.060, 0.045, 0.055, 0.045, 0.060];

/// Servo acceleration per unit of commanded force (rad/s^2).
const ACCEL_PER_FORCE: f64 = 400.0;

/// Hysteresis deadband applied when the backlash model is enabled.
const BACKLASH_RAD: f64 = 0.005;

#[derive(Debug, Clone, Copy)]
enum JointAxis {
    Yaw,
    Pitch,
}

const JOINT_AXES: [JointAxis; JOINT_COUNT] = [
    JointAxis::Yaw,
    JointAxis::Pitch,
    JointAxis::Pitch,
    JointAxis::Yaw,
    JointAxis::Pitch,
    JointAxis::Pitch,
];

/// Internal arm state, stored in the world. Angles in radians.
pub(crate) struct ArmBody {
    qpos: [f64; JOINT_COUNT],
    qvel: [f64; JOINT_COUNT],
    target: [f64; JOINT_COUNT],
    max_force: f64,
    max_vel: f64,
    backlash: bool,
}

impl ArmBody {
    pub(crate) fn new(backlash: bool) -> Self {
        Self {
            qpos: [0.0; JOINT_COUNT],
            qvel: [0.0; JOINT_COUNT],
            target: [0.0; JOINT_COUNT],
            max_force: 1.0,
            max_vel: VEL_NORM_RAD_S,
            backlash,
        }
    }

    fn act(&mut self, command: &[f64; JOINT_COUNT], max_force: f64, max_vel: f64) {
        for (target, &cmd) in self.target.iter_mut().zip(command.iter()) {
            *target = cmd.clamp(-1.0, 1.0) * JOINT_LIMIT_RAD;
        }
        self.max_force = max_force.max(0.0);
        self.max_vel = max_vel.max(0.0);
    }

    fn observe(&self) -> JointState {
        let mut state = JointState::default();
        for i in 0..JOINT_COUNT {
            state.qpos[i] = (self.qpos[i] / JOINT_LIMIT_RAD).clamp(-1.0, 1.0);
            state.qvel[i] = (self.qvel[i] / VEL_NORM_RAD_S).clamp(-1.0, 1.0);
        }
        state
    }

    fn set(&mut self, state: &JointState) {
        for i in 0..JOINT_COUNT {
            self.qpos[i] = state.qpos[i].clamp(-1.0, 1.0) * JOINT_LIMIT_RAD;
            self.qvel[i] = state.qvel[i].clamp(-1.0, 1.0) * VEL_NORM_RAD_S;
        }
    }

    fn soft_reset(&mut self) {
        self.qpos = [0.0; JOINT_COUNT];
        self.qvel = [0.0; JOINT_COUNT];
        self.target = [0.0; JOINT_COUNT];
    }

    pub(crate) fn step(&mut self, dt: f64) {
        let accel = self.max_force * ACCEL_PER_FORCE * dt;
        for i in 0..JOINT_COUNT {
            let mut err = self.target[i] - self.qpos[i];
            if self.backlash {
                if err.abs() <= BACKLASH_RAD {
                    err = 0.0;
                } else {
                    err -= BACKLASH_RAD * err.signum();
                }
            }

            let v_des = (err / dt).clamp(-self.max_vel, self.max_vel);
            let v = if v_des * self.qvel[i] >= 0.0 && v_des.abs() <= self.qvel[i].abs() {
                // Braking within the current direction is immediate.
                v_des
            } else {
                self.qvel[i] + (v_des - self.qvel[i]).clamp(-accel, accel)
            };

            self.qvel[i] = v;
            self.qpos[i] = (self.qpos[i] + v * dt).clamp(-JOINT_LIMIT_RAD, JOINT_LIMIT_RAD);
        }
    }

    /// World-frame position of chain point `link`: 0 is the base top,
    /// `k` is the far end of segment `k-1`, `EFFECTOR_LINK` is the tip.
    pub(crate) fn attachment(&self, link: usize) -> Option<Pose> {
        if link > EFFECTOR_LINK {
            return None;
        }
        let mut pos = Vector3::new(0.0, 0.0, BASE_HEIGHT);
        let mut rot = UnitQuaternion::identity();
        for i in 0..link {
            let axis = match JOINT_AXES[i] {
                JointAxis::Yaw => Vector3::z_axis(),
                JointAxis::Pitch => Vector3::x_axis(),
            };
            rot *= UnitQuaternion::from_axis_angle(&axis, self.qpos[i]);
            pos += rot * (Vector3::z() * LINK_LENGTHS[i]);
        }
        Some(Pose::from(pos))
    }
}

/// Handle to the arm body in a world.
///
/// `id` is the stable body identifier; it changes on `hard_reset`, and
/// holders of the old value (the distance oracle) must be rebound by
/// the orchestrating environment.
pub struct Robot {
    pub id: BodyId,
    backlash: bool,
}

impl Robot {
    pub fn spawn(world: &mut World, backlash: bool) -> Self {
        let id = world.spawn(Body::Arm(ArmBody::new(backlash)));
        Self { id, backlash }
    }

    /// Issue a bounded actuation command (normalized target angles).
    pub fn act(
        &self,
        world: &mut World,
        command: &[f64; JOINT_COUNT],
        max_force: f64,
        max_vel: f64,
    ) -> Result<(), WorldError> {
        world.arm_mut(self.id)?.act(command, max_force, max_vel);
        Ok(())
    }

    /// Current joint angles + velocities in normalized units.
    pub fn observe(&self, world: &World) -> Result<JointState, WorldError> {
        Ok(world.arm(self.id)?.observe())
    }

    /// Force-set pose/velocity without physical actuation.
    pub fn set(&self, world: &mut World, state: &JointState) -> Result<(), WorldError> {
        world.arm_mut(self.id)?.set(state);
        Ok(())
    }

    /// Soft reset: re-zero the existing body in place.
    pub fn reset(&self, world: &mut World) -> Result<(), WorldError> {
        world.arm_mut(self.id)?.soft_reset();
        Ok(())
    }

    /// Destroy and recreate the body. Invalidates the previous `id`.
    pub fn hard_reset(&mut self, world: &mut World) -> Result<(), WorldError> {
        world.remove(self.id)?;
        self.id = world.spawn(Body::Arm(ArmBody::new(self.backlash)));
        Ok(())
    }

    /// Release the body.
    pub fn close(&self, world: &mut World) -> Result<(), WorldError> {
        world.remove(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rest_effector_is_straight_up() {
        let arm = ArmBody::new(false);
        let tip = arm.attachment(EFFECTOR_LINK).unwrap();
        let reach: f64 = BASE_HEIGHT + LINK_LENGTHS.iter().sum::<f64>();
        assert_relative_eq!(tip.x, 0.0);
        assert_relative_eq!(tip.y, 0.0);
        assert_relative_eq!(tip.z, reach);
    }

    #[test]
    fn test_attachment_out_of_range() {
        let arm = ArmBody::new(false);
        assert!(arm.attachment(EFFECTOR_LINK + 1).is_none());
        assert!(arm.attachment(0).is_some());
    }

    #[test]
    fn test_servo_converges_to_target() {
        let mut arm = ArmBody::new(false);
        arm.act(&[0.2; JOINT_COUNT], 1.0, 18.0);
        for _ in 0..50 {
            arm.step(crate::sim::world::DT);
        }
        let obs = arm.observe();
        for q in obs.qpos {
            assert_relative_eq!(q, 0.2, epsilon = 1e-9);
        }
        for v in obs.qvel {
            assert_relative_eq!(v, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_backlash_leaves_a_gap_within_deadband() {
        let mut arm = ArmBody::new(true);
        arm.act(&[0.2; JOINT_COUNT], 1.0, 18.0);
        for _ in 0..50 {
            arm.step(crate::sim::world::DT);
        }
        let target = 0.2 * JOINT_LIMIT_RAD;
        for q in arm.qpos {
            let gap = (target - q).abs();
            assert!(gap <= BACKLASH_RAD + 1e-9, "gap {} exceeds deadband", gap);
            assert!(gap > 0.0);
        }
    }

    #[test]
    fn test_velocity_bound_limits_progress() {
        let mut arm = ArmBody::new(false);
        // Large target, tiny velocity bound: one tick must move at most
        // max_vel * dt.
        arm.act(&[1.0; JOINT_COUNT], 10.0, 0.5);
        arm.step(crate::sim::world::DT);
        for q in arm.qpos {
            assert!(q <= 0.5 * crate::sim::world::DT + 1e-12);
        }
    }

    #[test]
    fn test_set_and_observe_round_trip() {
        let mut arm = ArmBody::new(false);
        let state = JointState {
            qpos: [0.1, -0.2, 0.3, -0.4, 0.5, -0.6],
            qvel: [0.0; JOINT_COUNT],
        };
        arm.set(&state);
        let obs = arm.observe();
        for (a, b) in obs.qpos.iter().zip(state.qpos.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hard_reset_changes_id() {
        let mut world = World::new();
        let mut robot = Robot::spawn(&mut world, false);
        let old = robot.id;
        robot.hard_reset(&mut world).unwrap();
        assert_ne!(robot.id, old);
        assert!(robot.observe(&world).is_ok());
    }
}
