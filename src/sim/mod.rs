// src/sim/mod.rs
//
// Synthetic physics collaborator for the reacher environment.
//
// The real task runs against a rigid-body engine; this module stands in
// for it behind the same interface, the way a synthetic execution
// gateway stands in for real exchange connectors. It provides:
// - World: explicitly passed simulation-context handle (generational
//   body ids, caller-driven ticks, attachment-point queries)
// - Robot: 6-joint arm handle (bounded position servo over a forward-
//   kinematics chain; soft and hard resets)
// - Ball: position-constrained goal marker
//
// The dynamics are intentionally minimal: just enough that settle
// ticks, actuation warm-up, and stale-body failures behave like the
// real collaborator.

pub mod ball;
pub mod robot;
pub mod world;

pub use ball::{Ball, BALL_LINK};
pub use robot::{Robot, EFFECTOR_LINK, JOINT_LIMIT_RAD, VEL_NORM_RAD_S};
pub use world::{BodyId, World, WorldError, DT};
