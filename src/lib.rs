//! Reacher core library.
//!
//! This crate exposes a goal-reaching RL environment for a simulated
//! 6-joint arm. The binary (`src/bin/rollout.rs`) is just a thin
//! research harness around these components.
//!
//! # Architecture
//!
//! The codebase separates episode control logic from the physics
//! collaborator it drives:
//!
//! - **Types** (`types`): shared poses, joint state, and the
//!   `ControlMode` index table that keeps action scattering and
//!   observation projection consistent.
//!
//! - **Config** (`config`): goal-region geometry, actuation limits, and
//!   the tuned lifecycle constants, validated eagerly.
//!
//! - **Sim** (`sim`): synthetic physics collaborator — an explicitly
//!   passed `World` handle with generational body ids, plus `Robot` and
//!   `Ball` handles. Swappable for a real engine behind the same
//!   interface.
//!
//! - **Goal** (`goal`): deterministic seeded goal sampler and the pure
//!   [-1, 1] normalization map.
//!
//! - **Oracle** (`oracle`): end-effector/ball separation queries over
//!   re-bindable body references.
//!
//! - **Env** (`env`): the episode state machine — seed, reset (soft +
//!   periodic hard), step with reward/termination, close.
//!
//! - **Telemetry** (`telemetry`) and **Metrics** (`metrics`): JSONL
//!   rollout sinks and online statistics for the harness.

pub mod config;
pub mod env;
pub mod goal;
pub mod metrics;
pub mod observation;
pub mod oracle;
pub mod sim;
pub mod telemetry;
pub mod types;

// --- Re-exports for ergonomic external use ---------------------------------

pub use config::{
    ConfigError, GoalRegion, ReacherConfig, DEFAULT_RESTART_EVERY_N_EPISODES,
    DEFAULT_SUCCESS_DISTANCE, SUCCESS_REWARD,
};

pub use env::{reward_for_separation, EnvError, Lifecycle, ReacherEnv, StepInfo, StepResult};

pub use goal::{GoalSampler, MAX_SAMPLE_ATTEMPTS};

pub use metrics::OnlineStats;

pub use observation::Observation;

pub use oracle::DistanceOracle;

pub use sim::{Ball, BodyId, Robot, World, WorldError, BALL_LINK, EFFECTOR_LINK};

pub use telemetry::{FileSink, NoopSink, ResetRecord, RolloutSink, TickRecord};

pub use types::{ControlMode, JointState, Pose, JOINT_COUNT, SIMPLE_JOINTS};
