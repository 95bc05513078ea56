// src/config.rs
//
// Central configuration for the reacher environment.
// This is the single source of truth for the goal-region geometry,
// actuation limits, and the episode-lifecycle constants.
//
// The success distance and the hard-reset interval are empirically
// tuned values carried over from the original task; they are plain
// overridable fields, not derived from geometry.

use crate::types::{ControlMode, Pose};

/// Fixed success bonus paid when the end-effector reaches the goal.
pub const SUCCESS_REWARD: f64 = 1.0;

/// Default separation (distance units) under which an episode succeeds.
pub const DEFAULT_SUCCESS_DISTANCE: f64 = 0.016;

/// Default number of episodes between hard resets of the physics bodies.
pub const DEFAULT_RESTART_EVERY_N_EPISODES: u64 = 1000;

/// World ticks run after a constrained goal move so the ball settles
/// before the arm starts acting.
pub const DEFAULT_SETTLE_TICKS: u32 = 20;

/// Half-width of the uniform initial joint-angle draw, in normalized
/// action units.
pub const DEFAULT_INIT_POSE_RANGE: f64 = 0.2;

/// Geometry of the goal-sampling region.
///
/// Points are drawn from the box `x ∈ [cx-r, cx+r]`, `y ∈ [cy-r, cy+r]`
/// (half region: `y ∈ [cy, cy+r]`), `z ∈ [cz, cz+h]`, and rejected while
/// closer than `min_dist` to the center. The same center/radius/height
/// parameters drive the [-1, 1] observation normalization, so sampled
/// points always normalize in range.
#[derive(Debug, Clone)]
pub struct GoalRegion {
    /// Center offset of the region (the arm's base sits at the origin).
    pub center: Pose,
    /// Horizontal half-extent of the region.
    pub radius: f64,
    /// Vertical extent of the region above the center.
    pub height: f64,
    /// Minimum accepted distance from the center. Rejecting close draws
    /// prevents trivially-easy episodes near the arm's rest pose.
    pub min_dist: f64,
    /// Restrict sampling to the positive-y half of the region.
    pub halfsphere: bool,
}

impl Default for GoalRegion {
    fn default() -> Self {
        Self {
            center: Pose::new(0.0, 0.0369, 0.0437),
            radius: 0.2022,
            height: 0.2610,
            min_dist: 0.1,
            halfsphere: false,
        }
    }
}

impl GoalRegion {
    /// Validate the region geometry.
    ///
    /// Required: `radius > min_dist >= 0` and `height > 0`. Violations are
    /// configuration errors surfaced here, never clamped at sample time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ConfigError::InvalidRadius {
                radius: self.radius,
            });
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ConfigError::InvalidHeight {
                height: self.height,
            });
        }
        if !self.min_dist.is_finite() || self.min_dist < 0.0 || self.min_dist >= self.radius {
            return Err(ConfigError::InvalidMinDist {
                min_dist: self.min_dist,
                radius: self.radius,
            });
        }
        Ok(())
    }
}

/// Environment configuration.
#[derive(Debug, Clone)]
pub struct ReacherConfig {
    /// Full 6-joint control or the reduced 4-joint subset.
    pub mode: ControlMode,
    /// Enable the servo backlash model.
    pub backlash: bool,
    /// Actuation force bound forwarded to the robot on every command.
    pub max_force: f64,
    /// Joint velocity bound (normalized-units reference is this value
    /// in rad/s) forwarded to the robot on every command.
    pub max_vel: f64,
    /// Goal-sampling region.
    pub goal_region: GoalRegion,
    /// Separation at or under which the episode succeeds.
    pub success_distance: f64,
    /// Episodes between hard resets of the physics bodies.
    pub restart_every_n_episodes: u64,
    /// Ticks to let the constrained goal move settle during reset.
    pub settle_ticks: u32,
    /// Half-width of the uniform initial joint-angle draw.
    pub init_pose_range: f64,
}

impl Default for ReacherConfig {
    fn default() -> Self {
        Self {
            mode: ControlMode::Full,
            backlash: false,
            max_force: 1.0,
            max_vel: 18.0,
            goal_region: GoalRegion::default(),
            success_distance: DEFAULT_SUCCESS_DISTANCE,
            restart_every_n_episodes: DEFAULT_RESTART_EVERY_N_EPISODES,
            settle_ticks: DEFAULT_SETTLE_TICKS,
            init_pose_range: DEFAULT_INIT_POSE_RANGE,
        }
    }
}

impl ReacherConfig {
    /// Config for the reduced 4-joint task.
    pub fn simple() -> Self {
        Self {
            mode: ControlMode::Simple,
            ..Self::default()
        }
    }

    /// Config restricting goals to the positive-y half region.
    pub fn halfsphere() -> Self {
        let mut cfg = Self::default();
        cfg.goal_region.halfsphere = true;
        cfg
    }
}

/// Errors raised by invalid or infeasible configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidRadius { radius: f64 },
    InvalidHeight { height: f64 },
    InvalidMinDist { min_dist: f64, radius: f64 },
    SamplingExhausted { attempts: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidRadius { radius } => {
                write!(f, "goal region radius must be positive, got {}", radius)
            }
            ConfigError::InvalidHeight { height } => {
                write!(f, "goal region height must be positive, got {}", height)
            }
            ConfigError::InvalidMinDist { min_dist, radius } => {
                write!(
                    f,
                    "goal min_dist must satisfy 0 <= min_dist < radius, got min_dist {} with radius {}",
                    min_dist, radius
                )
            }
            ConfigError::SamplingExhausted { attempts } => {
                write!(
                    f,
                    "goal sampling rejected {} draws; region constraints are infeasible",
                    attempts
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
