// src/env.rs
//
// Gym-style reacher environment.
//
// Wraps the synthetic physics collaborator behind the standard RL
// interface:
// - seed(value)
// - reset() -> observation
// - step(action) -> (observation, reward, done, info)
// - close()
//
// All state transitions are deterministic given the seed. The
// environment exclusively owns the current goal and the episode
// counter; the distance oracle holds only back-references that the
// environment rebinds after a hard reset.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ReacherConfig, SUCCESS_REWARD};
use crate::goal::GoalSampler;
use crate::observation::Observation;
use crate::oracle::DistanceOracle;
use crate::sim::{Ball, BodyId, Robot, World, WorldError, BALL_LINK, EFFECTOR_LINK};
use crate::types::{ControlMode, JointState, Pose, JOINT_COUNT};

/// Lifecycle states of an environment instance.
///
/// `reset()` moves any non-closed state to `Ready`; `step()` is valid
/// from `Ready`/`Stepping`; `close()` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Constructed, never reset.
    Fresh,
    /// Reset completed; a fresh goal is in place.
    Ready,
    /// At least one step taken since the last reset.
    Stepping,
    /// Closed; every further operation is an error.
    Closed,
}

/// Errors surfaced by the environment.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvError {
    /// Invalid or infeasible configuration.
    Config(ConfigError),
    /// A body reference failed to resolve (collaborator fault).
    World(WorldError),
    /// Operation invalid in the current lifecycle state.
    Lifecycle { op: &'static str, state: Lifecycle },
    /// Action vector length does not match the configured mode.
    ActionLength { expected: usize, got: usize },
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::Config(e) => write!(f, "configuration error: {}", e),
            EnvError::World(e) => write!(f, "world error: {}", e),
            EnvError::Lifecycle { op, state } => {
                write!(f, "cannot {} in lifecycle state {:?}", op, state)
            }
            EnvError::ActionLength { expected, got } => {
                write!(f, "action length {} does not match mode ({})", got, expected)
            }
        }
    }
}

impl std::error::Error for EnvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvError::Config(e) => Some(e),
            EnvError::World(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EnvError {
    fn from(e: ConfigError) -> Self {
        EnvError::Config(e)
    }
}

impl From<WorldError> for EnvError {
    fn from(e: WorldError) -> Self {
        EnvError::World(e)
    }
}

/// Reward and termination for a given end-effector/goal separation.
///
/// Within `success_distance` the episode ends with the fixed bonus;
/// otherwise the reward is the negated separation, a dense shaping
/// signal that grows toward zero as the arm approaches the goal.
pub fn reward_for_separation(separation: f64, success_distance: f64) -> (f64, bool) {
    if separation <= success_distance {
        (SUCCESS_REWARD, true)
    } else {
        (-separation, false)
    }
}

/// Per-step diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// End-effector/goal separation this step.
    pub separation: f64,
    /// Episodes since the last hard reset.
    pub episode: u64,
    /// Steps taken in the current episode.
    pub tick: u64,
}

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// The observation after taking the action.
    pub observation: Observation,
    /// The reward for this step.
    pub reward: f64,
    /// Whether the episode has terminated.
    pub done: bool,
    /// Additional information about the step.
    pub info: StepInfo,
}

/// Gym-style reacher environment.
pub struct ReacherEnv {
    cfg: ReacherConfig,
    world: World,
    robot: Robot,
    ball: Ball,
    sampler: GoalSampler,
    oracle: DistanceOracle,
    /// Authoritative current goal; mutated only at reset.
    goal: Option<Pose>,
    /// Resets since the last hard reset.
    episodes: u64,
    /// Steps in the current episode.
    tick: u64,
    rng: ChaCha8Rng,
    lifecycle: Lifecycle,
}

impl ReacherEnv {
    /// Create a new environment. Geometry is validated eagerly; an
    /// invalid goal region is a construction error, not a sample-time
    /// surprise.
    pub fn new(cfg: ReacherConfig) -> Result<Self, EnvError> {
        let sampler = GoalSampler::new(cfg.goal_region.clone(), 0)?;

        let mut world = World::new();
        let robot = Robot::spawn(&mut world, cfg.backlash);
        let ball = Ball::spawn(&mut world);
        let oracle = DistanceOracle::new(robot.id, EFFECTOR_LINK, ball.id, BALL_LINK);

        Ok(Self {
            cfg,
            world,
            robot,
            ball,
            sampler,
            oracle,
            goal: None,
            episodes: 0,
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(0),
            lifecycle: Lifecycle::Fresh,
        })
    }

    /// Reseed the environment. The goal sampler derives its stream from
    /// the same seed, so a seeded environment is fully deterministic.
    pub fn seed(&mut self, seed: u64) -> Result<(), EnvError> {
        self.ensure_open("seed")?;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        let sampler_seed = self.rng.gen();
        self.sampler.reseed(sampler_seed);
        Ok(())
    }

    /// Start a new episode and return the initial observation.
    pub fn reset(&mut self) -> Result<Observation, EnvError> {
        self.ensure_open("reset")?;

        // Two-tier reset: destroying and recreating bodies is costly,
        // so it runs only every N episodes to bound engine drift.
        self.episodes += 1;
        if self.episodes >= self.cfg.restart_every_n_episodes {
            // The robot hard reset always has to go first.
            self.robot.hard_reset(&mut self.world)?;
            self.ball.hard_reset(&mut self.world)?;
            self.oracle.body_a = self.robot.id;
            self.oracle.body_b = self.ball.id;
            self.episodes = 0;
        }

        let goal = match self.cfg.mode {
            ControlMode::Full => self.sampler.sample_point()?,
            ControlMode::Simple => self.sampler.sample_simple_point()?,
        };
        self.goal = Some(goal);
        self.oracle.goal = Some(goal);

        // Move the ball through its constraint and let the move settle
        // before the arm starts acting.
        self.ball.change_position(&mut self.world, goal, 1.0)?;
        for _ in 0..self.cfg.settle_ticks {
            self.world.tick();
        }

        let range = self.cfg.init_pose_range;
        let mut qpos = [0.0; JOINT_COUNT];
        for q in &mut qpos {
            *q = self.rng.gen_range(-range..=range);
        }
        if self.cfg.mode == ControlMode::Simple {
            for joint in 0..JOINT_COUNT {
                if !self.cfg.mode.active_joints().contains(&joint) {
                    qpos[joint] = 0.0;
                }
            }
        }

        // Teleport into place, then warm up the servo toward the same
        // angles so the first real step sees no velocity residue.
        self.robot.reset(&mut self.world)?;
        self.robot.set(&mut self.world, &JointState::at_rest(qpos))?;
        self.robot
            .act(&mut self.world, &qpos, self.cfg.max_force, self.cfg.max_vel)?;
        self.world.tick();

        self.tick = 0;
        self.lifecycle = Lifecycle::Ready;
        self.build_observation()
    }

    /// Advance one step with the given action (length per mode, values
    /// in [-1, 1]; out-of-range values are clamped).
    pub fn step(&mut self, action: &[f64]) -> Result<StepResult, EnvError> {
        match self.lifecycle {
            Lifecycle::Ready | Lifecycle::Stepping => {}
            state => {
                return Err(EnvError::Lifecycle { op: "step", state });
            }
        }

        let expected = self.cfg.mode.action_dim();
        if action.len() != expected {
            return Err(EnvError::ActionLength {
                expected,
                got: action.len(),
            });
        }

        let command = self.cfg.mode.scatter(action);
        self.robot
            .act(&mut self.world, &command, self.cfg.max_force, self.cfg.max_vel)?;
        self.world.tick();
        self.tick += 1;

        let separation = self.oracle.query(&self.world)?;
        let (reward, done) = reward_for_separation(separation, self.cfg.success_distance);

        self.lifecycle = Lifecycle::Stepping;
        let observation = self.build_observation()?;
        Ok(StepResult {
            observation,
            reward,
            done,
            info: StepInfo {
                separation,
                episode: self.episodes,
                tick: self.tick,
            },
        })
    }

    /// Release the physics bodies. Terminal: any later call, including a
    /// second `close()`, is a lifecycle error.
    pub fn close(&mut self) -> Result<(), EnvError> {
        self.ensure_open("close")?;
        self.robot.close(&mut self.world)?;
        self.ball.close(&mut self.world)?;
        self.lifecycle = Lifecycle::Closed;
        Ok(())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Current goal (None before the first reset).
    pub fn goal(&self) -> Option<Pose> {
        self.goal
    }

    /// Resets since the last hard reset.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// Current robot body identifier (changes on hard reset).
    pub fn robot_id(&self) -> BodyId {
        self.robot.id
    }

    pub fn config(&self) -> &ReacherConfig {
        &self.cfg
    }

    pub fn action_dim(&self) -> usize {
        self.cfg.mode.action_dim()
    }

    pub fn observation_dim(&self) -> usize {
        self.cfg.mode.observation_dim()
    }

    fn ensure_open(&self, op: &'static str) -> Result<(), EnvError> {
        if self.lifecycle == Lifecycle::Closed {
            return Err(EnvError::Lifecycle {
                op,
                state: self.lifecycle,
            });
        }
        Ok(())
    }

    /// Joint state of the active joints plus the normalized goal,
    /// projected through the mode's index table.
    fn build_observation(&self) -> Result<Observation, EnvError> {
        let state = self.robot.observe(&self.world)?;
        let goal = self.goal.ok_or(EnvError::Lifecycle {
            op: "observe",
            state: self.lifecycle,
        })?;
        let normalized = self.sampler.normalize(&goal);

        let joints = self.cfg.mode.active_joints();
        Ok(Observation {
            qpos: joints.iter().map(|&j| state.qpos[j]).collect(),
            qvel: joints.iter().map(|&j| state.qvel[j]).collect(),
            goal: self
                .cfg
                .mode
                .goal_components()
                .iter()
                .map(|&c| normalized[c])
                .collect(),
        })
    }
}
