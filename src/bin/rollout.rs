// src/bin/rollout.rs
//
// Random-policy rollout harness.
//
// Goals:
// - Deterministic multi-episode evaluation from a base seed.
// - Exercises the full episode lifecycle (reset, step until done or a
//   step cap, periodic hard resets) at harness speed.
// - Reports success rate, episode-length statistics and steps/sec;
//   optionally writes per-step JSONL telemetry.
//
// Run examples:
//   cargo run --bin rollout -- --episodes 200 --seed 7
//   cargo run --bin rollout -- --simple --halfsphere --jsonl rollout.jsonl
//   cargo run --bin rollout -- --episodes 50 --max-steps 150 --quiet

use std::env;
use std::process;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use reacher::{
    FileSink, NoopSink, OnlineStats, ReacherConfig, ReacherEnv, ResetRecord, RolloutSink,
    TickRecord,
};

const DEFAULT_EPISODES: usize = 100;
const DEFAULT_MAX_STEPS: u64 = 300;
const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Clone)]
struct Args {
    episodes: usize,
    max_steps: u64,
    seed: u64,
    simple: bool,
    halfsphere: bool,
    backlash: bool,
    jsonl: Option<String>,
    quiet: bool,
}

impl Args {
    fn usage() -> &'static str {
        "\
reacher random-policy rollout harness

FLAGS:
  --episodes N         Number of episodes (default: 100)
  --max-steps N        Step cap per episode (default: 300)
  --seed U64           Base seed (default: 1)
  --simple             Reduced 4-joint task variant
  --halfsphere         Restrict goals to the positive-y half region
  --backlash           Enable the servo backlash model
  --jsonl PATH         Write per-step JSONL records to PATH
  --quiet              Suppress per-episode lines; only print the summary
  --help               Show this help

EXAMPLES:
  cargo run --bin rollout -- --episodes 200 --seed 7
  cargo run --bin rollout -- --simple --jsonl rollout.jsonl
"
    }

    fn parse_or_exit() -> Self {
        match Self::parse() {
            Ok(a) => a,
            Err(e) => {
                eprintln!("{e}\n\n{}", Self::usage());
                process::exit(2);
            }
        }
    }

    fn parse() -> Result<Self, String> {
        let mut out = Args {
            episodes: DEFAULT_EPISODES,
            max_steps: DEFAULT_MAX_STEPS,
            seed: DEFAULT_SEED,
            simple: false,
            halfsphere: false,
            backlash: false,
            jsonl: None,
            quiet: false,
        };

        let mut it = env::args().skip(1);

        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{}", Self::usage());
                    process::exit(0);
                }
                "--simple" => out.simple = true,
                "--halfsphere" => out.halfsphere = true,
                "--backlash" => out.backlash = true,
                "--quiet" => out.quiet = true,

                "--episodes" => {
                    let v = it
                        .next()
                        .ok_or_else(|| "Missing value for --episodes".to_string())?;
                    out.episodes = v
                        .parse::<usize>()
                        .map_err(|_| "Invalid --episodes (expected integer)".to_string())?;
                    if out.episodes == 0 {
                        return Err("--episodes must be >= 1".to_string());
                    }
                }
                "--max-steps" => {
                    let v = it
                        .next()
                        .ok_or_else(|| "Missing value for --max-steps".to_string())?;
                    out.max_steps = v
                        .parse::<u64>()
                        .map_err(|_| "Invalid --max-steps (expected integer)".to_string())?;
                    if out.max_steps == 0 {
                        return Err("--max-steps must be >= 1".to_string());
                    }
                }
                "--seed" => {
                    let v = it
                        .next()
                        .ok_or_else(|| "Missing value for --seed".to_string())?;
                    out.seed = v
                        .parse::<u64>()
                        .map_err(|_| "Invalid --seed (expected u64)".to_string())?;
                }
                "--jsonl" => {
                    let v = it
                        .next()
                        .ok_or_else(|| "Missing value for --jsonl".to_string())?;
                    out.jsonl = Some(v);
                }
                other => {
                    return Err(format!("Unknown flag: {other}"));
                }
            }
        }

        Ok(out)
    }
}

fn build_config(args: &Args) -> ReacherConfig {
    let mut cfg = if args.simple {
        ReacherConfig::simple()
    } else {
        ReacherConfig::default()
    };
    cfg.goal_region.halfsphere = args.halfsphere;
    cfg.backlash = args.backlash;
    cfg
}

fn main() {
    let args = Args::parse_or_exit();

    let mut sink: Box<dyn RolloutSink> = match &args.jsonl {
        Some(path) => match FileSink::create(path) {
            Ok(s) => Box::new(s),
            Err(e) => {
                eprintln!("Failed to create telemetry file {path}: {e}");
                process::exit(1);
            }
        },
        None => Box::new(NoopSink),
    };

    let mut env = match ReacherEnv::new(build_config(&args)) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Failed to construct environment: {e}");
            process::exit(1);
        }
    };
    if let Err(e) = env.seed(args.seed) {
        eprintln!("Failed to seed environment: {e}");
        process::exit(1);
    }

    // Separate action stream so reseeding the env does not disturb the
    // random policy and vice versa.
    let mut policy_rng = ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(1));
    let action_dim = env.action_dim();

    let mut episode_lengths = OnlineStats::default();
    let mut final_rewards = OnlineStats::default();
    let mut successes = 0usize;
    let mut total_steps = 0u64;

    let start = Instant::now();

    for episode in 0..args.episodes {
        let result = run_episode(&mut env, &mut policy_rng, action_dim, &args, sink.as_mut());
        let (steps, last_reward, success) = match result {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("Episode {episode} failed: {e}");
                process::exit(1);
            }
        };

        episode_lengths.add(steps as f64);
        final_rewards.add(last_reward);
        total_steps += steps;
        if success {
            successes += 1;
        }

        if !args.quiet {
            println!(
                "episode {:>4}  steps {:>4}  final reward {:>9.4}  {}",
                episode,
                steps,
                last_reward,
                if success { "reached" } else { "capped" }
            );
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    let steps_per_sec = if elapsed > 0.0 {
        total_steps as f64 / elapsed
    } else {
        0.0
    };

    println!("----------------------------------------------------------------");
    println!(
        "episodes {}  success rate {:.1}%  steps/sec {:.0}",
        args.episodes,
        100.0 * (successes as f64) / (args.episodes as f64),
        steps_per_sec
    );
    println!(
        "episode length: mean {:.1}  std {:.1}  min {:.0}  max {:.0}",
        episode_lengths.mean(),
        episode_lengths.stddev(),
        episode_lengths.min(),
        episode_lengths.max()
    );
    println!(
        "final reward:   mean {:.4}  min {:.4}  max {:.4}",
        final_rewards.mean(),
        final_rewards.min(),
        final_rewards.max()
    );

    if let Err(e) = env.close() {
        eprintln!("Failed to close environment: {e}");
        process::exit(1);
    }
}

/// Run one episode; returns (steps taken, last reward, reached goal).
fn run_episode(
    env: &mut ReacherEnv,
    policy_rng: &mut ChaCha8Rng,
    action_dim: usize,
    args: &Args,
    sink: &mut dyn RolloutSink,
) -> Result<(u64, f64, bool), reacher::EnvError> {
    env.reset()?;

    let goal = env.goal().unwrap_or_else(|| reacher::Pose::origin());
    sink.log_reset(&ResetRecord {
        episode: env.episodes(),
        goal: [goal.x, goal.y, goal.z],
    });

    let mut last_reward = 0.0;
    let mut steps = 0u64;

    while steps < args.max_steps {
        let action: Vec<f64> = (0..action_dim)
            .map(|_| policy_rng.gen_range(-1.0..=1.0))
            .collect();

        let result = env.step(&action)?;
        steps += 1;
        last_reward = result.reward;

        sink.log_step(&TickRecord {
            episode: result.info.episode,
            tick: result.info.tick,
            action,
            reward: result.reward,
            done: result.done,
            separation: result.info.separation,
        });

        if result.done {
            return Ok((steps, last_reward, true));
        }
    }

    Ok((steps, last_reward, false))
}
