// tests/episode_lifecycle_tests.rs
//
// Lifecycle tests: step-before-reset, close semantics, the two-tier
// reset strategy, and the zero-action scenario.

use reacher::{EnvError, Lifecycle, ReacherConfig, ReacherEnv};

#[test]
fn test_step_before_first_reset_fails() {
    let mut env = ReacherEnv::new(ReacherConfig::default()).unwrap();
    assert_eq!(env.lifecycle(), Lifecycle::Fresh);
    assert!(matches!(
        env.step(&[0.0; 6]),
        Err(EnvError::Lifecycle { op: "step", .. })
    ));
}

#[test]
fn test_closed_environment_rejects_everything() {
    let mut env = ReacherEnv::new(ReacherConfig::default()).unwrap();
    env.reset().unwrap();
    env.close().unwrap();
    assert_eq!(env.lifecycle(), Lifecycle::Closed);

    assert!(matches!(
        env.reset(),
        Err(EnvError::Lifecycle { op: "reset", .. })
    ));
    assert!(matches!(
        env.step(&[0.0; 6]),
        Err(EnvError::Lifecycle { op: "step", .. })
    ));
    assert!(matches!(
        env.seed(1),
        Err(EnvError::Lifecycle { op: "seed", .. })
    ));
    // Repeated close is a caller error, not a silent no-op.
    assert!(matches!(
        env.close(),
        Err(EnvError::Lifecycle { op: "close", .. })
    ));
}

#[test]
fn test_reset_from_stepping_state() {
    let mut env = ReacherEnv::new(ReacherConfig::default()).unwrap();
    env.seed(5).unwrap();
    env.reset().unwrap();
    env.step(&[0.0; 6]).unwrap();
    assert_eq!(env.lifecycle(), Lifecycle::Stepping);

    let obs = env.reset().unwrap();
    assert_eq!(env.lifecycle(), Lifecycle::Ready);
    assert_eq!(obs.len(), 15);
}

#[test]
fn test_hard_reset_fires_on_the_nth_reset() {
    let cfg = ReacherConfig {
        restart_every_n_episodes: 3,
        ..ReacherConfig::default()
    };
    let mut env = ReacherEnv::new(cfg).unwrap();
    env.seed(11).unwrap();

    let original_id = env.robot_id();

    env.reset().unwrap();
    assert_eq!(env.episodes(), 1);
    assert_eq!(env.robot_id(), original_id);

    env.reset().unwrap();
    assert_eq!(env.episodes(), 2);
    assert_eq!(env.robot_id(), original_id);

    // Third reset reaches the threshold: bodies are recreated and the
    // counter returns to zero.
    env.reset().unwrap();
    assert_eq!(env.episodes(), 0);
    assert_ne!(env.robot_id(), original_id);

    // The oracle was rebound, so stepping still works.
    let result = env.step(&[0.0; 6]).unwrap();
    assert!(result.info.separation.is_finite());
}

#[test]
fn test_hard_reset_cycles_repeatedly() {
    let cfg = ReacherConfig {
        restart_every_n_episodes: 2,
        ..ReacherConfig::default()
    };
    let mut env = ReacherEnv::new(cfg).unwrap();
    env.seed(13).unwrap();

    let mut ids = vec![env.robot_id()];
    for _ in 0..6 {
        env.reset().unwrap();
        env.step(&[0.0; 6]).unwrap();
        let id = env.robot_id();
        if Some(&id) != ids.last() {
            ids.push(id);
        }
    }
    // 6 resets at interval 2 => 3 hard resets => 4 distinct ids.
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_zero_action_scenario_from_rest_never_succeeds() {
    // From the exact rest pose the end-effector sits above the goal
    // region, so 20 zero-action steps must stay unterminated with a
    // dense non-positive reward.
    let cfg = ReacherConfig {
        init_pose_range: 0.0,
        ..ReacherConfig::default()
    };
    let mut env = ReacherEnv::new(cfg).unwrap();
    env.seed(21).unwrap();
    env.reset().unwrap();

    for step in 0..20 {
        let result = env.step(&[0.0; 6]).unwrap();
        assert!(!result.done, "unexpected termination at step {}", step);
        assert!(result.reward.is_finite());
        assert!(result.reward <= 0.0, "reward {} at step {}", result.reward, step);
    }
}

#[test]
fn test_zero_action_rollout_reward_matches_separation() {
    // Default configuration: every step's reward must be consistent
    // with the measured separation and the success rule.
    let mut env = ReacherEnv::new(ReacherConfig::default()).unwrap();
    env.seed(1234).unwrap();
    env.reset().unwrap();

    for _ in 0..20 {
        let result = env.step(&[0.0; 6]).unwrap();
        assert!(result.reward.is_finite());
        let threshold = env.config().success_distance;
        if result.done {
            assert!(result.info.separation <= threshold);
            assert_eq!(result.reward, 1.0);
            break;
        }
        assert!(result.info.separation > threshold);
        assert_eq!(result.reward, -result.info.separation);
        assert!(result.reward <= 0.0);
    }
}
