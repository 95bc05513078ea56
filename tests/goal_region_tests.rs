// tests/goal_region_tests.rs
//
// Goal-region properties through the public API: sample bounds,
// min-dist rejection, normalization range, and eager validation.

use reacher::{ConfigError, GoalRegion, GoalSampler, ReacherConfig, ReacherEnv};

#[test]
fn test_sampled_points_respect_bounds_and_min_dist() {
    let mut sampler = GoalSampler::new(GoalRegion::default(), 4242).unwrap();
    let region = sampler.region().clone();

    for _ in 0..1000 {
        let p = sampler.sample_point().unwrap();
        let offset = p - region.center;
        assert!(offset.x.abs() <= region.radius);
        assert!(offset.y.abs() <= region.radius);
        assert!((0.0..=region.height).contains(&offset.z));
        assert!(offset.norm() >= region.min_dist);
    }
}

#[test]
fn test_normalized_samples_stay_in_unit_cube() {
    let mut sampler = GoalSampler::new(GoalRegion::default(), 7).unwrap();
    for _ in 0..1000 {
        let p = sampler.sample_point().unwrap();
        for component in sampler.normalize(&p) {
            assert!((-1.0..=1.0).contains(&component));
        }
    }
}

#[test]
fn test_halfsphere_region_only_positive_y() {
    let region = GoalRegion {
        halfsphere: true,
        ..GoalRegion::default()
    };
    let cy = region.center.y;
    let mut sampler = GoalSampler::new(region, 99).unwrap();
    for _ in 0..500 {
        assert!(sampler.sample_point().unwrap().y >= cy);
    }
}

#[test]
fn test_simple_goals_are_planar() {
    let mut sampler = GoalSampler::new(GoalRegion::default(), 123).unwrap();
    let cx = sampler.region().center.x;
    for _ in 0..500 {
        let p = sampler.sample_simple_point().unwrap();
        assert_eq!(p.x, cx);
    }
}

#[test]
fn test_invalid_geometry_is_rejected_eagerly() {
    let bad_radius = GoalRegion {
        radius: -0.1,
        ..GoalRegion::default()
    };
    assert!(matches!(
        GoalSampler::new(bad_radius, 0).err(),
        Some(ConfigError::InvalidRadius { .. })
    ));

    let bad_height = GoalRegion {
        height: 0.0,
        ..GoalRegion::default()
    };
    assert!(matches!(
        GoalSampler::new(bad_height, 0).err(),
        Some(ConfigError::InvalidHeight { .. })
    ));

    let bad_min_dist = GoalRegion {
        min_dist: 0.5,
        ..GoalRegion::default()
    };
    assert!(matches!(
        GoalSampler::new(bad_min_dist, 0).err(),
        Some(ConfigError::InvalidMinDist { .. })
    ));
}

#[test]
fn test_env_construction_validates_the_region() {
    let mut cfg = ReacherConfig::default();
    cfg.goal_region.height = -1.0;
    assert!(ReacherEnv::new(cfg).is_err());
}

#[test]
fn test_env_goal_normalization_lands_in_observation_range() {
    let mut env = ReacherEnv::new(ReacherConfig::default()).unwrap();
    env.seed(8).unwrap();
    for _ in 0..20 {
        let obs = env.reset().unwrap();
        assert_eq!(obs.goal.len(), 3);
        for g in &obs.goal {
            assert!((-1.0..=1.0).contains(g));
        }
    }
}
