// src/sim/ball.rs
//
// Position-constrained goal marker.
//
// The ball is not a free dynamic body: it hangs on a position
// constraint and each world tick closes a fixed fraction of the gap to
// the constraint target. A retargeted ball settles to well under the
// success distance within the environment's 20 settle ticks.

use crate::sim::world::{Body, BodyId, World, WorldError};
use crate::types::Pose;

/// Attachment index of the ball center.
pub const BALL_LINK: usize = 0;

/// Fraction of the remaining gap closed per tick at unit speed.
const APPROACH_GAIN: f64 = 0.35;

fn home() -> Pose {
    Pose::new(0.0, 0.0, 0.1)
}

/// Internal ball state, stored in the world.
pub(crate) struct BallBody {
    pos: Pose,
    target: Pose,
    speed: f64,
}

impl BallBody {
    pub(crate) fn new() -> Self {
        Self {
            pos: home(),
            target: home(),
            speed: 1.0,
        }
    }

    pub(crate) fn step(&mut self) {
        let fraction = (APPROACH_GAIN * self.speed).clamp(0.0, 1.0);
        self.pos += (self.target - self.pos) * fraction;
    }

    pub(crate) fn attachment(&self, link: usize) -> Option<Pose> {
        (link == BALL_LINK).then_some(self.pos)
    }

    fn change_position(&mut self, target: Pose, speed: f64) {
        self.target = target;
        self.speed = speed.max(0.0);
    }
}

/// Handle to the ball body in a world.
pub struct Ball {
    pub id: BodyId,
}

impl Ball {
    pub fn spawn(world: &mut World) -> Self {
        let id = world.spawn(Body::Ball(BallBody::new()));
        Self { id }
    }

    /// Retarget the position constraint. The move takes effect over the
    /// following ticks, not instantaneously.
    pub fn change_position(
        &self,
        world: &mut World,
        target: Pose,
        speed: f64,
    ) -> Result<(), WorldError> {
        world.ball_mut(self.id)?.change_position(target, speed);
        Ok(())
    }

    /// Current center position.
    pub fn position(&self, world: &World) -> Result<Pose, WorldError> {
        world.attachment(self.id, BALL_LINK)
    }

    /// Destroy and recreate the body at its home pose. Invalidates the
    /// previous `id`.
    pub fn hard_reset(&mut self, world: &mut World) -> Result<(), WorldError> {
        world.remove(self.id)?;
        self.id = world.spawn(Body::Ball(BallBody::new()));
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

    #[test]
    fn test_constrained_move_settles_within_settle_ticks() {
        let mut world = World::new();
        let ball = Ball::spawn(&mut world);
        let target = Pose::new(0.15, -0.1, 0.25);

        ball.change_position(&mut world, target, 1.0).unwrap();
        for _ in 0..20 {
            world.tick();
        }

        let pos = ball.position(&world).unwrap();
        assert!((pos - target).norm() < 1e-3);
    }

    #[test]
    fn test_move_is_gradual_not_teleporting() {
        let mut world = World::new();
        let ball = Ball::spawn(&mut world);
        let start = ball.position(&world).unwrap();
        let target = Pose::new(0.2, 0.0, 0.2);

        ball.change_position(&mut world, target, 1.0).unwrap();
        world.tick();

        let pos = ball.position(&world).unwrap();
        assert!((pos - start).norm() > 0.0);
        assert!((pos - target).norm() > 0.0);
    }

    #[test]
    fn test_hard_reset_returns_home_and_changes_id() {
        let mut world = World::new();
        let mut ball = Ball::spawn(&mut world);
        ball.change_position(&mut world, Pose::new(0.1, 0.1, 0.3), 1.0)
            .unwrap();
        for _ in 0..20 {
            world.tick();
        }

        let old = ball.id;
        ball.hard_reset(&mut world).unwrap();
        assert_ne!(ball.id, old);
        assert_eq!(ball.position(&world).unwrap(), super::home());
    }
}
