// src/sim/world.rs
//
// Simulation-context handle: body registry + caller-driven clock.
//
// Bodies live in generational slots. Removing a body bumps the slot
// generation, so identifiers held across a hard reset stop resolving
// and queries against them fail with `WorldError::StaleBody` instead of
// silently reading the replacement body.

use crate::sim::ball::BallBody;
use crate::sim::robot::ArmBody;
use crate::types::Pose;

/// Simulated seconds per world tick.
pub const DT: f64 = 0.01;

/// Generational body identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId {
    index: usize,
    generation: u32,
}

/// Errors raised by body lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The identifier refers to a destroyed body (e.g. held across a
    /// hard reset without rebinding).
    StaleBody { id: BodyId },
    /// The identifier was never issued by this world.
    UnknownBody { id: BodyId },
    /// The body exists but has no attachment point with this index.
    UnknownAttachment { id: BodyId, link: usize },
    /// The body exists but is not of the kind the handle expects.
    WrongBodyKind { id: BodyId },
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::StaleBody { id } => {
                write!(f, "body {:?} was destroyed; rebind after hard reset", id)
            }
            WorldError::UnknownBody { id } => {
                write!(f, "body {:?} was never issued by this world", id)
            }
            WorldError::UnknownAttachment { id, link } => {
                write!(f, "body {:?} has no attachment point {}", id, link)
            }
            WorldError::WrongBodyKind { id } => {
                write!(f, "body {:?} is not of the expected kind", id)
            }
        }
    }
}

impl std::error::Error for WorldError {}

pub(crate) enum Body {
    Arm(ArmBody),
    Ball(BallBody),
}

impl Body {
    fn step(&mut self, dt: f64) {
        match self {
            Body::Arm(arm) => arm.step(dt),
            Body::Ball(ball) => ball.step(),
        }
    }

    fn attachment(&self, link: usize) -> Option<Pose> {
        match self {
            Body::Arm(arm) => arm.attachment(link),
            Body::Ball(ball) => ball.attachment(link),
        }
    }
}

struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// The shared simulation world.
///
/// Owned by the environment and passed explicitly to every collaborator
/// call; there is no ambient global engine state. Advancing time is a
/// synchronous, caller-driven `tick()`.
pub struct World {
    slots: Vec<Slot>,
    ticks: u64,
}

impl World {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            ticks: 0,
        }
    }

    /// Total ticks advanced since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance every live body by one simulation step.
    pub fn tick(&mut self) {
        for slot in &mut self.slots {
            if let Some(body) = &mut slot.body {
                body.step(DT);
            }
        }
        self.ticks += 1;
    }

    /// World-frame position of attachment `link` on `id`.
    pub fn attachment(&self, id: BodyId, link: usize) -> Result<Pose, WorldError> {
        self.body(id)?
            .attachment(link)
            .ok_or(WorldError::UnknownAttachment { id, link })
    }

    /// True if `id` still resolves to a live body.
    pub fn contains(&self, id: BodyId) -> bool {
        self.body(id).is_ok()
    }

    /// Destroy a body. Its identifier (and any copies held elsewhere)
    /// becomes stale.
    pub fn remove(&mut self, id: BodyId) -> Result<(), WorldError> {
        let slot = self
            .slots
            .get_mut(id.index)
            .ok_or(WorldError::UnknownBody { id })?;
        if slot.generation != id.generation || slot.body.is_none() {
            return Err(WorldError::StaleBody { id });
        }
        slot.body = None;
        slot.generation += 1;
        Ok(())
    }

    pub(crate) fn spawn(&mut self, body: Body) -> BodyId {
        if let Some(index) = self.slots.iter().position(|s| s.body.is_none()) {
            self.slots[index].body = Some(body);
            BodyId {
                index,
                generation: self.slots[index].generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                body: Some(body),
            });
            BodyId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    pub(crate) fn body(&self, id: BodyId) -> Result<&Body, WorldError> {
        let slot = self
            .slots
            .get(id.index)
            .ok_or(WorldError::UnknownBody { id })?;
        if slot.generation != id.generation {
            return Err(WorldError::StaleBody { id });
        }
        slot.body.as_ref().ok_or(WorldError::StaleBody { id })
    }

    pub(crate) fn body_mut(&mut self, id: BodyId) -> Result<&mut Body, WorldError> {
        let slot = self
            .slots
            .get_mut(id.index)
            .ok_or(WorldError::UnknownBody { id })?;
        if slot.generation != id.generation {
            return Err(WorldError::StaleBody { id });
        }
        slot.body.as_mut().ok_or(WorldError::StaleBody { id })
    }

    pub(crate) fn arm_mut(&mut self, id: BodyId) -> Result<&mut ArmBody, WorldError> {
        match self.body_mut(id)? {
            Body::Arm(arm) => Ok(arm),
            Body::Ball(_) => Err(WorldError::WrongBodyKind { id }),
        }
    }

    pub(crate) fn arm(&self, id: BodyId) -> Result<&ArmBody, WorldError> {
        match self.body(id)? {
            Body::Arm(arm) => Ok(arm),
            Body::Ball(_) => Err(WorldError::WrongBodyKind { id }),
        }
    }

    pub(crate) fn ball_mut(&mut self, id: BodyId) -> Result<&mut BallBody, WorldError> {
        match self.body_mut(id)? {
            Body::Ball(ball) => Ok(ball),
            Body::Arm(_) => Err(WorldError::WrongBodyKind { id }),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
