//! Turns physics contacts into predation.

use crate::entity::{EntityId, EntityKind};
use crate::physics::{BodyHandle, ContactListener};
use crate::spawner::{Removal, Spawner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// A shark touched a food entity; the food is consumed.
    Predation { shark: EntityId, food: EntityId },
    Ignore,
}

/// Classifies an unordered pair of resolved entities.
pub fn classify(a: (EntityId, EntityKind), b: (EntityId, EntityKind)) -> Interaction {
    match (a, b) {
        ((shark, EntityKind::Shark), (food, EntityKind::Food))
        | ((food, EntityKind::Food), (shark, EntityKind::Shark)) => {
            Interaction::Predation { shark, food }
        }
        _ => Interaction::Ignore,
    }
}

/// Contact listener installed for the duration of one physics advance.
///
/// Holds the spawner mutably, so nothing else can touch the population while
/// contacts are being delivered.
pub struct CollisionResolver<'a> {
    spawner: &'a mut Spawner,
    eaten: Vec<EntityId>,
    misses: u32,
}

impl<'a> CollisionResolver<'a> {
    pub fn new(spawner: &'a mut Spawner) -> Self {
        Self {
            spawner,
            eaten: Vec::new(),
            misses: 0,
        }
    }

    pub fn eaten(&self) -> &[EntityId] {
        &self.eaten
    }

    pub fn removal_misses(&self) -> u32 {
        self.misses
    }

    pub fn into_outcome(self) -> (Vec<EntityId>, u32) {
        (self.eaten, self.misses)
    }
}

impl ContactListener for CollisionResolver<'_> {
    fn begin_contact(&mut self, a: BodyHandle, b: BodyHandle) {
        let (Some(first), Some(second)) = (self.spawner.owner_of(a), self.spawner.owner_of(b))
        else {
            tracing::trace!(a = a.raw(), b = b.raw(), "contact with unowned body");
            return;
        };

        match classify(first, second) {
            Interaction::Predation { shark, food } => {
                tracing::trace!(%shark, %food, "predation");
                match self.spawner.remove(food) {
                    Removal::Removed(_) => self.eaten.push(food),
                    Removal::Missed => self.misses += 1,
                }
            }
            Interaction::Ignore => {
                tracing::trace!(a = %first.0, b = %second.0, "contact ignored");
            }
        }
    }
}
