//! Owner of the live population.
//!
//! Each tick the spawner rolls once per kind for a new arrival, then ages
//! every entity and drops the ones past their lifetime. Predation removes
//! entities through [`Spawner::remove`], which only queues the body for
//! destruction: bodies are destroyed at the start of the next tick, always
//! before the physics world advances again.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityKind, KindProfile, Lifetime, Placement, StepOutcome};
use crate::error::PlacementError;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::rng::SimRng;

/// Spawn chance and lifetime for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// A new entity appears when a uniform draw from `0..=one_in` is zero.
    /// `None` disables spawning for the kind.
    pub one_in: Option<u32>,
    pub lifetime: Lifetime,
}

impl SpawnRule {
    pub fn disabled(lifetime: Lifetime) -> Self {
        Self {
            one_in: None,
            lifetime,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerConfig {
    /// Food placed unconditionally when the spawner is built.
    pub food_initial: u32,
    pub food: SpawnRule,
    pub shark: SpawnRule,
    pub food_profile: KindProfile,
    pub shark_profile: KindProfile,
}

impl SpawnerConfig {
    pub fn rule(&self, kind: EntityKind) -> &SpawnRule {
        match kind {
            EntityKind::Food => &self.food,
            EntityKind::Shark => &self.shark,
        }
    }

    pub fn profile(&self, kind: EntityKind) -> &KindProfile {
        match kind {
            EntityKind::Food => &self.food_profile,
            EntityKind::Shark => &self.shark_profile,
        }
    }
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            food_initial: 20,
            food: SpawnRule {
                one_in: Some(10),
                lifetime: Lifetime::Ticks(10),
            },
            shark: SpawnRule {
                one_in: Some(50),
                lifetime: Lifetime::Ticks(200),
            },
            food_profile: KindProfile::food(0.5),
            shark_profile: KindProfile::shark(0.8, 0.5, 0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
    Removed(Entity),
    /// Nothing to remove, typically because the entity already expired or
    /// was eaten earlier in the same step.
    Missed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub spawned: Vec<EntityId>,
    pub expired: Vec<EntityId>,
    pub failed_spawns: u32,
    pub bodies_destroyed: usize,
}

pub struct Spawner {
    config: SpawnerConfig,
    rng: SimRng,
    next_id: u64,
    population: Vec<Entity>,
    owners: HashMap<BodyHandle, (EntityId, EntityKind)>,
    retired: Vec<BodyHandle>,
}

impl Spawner {
    pub fn new(config: SpawnerConfig, rng: SimRng, physics: &mut dyn PhysicsWorld) -> Self {
        let seed_count = config.food_initial;
        let mut spawner = Self {
            config,
            rng,
            next_id: 0,
            population: Vec::new(),
            owners: HashMap::new(),
            retired: Vec::new(),
        };
        for _ in 0..seed_count {
            if let Err(err) = spawner.spawn_random(EntityKind::Food, physics) {
                tracing::warn!(%err, "initial food placement failed");
            }
        }
        tracing::debug!(seeded = spawner.population.len(), "spawner ready");
        spawner
    }

    pub fn tick(&mut self, physics: &mut dyn PhysicsWorld) -> TickReport {
        let mut report = TickReport {
            bodies_destroyed: self.flush_retired(physics),
            ..TickReport::default()
        };

        for kind in EntityKind::ALL {
            let Some(one_in) = self.config.rule(kind).one_in else {
                continue;
            };
            if self.rng.gen_range(0..=one_in) != 0 {
                continue;
            }
            match self.spawn_random(kind, physics) {
                Ok(id) => report.spawned.push(id),
                Err(err) => {
                    tracing::warn!(kind = kind.label(), %err, "spawn aborted");
                    report.failed_spawns += 1;
                }
            }
        }

        let snapshot = std::mem::take(&mut self.population);
        let mut survivors = Vec::with_capacity(snapshot.len());
        for mut entity in snapshot {
            match entity.step(physics) {
                StepOutcome::Alive => survivors.push(entity),
                StepOutcome::Expired => {
                    tracing::debug!(entity = %entity.id(), kind = entity.kind().label(), age = entity.age(), "expired");
                    report.expired.push(entity.id());
                    self.retired.push(entity.body());
                }
            }
        }
        self.population = survivors;

        report.bodies_destroyed += self.flush_retired(physics);
        report
    }

    /// Removes an entity by id. Removing an absent entity is a no-op.
    pub fn remove(&mut self, id: EntityId) -> Removal {
        let Some(index) = self.population.iter().position(|e| e.id() == id) else {
            tracing::debug!(entity = %id, "removal miss");
            return Removal::Missed;
        };
        let entity = self.population.remove(index);
        self.retired.push(entity.body());
        tracing::debug!(entity = %id, kind = entity.kind().label(), "removed");
        Removal::Removed(entity)
    }

    pub fn spawn_at(
        &mut self,
        kind: EntityKind,
        placement: Placement,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<EntityId, PlacementError> {
        let id = EntityId::new(self.next_id);
        let lifetime = self.config.rule(kind).lifetime;
        let entity = Entity::create(id, self.config.profile(kind), lifetime, placement, physics)?;
        self.next_id += 1;
        self.owners.insert(entity.body(), (id, kind));
        tracing::debug!(entity = %id, kind = kind.label(), x = placement.position.x, y = placement.position.y, "spawned");
        self.population.push(entity);
        Ok(id)
    }

    fn spawn_random(
        &mut self,
        kind: EntityKind,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<EntityId, PlacementError> {
        let placement = Placement::random(&mut self.rng, physics.bounds());
        self.spawn_at(kind, placement, physics)
    }

    fn flush_retired(&mut self, physics: &mut dyn PhysicsWorld) -> usize {
        let mut destroyed = 0;
        for body in self.retired.drain(..) {
            self.owners.remove(&body);
            if physics.destroy_body(body) {
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Entity that owns `body`, including entities removed since the last
    /// tick whose bodies have not been destroyed yet.
    pub fn owner_of(&self, body: BodyHandle) -> Option<(EntityId, EntityKind)> {
        self.owners.get(&body).copied()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.population.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.population.iter()
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.population.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn pending_bodies(&self) -> usize {
        self.retired.len()
    }
}

impl<'a> IntoIterator for &'a Spawner {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
