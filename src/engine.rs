//! Fixed-order simulation driver: spawner tick, then physics advance.

use serde::Serialize;

use crate::collision::CollisionResolver;
use crate::entity::{EntityId, EntityKind};
use crate::physics::{PhysicsWorld, StepConfig};
use crate::render::Surface;
use crate::rng::RngManager;
use crate::spawner::{Spawner, SpawnerConfig};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub step: StepConfig,
    pub spawner: SpawnerConfig,
}

pub struct EngineBuilder {
    settings: EngineSettings,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn build<P: PhysicsWorld>(self, mut physics: P) -> Engine<P> {
        let mut rng = RngManager::new(self.settings.seed);
        let spawner = Spawner::new(
            self.settings.spawner.clone(),
            rng.fork("spawner"),
            &mut physics,
        );
        tracing::info!(
            scenario = %self.settings.scenario_name,
            seed = self.settings.seed,
            seeded = spawner.len(),
            "engine ready"
        );
        Engine {
            physics,
            spawner,
            tick: 0,
            totals: RunSummary::default(),
            settings: self.settings,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    pub spawned: Vec<EntityId>,
    pub expired: Vec<EntityId>,
    pub eaten: Vec<EntityId>,
    pub removal_misses: u32,
    pub failed_spawns: u32,
    pub food: usize,
    pub sharks: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub ticks: u64,
    pub spawned: u64,
    pub expired: u64,
    pub eaten: u64,
    pub removal_misses: u64,
    pub failed_spawns: u64,
    pub food: usize,
    pub sharks: usize,
}

impl RunSummary {
    fn record(&mut self, tick: &TickSummary) {
        self.ticks = tick.tick;
        self.spawned += tick.spawned.len() as u64;
        self.expired += tick.expired.len() as u64;
        self.eaten += tick.eaten.len() as u64;
        self.removal_misses += u64::from(tick.removal_misses);
        self.failed_spawns += u64::from(tick.failed_spawns);
        self.food = tick.food;
        self.sharks = tick.sharks;
    }
}

pub struct Engine<P: PhysicsWorld> {
    physics: P,
    spawner: Spawner,
    tick: u64,
    totals: RunSummary,
    settings: EngineSettings,
}

impl<P: PhysicsWorld> Engine<P> {
    pub fn step(&mut self) -> TickSummary {
        self.tick += 1;
        let report = self.spawner.tick(&mut self.physics);

        let mut resolver = CollisionResolver::new(&mut self.spawner);
        self.physics.advance(&self.settings.step, &mut resolver);
        let (eaten, removal_misses) = resolver.into_outcome();

        let summary = TickSummary {
            tick: self.tick,
            spawned: report.spawned,
            expired: report.expired,
            eaten,
            removal_misses,
            failed_spawns: report.failed_spawns,
            food: self.spawner.count(EntityKind::Food),
            sharks: self.spawner.count(EntityKind::Shark),
        };
        tracing::debug!(
            tick = summary.tick,
            food = summary.food,
            sharks = summary.sharks,
            eaten = summary.eaten.len(),
            "tick complete"
        );
        self.totals.record(&summary);
        summary
    }

    pub fn run(&mut self, ticks: u64) -> RunSummary {
        self.run_with_hook(ticks, |_| {})
    }

    pub fn run_with_hook<F>(&mut self, ticks: u64, mut hook: F) -> RunSummary
    where
        F: FnMut(&TickSummary),
    {
        for _ in 0..ticks {
            let summary = self.step();
            hook(&summary);
        }
        let summary = self.summary();
        tracing::info!(
            scenario = %summary.scenario,
            ticks = summary.ticks,
            eaten = summary.eaten,
            food = summary.food,
            sharks = summary.sharks,
            "run complete"
        );
        summary
    }

    /// Totals since the engine was built.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            scenario: self.settings.scenario_name.clone(),
            ..self.totals.clone()
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        for entity in &self.spawner {
            entity.render(&self.physics, surface);
        }
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Host access to the population and physics together, e.g. to place
    /// entities by hand between steps.
    pub fn parts_mut(&mut self) -> (&mut Spawner, &mut P) {
        (&mut self.spawner, &mut self.physics)
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Lifetime;
    use crate::physics::SandboxPhysics;
    use crate::spawner::SpawnRule;
    use glam::Vec2;

    fn settings(spawner: SpawnerConfig) -> EngineSettings {
        EngineSettings {
            scenario_name: "unit".into(),
            seed: 11,
            step: StepConfig::from_fps(50, 6, 2),
            spawner,
        }
    }

    #[test]
    fn totals_track_every_tick() {
        let mut engine = EngineBuilder::new(settings(SpawnerConfig {
            food_initial: 4,
            food: SpawnRule::disabled(Lifetime::Ticks(2)),
            shark: SpawnRule::disabled(Lifetime::Immortal),
            ..SpawnerConfig::default()
        }))
        .build(SandboxPhysics::new(Vec2::new(40.0, 40.0)));

        let summary = engine.run(5);
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.expired, 4);
        assert_eq!(summary.food, 0);
        assert_eq!(summary.scenario, "unit");
        assert_eq!(engine.current_tick(), 5);
        assert_eq!(engine.physics().body_count(), 0);
    }

    #[test]
    fn render_draws_every_live_entity() {
        let engine = EngineBuilder::new(settings(SpawnerConfig {
            food_initial: 1,
            food: SpawnRule::disabled(Lifetime::Immortal),
            shark: SpawnRule::disabled(Lifetime::Immortal),
            ..SpawnerConfig::default()
        }))
        .build(SandboxPhysics::new(Vec2::new(40.0, 40.0)));

        let mut surface = crate::render::AsciiSurface::new(Vec2::new(40.0, 40.0), 8, 8);
        engine.render(&mut surface);
        assert_eq!(surface.count('*'), 1);
    }
}
