pub mod collision;
pub mod engine;
pub mod entity;
pub mod error;
pub mod physics;
pub mod render;
pub mod rng;
pub mod scenario;
pub mod spawner;

pub use engine::{Engine, EngineBuilder, EngineSettings, RunSummary, TickSummary};
pub use entity::{Entity, EntityId, EntityKind, Lifetime};
pub use scenario::{Scenario, ScenarioLoader};
pub use spawner::{Removal, Spawner, SpawnerConfig};
