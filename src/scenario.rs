use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{Engine, EngineBuilder, EngineSettings},
    entity::{KindProfile, Lifetime},
    error::ScenarioError,
    physics::{SandboxPhysics, StepConfig},
    spawner::{SpawnRule, SpawnerConfig},
};

fn default_name() -> String {
    "open_ocean".to_string()
}

fn default_ticks() -> u64 {
    1_000
}

fn default_viewport_width() -> f32 {
    1600.0
}

fn default_viewport_height() -> f32 {
    1200.0
}

fn default_pixels_per_unit() -> f32 {
    30.0
}

fn default_fps() -> u32 {
    50
}

fn default_velocity_iterations() -> u32 {
    6
}

fn default_position_iterations() -> u32 {
    2
}

fn default_food_initial() -> u32 {
    20
}

fn default_food_spawn_one_in() -> Option<u32> {
    Some(10)
}

fn default_food_lifetime() -> i64 {
    10
}

fn default_food_radius() -> f32 {
    0.5
}

fn default_shark_spawn_one_in() -> Option<u32> {
    Some(50)
}

fn default_shark_lifetime() -> i64 {
    200
}

fn default_shark_impulse() -> f32 {
    0.5
}

fn default_shark_damping() -> f32 {
    0.5
}

fn default_shark_size() -> f32 {
    0.8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub physics: PhysicsSection,
    #[serde(default)]
    pub food: FoodSection,
    #[serde(default)]
    pub shark: SharkSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_viewport_width")]
    pub width: f32,
    #[serde(default = "default_viewport_height")]
    pub height: f32,
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
            pixels_per_unit: default_pixels_per_unit(),
        }
    }
}

impl WorldSection {
    /// World extent in physics units.
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / self.pixels_per_unit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSection {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_velocity_iterations")]
    pub velocity_iterations: u32,
    #[serde(default = "default_position_iterations")]
    pub position_iterations: u32,
}

impl Default for PhysicsSection {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            velocity_iterations: default_velocity_iterations(),
            position_iterations: default_position_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSection {
    #[serde(default = "default_food_initial")]
    pub initial: u32,
    #[serde(default = "default_food_spawn_one_in")]
    pub spawn_one_in: Option<u32>,
    /// `-1` keeps food alive until eaten.
    #[serde(default = "default_food_lifetime")]
    pub lifetime: i64,
    #[serde(default = "default_food_radius")]
    pub radius: f32,
}

impl Default for FoodSection {
    fn default() -> Self {
        Self {
            initial: default_food_initial(),
            spawn_one_in: default_food_spawn_one_in(),
            lifetime: default_food_lifetime(),
            radius: default_food_radius(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharkSection {
    #[serde(default = "default_shark_spawn_one_in")]
    pub spawn_one_in: Option<u32>,
    #[serde(default = "default_shark_lifetime")]
    pub lifetime: i64,
    #[serde(default = "default_shark_impulse")]
    pub impulse: f32,
    #[serde(default = "default_shark_damping")]
    pub linear_damping: f32,
    #[serde(default = "default_shark_size")]
    pub size: f32,
}

impl Default for SharkSection {
    fn default() -> Self {
        Self {
            spawn_one_in: default_shark_spawn_one_in(),
            lifetime: default_shark_lifetime(),
            impulse: default_shark_impulse(),
            linear_damping: default_shark_damping(),
            size: default_shark_size(),
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: None,
            seed: 0,
            ticks: default_ticks(),
            world: WorldSection::default(),
            physics: PhysicsSection::default(),
            food: FoodSection::default(),
            shark: SharkSection::default(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let world = &self.world;
        for (field, value) in [
            ("world.width", world.width),
            ("world.height", world.height),
            ("world.pixels_per_unit", world.pixels_per_unit),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ScenarioError::Validation(format!(
                    "{field} must be positive, got {value}"
                )));
            }
        }

        if self.physics.fps == 0 {
            return Err(ScenarioError::Validation("physics.fps must be non-zero".into()));
        }

        for (field, lifetime) in [
            ("food.lifetime", self.food.lifetime),
            ("shark.lifetime", self.shark.lifetime),
        ] {
            if lifetime < -1 {
                return Err(ScenarioError::Validation(format!(
                    "{field} must be -1 (immortal) or non-negative, got {lifetime}"
                )));
            }
        }

        if !(self.food.radius.is_finite() && self.food.radius > 0.0) {
            return Err(ScenarioError::Validation("food.radius must be positive".into()));
        }
        if !(self.shark.size.is_finite() && self.shark.size > 0.0) {
            return Err(ScenarioError::Validation("shark.size must be positive".into()));
        }
        if !self.shark.impulse.is_finite() {
            return Err(ScenarioError::Validation(format!(
                "shark.impulse must be finite, got {}",
                self.shark.impulse
            )));
        }
        if !(self.shark.linear_damping.is_finite() && self.shark.linear_damping >= 0.0) {
            return Err(ScenarioError::Validation(format!(
                "shark.linear_damping must be finite and non-negative, got {}",
                self.shark.linear_damping
            )));
        }
        Ok(())
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.unwrap_or(self.ticks)
    }

    pub fn step_config(&self) -> StepConfig {
        StepConfig::from_fps(
            self.physics.fps,
            self.physics.velocity_iterations,
            self.physics.position_iterations,
        )
    }

    pub fn spawner_config(&self) -> SpawnerConfig {
        SpawnerConfig {
            food_initial: self.food.initial,
            food: SpawnRule {
                one_in: self.food.spawn_one_in,
                lifetime: Lifetime::from_limit(self.food.lifetime),
            },
            shark: SpawnRule {
                one_in: self.shark.spawn_one_in,
                lifetime: Lifetime::from_limit(self.shark.lifetime),
            },
            food_profile: KindProfile::food(self.food.radius),
            shark_profile: KindProfile::shark(
                self.shark.size,
                self.shark.impulse,
                self.shark.linear_damping,
            ),
        }
    }

    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            scenario_name: self.name.clone(),
            seed: self.seed,
            step: self.step_config(),
            spawner: self.spawner_config(),
        }
    }

    /// Engine backed by the bundled sandbox physics.
    pub fn build_engine(&self) -> Engine<SandboxPhysics> {
        EngineBuilder::new(self.settings()).build(SandboxPhysics::new(self.world.bounds()))
    }
}
