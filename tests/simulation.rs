use std::path::PathBuf;

use shoal::{
    engine::{EngineBuilder, EngineSettings},
    entity::{EntityKind, Lifetime, Placement},
    physics::{PhysicsWorld, SandboxPhysics, StepConfig},
    spawner::{SpawnRule, SpawnerConfig},
    Scenario, ScenarioLoader,
};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path() -> PathBuf {
    PathBuf::from("scenarios/open_ocean.yaml")
}

fn quiet_settings(food_initial: u32, food_lifetime: Lifetime) -> EngineSettings {
    EngineSettings {
        scenario_name: "quiet".into(),
        seed: 5,
        step: StepConfig::from_fps(50, 6, 2),
        spawner: SpawnerConfig {
            food_initial,
            food: SpawnRule::disabled(food_lifetime),
            shark: SpawnRule::disabled(Lifetime::Immortal),
            ..SpawnerConfig::default()
        },
    }
}

fn sandbox() -> SandboxPhysics {
    SandboxPhysics::new(glam::Vec2::new(1600.0, 1200.0) / 30.0)
}

#[test]
fn scenario_loader_reads_fixture() {
    let scenario = scenario_loader().load(scenario_path()).expect("scenario parses");
    assert_eq!(scenario.name, "open_ocean");
    assert_eq!(
        scenario.description.as_deref(),
        Some("Default viewport with drifting food and a few sharks")
    );
    assert_eq!(scenario.seed, 7);
    assert_eq!(scenario.ticks, 500);
    assert_eq!(scenario.food.initial, 20);
    assert_eq!(scenario.shark.spawn_one_in, Some(50));
}

#[test]
fn loader_reports_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.yaml"), "food:\n  lifetime: -5\n").unwrap();
    std::fs::write(dir.path().join("garbled.yaml"), "food: [1, 2").unwrap();

    let loader = ScenarioLoader::new(dir.path());
    let err = loader.load("broken.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("food.lifetime"));
    assert!(loader.load("garbled.yaml").is_err());
    assert!(loader.load("missing.yaml").is_err());
}

#[test]
fn loader_rejects_non_finite_shark_motion() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("nan_thrust.yaml"),
        "shark:\n  spawn_one_in: 0\n  impulse: .nan\n  lifetime: -1\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("negative_damping.yaml"),
        "shark:\n  linear_damping: -1.0\n",
    )
    .unwrap();

    let loader = ScenarioLoader::new(dir.path());
    let err = loader.load("nan_thrust.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("shark.impulse"));
    let err = loader.load("negative_damping.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("shark.linear_damping"));
}

#[test]
fn engine_runs_deterministically() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();

    let mut engine_a = scenario.build_engine();
    let mut engine_b = scenario.build_engine();
    let summary_a = engine_a.run(300);
    let summary_b = engine_b.run(300);

    assert_eq!(summary_a, summary_b);
    let ids_a: Vec<_> = engine_a.spawner().iter().map(|e| (e.id(), e.age())).collect();
    let ids_b: Vec<_> = engine_b.spawner().iter().map(|e| (e.id(), e.age())).collect();
    assert_eq!(ids_a, ids_b);
}

#[test]
fn different_seeds_diverge() {
    let mut scenario = Scenario::default();
    scenario.seed = 1;
    let first = scenario.build_engine().run(300);
    scenario.seed = 2;
    let second = scenario.build_engine().run(300);
    assert_ne!(first, second);
}

#[test]
fn five_quiet_food_age_to_one_hundred() {
    let mut engine =
        EngineBuilder::new(quiet_settings(5, Lifetime::Immortal)).build(sandbox());
    engine.run(100);

    let spawner = engine.spawner();
    assert_eq!(spawner.count(EntityKind::Food), 5);
    assert_eq!(spawner.len(), 5);
    assert!(spawner.iter().all(|e| e.age() == 100));
}

#[test]
fn five_quiet_food_with_lifetime_fifty_are_gone_after_tick_fifty_one() {
    let mut engine = EngineBuilder::new(quiet_settings(5, Lifetime::Ticks(50))).build(sandbox());
    engine.run(50);
    assert_eq!(engine.spawner().len(), 5);

    let tick = engine.step();
    assert_eq!(tick.tick, 51);
    assert_eq!(tick.expired.len(), 5);
    assert!(engine.spawner().is_empty());
    assert_eq!(engine.physics().body_count(), 0);
}

#[test]
fn shark_on_top_of_food_eats_it_in_one_advance() {
    let mut engine =
        EngineBuilder::new(quiet_settings(0, Lifetime::Immortal)).build(sandbox());
    let (spawner, physics) = engine.parts_mut();
    let shark = spawner
        .spawn_at(EntityKind::Shark, Placement::at(20.0, 20.0), physics)
        .unwrap();
    let food = spawner
        .spawn_at(EntityKind::Food, Placement::at(20.3, 20.0), physics)
        .unwrap();

    let tick = engine.step();
    assert_eq!(tick.eaten, vec![food]);
    assert_eq!(tick.removal_misses, 0);
    assert!(engine.spawner().contains(shark));
    assert!(!engine.spawner().contains(food));
    // the eaten body lingers until the next tick flushes it
    assert_eq!(engine.physics().body_count(), 2);

    let tick = engine.step();
    assert!(tick.eaten.is_empty());
    assert_eq!(engine.physics().body_count(), 1);
}

#[test]
fn two_sharks_reaching_one_food_remove_it_once() {
    let mut engine =
        EngineBuilder::new(quiet_settings(0, Lifetime::Immortal)).build(sandbox());
    let (spawner, physics) = engine.parts_mut();
    for x in [10.0, 10.4] {
        spawner
            .spawn_at(EntityKind::Shark, Placement::at(x, 10.0), physics)
            .unwrap();
    }
    let food = spawner
        .spawn_at(EntityKind::Food, Placement::at(10.2, 10.0), physics)
        .unwrap();

    let tick = engine.step();
    assert_eq!(tick.eaten, vec![food]);
    assert_eq!(tick.removal_misses, 1);
    assert_eq!(tick.sharks, 2);
    assert_eq!(tick.food, 0);
}

#[test]
fn expired_food_is_never_eaten_afterwards() {
    let mut engine = EngineBuilder::new(quiet_settings(0, Lifetime::Ticks(0))).build(sandbox());
    let (spawner, physics) = engine.parts_mut();
    spawner
        .spawn_at(EntityKind::Shark, Placement::at(5.0, 5.0), physics)
        .unwrap();
    spawner
        .spawn_at(EntityKind::Food, Placement::at(5.1, 5.0), physics)
        .unwrap();

    let tick = engine.step();
    assert_eq!(tick.expired.len(), 1);
    assert!(tick.eaten.is_empty());
    assert_eq!(tick.removal_misses, 0);
    assert_eq!(engine.physics().body_count(), 1);
}

#[test]
fn population_and_bodies_agree_after_every_step() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let mut engine = scenario.build_engine();
    for _ in 0..400 {
        engine.step();
        let spawner = engine.spawner();
        assert_eq!(
            engine.physics().body_count(),
            spawner.len() + spawner.pending_bodies()
        );
        for entity in spawner {
            assert!(!entity.lifetime().is_expired(entity.age()));
            assert!(engine.physics().transform(entity.body()).is_some());
        }
    }
}
