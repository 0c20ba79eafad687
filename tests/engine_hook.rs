use shoal::ScenarioLoader;

#[test]
fn engine_runs_hook_each_tick() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader
        .load("scenarios/open_ocean.yaml")
        .expect("scenario should load");
    let mut engine = scenario.build_engine();
    assert_eq!(engine.scenario_name(), "open_ocean");

    let mut ticks = Vec::new();
    let summary = engine.run_with_hook(6, |tick| ticks.push(tick.tick));

    assert_eq!(ticks.len(), 6);
    assert_eq!(ticks.first().copied(), Some(1));
    assert_eq!(ticks.last().copied(), Some(6));
    assert_eq!(summary.ticks, 6);
    assert_eq!(summary.scenario, "open_ocean");
}
