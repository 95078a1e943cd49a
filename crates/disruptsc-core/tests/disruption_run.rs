//! Full runs over a diamond network: a cheap northern road and an
//! expensive southern one between a producing firm and its buyers.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use disruptsc_core::config::SimulationConfig;
use disruptsc_core::runner::{self, EndReason, NoOpObserver, StepObserver};
use disruptsc_core::shippers::LinkShippers;
use disruptsc_core::step::{SimulationState, StepSummary};
use disruptsc_network::{CommercialLink, TransportGraph};
use disruptsc_types::{EdgeRecord, NodeRecord, RouteChoice};

const NODES: &str = r#"[
    {"id": 1, "name": "Farm"},
    {"id": 2, "name": "North junction"},
    {"id": 3, "name": "South junction"},
    {"id": 4, "name": "City"}
]"#;

const EDGES: &str = r#"[
    {"id": 1, "end1": 1, "end2": 2, "type": "roads", "name": "North bridge", "km": 10.0, "capacity": 1000.0, "cost_per_ton": 1.0, "cost_travel_time": 0.5},
    {"id": 2, "end1": 2, "end2": 4, "type": "roads", "km": 10.0, "capacity": 1000.0, "cost_per_ton": 1.0, "cost_travel_time": 0.5},
    {"id": 3, "end1": 1, "end2": 3, "type": "roads", "km": 25.0, "capacity": 1000.0, "cost_per_ton": 2.0, "cost_travel_time": 1.0},
    {"id": 4, "end1": 3, "end2": 4, "type": "roads", "km": 25.0, "capacity": 1000.0, "cost_per_ton": 2.0, "cost_travel_time": 1.0}
]"#;

const LINKS: &str = r#"[
    {
        "id": 1,
        "supplier": {"kind": "firm", "id": 1},
        "buyer": {"kind": "household", "id": 1},
        "origin": 1,
        "destination": 4,
        "product": "AGR",
        "category": "domestic_B2C",
        "order": 10.0,
        "logistics_mode": "domestic"
    },
    {
        "id": 2,
        "supplier": {"kind": "firm", "id": 1},
        "buyer": {"kind": "country", "id": "THA"},
        "origin": 1,
        "destination": 4,
        "product": "AGR",
        "category": "export",
        "order": 5.0,
        "logistics_mode": "domestic"
    }
]"#;

fn setup(config_yaml: &str) -> (SimulationState, LinkShippers) {
    let config = SimulationConfig::parse(config_yaml).unwrap();
    let nodes: Vec<NodeRecord> = serde_json::from_str(NODES).unwrap();
    let edges: Vec<EdgeRecord> = serde_json::from_str(EDGES).unwrap();
    let mut graph = TransportGraph::from_records(nodes, edges).unwrap();
    graph.define_weights(
        config.simulation.route_optimization_weight,
        &config.logistics_modes,
    );
    let mut state = SimulationState::new(graph, config);

    let links: Vec<CommercialLink> = serde_json::from_str(LINKS).unwrap();
    state.config.validate_links(&links).unwrap();
    let mut shippers = LinkShippers::new(links);
    let settings = state.transport_settings();
    assert_eq!(shippers.initialize_routes(&mut state.graph, &settings), 2);
    (state, shippers)
}

#[derive(Default)]
struct Recorder {
    steps: Vec<u32>,
}

impl StepObserver for Recorder {
    fn on_step(&mut self, summary: &StepSummary, _state: &SimulationState) {
        self.steps.push(summary.time_step);
    }
}

const BRIDGE_CLOSED: &str = r#"
events:
  - type: transport_disruption
    edge_names: ["North bridge"]
    start_time: 1
    duration: 1
"#;

#[test]
fn detour_then_back_to_equilibrium() {
    let (mut state, mut shippers) = setup(BRIDGE_CLOSED);
    let mut recorder = Recorder::default();
    let result = runner::run_disruption(&mut state, &mut shippers, &mut recorder).unwrap();

    assert_eq!(result.end_reason, EndReason::BackToEquilibrium);
    assert_eq!(result.steps, 3);
    assert_eq!(recorder.steps, vec![0, 1, 2]);

    let detour = result.summaries.get(1).unwrap();
    assert_eq!(detour.disruptions_started, 1);
    assert_eq!(detour.undeliverable_links, 0);
    assert!(detour.indicators.household_extra_spending > 0.0);
    assert!(detour.indicators.country_extra_spending > 0.0);
    assert_eq!(detour.indicators.household_consumption_loss, 0.0);

    let recovered = result.final_summary().unwrap();
    assert!(recovered.indicators.is_back_to_equilibrium(1e-3));
    let link = shippers.link(disruptsc_types::CommercialLinkId::new(1)).unwrap();
    assert_eq!(link.current_route, Some(RouteChoice::Main));
    assert!(link.alternative_route.is_some());
}

#[test]
fn without_epsilon_runs_to_the_horizon() {
    let yaml = format!("simulation:\n  epsilon_stop_condition: null\n{BRIDGE_CLOSED}");
    let (mut state, mut shippers) = setup(&yaml);
    let result = runner::run_disruption(&mut state, &mut shippers, &mut NoOpObserver).unwrap();

    // duration 1 maps to 4 steps after the initial one.
    assert_eq!(result.end_reason, EndReason::MaxDurationReached);
    assert_eq!(result.steps, 5);
    assert_eq!(state.clock.time_step(), 4);
}

#[test]
fn isolated_city_loses_consumption() {
    let yaml = r#"
events:
  - type: transport_disruption
    node_names: ["City"]
    start_time: 1
    duration: 2
"#;
    let (mut state, mut shippers) = setup(yaml);
    let result = runner::run_disruption(&mut state, &mut shippers, &mut NoOpObserver).unwrap();

    assert_eq!(result.end_reason, EndReason::BackToEquilibrium);
    assert_eq!(result.steps, 4);
    for summary in result.summaries.get(1..3).unwrap() {
        assert_eq!(summary.undeliverable_links, 2);
        assert_eq!(summary.indicators.household_consumption_loss, 10.0);
        assert_eq!(summary.indicators.country_consumption_loss, 5.0);
    }
}

#[test]
fn static_run_and_missing_disruption() {
    let (mut state, mut shippers) = setup("");
    let result = runner::run_static(&mut state, &mut shippers, &mut NoOpObserver).unwrap();
    assert_eq!(result.end_reason, EndReason::StaticRun);
    let summary = result.final_summary().unwrap();
    assert_eq!(summary.shipments_placed, 2);
    assert!(summary.flows.is_some());

    let err = runner::run_disruption(&mut state, &mut shippers, &mut NoOpObserver).unwrap_err();
    assert!(matches!(err, runner::RunnerError::NoDisruption));
}
