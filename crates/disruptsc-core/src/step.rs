//! One time step of the simulation.
//!
//! Each step walks through the same phases in a fixed order:
//!
//! 1. **Reset** -- zero edge loads and restore the routing weights.
//! 2. **Disrupt** -- apply the disruptions starting at this step.
//! 3. **Order retrieval** and **production planning** -- agents read their
//!    orders, plan production and purchases, and produce.
//! 4. **Delivery** -- shipments are placed on their routes. Traffic and
//!    congestion are evaluated on the loaded graph, and flows are captured
//!    at steps 0 and 1.
//! 5. **Receipt** -- buyers take their deliveries off the graph; firms
//!    evaluate profit.
//! 6. **Disruption decay** -- disruptions and destroyed capital recover by
//!    one step.
//! 7. **Convergence check** -- the step reports the equilibrium indicators
//!    the run loop decides on.
//!
//! Steps never interleave: loads and congestion left by one step feed the
//! routing decisions of the next.

use core::fmt;

use disruptsc_network::{FlowTable, TransportGraph};
use serde::Serialize;
use tracing::{debug, info};

use crate::agents::{AgentError, EconomicAgents, EquilibriumIndicators, TransportSettings};
use crate::clock::SimulationClock;
use crate::config::SimulationConfig;
use crate::disruption::{Disruption, DisruptionList};

/// Errors that can occur during a time step.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// An agent phase failed.
    #[error("agent error at time step {time_step}: {source}")]
    Agent {
        /// The time step that failed.
        time_step: u32,
        /// The underlying agent error.
        source: AgentError,
    },
}

/// Phases of a time step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    /// Loads and weights are reset.
    Reset,
    /// Scheduled disruptions are applied.
    Disrupt,
    /// Firms retrieve orders.
    OrderRetrieval,
    /// Firms plan and run production.
    ProductionPlanning,
    /// Agents plan purchases and send orders.
    Purchasing,
    /// Shipments are placed on the graph.
    Delivery,
    /// Buyers receive their shipments.
    Receipt,
    /// Disruptions shorten by one step.
    DisruptionDecay,
    /// Equilibrium indicators are collected.
    ConvergenceCheck,
}

impl StepPhase {
    /// Phase name as it appears in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Disrupt => "disrupt",
            Self::OrderRetrieval => "order_retrieval",
            Self::ProductionPlanning => "production_planning",
            Self::Purchasing => "purchasing",
            Self::Delivery => "delivery",
            Self::Receipt => "receipt",
            Self::DisruptionDecay => "disruption_decay",
            Self::ConvergenceCheck => "convergence_check",
        }
    }
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a single time step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSummary {
    /// The time step that was executed.
    pub time_step: u32,
    /// Disruptions that started at this step.
    pub disruptions_started: u32,
    /// Shipments placed on the graph.
    pub shipments_placed: u32,
    /// Links that had no available route.
    pub undeliverable_links: u32,
    /// Edges with positive congestion after delivery.
    pub congested_edges: usize,
    /// Flows per edge, captured at steps 0 and 1.
    pub flows: Option<FlowTable>,
    /// Equilibrium indicators at the end of the step.
    pub indicators: EquilibriumIndicators,
}

/// The mutable state passed through the time-step cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// The simulation clock.
    pub clock: SimulationClock,
    /// The transport network.
    pub graph: TransportGraph,
    /// Every disruption of the run.
    pub disruptions: DisruptionList,
    /// Run configuration.
    pub config: SimulationConfig,
}

impl SimulationState {
    /// Bundle a graph and a configuration, resolving the configured events
    /// against the graph.
    pub fn new(graph: TransportGraph, config: SimulationConfig) -> Self {
        let disruptions = DisruptionList::from_events(&config.events, &graph);
        Self {
            clock: SimulationClock::new(config.simulation.time_resolution),
            graph,
            disruptions,
            config,
        }
    }

    /// Delivery settings derived from the configuration.
    pub fn transport_settings(&self) -> TransportSettings {
        let simulation = &self.config.simulation;
        TransportSettings {
            capacity_constraint: simulation.capacity_constraint,
            criterion: simulation.route_optimization_weight,
            sectors_no_transport_network: simulation.sectors_no_transport_network.clone(),
        }
    }
}

/// Execute the time step the clock currently points at.
///
/// The clock is not advanced; the run loop does that between steps.
///
/// # Errors
///
/// Returns [`StepError::Agent`] if any agent phase fails.
pub fn run_time_step(
    state: &mut SimulationState,
    agents: &mut dyn EconomicAgents,
) -> Result<StepSummary, StepError> {
    let time_step = state.clock.time_step();
    let agent_error = |source| StepError::Agent { time_step, source };
    let settings = state.transport_settings();
    let criterion = state.config.simulation.route_optimization_weight;
    info!(time_step, elapsed_days = state.clock.elapsed_days(), "Time step started");

    // --- Reset ---
    enter(time_step, StepPhase::Reset);
    state.graph.reset_loads(criterion, &state.config.logistics_modes);

    // --- Disrupt ---
    enter(time_step, StepPhase::Disrupt);
    let mut disruptions_started = 0_u32;
    for disruption in state.disruptions.filter_start_time(time_step) {
        match disruption {
            Disruption::Transport(transport) => {
                let outcome = transport.implement(&mut state.graph);
                info!(
                    time_step,
                    nodes = outcome.nodes.len(),
                    edges = outcome.edges.len(),
                    "Transport disruption applied"
                );
            }
            Disruption::Capital(destruction) => {
                agents.destroy_capital(destruction).map_err(agent_error)?;
            }
        }
        disruptions_started = disruptions_started.saturating_add(1);
    }

    // --- Order retrieval ---
    enter(time_step, StepPhase::OrderRetrieval);
    agents.retrieve_orders(time_step).map_err(agent_error)?;

    // --- Production planning ---
    enter(time_step, StepPhase::ProductionPlanning);
    agents
        .plan_production(state.config.simulation.propagate_input_price_change)
        .map_err(agent_error)?;

    // --- Purchasing ---
    enter(time_step, StepPhase::Purchasing);
    agents.plan_purchase().map_err(agent_error)?;
    agents.send_purchase_orders().map_err(agent_error)?;
    agents.produce().map_err(agent_error)?;

    // --- Delivery ---
    enter(time_step, StepPhase::Delivery);
    let report = agents
        .deliver(&mut state.graph, &settings)
        .map_err(agent_error)?;
    let congested_edges = if state.config.simulation.congestion {
        let coefficients = state.config.sector_volume_coefficients.as_ref();
        if time_step == 0 {
            state.graph.evaluate_normal_traffic(coefficients);
            0
        } else {
            state.graph.evaluate_congestion(coefficients)
        }
    } else {
        0
    };
    let flows = (time_step <= 1).then(|| {
        state
            .graph
            .compute_flow_per_segment(&state.config.simulation.flow_types)
    });

    // --- Receipt ---
    enter(time_step, StepPhase::Receipt);
    agents
        .receive_products(&mut state.graph, &settings)
        .map_err(agent_error)?;
    agents.evaluate_profit().map_err(agent_error)?;

    // --- Disruption decay ---
    enter(time_step, StepPhase::DisruptionDecay);
    state.graph.decay_disruptions();
    agents.update_disrupted_production_capacity();

    // --- Convergence check ---
    enter(time_step, StepPhase::ConvergenceCheck);
    let indicators = agents.equilibrium_indicators();

    info!(
        time_step,
        disruptions_started,
        shipments_placed = report.shipments_placed,
        undeliverable = report.undeliverable,
        congested_edges,
        household_extra_spending = indicators.household_extra_spending,
        household_consumption_loss = indicators.household_consumption_loss,
        "Time step completed"
    );

    Ok(StepSummary {
        time_step,
        disruptions_started,
        shipments_placed: report.shipments_placed,
        undeliverable_links: report.undeliverable,
        congested_edges,
        flows,
        indicators,
    })
}

fn enter(time_step: u32, phase: StepPhase) {
    debug!(time_step, %phase, "Entering phase");
}
