//! Step observer that reports the state of the network after each step.

use disruptsc_core::runner::StepObserver;
use disruptsc_core::step::{SimulationState, StepSummary};
use tracing::{debug, info};

/// Observer logging disruption and delivery state after every step.
#[derive(Debug, Default)]
pub struct StepLogger {
    worst_undeliverable: u32,
}

impl StepLogger {
    /// Create a new step logger.
    pub const fn new() -> Self {
        Self {
            worst_undeliverable: 0,
        }
    }

    /// Highest number of undeliverable links seen in one step.
    pub const fn worst_undeliverable(&self) -> u32 {
        self.worst_undeliverable
    }
}

impl StepObserver for StepLogger {
    fn on_step(&mut self, summary: &StepSummary, state: &SimulationState) {
        self.worst_undeliverable = self.worst_undeliverable.max(summary.undeliverable_links);
        let indicators = &summary.indicators;
        info!(
            time_step = summary.time_step,
            disrupted_nodes = state.graph.disrupted_nodes().len(),
            disrupted_edges = state.graph.disrupted_edges().len(),
            undeliverable = summary.undeliverable_links,
            congested_edges = summary.congested_edges,
            household_extra_spending = indicators.household_extra_spending,
            household_consumption_loss = indicators.household_consumption_loss,
            country_extra_spending = indicators.country_extra_spending,
            country_consumption_loss = indicators.country_consumption_loss,
            "Step observed"
        );
        if let Some(flows) = &summary.flows {
            debug!(
                time_step = summary.time_step,
                edges_with_flows = flows.len(),
                "Flows captured"
            );
        }
    }
}
