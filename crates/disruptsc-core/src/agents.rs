//! Economic agent collaborator trait.
//!
//! Firms, households and countries live outside this crate. During each
//! time step the loop drives them through the [`EconomicAgents`] trait,
//! one phase at a time, and reads back the indicators of the equilibrium
//! check. The [`LinkShippers`](crate::shippers::LinkShippers) population is
//! the reference implementation.

use std::collections::BTreeSet;

use disruptsc_network::{NetworkError, TransportGraph};
use disruptsc_types::{FirmId, OptimizationCriterion, Sector};
use serde::{Deserialize, Serialize};

use crate::disruption::CapitalDestruction;

/// Errors raised by an agent population.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A transport-graph operation failed while delivering or receiving.
    #[error("network error: {source}")]
    Network {
        /// The underlying network error.
        #[from]
        source: NetworkError,
    },

    /// An event targets a firm the population does not know.
    #[error("unknown firm: {0}")]
    UnknownFirm(FirmId),
}

/// Settings the delivery and receipt phases need.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSettings {
    /// Whether shipments load edges and trigger capacity burdens.
    pub capacity_constraint: bool,
    /// Cost criterion routes are evaluated with.
    pub criterion: OptimizationCriterion,
    /// Sectors delivered without using the network.
    pub sectors_no_transport_network: BTreeSet<Sector>,
}

/// What the delivery phase did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Shipments placed on the transport graph.
    pub shipments_placed: u32,
    /// Links with no available route this step.
    pub undeliverable: u32,
}

/// Aggregates checked by the back-to-equilibrium stop condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumIndicators {
    /// Household spending above the pre-disruption level.
    pub household_extra_spending: f64,
    /// Household consumption below the pre-disruption level.
    pub household_consumption_loss: f64,
    /// Country spending above the pre-disruption level.
    pub country_extra_spending: f64,
    /// Country consumption below the pre-disruption level.
    pub country_consumption_loss: f64,
}

impl EquilibriumIndicators {
    /// Whether all four indicators are at most `epsilon`.
    pub fn is_back_to_equilibrium(&self, epsilon: f64) -> bool {
        [
            self.household_extra_spending,
            self.household_consumption_loss,
            self.country_extra_spending,
            self.country_consumption_loss,
        ]
        .into_iter()
        .all(|value| value <= epsilon)
    }
}

/// The agent populations driven by the time-step cycle.
///
/// Phases run in declaration order. Phases a population does not model
/// keep their default no-op body.
pub trait EconomicAgents {
    /// Firms retrieve the orders their buyers sent during the previous step.
    fn retrieve_orders(&mut self, time_step: u32) -> Result<(), AgentError>;

    /// Firms plan production from orders and capacity. With
    /// `propagate_input_price_change`, cost increases reach the buyers'
    /// prices.
    fn plan_production(&mut self, propagate_input_price_change: bool) -> Result<(), AgentError>;

    /// Firms plan input purchases.
    fn plan_purchase(&mut self) -> Result<(), AgentError> {
        Ok(())
    }

    /// Households, countries then firms send purchase orders.
    fn send_purchase_orders(&mut self) -> Result<(), AgentError> {
        Ok(())
    }

    /// Firms produce.
    fn produce(&mut self) -> Result<(), AgentError>;

    /// Countries then firms ship their deliveries over the graph.
    fn deliver(
        &mut self,
        graph: &mut TransportGraph,
        settings: &TransportSettings,
    ) -> Result<DeliveryReport, AgentError>;

    /// Households, countries then firms take their deliveries off the graph.
    fn receive_products(
        &mut self,
        graph: &mut TransportGraph,
        settings: &TransportSettings,
    ) -> Result<(), AgentError>;

    /// Firms evaluate their profit.
    fn evaluate_profit(&mut self) -> Result<(), AgentError> {
        Ok(())
    }

    /// Destroy part of the production capital of the targeted firms.
    fn destroy_capital(&mut self, destruction: &CapitalDestruction) -> Result<(), AgentError>;

    /// One step of capital reconstruction.
    fn update_disrupted_production_capacity(&mut self);

    /// Current equilibrium indicators.
    fn equilibrium_indicators(&self) -> EquilibriumIndicators;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equilibrium_requires_every_indicator() {
        let mut indicators = EquilibriumIndicators::default();
        assert!(indicators.is_back_to_equilibrium(1e-3));
        indicators.country_consumption_loss = 1e-3;
        assert!(indicators.is_back_to_equilibrium(1e-3));
        indicators.household_extra_spending = 0.5;
        assert!(!indicators.is_back_to_equilibrium(1e-3));
    }
}
