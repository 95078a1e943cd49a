//! Reference agent population: suppliers shipping along commercial links.
//!
//! Every link carries a fixed baseline order each step. A firm delivers
//! its orders in proportion to its remaining production capacity, over the
//! link's main route while it is available and over an alternative route
//! otherwise. Final consumers (households and countries) record the value
//! they did not receive as consumption loss and, when suppliers pass
//! transport costs on, the transport cost above the baseline as extra
//! spending.

use std::collections::{BTreeMap, BTreeSet};

use disruptsc_network::{CommercialLink, NetworkError, Route, TransportGraph};
use disruptsc_types::{AgentRef, CommercialLinkId, EdgeAttribute, FirmId};
use tracing::{debug, info, warn};

use crate::agents::{
    AgentError, DeliveryReport, EconomicAgents, EquilibriumIndicators, TransportSettings,
};
use crate::disruption::CapitalDestruction;

/// Capital destroyed at one firm, with the steps left until it is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CapacityLoss {
    fraction: f64,
    remaining: u32,
}

/// Per-link bookkeeping of the current step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LinkStep {
    order: f64,
    planned_delivery: f64,
    extra_cost: f64,
    transport_cost: f64,
}

/// Commercial links and the firms, households and countries at their ends.
#[derive(Debug, Clone, Default)]
pub struct LinkShippers {
    links: Vec<CommercialLink>,
    baseline_costs: BTreeMap<CommercialLinkId, f64>,
    base_prices: BTreeMap<CommercialLinkId, f64>,
    unrouted: BTreeSet<CommercialLinkId>,
    firms: BTreeSet<FirmId>,
    capacity_losses: BTreeMap<FirmId, Vec<CapacityLoss>>,
    steps: BTreeMap<CommercialLinkId, LinkStep>,
    pass_costs_on: bool,
    profits: BTreeMap<FirmId, f64>,
    indicators: EquilibriumIndicators,
}

impl LinkShippers {
    /// Create the population from its commercial links.
    pub fn new(links: Vec<CommercialLink>) -> Self {
        let firms = links
            .iter()
            .flat_map(|link| [link.supplier.as_firm(), link.buyer.as_firm()])
            .flatten()
            .collect();
        let base_prices = links.iter().map(|link| (link.id, link.price)).collect();
        Self {
            links,
            base_prices,
            firms,
            ..Self::default()
        }
    }

    /// All commercial links.
    pub fn links(&self) -> &[CommercialLink] {
        &self.links
    }

    /// Look up a link.
    pub fn link(&self, id: CommercialLinkId) -> Option<&CommercialLink> {
        self.links.iter().find(|link| link.id == id)
    }

    /// Last computed profit of a firm.
    pub fn profit(&self, firm: FirmId) -> Option<f64> {
        self.profits.get(&firm).copied()
    }

    /// Links that could not be given a main route.
    pub const fn unrouted(&self) -> &BTreeSet<CommercialLinkId> {
        &self.unrouted
    }

    /// Fraction of its production capacity a firm has left.
    pub fn production_capacity(&self, firm: FirmId) -> f64 {
        self.capacity_losses
            .get(&firm)
            .map_or(1.0, |losses| {
                losses.iter().map(|loss| 1.0 - loss.fraction).product()
            })
    }

    /// Choose the main route of every link using the network and record
    /// its baseline transport cost. Returns the number of routed links.
    ///
    /// Links whose buyer cannot be reached are logged and then supplied
    /// without transport.
    pub fn initialize_routes(
        &mut self,
        graph: &mut TransportGraph,
        settings: &TransportSettings,
    ) -> usize {
        info!(
            links = self.links.len(),
            "Each commercial link is being linked to a route of the transport network"
        );
        let mut routed = 0_usize;
        for link in &mut self.links {
            if settings.sectors_no_transport_network.contains(&link.product) {
                continue;
            }
            link.set_delivery(link.order);
            let chosen = link
                .choose_initial_route(graph, settings.capacity_constraint)
                .and_then(|()| {
                    let route = link.route.as_ref().ok_or(NetworkError::NoPath {
                        from: link.origin,
                        to: link.destination,
                    })?;
                    transport_cost(graph, route, link.delivery_in_tons, settings)
                });
            match chosen {
                Ok(cost) => {
                    self.baseline_costs.insert(link.id, cost);
                    routed = routed.saturating_add(1);
                }
                Err(err) => {
                    warn!(link = %link.id, error = %err, "No initial route, link supplied without transport");
                    self.unrouted.insert(link.id);
                }
            }
        }
        info!(routed, unrouted = self.unrouted.len(), "Initial routes chosen");
        routed
    }
}

/// Whether the link's shipments travel over the network.
fn uses_network(
    link: &CommercialLink,
    unrouted: &BTreeSet<CommercialLinkId>,
    settings: &TransportSettings,
) -> bool {
    !settings.sectors_no_transport_network.contains(&link.product) && !unrouted.contains(&link.id)
}

/// Monetary transport cost of `tons` along `route`, congestion included.
fn transport_cost(
    graph: &TransportGraph,
    route: &Route,
    tons: f64,
    settings: &TransportSettings,
) -> Result<f64, NetworkError> {
    let per_ton = graph.aggregate_on_route(route, EdgeAttribute::Cost(settings.criterion))?
        + graph.congestion_time_cost(route)?;
    Ok(per_ton * tons)
}

impl EconomicAgents for LinkShippers {
    fn retrieve_orders(&mut self, time_step: u32) -> Result<(), AgentError> {
        self.steps = self
            .links
            .iter()
            .map(|link| {
                (
                    link.id,
                    LinkStep {
                        order: link.order,
                        ..LinkStep::default()
                    },
                )
            })
            .collect();
        self.indicators = EquilibriumIndicators::default();
        self.profits.clear();
        debug!(time_step, orders = self.steps.len(), "Orders retrieved");
        Ok(())
    }

    fn plan_production(&mut self, propagate_input_price_change: bool) -> Result<(), AgentError> {
        self.pass_costs_on = propagate_input_price_change;
        for link in &self.links {
            let capacity = link
                .supplier
                .as_firm()
                .map_or(1.0, |firm| self.production_capacity(firm));
            if let Some(step) = self.steps.get_mut(&link.id) {
                step.planned_delivery = step.order * capacity;
            }
        }
        Ok(())
    }

    fn produce(&mut self) -> Result<(), AgentError> {
        let rationed = self
            .steps
            .values()
            .filter(|step| step.planned_delivery < step.order)
            .count();
        if rationed > 0 {
            debug!(rationed, "Links rationed by production capacity");
        }
        Ok(())
    }

    fn deliver(
        &mut self,
        graph: &mut TransportGraph,
        settings: &TransportSettings,
    ) -> Result<DeliveryReport, AgentError> {
        let mut report = DeliveryReport::default();
        let Self {
            links,
            steps,
            baseline_costs,
            base_prices,
            unrouted,
            pass_costs_on,
            ..
        } = self;
        for link in links.iter_mut() {
            let Some(step) = steps.get_mut(&link.id) else {
                continue;
            };
            link.set_delivery(step.planned_delivery);
            if !uses_network(link, unrouted, settings) {
                continue;
            }
            if link.select_delivery_route(graph).is_none() {
                link.set_delivery(0.0);
                report.undeliverable = report.undeliverable.saturating_add(1);
                continue;
            }
            let Some(route) = link.selected_route() else {
                continue;
            };

            // The record placed on the graph carries this step's price.
            let cost = transport_cost(graph, route, link.delivery_in_tons, settings)?;
            let baseline = baseline_costs.get(&link.id).copied().unwrap_or(cost);
            step.transport_cost = cost;
            step.extra_cost = (cost - baseline).max(0.0);
            let base_price = base_prices.get(&link.id).copied().unwrap_or(link.price);
            link.price = if *pass_costs_on && link.delivery > 0.0 {
                base_price + step.extra_cost / link.delivery
            } else {
                base_price
            };

            graph.transport_shipment(link, settings.capacity_constraint)?;
            report.shipments_placed = report.shipments_placed.saturating_add(1);
        }
        Ok(report)
    }

    fn receive_products(
        &mut self,
        graph: &mut TransportGraph,
        _settings: &TransportSettings,
    ) -> Result<(), AgentError> {
        for link in &self.links {
            graph.remove_link_shipment(link);
            if !link.buyer.is_final_consumer() {
                continue;
            }
            let Some(step) = self.steps.get(&link.id) else {
                continue;
            };
            let base_price = self.base_prices.get(&link.id).copied().unwrap_or(link.price);
            let consumption_loss = (step.order - link.delivery).max(0.0) * base_price;
            let extra_spending = if self.pass_costs_on { step.extra_cost } else { 0.0 };
            match link.buyer {
                AgentRef::Household(_) => {
                    self.indicators.household_consumption_loss += consumption_loss;
                    self.indicators.household_extra_spending += extra_spending;
                }
                AgentRef::Country(_) => {
                    self.indicators.country_consumption_loss += consumption_loss;
                    self.indicators.country_extra_spending += extra_spending;
                }
                AgentRef::Firm(_) => {}
            }
        }
        Ok(())
    }

    fn evaluate_profit(&mut self) -> Result<(), AgentError> {
        for link in &self.links {
            let Some(firm) = link.supplier.as_firm() else {
                continue;
            };
            let transport_cost = self.steps.get(&link.id).map_or(0.0, |step| step.transport_cost);
            *self.profits.entry(firm).or_insert(0.0) +=
                link.delivery.mul_add(link.price, -transport_cost);
        }
        Ok(())
    }

    fn destroy_capital(&mut self, destruction: &CapitalDestruction) -> Result<(), AgentError> {
        if let Some(unknown) = destruction.firms.keys().find(|firm| !self.firms.contains(firm)) {
            return Err(AgentError::UnknownFirm(*unknown));
        }
        for (&firm, &fraction) in &destruction.firms {
            info!(%firm, fraction, duration = destruction.duration, "Firm loses production capital");
            self.capacity_losses.entry(firm).or_default().push(CapacityLoss {
                fraction,
                remaining: destruction.duration,
            });
        }
        Ok(())
    }

    fn update_disrupted_production_capacity(&mut self) {
        for losses in self.capacity_losses.values_mut() {
            for loss in losses.iter_mut() {
                loss.remaining = loss.remaining.saturating_sub(1);
            }
            losses.retain(|loss| loss.remaining > 0);
        }
        self.capacity_losses.retain(|_, losses| !losses.is_empty());
    }

    fn equilibrium_indicators(&self) -> EquilibriumIndicators {
        self.indicators
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use disruptsc_network::LogisticsModes;
    use disruptsc_types::{
        EdgeId, EdgeRecord, FlowCategory, HouseholdId, NodeId, OptimizationCriterion, Sector,
        TransportMode,
    };

    use super::*;

    fn n(id: u64) -> NodeId {
        NodeId::new(id)
    }

    /// Cheap road 1-2-3 and an expensive bypass 1-4-3.
    fn graph() -> TransportGraph {
        let road = |id: u64, a: u64, b: u64, cost: f64| {
            let mut record = EdgeRecord::new(EdgeId::new(id), n(a), n(b), TransportMode::Road);
            record.costs.cost_per_ton = cost;
            record
        };
        let mut graph = TransportGraph::new();
        for record in [road(1, 1, 2, 1.0), road(2, 2, 3, 1.0), road(3, 1, 4, 3.0), road(4, 4, 3, 3.0)] {
            graph.add_edge(record).unwrap();
        }
        graph.define_weights(OptimizationCriterion::CostPerTon, &LogisticsModes::default());
        graph
    }

    fn settings() -> TransportSettings {
        TransportSettings {
            capacity_constraint: true,
            criterion: OptimizationCriterion::CostPerTon,
            sectors_no_transport_network: BTreeSet::from([Sector::new("SER")]),
        }
    }

    fn household_link(id: u64, product: &str) -> CommercialLink {
        CommercialLink {
            id: CommercialLinkId::new(id),
            supplier: AgentRef::Firm(FirmId::new(1)),
            buyer: AgentRef::Household(HouseholdId::new(1)),
            origin: n(1),
            destination: n(3),
            product: Sector::new(product),
            category: FlowCategory::DomesticB2C,
            order: 10.0,
            delivery: 0.0,
            delivery_in_tons: 0.0,
            tons_per_value: 1.0,
            price: 1.0,
            logistics_mode: Some(String::from("domestic")),
            route: None,
            alternative_route: None,
            current_route: None,
        }
    }

    fn run_step(shippers: &mut LinkShippers, graph: &mut TransportGraph) -> DeliveryReport {
        let settings = settings();
        graph.reset_loads(OptimizationCriterion::CostPerTon, &LogisticsModes::default());
        shippers.retrieve_orders(0).unwrap();
        shippers.plan_production(true).unwrap();
        shippers.produce().unwrap();
        let report = shippers.deliver(graph, &settings).unwrap();
        shippers.receive_products(graph, &settings).unwrap();
        shippers.evaluate_profit().unwrap();
        report
    }

    #[test]
    fn undisrupted_step_is_at_equilibrium() {
        let mut graph = graph();
        let mut shippers = LinkShippers::new(vec![household_link(1, "AGR"), household_link(2, "SER")]);
        assert_eq!(shippers.initialize_routes(&mut graph, &settings()), 1);

        let report = run_step(&mut shippers, &mut graph);
        assert_eq!(report.shipments_placed, 1);
        assert!(shippers.equilibrium_indicators().is_back_to_equilibrium(0.0));
        assert!(graph.edges().all(|edge| edge.shipments.is_empty()));
        // 2 x 10 sales minus 20 of transport on the AGR link.
        assert_eq!(shippers.profit(FirmId::new(1)), Some(0.0));
    }

    #[test]
    fn detour_costs_show_as_extra_spending() {
        let mut graph = graph();
        let mut shippers = LinkShippers::new(vec![household_link(1, "AGR")]);
        shippers.initialize_routes(&mut graph, &settings());
        let _ = graph.apply_disruption(&[], &[EdgeId::new(2)], 1);

        let report = run_step(&mut shippers, &mut graph);
        assert_eq!(report.undeliverable, 0);
        let indicators = shippers.equilibrium_indicators();
        assert_eq!(indicators.household_extra_spending, 40.0);
        assert_eq!(indicators.household_consumption_loss, 0.0);
        assert_eq!(shippers.link(CommercialLinkId::new(1)).map(|l| l.price), Some(5.0));
    }

    #[test]
    fn detour_shipment_records_the_passed_on_price() {
        let mut graph = graph();
        let settings = settings();
        let mut shippers = LinkShippers::new(vec![household_link(1, "AGR"), household_link(2, "SER")]);
        shippers.initialize_routes(&mut graph, &settings);
        let _ = graph.apply_disruption(&[], &[EdgeId::new(2)], 1);

        graph.reset_loads(OptimizationCriterion::CostPerTon, &LogisticsModes::default());
        shippers.retrieve_orders(1).unwrap();
        shippers.plan_production(true).unwrap();
        shippers.produce().unwrap();
        let report = shippers.deliver(&mut graph, &settings).unwrap();
        assert_eq!(report.shipments_placed, 1);
        assert_eq!(shippers.links().len(), 2);

        let id = CommercialLinkId::new(1);
        let record = graph
            .edge(n(1), n(4))
            .and_then(|edge| edge.shipments.get(&id))
            .unwrap();
        assert_eq!(record.price, 5.0);
        assert_eq!(shippers.link(id).map(|l| l.price), Some(5.0));
    }

    #[test]
    fn cut_off_buyer_loses_consumption() {
        let mut graph = graph();
        let mut shippers = LinkShippers::new(vec![household_link(1, "AGR")]);
        shippers.initialize_routes(&mut graph, &settings());
        let _ = graph.apply_disruption(&[n(3)], &[], 1);

        let report = run_step(&mut shippers, &mut graph);
        assert_eq!(report.undeliverable, 1);
        assert_eq!(shippers.equilibrium_indicators().household_consumption_loss, 10.0);
    }

    #[test]
    fn capital_destruction_rations_until_rebuilt() {
        let mut graph = graph();
        let mut shippers = LinkShippers::new(vec![household_link(1, "AGR")]);
        shippers.initialize_routes(&mut graph, &settings());
        let destruction = CapitalDestruction {
            firms: BTreeMap::from([(FirmId::new(1), 0.4)]),
            start_time: 1,
            duration: 2,
        };
        shippers.destroy_capital(&destruction).unwrap();
        assert!((shippers.production_capacity(FirmId::new(1)) - 0.6).abs() < 1e-12);

        run_step(&mut shippers, &mut graph);
        let loss = shippers.equilibrium_indicators().household_consumption_loss;
        assert!((loss - 4.0).abs() < 1e-9);

        shippers.update_disrupted_production_capacity();
        assert!(shippers.production_capacity(FirmId::new(1)) < 1.0);
        shippers.update_disrupted_production_capacity();
        assert_eq!(shippers.production_capacity(FirmId::new(1)), 1.0);

        let unknown = CapitalDestruction {
            firms: BTreeMap::from([(FirmId::new(99), 0.1)]),
            start_time: 1,
            duration: 1,
        };
        assert!(matches!(
            shippers.destroy_capital(&unknown),
            Err(AgentError::UnknownFirm(_))
        ));
    }
}
