//! Traffic and congestion evaluation.
//!
//! Traffic on an edge is the monetary value of the shipments it carries,
//! or their volume when per-sector volume coefficients are known. The
//! traffic recorded at the initial equilibrium is the reference against
//! which later congestion is measured.

use std::collections::BTreeMap;

use disruptsc_types::Sector;
use tracing::debug;

use crate::edge::{EdgeKey, TransportEdge};
use crate::graph::TransportGraph;

/// Congestion level above which an edge counts as congested.
pub const CONGESTION_EPSILON: f64 = 1e-6;

/// Congestion assumed on an edge that carried nothing at equilibrium.
const CONGESTION_ON_NEW_TRAFFIC: f64 = 0.5;

/// Traffic ratio tolerated before congestion starts.
const CONGESTION_FREE_RATIO: f64 = 1.5;

/// Upper bound of the congestion level.
const CONGESTION_CEILING: f64 = 4.0;

/// Congestion level for the given current and normal traffic.
///
/// Zero up to 1.5 times the normal traffic, then rising towards 4 as
/// `4 * (1 - exp(-(current - 1.5 * normal)))`. Traffic on an edge that was
/// idle at equilibrium yields a flat 0.5.
pub fn congestion_function(current: f64, normal: f64) -> f64 {
    if current <= 0.0 {
        return 0.0;
    }
    if normal <= 0.0 {
        return CONGESTION_ON_NEW_TRAFFIC;
    }
    let excess = CONGESTION_FREE_RATIO.mul_add(-normal, current);
    if excess <= 0.0 {
        return 0.0;
    }
    CONGESTION_CEILING * (1.0 - (-excess).exp())
}

impl TransportEdge {
    /// Traffic carried by the edge's current shipments.
    fn traffic(&self, volume_coefficients: Option<&BTreeMap<Sector, f64>>) -> f64 {
        match volume_coefficients {
            Some(coefficients) => self
                .shipments
                .values()
                .filter_map(|shipment| {
                    coefficients
                        .get(&shipment.product_type)
                        .filter(|coefficient| **coefficient > 0.0)
                        .map(|coefficient| coefficient * shipment.quantity)
                })
                .sum(),
            None => self.shipments.values().map(|shipment| shipment.quantity).sum(),
        }
    }
}

impl TransportGraph {
    /// Set `traffic_current` on every non-virtual edge.
    ///
    /// With volume coefficients, only sectors with a positive coefficient
    /// contribute, weighted by that coefficient. Without them, traffic is
    /// the plain monetary sum of the shipments.
    pub fn evaluate_traffic(&mut self, volume_coefficients: Option<&BTreeMap<Sector, f64>>) {
        for edge in self.edges_mut().filter(|edge| !edge.is_virtual()) {
            edge.traffic_current = edge.traffic(volume_coefficients);
        }
    }

    /// Record the current traffic as the equilibrium reference and clear
    /// all congestion.
    pub fn evaluate_normal_traffic(&mut self, volume_coefficients: Option<&BTreeMap<Sector, f64>>) {
        self.evaluate_traffic(volume_coefficients);
        self.congested_edges.clear();
        for edge in self.edges_mut().filter(|edge| !edge.is_virtual()) {
            edge.traffic_normal = edge.traffic_current;
            edge.congestion = 0.0;
        }
    }

    /// Evaluate the current traffic and set the congestion of every
    /// non-virtual edge. Returns the number of congested edges.
    pub fn evaluate_congestion(&mut self, volume_coefficients: Option<&BTreeMap<Sector, f64>>) -> usize {
        self.evaluate_traffic(volume_coefficients);
        let mut congested = Vec::new();
        for edge in self.edges_mut().filter(|edge| !edge.is_virtual()) {
            edge.congestion = congestion_function(edge.traffic_current, edge.traffic_normal);
            if edge.congestion > CONGESTION_EPSILON {
                congested.push(edge.key);
            }
        }
        debug!(congested = congested.len(), "Congestion evaluated");
        self.congested_edges = congested;
        self.congested_edges.len()
    }

    /// Edges found congested by the last congestion evaluation.
    pub fn congested_edges(&self) -> &[EdgeKey] {
        &self.congested_edges
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use disruptsc_types::{
        AgentRef, CommercialLinkId, EdgeId, EdgeRecord, FirmId, FlowCategory, NodeId,
        ShipmentRecord, TransportMode,
    };

    use super::*;

    #[test]
    fn congestion_boundaries() {
        assert_eq!(congestion_function(0.0, 0.0), 0.0);
        assert_eq!(congestion_function(5.0, 0.0), 0.5);
        assert_eq!(congestion_function(0.0, 5.0), 0.0);
        assert_eq!(congestion_function(90.0, 100.0), 0.0);
        assert_eq!(congestion_function(149.0, 100.0), 0.0);
        assert_eq!(congestion_function(150.0, 100.0), 0.0);
        let just_above = congestion_function(151.0, 100.0);
        assert!((just_above - 4.0 * (1.0 - (-1.0_f64).exp())).abs() < 1e-12);
        assert!(congestion_function(1e6, 100.0) <= 4.0);
    }

    #[test]
    fn congestion_is_monotone_above_threshold() {
        let mut previous = 0.0;
        for current in [150.0, 150.5, 151.0, 153.0, 160.0, 300.0] {
            let level = congestion_function(current, 100.0);
            assert!(level >= previous);
            previous = level;
        }
    }

    fn shipment(sector: &str, quantity: f64) -> ShipmentRecord {
        ShipmentRecord {
            from: AgentRef::Firm(FirmId::new(1)),
            to: AgentRef::Firm(FirmId::new(2)),
            quantity,
            tons: quantity,
            product_type: Sector::new(sector),
            flow_category: FlowCategory::DomesticB2B,
            price: 1.0,
        }
    }

    fn graph_with_shipments() -> TransportGraph {
        let mut graph = TransportGraph::new();
        let _ = graph.add_edge(EdgeRecord::new(
            EdgeId::new(1),
            NodeId::new(1),
            NodeId::new(2),
            TransportMode::Road,
        ));
        if let Some(edge) = graph.edge_mut(NodeId::new(1), NodeId::new(2)) {
            edge.shipments.insert(CommercialLinkId::new(1), shipment("AGR", 10.0));
            edge.shipments.insert(CommercialLinkId::new(2), shipment("SER", 4.0));
        }
        graph
    }

    #[test]
    fn traffic_uses_positive_volume_coefficients_only() {
        let mut graph = graph_with_shipments();
        graph.evaluate_traffic(None);
        assert!(graph.edge(NodeId::new(1), NodeId::new(2)).is_some_and(|e| e.traffic_current == 14.0));

        let coefficients = BTreeMap::from([(Sector::new("AGR"), 2.0), (Sector::new("SER"), 0.0)]);
        graph.evaluate_traffic(Some(&coefficients));
        assert!(graph.edge(NodeId::new(1), NodeId::new(2)).is_some_and(|e| e.traffic_current == 20.0));
    }

    #[test]
    fn congestion_after_traffic_surge() {
        let mut graph = graph_with_shipments();
        graph.evaluate_normal_traffic(None);
        assert_eq!(graph.evaluate_congestion(None), 0);

        if let Some(edge) = graph.edge_mut(NodeId::new(1), NodeId::new(2)) {
            edge.shipments.insert(CommercialLinkId::new(3), shipment("MAN", 30.0));
        }
        assert_eq!(graph.evaluate_congestion(None), 1);
        assert!(graph.edge(NodeId::new(1), NodeId::new(2)).is_some_and(|e| e.congestion > 0.0));

        graph.evaluate_normal_traffic(None);
        assert!(graph.congested_edges().is_empty());
        assert!(graph.edge(NodeId::new(1), NodeId::new(2)).is_some_and(|e| e.congestion == 0.0));
    }
}
