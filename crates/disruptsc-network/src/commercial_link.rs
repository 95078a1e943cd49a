//! Commercial links: standing buyer-supplier relationships and the routes
//! their shipments take through the transport graph.
//!
//! A link keeps a main route chosen at initialisation and, once the main
//! route has been disrupted, an alternative route computed on the
//! undisrupted part of the network. Each time step the link selects one of
//! them, or none if the buyer cannot be reached.

use disruptsc_types::{
    AgentRef, CommercialLinkId, EdgeAttribute, FlowCategory, NodeId, RouteChoice, Sector,
    ShipmentRecord,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NetworkError;
use crate::graph::TransportGraph;
use crate::route::Route;
use crate::weights::WeightKey;

/// Buyer-supplier relationship shipping one product over the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialLink {
    /// Link identifier.
    pub id: CommercialLinkId,
    /// Selling agent.
    pub supplier: AgentRef,
    /// Buying agent.
    pub buyer: AgentRef,
    /// Transport node the supplier ships from.
    pub origin: NodeId,
    /// Transport node the buyer receives at.
    pub destination: NodeId,
    /// Product sector.
    pub product: Sector,
    /// Flow category.
    pub category: FlowCategory,
    /// Monetary quantity ordered per time step.
    #[serde(default)]
    pub order: f64,
    /// Monetary quantity delivered this time step.
    #[serde(default)]
    pub delivery: f64,
    /// Tons delivered this time step.
    #[serde(default)]
    pub delivery_in_tons: f64,
    /// Tons per monetary unit of the product.
    #[serde(default = "default_tons_per_value")]
    pub tons_per_value: f64,
    /// Unit price.
    #[serde(default = "default_price")]
    pub price: f64,
    /// Logistics mode the link routes under, e.g. `domestic`.
    #[serde(default)]
    pub logistics_mode: Option<String>,
    /// Route chosen at initialisation.
    #[serde(default)]
    pub route: Option<Route>,
    /// Route used while the main route is disrupted.
    #[serde(default)]
    pub alternative_route: Option<Route>,
    /// Route used this time step; `None` if undeliverable.
    #[serde(default)]
    pub current_route: Option<RouteChoice>,
}

const fn default_tons_per_value() -> f64 {
    1.0
}

const fn default_price() -> f64 {
    1.0
}

impl CommercialLink {
    /// Routing weight the link minimises: its logistics mode weight, or the
    /// capacity weight when it has none.
    pub fn weight_key(&self) -> WeightKey {
        self.logistics_mode.as_ref().map_or(
            WeightKey::Attribute(EdgeAttribute::CapacityWeight),
            |mode| WeightKey::mode(mode.clone()),
        )
    }

    /// Route selected for this time step.
    pub fn selected_route(&self) -> Option<&Route> {
        match self.current_route? {
            RouteChoice::Main => self.route.as_ref(),
            RouteChoice::Alternative => self.alternative_route.as_ref(),
        }
    }

    /// Set this step's monetary delivery and the matching tonnage.
    pub fn set_delivery(&mut self, quantity: f64) {
        self.delivery = quantity;
        self.delivery_in_tons = quantity * self.tons_per_value;
    }

    /// The record written on every segment the shipment passes.
    pub fn shipment_record(&self) -> ShipmentRecord {
        ShipmentRecord {
            from: self.supplier.clone(),
            to: self.buyer.clone(),
            quantity: self.delivery,
            tons: self.delivery_in_tons,
            product_type: self.product.clone(),
            flow_category: self.category,
            price: self.price,
        }
    }

    /// Compute the main route on the full graph.
    ///
    /// With `capacity_constraint`, the route's tonnage is loaded at once so
    /// the links routed after this one see the capacity burden.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingNode`] or [`NetworkError::NoPath`]
    /// when the buyer cannot be reached; the link keeps no route.
    pub fn choose_initial_route(
        &mut self,
        graph: &mut TransportGraph,
        capacity_constraint: bool,
    ) -> Result<(), NetworkError> {
        self.alternative_route = None;
        self.current_route = None;
        let route = graph.shortest_route(self.origin, self.destination, &self.weight_key())?;
        if capacity_constraint {
            graph.apply_load(&route, self.delivery_in_tons)?;
        }
        self.route = Some(route);
        self.current_route = Some(RouteChoice::Main);
        Ok(())
    }

    /// Select the route for this time step.
    ///
    /// The main route is used while available, then the stored alternative,
    /// then a new alternative computed on the undisrupted subgraph. When
    /// even that fails the link is undeliverable this step and `None` is
    /// returned.
    pub fn select_delivery_route(&mut self, graph: &TransportGraph) -> Option<RouteChoice> {
        self.current_route = self.pick_route(graph);
        self.current_route
    }

    fn pick_route(&mut self, graph: &TransportGraph) -> Option<RouteChoice> {
        if self.route.as_ref().is_some_and(|route| graph.is_route_available(route)) {
            return Some(RouteChoice::Main);
        }
        if self
            .alternative_route
            .as_ref()
            .is_some_and(|route| graph.is_route_available(route))
        {
            return Some(RouteChoice::Alternative);
        }
        let available = graph.available_subgraph();
        match available.shortest_route(self.origin, self.destination, &self.weight_key()) {
            Ok(route) => {
                info!(
                    link = %self.id,
                    supplier = %self.supplier,
                    buyer = %self.buyer,
                    edges = route.edge_count(),
                    "Main route unavailable, using an alternative route"
                );
                self.alternative_route = Some(route);
                Some(RouteChoice::Alternative)
            }
            Err(err) => {
                info!(
                    link = %self.id,
                    supplier = %self.supplier,
                    buyer = %self.buyer,
                    error = %err,
                    "No route available, shipment cannot be delivered"
                );
                None
            }
        }
    }
}
