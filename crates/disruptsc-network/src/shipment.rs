//! Shipment records on nodes and edges.
//!
//! A shipment is keyed by the commercial link that sends it. Placing a
//! shipment writes the same record on every segment of the route and loads
//! its tonnage on the edges; removing it deletes the record wherever it is
//! found.

use disruptsc_types::{CommercialLinkId, ShipmentRecord};
use tracing::debug;

use crate::commercial_link::CommercialLink;
use crate::error::NetworkError;
use crate::graph::TransportGraph;
use crate::route::{Route, Segment};

impl TransportGraph {
    /// Write `record` on every node and edge of `route`, replacing any
    /// previous record of the same link. Edge loads are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingNode`] or [`NetworkError::MissingEdge`]
    /// if a segment is not in the graph; nothing is written in that case.
    pub fn attach_shipment(
        &mut self,
        route: &Route,
        link: CommercialLinkId,
        record: &ShipmentRecord,
    ) -> Result<(), NetworkError> {
        for segment in route.segments() {
            match *segment {
                Segment::Node(node) => {
                    if !self.contains_node(node) {
                        return Err(NetworkError::MissingNode(node));
                    }
                }
                Segment::Edge(from, to) => {
                    self.edge_between(from, to)?;
                }
            }
        }
        for segment in route.segments() {
            match *segment {
                Segment::Node(node) => {
                    if let Some(node) = self.node_mut(node) {
                        node.shipments.insert(link, record.clone());
                    }
                }
                Segment::Edge(from, to) => {
                    if let Some(edge) = self.edge_mut(from, to) {
                        edge.shipments.insert(link, record.clone());
                    }
                }
            }
        }
        Ok(())
    }

    /// Attach `record` to every segment of `route`, then load its tonnage
    /// on the route's edges.
    ///
    /// Returns the number of edges left over capacity.
    ///
    /// # Errors
    ///
    /// Same as [`attach_shipment`](Self::attach_shipment).
    pub fn place_shipment(
        &mut self,
        route: &Route,
        link: CommercialLinkId,
        record: &ShipmentRecord,
    ) -> Result<usize, NetworkError> {
        self.attach_shipment(route, link, record)?;
        self.apply_load(route, record.tons)
    }

    /// Delete the link's record from every segment of `route`. Segments
    /// without a record, or absent from the graph, are skipped.
    pub fn remove_shipment(&mut self, route: &Route, link: CommercialLinkId) {
        for segment in route.segments() {
            match *segment {
                Segment::Node(node) => {
                    if let Some(node) = self.node_mut(node) {
                        node.shipments.remove(&link);
                    }
                }
                Segment::Edge(from, to) => {
                    if let Some(edge) = self.edge_mut(from, to) {
                        edge.shipments.remove(&link);
                    }
                }
            }
        }
    }

    /// Put the link's current shipment on its selected route. With
    /// `capacity_constraint` the shipment also loads the edges.
    ///
    /// Returns `false` when the link has no route selected this step.
    ///
    /// # Errors
    ///
    /// Propagates [`attach_shipment`](Self::attach_shipment) errors.
    pub fn transport_shipment(
        &mut self,
        link: &CommercialLink,
        capacity_constraint: bool,
    ) -> Result<bool, NetworkError> {
        let Some(route) = link.selected_route() else {
            debug!(link = %link.id, "No route selected, shipment not placed");
            return Ok(false);
        };
        let record = link.shipment_record();
        if capacity_constraint {
            self.place_shipment(route, link.id, &record)?;
        } else {
            self.attach_shipment(route, link.id, &record)?;
        }
        Ok(true)
    }

    /// Remove the link's shipment from its main and alternative routes.
    pub fn remove_link_shipment(&mut self, link: &CommercialLink) {
        for route in [&link.route, &link.alternative_route].into_iter().flatten() {
            self.remove_shipment(route, link.id);
        }
    }
}
