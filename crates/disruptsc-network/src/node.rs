//! Transport node with its per-step runtime state.
//!
//! A [`TransportNode`] keeps the static attributes of one row of the node
//! table next to the mutable state the simulation writes every time step:
//! remaining disruption, shipments in transit and the agents located here.

use std::collections::{BTreeMap, BTreeSet};

use disruptsc_types::{
    CommercialLinkId, Coordinates, FirmId, HouseholdId, NodeId, NodeRecord, ShipmentRecord,
};

/// Vertex of the transport graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportNode {
    /// Node identifier.
    pub id: NodeId,
    /// Optional place name.
    pub name: Option<String>,
    /// Node location.
    pub geometry: Option<Coordinates>,
    /// Special infrastructure flag.
    pub special: bool,
    /// Remaining disrupted time steps; 0 means available.
    pub disruption_duration: u32,
    /// Shipments currently passing through, keyed by commercial link.
    pub shipments: BTreeMap<CommercialLinkId, ShipmentRecord>,
    /// Firms located on this node.
    pub firms_there: BTreeSet<FirmId>,
    /// Household located on this node, if any.
    pub household_there: Option<HouseholdId>,
}

impl TransportNode {
    /// Create a healthy, empty node from its table row.
    pub fn from_record(record: NodeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            geometry: record.geometry,
            special: record.special,
            disruption_duration: 0,
            shipments: BTreeMap::new(),
            firms_there: BTreeSet::new(),
            household_there: None,
        }
    }

    /// Overwrite the static attributes, keeping the runtime state.
    pub fn update_attributes(&mut self, record: NodeRecord) {
        self.name = record.name;
        self.geometry = record.geometry;
        self.special = record.special;
    }

    /// Whether the node is currently disrupted.
    pub const fn is_disrupted(&self) -> bool {
        self.disruption_duration > 0
    }
}
