//! Transport edge with its routing weights and per-step runtime state.
//!
//! The graph is undirected: an edge is stored once under its normalised
//! [`EdgeKey`], whichever direction a route travels it in.

use std::collections::BTreeMap;

use disruptsc_types::{
    CommercialLinkId, EdgeAttribute, EdgeCosts, EdgeId, EdgeRecord, NodeId, ShipmentRecord,
    TransportMode,
};
use serde::{Deserialize, Serialize};

use crate::flows::FlowType;
use crate::weights::WeightKey;

/// Unordered pair of endpoints identifying an edge (smaller id first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    low: NodeId,
    high: NodeId,
}

impl EdgeKey {
    /// Normalise an endpoint pair.
    pub fn new(u: NodeId, v: NodeId) -> Self {
        if u <= v {
            Self { low: u, high: v }
        } else {
            Self { low: v, high: u }
        }
    }

    /// The two endpoints, smaller id first.
    pub const fn endpoints(self) -> (NodeId, NodeId) {
        (self.low, self.high)
    }

    /// The endpoint opposite to `node`, or `None` if `node` is not an
    /// endpoint.
    pub fn other(self, node: NodeId) -> Option<NodeId> {
        if node == self.low {
            Some(self.high)
        } else if node == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

impl core::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Edge of the transport graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportEdge {
    /// Edge identifier from the edge table.
    pub id: EdgeId,
    /// Endpoints.
    pub key: EdgeKey,
    /// Transport mode.
    pub mode: TransportMode,
    /// Multimodal link tag.
    pub multimodes: Option<String>,
    /// Road class or equivalent.
    pub class: Option<String>,
    /// Surface type.
    pub surface: Option<String>,
    /// Optional name.
    pub name: Option<String>,
    /// Special infrastructure flag.
    pub special: bool,
    /// Length in kilometres.
    pub km: f64,
    /// Capacity in tons per time step; `None` means unlimited.
    pub capacity: Option<f64>,
    /// Per-criterion costs.
    pub costs: EdgeCosts,
    /// Base routing weight (value of the optimisation criterion).
    pub weight: f64,
    /// Base weight plus accumulated capacity burdens.
    pub capacity_weight: f64,
    /// Routing weight per logistics mode name.
    pub mode_weights: BTreeMap<String, f64>,
    /// Tons loaded during the current time step.
    pub current_load: f64,
    /// Remaining disrupted time steps; 0 means available.
    pub disruption_duration: u32,
    /// Shipments currently on the edge, keyed by commercial link.
    pub shipments: BTreeMap<CommercialLinkId, ShipmentRecord>,
    /// Congestion level (0 when free-flowing, at most 4).
    pub congestion: f64,
    /// Traffic at the current time step.
    pub traffic_current: f64,
    /// Traffic at the initial equilibrium.
    pub traffic_normal: f64,
    /// Last per-flow-type aggregation.
    pub flows: BTreeMap<FlowType, f64>,
}

impl TransportEdge {
    /// Create an idle, healthy edge from its table row.
    ///
    /// Routing weights start at 0 until
    /// [`define_weights`](crate::TransportGraph::define_weights) runs.
    pub fn from_record(record: EdgeRecord) -> Self {
        Self {
            id: record.id,
            key: EdgeKey::new(record.end1, record.end2),
            mode: record.mode,
            multimodes: record.multimodes,
            class: record.class,
            surface: record.surface,
            name: record.name,
            special: record.special,
            km: record.km,
            capacity: record.capacity,
            costs: record.costs,
            weight: 0.0,
            capacity_weight: 0.0,
            mode_weights: BTreeMap::new(),
            current_load: 0.0,
            disruption_duration: 0,
            shipments: BTreeMap::new(),
            congestion: 0.0,
            traffic_current: 0.0,
            traffic_normal: 0.0,
            flows: BTreeMap::new(),
        }
    }

    /// Whether the edge is a virtual connector.
    pub const fn is_virtual(&self) -> bool {
        self.mode.is_virtual()
    }

    /// Whether the edge is currently disrupted.
    pub const fn is_disrupted(&self) -> bool {
        self.disruption_duration > 0
    }

    /// Whether the current load exceeds the capacity.
    pub fn is_over_capacity(&self) -> bool {
        self.capacity.is_some_and(|capacity| self.current_load > capacity)
    }

    /// Read a numeric attribute. Unlimited capacity reads as infinity.
    pub const fn attribute(&self, attribute: EdgeAttribute) -> f64 {
        match attribute {
            EdgeAttribute::Km => self.km,
            EdgeAttribute::Capacity => match self.capacity {
                Some(capacity) => capacity,
                None => f64::INFINITY,
            },
            EdgeAttribute::Cost(criterion) => self.costs.get(criterion),
            EdgeAttribute::CurrentLoad => self.current_load,
            EdgeAttribute::Weight => self.weight,
            EdgeAttribute::CapacityWeight => self.capacity_weight,
            EdgeAttribute::Congestion => self.congestion,
            EdgeAttribute::TrafficCurrent => self.traffic_current,
            EdgeAttribute::TrafficNormal => self.traffic_normal,
        }
    }

    /// Routing weight under `key`, or `None` when the edge carries no weight
    /// for that logistics mode.
    pub fn routing_weight(&self, key: &WeightKey) -> Option<f64> {
        match key {
            WeightKey::Attribute(attribute) => Some(self.attribute(*attribute)),
            WeightKey::LogisticsMode(mode) => self.mode_weights.get(mode).copied(),
        }
    }
}
