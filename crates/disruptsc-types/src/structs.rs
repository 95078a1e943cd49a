//! Core records shared between the transport network, the agents and the
//! simulation loop.
//!
//! [`NodeRecord`] and [`EdgeRecord`] mirror one row of the node and edge
//! attribute tables produced by geospatial ingestion. [`ShipmentRecord`] is
//! the value a commercial link leaves on every node and edge of its route
//! while goods are in transit.

use serde::{Deserialize, Serialize};

use crate::enums::{FlowCategory, OptimizationCriterion, TransportMode};
use crate::ids::{CountryCode, EdgeId, FirmId, HouseholdId, NodeId, Sector};

/// Any economic agent that can sit at either end of a commercial link.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AgentRef {
    /// A domestic firm.
    Firm(FirmId),
    /// A domestic household.
    Household(HouseholdId),
    /// A foreign country.
    Country(CountryCode),
}

impl AgentRef {
    /// Return the firm id if this agent is a firm.
    pub const fn as_firm(&self) -> Option<FirmId> {
        match self {
            Self::Firm(id) => Some(*id),
            Self::Household(_) | Self::Country(_) => None,
        }
    }

    /// Whether the agent is a final consumer (household or country).
    pub const fn is_final_consumer(&self) -> bool {
        matches!(self, Self::Household(_) | Self::Country(_))
    }
}

impl core::fmt::Display for AgentRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Firm(id) => write!(f, "firm {id}"),
            Self::Household(id) => write!(f, "household {id}"),
            Self::Country(code) => write!(f, "country {code}"),
        }
    }
}

/// Goods of one commercial link currently in transit on a route segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Supplier.
    pub from: AgentRef,
    /// Buyer.
    pub to: AgentRef,
    /// Monetary value shipped.
    pub quantity: f64,
    /// Physical weight shipped, in tons.
    pub tons: f64,
    /// Sector of the shipped product.
    pub product_type: Sector,
    /// Category of the flow.
    pub flow_category: FlowCategory,
    /// Unit price.
    pub price: f64,
}

/// Planar coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Longitude or easting.
    pub x: f64,
    /// Latitude or northing.
    pub y: f64,
}

/// One row of the transport node table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node identifier.
    pub id: NodeId,
    /// Optional place name.
    #[serde(default)]
    pub name: Option<String>,
    /// Node location.
    #[serde(default)]
    pub geometry: Option<Coordinates>,
    /// Whether the node is flagged as special infrastructure (port, bridge...).
    #[serde(default)]
    pub special: bool,
}

impl NodeRecord {
    /// A node record carrying only its identifier.
    pub const fn bare(id: NodeId) -> Self {
        Self {
            id,
            name: None,
            geometry: None,
            special: false,
        }
    }
}

/// Per-criterion cost attributes of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeCosts {
    /// Monetary cost per ton.
    #[serde(default)]
    pub cost_per_ton: f64,
    /// Travel time.
    #[serde(default)]
    pub travel_time: f64,
    /// Monetised travel time.
    #[serde(default)]
    pub time_cost: f64,
    /// Monetised, congestion-sensitive travel time.
    #[serde(default)]
    pub cost_travel_time: f64,
    /// Monetised travel-time variability.
    #[serde(default)]
    pub cost_variability: f64,
    /// Aggregate generalised cost.
    #[serde(default)]
    pub agg_cost: f64,
}

impl EdgeCosts {
    /// Value of the given criterion.
    pub const fn get(&self, criterion: OptimizationCriterion) -> f64 {
        match criterion {
            OptimizationCriterion::CostPerTon => self.cost_per_ton,
            OptimizationCriterion::TravelTime => self.travel_time,
            OptimizationCriterion::TimeCost => self.time_cost,
            OptimizationCriterion::CostTravelTime => self.cost_travel_time,
            OptimizationCriterion::CostVariability => self.cost_variability,
            OptimizationCriterion::AggCost => self.agg_cost,
        }
    }
}

/// One row of the transport edge table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Edge identifier.
    pub id: EdgeId,
    /// First endpoint.
    pub end1: NodeId,
    /// Second endpoint.
    pub end2: NodeId,
    /// Transport mode.
    #[serde(rename = "type")]
    pub mode: TransportMode,
    /// Multimodal link tag (e.g. `"roads-maritime"`), for multimodal edges.
    #[serde(default)]
    pub multimodes: Option<String>,
    /// Road class or equivalent.
    #[serde(default)]
    pub class: Option<String>,
    /// Surface type (paved, unpaved...).
    #[serde(default)]
    pub surface: Option<String>,
    /// Optional name.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the edge is flagged as special infrastructure.
    #[serde(default)]
    pub special: bool,
    /// Length in kilometres.
    #[serde(default)]
    pub km: f64,
    /// Capacity in tons per time step; `None` means unlimited.
    #[serde(default)]
    pub capacity: Option<f64>,
    /// Cost attributes.
    #[serde(flatten)]
    pub costs: EdgeCosts,
}

impl EdgeRecord {
    /// An edge record with default attributes between two nodes.
    pub fn new(id: EdgeId, end1: NodeId, end2: NodeId, mode: TransportMode) -> Self {
        Self {
            id,
            end1,
            end2,
            mode,
            multimodes: None,
            class: None,
            surface: None,
            name: None,
            special: false,
            km: 0.0,
            capacity: None,
            costs: EdgeCosts::default(),
        }
    }
}
