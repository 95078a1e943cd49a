//! Per-segment flow aggregation.
//!
//! Shipments on each edge are summed (monetary quantity) by flow type: all
//! of them, one flow category, or one product sector.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use disruptsc_types::{EdgeId, FlowCategory, Sector, ShipmentRecord};
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::graph::TransportGraph;

/// What a per-segment flow sum selects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FlowType {
    /// Every shipment.
    Total,
    /// Shipments of one flow category.
    Category(FlowCategory),
    /// Shipments of one product sector.
    Product(Sector),
}

impl FlowType {
    /// Whether the shipment counts towards this flow type.
    pub fn matches(&self, shipment: &ShipmentRecord) -> bool {
        match self {
            Self::Total => true,
            Self::Category(category) => shipment.flow_category == *category,
            Self::Product(sector) => shipment.product_type == *sector,
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total => f.write_str("total"),
            Self::Category(category) => write!(f, "{category}"),
            Self::Product(sector) => write!(f, "{sector}"),
        }
    }
}

impl FromStr for FlowType {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NetworkError::InvalidFlowType { key: s.to_owned() });
        }
        if s == "total" {
            return Ok(Self::Total);
        }
        Ok(s.parse::<FlowCategory>()
            .map_or_else(|_| Self::Product(Sector::new(s)), Self::Category))
    }
}

impl TryFrom<String> for FlowType {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FlowType> for String {
    fn from(value: FlowType) -> Self {
        value.to_string()
    }
}

/// Flow sums per edge and flow type.
pub type FlowTable = BTreeMap<EdgeId, BTreeMap<FlowType, f64>>;

impl TransportGraph {
    /// Sum the shipments of every non-virtual edge by flow type, store the
    /// sums on the edges and return them.
    pub fn compute_flow_per_segment(&mut self, flow_types: &[FlowType]) -> FlowTable {
        let mut table = FlowTable::new();
        for edge in self.edges_mut().filter(|edge| !edge.is_virtual()) {
            let mut sums = BTreeMap::new();
            for flow_type in flow_types {
                let sum: f64 = edge
                    .shipments
                    .values()
                    .filter(|shipment| flow_type.matches(shipment))
                    .map(|shipment| shipment.quantity)
                    .sum();
                sums.insert(flow_type.clone(), sum);
            }
            edge.flows.clone_from(&sums);
            table.insert(edge.id, sums);
        }
        table
    }
}
