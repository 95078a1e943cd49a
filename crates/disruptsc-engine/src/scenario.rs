//! Scenario files: the transport network tables, the commercial links and
//! where agents are located.
//!
//! A scenario is one JSON document:
//!
//! ```json
//! {
//!   "nodes": [{"id": 1, "name": "Port"}],
//!   "edges": [{"id": 1, "end1": 1, "end2": 2, "type": "roads", "cost_per_ton": 1.0}],
//!   "links": [],
//!   "firm_locations": {"1": 1},
//!   "household_locations": {}
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use disruptsc_network::{CommercialLink, NetworkError, TransportGraph};
use disruptsc_types::{EdgeRecord, FirmId, HouseholdId, NodeId, NodeRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Errors that can occur when loading a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Failed to read the scenario file.
    #[error("failed to read scenario file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the scenario JSON.
    #[error("failed to parse scenario JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Everything a run needs besides its configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Node attribute table.
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    /// Edge attribute table.
    pub edges: Vec<EdgeRecord>,
    /// Commercial links shipping over the network.
    #[serde(default)]
    pub links: Vec<CommercialLink>,
    /// Node hosting each firm.
    #[serde(default)]
    pub firm_locations: BTreeMap<FirmId, NodeId>,
    /// Node hosting each household.
    #[serde(default)]
    pub household_locations: BTreeMap<HouseholdId, NodeId>,
}

impl Scenario {
    /// Load a scenario from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Json`] if the JSON is malformed.
    pub fn parse(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_str(json)?;
        info!(
            nodes = scenario.nodes.len(),
            edges = scenario.edges.len(),
            links = scenario.links.len(),
            firms = scenario.firm_locations.len(),
            households = scenario.household_locations.len(),
            "Scenario loaded"
        );
        Ok(scenario)
    }

    /// Build the transport graph and locate the agents on it. Returns the
    /// graph and the commercial links.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] on duplicate edges or when an agent sits on
    /// a node outside the network.
    pub fn into_parts(self) -> Result<(TransportGraph, Vec<CommercialLink>), NetworkError> {
        let mut graph = TransportGraph::from_records(self.nodes, self.edges)?;
        graph.locate_firms(self.firm_locations)?;
        graph.locate_households(self.household_locations)?;
        Ok((graph, self.links))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "nodes": [{"id": 1, "name": "Port"}, {"id": 2, "name": "Capital"}],
        "edges": [
            {"id": 1, "end1": 1, "end2": 2, "type": "roads", "km": 40.0, "cost_per_ton": 2.0}
        ],
        "links": [{
            "id": 1,
            "supplier": {"kind": "country", "id": "CHN"},
            "buyer": {"kind": "firm", "id": 3},
            "origin": 1,
            "destination": 2,
            "product": "MAN",
            "category": "import",
            "order": 4.0,
            "logistics_mode": "international"
        }],
        "firm_locations": {"3": 2},
        "household_locations": {"1": 2}
    }"#;

    #[test]
    fn parse_and_build() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        assert_eq!(scenario.links.len(), 1);
        let (graph, links) = scenario.into_parts().unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(links.len(), 1);
        let capital = graph.node(NodeId::new(2)).unwrap();
        assert!(capital.firms_there.contains(&FirmId::new(3)));
        assert_eq!(capital.household_there, Some(HouseholdId::new(1)));
    }

    #[test]
    fn agents_off_the_network_are_rejected() {
        let mut scenario = Scenario::parse(SCENARIO).unwrap();
        scenario.firm_locations.insert(FirmId::new(9), NodeId::new(99));
        assert!(matches!(
            scenario.into_parts(),
            Err(NetworkError::MissingNode(node)) if node == NodeId::new(99)
        ));
    }

    #[test]
    fn edges_are_required() {
        assert!(matches!(
            Scenario::parse(r#"{"nodes": []}"#),
            Err(ScenarioError::Json { .. })
        ));
    }
}
