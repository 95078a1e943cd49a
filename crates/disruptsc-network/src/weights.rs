//! Routing weights: base weight, capacity weight and one weight per
//! logistics mode, plus the per-step load bookkeeping that burdens
//! over-capacity edges.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use disruptsc_types::{EdgeAttribute, OptimizationCriterion, TransportMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::edge::TransportEdge;
use crate::error::NetworkError;
use crate::graph::TransportGraph;
use crate::route::Route;

/// Weight given to edges a logistics mode does not accept.
pub const OTHER_MODE_BURDEN: f64 = 1e10;

/// Weight added once per load application that leaves an edge over capacity.
pub const CAPACITY_BURDEN: f64 = 1e5;

/// Suffix turning a logistics mode name into its weight name.
const MODE_WEIGHT_SUFFIX: &str = "_weight";

/// Transport modes and multimodal links a logistics mode may use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogisticsMode {
    /// Edge types the mode may travel on.
    #[serde(default)]
    pub accepted_modes: BTreeSet<TransportMode>,
    /// Multimodal link tags the mode may use, e.g. `"roads-maritime"`.
    #[serde(default)]
    pub accepted_multimodal_links: BTreeSet<String>,
}

impl LogisticsMode {
    /// Whether an edge of this type and multimodal tag is accepted.
    pub fn accepts(&self, mode: TransportMode, multimodes: Option<&str>) -> bool {
        if !self.accepted_modes.contains(&mode) {
            return false;
        }
        if mode == TransportMode::Multimodal {
            return multimodes.is_some_and(|tag| self.accepted_multimodal_links.contains(tag));
        }
        true
    }
}

/// Named logistics modes, e.g. `domestic` and `international`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogisticsModes(pub BTreeMap<String, LogisticsMode>);

impl LogisticsModes {
    /// Look up a mode by name.
    pub fn get(&self, name: &str) -> Option<&LogisticsMode> {
        self.0.get(name)
    }

    /// Iterate over the modes.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LogisticsMode)> {
        self.0.iter()
    }

    /// Whether a mode of this name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl Default for LogisticsModes {
    /// Domestic flows travel by road only; international flows may also
    /// use maritime edges and road-maritime multimodal links.
    fn default() -> Self {
        let domestic = LogisticsMode {
            accepted_modes: BTreeSet::from([TransportMode::Road]),
            accepted_multimodal_links: BTreeSet::new(),
        };
        let international = LogisticsMode {
            accepted_modes: BTreeSet::from([
                TransportMode::Road,
                TransportMode::Maritime,
                TransportMode::Multimodal,
            ]),
            accepted_multimodal_links: BTreeSet::from([String::from("roads-maritime")]),
        };
        Self(BTreeMap::from([
            (String::from("domestic"), domestic),
            (String::from("international"), international),
        ]))
    }
}

/// Name of the edge weight a shortest-route search minimises.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeightKey {
    /// A numeric edge attribute (`weight`, `capacity_weight`, `km`, a cost).
    Attribute(EdgeAttribute),
    /// The weight of a logistics mode, written `<mode>_weight`.
    LogisticsMode(String),
}

impl WeightKey {
    /// The weight of a named logistics mode.
    pub fn mode(name: impl Into<String>) -> Self {
        Self::LogisticsMode(name.into())
    }
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(attribute) => write!(f, "{attribute}"),
            Self::LogisticsMode(mode) => write!(f, "{mode}{MODE_WEIGHT_SUFFIX}"),
        }
    }
}

impl FromStr for WeightKey {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(attribute) = s.parse::<EdgeAttribute>() {
            return Ok(Self::Attribute(attribute));
        }
        match s.strip_suffix(MODE_WEIGHT_SUFFIX) {
            Some(mode) if !mode.is_empty() => Ok(Self::LogisticsMode(mode.to_owned())),
            _ => Err(NetworkError::UnknownWeightKey(s.to_owned())),
        }
    }
}

impl TransportEdge {
    /// Reset every routing weight to the value of `criterion`, burdening
    /// the logistics modes that do not accept this edge.
    fn define_weights(&mut self, criterion: OptimizationCriterion, modes: &LogisticsModes) {
        let base = self.costs.get(criterion);
        self.weight = base;
        self.capacity_weight = base;
        self.mode_weights.clear();
        for (name, mode) in modes.iter() {
            let weight = if mode.accepts(self.mode, self.multimodes.as_deref()) {
                base
            } else {
                OTHER_MODE_BURDEN
            };
            self.mode_weights.insert(name.clone(), weight);
        }
    }

    /// Add the capacity burden to the capacity weight and every mode weight.
    fn add_capacity_burden(&mut self) {
        self.capacity_weight += CAPACITY_BURDEN;
        for weight in self.mode_weights.values_mut() {
            *weight += CAPACITY_BURDEN;
        }
    }
}

impl TransportGraph {
    /// Set `weight`, `capacity_weight` and every `<mode>_weight` on all
    /// edges from the chosen cost criterion.
    pub fn define_weights(&mut self, criterion: OptimizationCriterion, modes: &LogisticsModes) {
        info!(%criterion, modes = modes.0.len(), "Generating shortest-path weights on transport network");
        for edge in self.edges_mut() {
            edge.define_weights(criterion, modes);
        }
    }

    /// Zero every current load and redefine the weights, clearing the
    /// capacity burdens accumulated during the previous step.
    pub fn reset_loads(&mut self, criterion: OptimizationCriterion, modes: &LogisticsModes) {
        for edge in self.edges_mut() {
            edge.current_load = 0.0;
        }
        self.define_weights(criterion, modes);
    }

    /// Add `tons` to the current load of every non-virtual edge on the
    /// route. Each edge left over capacity receives one capacity burden.
    ///
    /// Returns the number of edges over capacity after loading.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingEdge`] if the route crosses an edge
    /// that is not in the graph; no load is applied in that case.
    pub fn apply_load(&mut self, route: &Route, tons: f64) -> Result<usize, NetworkError> {
        for (from, to) in route.edges() {
            self.edge_between(from, to)?;
        }
        let mut over_capacity = 0_usize;
        for (from, to) in route.edges() {
            let Some(edge) = self.edge_mut(from, to) else {
                continue;
            };
            if edge.is_virtual() {
                continue;
            }
            edge.current_load += tons;
            if edge.is_over_capacity() {
                info!(
                    edge = %edge.id,
                    mode = %edge.mode,
                    load = edge.current_load,
                    capacity = edge.capacity.unwrap_or_default(),
                    "Edge has exceeded its capacity"
                );
                edge.add_capacity_burden();
                over_capacity = over_capacity.saturating_add(1);
            }
        }
        if over_capacity > 0 {
            debug!(over_capacity, tons, "Capacity burden applied");
        }
        Ok(over_capacity)
    }
}
