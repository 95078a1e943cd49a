//! Disruption events and the list the run loop draws from.
//!
//! Transport disruptions act on the graph directly. Capital destructions
//! are handed to the agent population, which owns production capacity.

use std::collections::BTreeMap;

use disruptsc_network::{DisruptionOutcome, TransportGraph};
use disruptsc_types::{EdgeId, FirmId, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EventConfig;

/// Transport nodes and edges made unusable for a number of time steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportDisruption {
    /// Disrupted nodes.
    pub nodes: Vec<NodeId>,
    /// Disrupted edges.
    pub edges: Vec<EdgeId>,
    /// Time step at which the disruption starts.
    pub start_time: u32,
    /// Number of time steps the targets stay disrupted.
    pub duration: u32,
}

impl TransportDisruption {
    /// Set the disruption duration of every target on the graph.
    pub fn implement(&self, graph: &mut TransportGraph) -> DisruptionOutcome {
        graph.apply_disruption(&self.nodes, &self.edges, self.duration)
    }
}

/// Destruction of part of the production capital of some firms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalDestruction {
    /// Destroyed fraction of capital per firm, in `[0, 1]`.
    pub firms: BTreeMap<FirmId, f64>,
    /// Time step at which the destruction happens.
    pub start_time: u32,
    /// Number of time steps until capacity is restored.
    pub duration: u32,
}

/// Any disruption event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Disruption {
    /// See [`TransportDisruption`].
    Transport(TransportDisruption),
    /// See [`CapitalDestruction`].
    Capital(CapitalDestruction),
}

impl Disruption {
    /// Time step at which the disruption starts.
    pub const fn start_time(&self) -> u32 {
        match self {
            Self::Transport(disruption) => disruption.start_time,
            Self::Capital(destruction) => destruction.start_time,
        }
    }

    /// Number of time steps the disruption lasts.
    pub const fn duration(&self) -> u32 {
        match self {
            Self::Transport(disruption) => disruption.duration,
            Self::Capital(destruction) => destruction.duration,
        }
    }
}

/// Every disruption of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisruptionList {
    disruptions: Vec<Disruption>,
}

impl DisruptionList {
    /// Wrap a list of disruptions.
    pub const fn new(disruptions: Vec<Disruption>) -> Self {
        Self { disruptions }
    }

    /// Build the list from configured events, resolving node and edge
    /// names against the graph.
    ///
    /// Unknown names are logged and skipped. A transport event left with no
    /// target is dropped.
    pub fn from_events(events: &[EventConfig], graph: &TransportGraph) -> Self {
        let mut disruptions = Vec::with_capacity(events.len());
        for event in events {
            match event {
                EventConfig::TransportDisruption {
                    nodes,
                    edges,
                    node_names,
                    edge_names,
                    start_time,
                    duration,
                } => {
                    let mut nodes = nodes.clone();
                    for name in node_names {
                        let found: Vec<NodeId> = graph
                            .nodes()
                            .filter(|node| node.name.as_deref() == Some(name.as_str()))
                            .map(|node| node.id)
                            .collect();
                        if found.is_empty() {
                            warn!(name = %name, "No transport node with this name");
                        }
                        nodes.extend(found);
                    }
                    let mut edges = edges.clone();
                    for name in edge_names {
                        let found: Vec<EdgeId> = graph
                            .edges()
                            .filter(|edge| edge.name.as_deref() == Some(name.as_str()))
                            .map(|edge| edge.id)
                            .collect();
                        if found.is_empty() {
                            warn!(name = %name, "No transport edge with this name");
                        }
                        edges.extend(found);
                    }
                    if nodes.is_empty() && edges.is_empty() {
                        warn!(start_time, "Transport disruption has no target, dropped");
                        continue;
                    }
                    disruptions.push(Disruption::Transport(TransportDisruption {
                        nodes,
                        edges,
                        start_time: *start_time,
                        duration: *duration,
                    }));
                }
                EventConfig::CapitalDestruction {
                    firms,
                    start_time,
                    duration,
                } => disruptions.push(Disruption::Capital(CapitalDestruction {
                    firms: firms.clone(),
                    start_time: *start_time,
                    duration: *duration,
                })),
            }
        }
        Self { disruptions }
    }

    /// Number of disruptions.
    pub fn len(&self) -> usize {
        self.disruptions.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.disruptions.is_empty()
    }

    /// Iterate over all disruptions.
    pub fn iter(&self) -> impl Iterator<Item = &Disruption> {
        self.disruptions.iter()
    }

    /// Disruptions starting at time step `t`.
    pub fn filter_start_time(&self, t: u32) -> impl Iterator<Item = &Disruption> {
        self.disruptions
            .iter()
            .filter(move |disruption| disruption.start_time() == t)
    }

    /// Longest disruption duration.
    pub fn max_duration(&self) -> Option<u32> {
        self.disruptions.iter().map(Disruption::duration).max()
    }

    /// Latest disruption start time.
    pub fn latest_start_time(&self) -> Option<u32> {
        self.disruptions.iter().map(Disruption::start_time).max()
    }

    /// Log one line per disruption.
    pub fn log_info(&self) {
        info!(count = self.disruptions.len(), "Disruption(s) will occur");
        for disruption in &self.disruptions {
            match disruption {
                Disruption::Transport(transport) => info!(
                    nodes = ?transport.nodes,
                    edges = ?transport.edges,
                    start_time = transport.start_time,
                    duration = transport.duration,
                    "Transport disruption"
                ),
                Disruption::Capital(capital) => info!(
                    firms = capital.firms.len(),
                    start_time = capital.start_time,
                    duration = capital.duration,
                    "Capital destruction"
                ),
            }
        }
    }
}
