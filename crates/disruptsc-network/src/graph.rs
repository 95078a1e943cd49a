//! Transport graph: transport nodes as vertices, transport edges as
//! undirected weighted links.
//!
//! The [`TransportGraph`] is the spatial backbone of the simulation. It
//! stores every [`TransportNode`] and [`TransportEdge`] as a typed record,
//! provides neighbour lookups, shortest-route computation under any routing
//! weight, disruption bookkeeping and the undisrupted subgraph used for
//! rerouting.
//!
//! Internally, an adjacency map indexes the neighbours of every node:
//! `BTreeMap<NodeId, BTreeSet<NodeId>>`. Edges are stored once under their
//! normalised [`EdgeKey`], with a secondary index from table [`EdgeId`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use disruptsc_types::{EdgeId, EdgeRecord, FirmId, HouseholdId, NodeId, NodeRecord, TransportMode};
use tracing::{debug, info, warn};

use crate::edge::{EdgeKey, TransportEdge};
use crate::error::NetworkError;
use crate::node::TransportNode;
use crate::route::Route;
use crate::weights::WeightKey;

/// Nodes and edges actually reached by a disruption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisruptionOutcome {
    /// Nodes whose disruption duration was set.
    pub nodes: Vec<NodeId>,
    /// Edges whose disruption duration was set.
    pub edges: Vec<EdgeId>,
    /// Requested node ids absent from the graph.
    pub unknown_nodes: Vec<NodeId>,
    /// Requested edge ids absent from the graph.
    pub unknown_edges: Vec<EdgeId>,
}

/// The multi-modal transport graph.
#[derive(Debug, Clone, Default)]
pub struct TransportGraph {
    /// All nodes indexed by their identifier.
    nodes: BTreeMap<NodeId, TransportNode>,
    /// All edges indexed by their endpoints.
    edges: BTreeMap<EdgeKey, TransportEdge>,
    /// Neighbours of every node.
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// Table edge id -> endpoints.
    edge_index: BTreeMap<EdgeId, EdgeKey>,
    /// Edges found congested by the last congestion evaluation.
    pub(crate) congested_edges: Vec<EdgeKey>,
}

impl TransportGraph {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            edge_index: BTreeMap::new(),
            congested_edges: Vec::new(),
        }
    }

    /// Build a graph from the node and edge tables.
    ///
    /// Only nodes that are endpoints of at least one edge are created;
    /// endpoints missing from the node table get a bare record.
    pub fn from_records(
        nodes: impl IntoIterator<Item = NodeRecord>,
        edges: impl IntoIterator<Item = EdgeRecord>,
    ) -> Result<Self, NetworkError> {
        let mut node_table: BTreeMap<NodeId, NodeRecord> =
            nodes.into_iter().map(|record| (record.id, record)).collect();
        let mut graph = Self::new();
        for edge in edges {
            for end in [edge.end1, edge.end2] {
                if !graph.nodes.contains_key(&end) {
                    let record = node_table.remove(&end).unwrap_or_else(|| {
                        debug!(node = %end, "edge endpoint missing from node table");
                        NodeRecord::bare(end)
                    });
                    graph.add_node(record);
                }
            }
            graph.add_edge(edge)?;
        }
        graph.log_summary();
        Ok(graph)
    }

    // -------------------------------------------------------------------
    // Node operations
    // -------------------------------------------------------------------

    /// Add a node, or refresh the static attributes of an existing one.
    pub fn add_node(&mut self, record: NodeRecord) {
        let id = record.id;
        if let Some(existing) = self.nodes.get_mut(&id) {
            existing.update_attributes(record);
        } else {
            self.nodes.insert(id, TransportNode::from_record(record));
            self.adjacency.entry(id).or_default();
        }
    }

    /// Get a node.
    pub fn node(&self, id: NodeId) -> Option<&TransportNode> {
        self.nodes.get(&id)
    }

    /// Get a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TransportNode> {
        self.nodes.get_mut(&id)
    }

    /// Whether the node exists.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &TransportNode> {
        self.nodes.values()
    }

    // -------------------------------------------------------------------
    // Edge operations
    // -------------------------------------------------------------------

    /// Add an edge, creating missing endpoint nodes.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateEdge`] if the endpoints are already
    /// joined, or [`NetworkError::DuplicateEdgeId`] if the id is taken.
    pub fn add_edge(&mut self, record: EdgeRecord) -> Result<(), NetworkError> {
        let key = EdgeKey::new(record.end1, record.end2);
        if self.edges.contains_key(&key) {
            return Err(NetworkError::DuplicateEdge {
                from: record.end1,
                to: record.end2,
            });
        }
        if self.edge_index.contains_key(&record.id) {
            return Err(NetworkError::DuplicateEdgeId(record.id));
        }
        for end in [record.end1, record.end2] {
            if !self.nodes.contains_key(&end) {
                self.add_node(NodeRecord::bare(end));
            }
        }
        self.adjacency.entry(record.end1).or_default().insert(record.end2);
        self.adjacency.entry(record.end2).or_default().insert(record.end1);
        self.edge_index.insert(record.id, key);
        self.edges.insert(key, TransportEdge::from_record(record));
        Ok(())
    }

    /// Get the edge joining two nodes, in either direction.
    pub fn edge(&self, u: NodeId, v: NodeId) -> Option<&TransportEdge> {
        self.edges.get(&EdgeKey::new(u, v))
    }

    /// Get the edge joining two nodes mutably.
    pub fn edge_mut(&mut self, u: NodeId, v: NodeId) -> Option<&mut TransportEdge> {
        self.edges.get_mut(&EdgeKey::new(u, v))
    }

    /// Get the edge joining two nodes, or [`NetworkError::MissingEdge`].
    pub fn edge_between(&self, u: NodeId, v: NodeId) -> Result<&TransportEdge, NetworkError> {
        self.edge(u, v)
            .ok_or(NetworkError::MissingEdge { from: u, to: v })
    }

    /// Get an edge by its table id.
    pub fn edge_by_id(&self, id: EdgeId) -> Option<&TransportEdge> {
        self.edge_index.get(&id).and_then(|key| self.edges.get(key))
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all edges.
    pub fn edges(&self) -> impl Iterator<Item = &TransportEdge> {
        self.edges.values()
    }

    /// Iterate over all edges mutably.
    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut TransportEdge> {
        self.edges.values_mut()
    }

    /// Neighbours of a node.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Total length per transport mode.
    pub fn km_per_mode(&self) -> BTreeMap<TransportMode, f64> {
        let mut totals: BTreeMap<TransportMode, f64> = BTreeMap::new();
        for edge in self.edges.values() {
            *totals.entry(edge.mode).or_insert(0.0) += edge.km;
        }
        totals
    }

    /// Log network size and length per transport mode.
    pub fn log_summary(&self) {
        let km_per_mode = self.km_per_mode();
        let total_km: f64 = km_per_mode.values().sum();
        info!(total_km = format!("{total_km:.0}"), "Total length of transport network");
        for (mode, km) in &km_per_mode {
            info!(%mode, km = format!("{km:.0}"), "Transport network length per mode");
        }
        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "Transport network size"
        );
    }

    // -------------------------------------------------------------------
    // Routing
    // -------------------------------------------------------------------

    /// Find the cheapest route between two nodes under the routing weight
    /// `key`, using Dijkstra's algorithm.
    ///
    /// Edges with no weight for `key` (a logistics mode never defined on
    /// them) or a non-finite or negative weight are not traversed.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingNode`] if either endpoint is absent
    /// and [`NetworkError::NoPath`] if they are not connected. Both are
    /// logged; callers are expected to fall back rather than abort.
    pub fn shortest_route(
        &self,
        origin: NodeId,
        destination: NodeId,
        key: &WeightKey,
    ) -> Result<Route, NetworkError> {
        for endpoint in [origin, destination] {
            if !self.nodes.contains_key(&endpoint) {
                info!(node = %endpoint, "Node not in the available transport network");
                return Err(NetworkError::MissingNode(endpoint));
            }
        }

        let Some(path) = self.shortest_path(origin, destination, key) else {
            info!(from = %origin, to = %destination, weight = %key, "There is no path");
            return Err(NetworkError::NoPath {
                from: origin,
                to: destination,
            });
        };

        Route::from_path(&path).ok_or(NetworkError::NoPath {
            from: origin,
            to: destination,
        })
    }

    /// Dijkstra over the adjacency map. Returns the visited nodes from
    /// `start` to `goal` inclusive.
    fn shortest_path(&self, start: NodeId, goal: NodeId, key: &WeightKey) -> Option<Vec<NodeId>> {
        if start == goal {
            return Some(vec![start]);
        }

        let mut dist: BTreeMap<NodeId, Distance> = BTreeMap::new();
        let mut prev: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        // A BTreeSet keyed on (distance, node) serves as the priority queue.
        let mut queue: BTreeSet<(Distance, NodeId)> = BTreeSet::new();

        dist.insert(start, Distance(0.0));
        queue.insert((Distance(0.0), start));

        while let Some((current_dist, current)) = queue.pop_first() {
            if current == goal {
                break;
            }

            for neighbor in self.neighbors(current) {
                let Some(weight) = self
                    .edge(current, neighbor)
                    .and_then(|edge| edge.routing_weight(key))
                else {
                    continue;
                };
                if !weight.is_finite() || weight < 0.0 {
                    continue;
                }
                let new_dist = Distance(current_dist.0 + weight);

                let is_shorter = dist
                    .get(&neighbor)
                    .is_none_or(|existing| new_dist < *existing);

                if is_shorter {
                    if let Some(old_dist) = dist.insert(neighbor, new_dist) {
                        queue.remove(&(old_dist, neighbor));
                    }
                    prev.insert(neighbor, current);
                    queue.insert((new_dist, neighbor));
                }
            }
        }

        if !prev.contains_key(&goal) {
            return None;
        }

        let mut path = VecDeque::new();
        let mut current = goal;
        path.push_front(current);
        while let Some(&predecessor) = prev.get(&current) {
            path.push_front(predecessor);
            current = predecessor;
            if current == start {
                break;
            }
        }

        Some(path.into_iter().collect())
    }

    /// The subgraph of undisrupted nodes and edges.
    ///
    /// Every undisrupted node is kept, even when all its edges are
    /// disrupted, so routing on the subgraph reports
    /// [`NetworkError::NoPath`] rather than [`NetworkError::MissingNode`]
    /// for a cut-off node. Build a fresh subgraph whenever the disruption
    /// state changes.
    pub fn available_subgraph(&self) -> Self {
        let mut subgraph = Self::new();
        for node in self.nodes.values().filter(|node| !node.is_disrupted()) {
            subgraph.nodes.insert(node.id, node.clone());
            subgraph.adjacency.entry(node.id).or_default();
        }
        for (key, edge) in &self.edges {
            let (u, v) = key.endpoints();
            if edge.is_disrupted() || !subgraph.nodes.contains_key(&u) || !subgraph.nodes.contains_key(&v) {
                continue;
            }
            subgraph.adjacency.entry(u).or_default().insert(v);
            subgraph.adjacency.entry(v).or_default().insert(u);
            subgraph.edge_index.insert(edge.id, *key);
            subgraph.edges.insert(*key, edge.clone());
        }
        subgraph
    }

    // -------------------------------------------------------------------
    // Disruptions
    // -------------------------------------------------------------------

    /// Disrupt nodes and edges for `duration` time steps.
    ///
    /// Virtual edges are never disrupted. Unknown ids are logged and
    /// reported in the outcome.
    pub fn apply_disruption(
        &mut self,
        nodes: &[NodeId],
        edges: &[EdgeId],
        duration: u32,
    ) -> DisruptionOutcome {
        let mut outcome = DisruptionOutcome::default();
        for &id in nodes {
            if let Some(node) = self.nodes.get_mut(&id) {
                info!(node = %id, duration, "Transport node gets disrupted");
                node.disruption_duration = duration;
                outcome.nodes.push(id);
            } else {
                warn!(node = %id, "Cannot disrupt unknown transport node");
                outcome.unknown_nodes.push(id);
            }
        }
        for &id in edges {
            let Some(edge) = self
                .edge_index
                .get(&id)
                .and_then(|key| self.edges.get_mut(key))
            else {
                warn!(edge = %id, "Cannot disrupt unknown transport edge");
                outcome.unknown_edges.push(id);
                continue;
            };
            if edge.is_virtual() {
                debug!(edge = %id, "Virtual edges are not disrupted");
                continue;
            }
            info!(edge = %id, mode = %edge.mode, duration, "Transport edge gets disrupted");
            edge.disruption_duration = duration;
            outcome.edges.push(id);
        }
        outcome
    }

    /// One time step is gone: every remaining disruption shortens by one.
    pub fn decay_disruptions(&mut self) {
        for node in self.nodes.values_mut() {
            node.disruption_duration = node.disruption_duration.saturating_sub(1);
        }
        for edge in self.edges.values_mut() {
            edge.disruption_duration = edge.disruption_duration.saturating_sub(1);
        }
    }

    /// Nodes currently disrupted.
    pub fn disrupted_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|node| node.is_disrupted())
            .map(|node| node.id)
            .collect()
    }

    /// Edges currently disrupted.
    pub fn disrupted_edges(&self) -> Vec<EdgeId> {
        self.edges
            .values()
            .filter(|edge| edge.is_disrupted())
            .map(|edge| edge.id)
            .collect()
    }

    /// Clear every disruption, shipment, congestion level and load, so a
    /// new run can start on the same graph.
    pub fn reinitialize_flows_and_disruptions(&mut self) {
        for node in self.nodes.values_mut() {
            node.disruption_duration = 0;
            node.shipments.clear();
        }
        for edge in self.edges.values_mut() {
            edge.disruption_duration = 0;
            edge.shipments.clear();
            edge.congestion = 0.0;
            edge.current_load = 0.0;
        }
        self.congested_edges.clear();
    }

    // -------------------------------------------------------------------
    // Agent location
    // -------------------------------------------------------------------

    /// Reset `firms_there` on every node and record the given locations.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingNode`] on the first unknown node; the
    /// firms located before it stay located.
    pub fn locate_firms(
        &mut self,
        locations: impl IntoIterator<Item = (FirmId, NodeId)>,
    ) -> Result<(), NetworkError> {
        for node in self.nodes.values_mut() {
            node.firms_there.clear();
        }
        for (firm, node_id) in locations {
            let node = self
                .nodes
                .get_mut(&node_id)
                .ok_or(NetworkError::MissingNode(node_id))?;
            node.firms_there.insert(firm);
        }
        Ok(())
    }

    /// Reset `household_there` on every node and record the given
    /// locations. A node holds at most one household; the last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingNode`] on the first unknown node.
    pub fn locate_households(
        &mut self,
        locations: impl IntoIterator<Item = (HouseholdId, NodeId)>,
    ) -> Result<(), NetworkError> {
        for node in self.nodes.values_mut() {
            node.household_there = None;
        }
        for (household, node_id) in locations {
            let node = self
                .nodes
                .get_mut(&node_id)
                .ok_or(NetworkError::MissingNode(node_id))?;
            if let Some(previous) = node.household_there.replace(household) {
                warn!(node = %node_id, %previous, %household, "Node already hosted a household");
            }
        }
        Ok(())
    }
}

/// Path length with a total order, usable as a priority-queue key.
#[derive(Debug, Clone, Copy)]
struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use disruptsc_types::{EdgeAttribute, OptimizationCriterion};

    use super::*;
    use crate::route::Segment;

    fn n(id: u64) -> NodeId {
        NodeId::new(id)
    }

    fn road(id: u64, a: u64, b: u64, cost_per_ton: f64) -> EdgeRecord {
        let mut record = EdgeRecord::new(EdgeId::new(id), n(a), n(b), TransportMode::Road);
        record.km = 10.0;
        record.costs.cost_per_ton = cost_per_ton;
        record
    }

    fn cost_per_ton() -> WeightKey {
        WeightKey::Attribute(EdgeAttribute::Cost(OptimizationCriterion::CostPerTon))
    }

    /// A - B - C line with costs 1 and 2.
    fn line_graph() -> TransportGraph {
        let mut graph = TransportGraph::new();
        let _ = graph.add_edge(road(10, 1, 2, 1.0));
        let _ = graph.add_edge(road(11, 2, 3, 2.0));
        graph
    }

    #[test]
    fn edge_creates_missing_endpoints() {
        let graph = line_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let edge = graph.edge(n(2), n(1));
        assert!(edge.is_some_and(|e| e.shipments.is_empty() && e.current_load == 0.0));
        assert!(graph.node(n(1)).is_some_and(|node| node.disruption_duration == 0));
    }

    #[test]
    fn duplicate_edges_rejected() {
        let mut graph = line_graph();
        assert_eq!(
            graph.add_edge(road(12, 2, 1, 1.0)),
            Err(NetworkError::DuplicateEdge { from: n(2), to: n(1) })
        );
        assert_eq!(
            graph.add_edge(road(10, 5, 6, 1.0)),
            Err(NetworkError::DuplicateEdgeId(EdgeId::new(10)))
        );
    }

    #[test]
    fn shortest_route_through_middle_node() {
        let graph = line_graph();
        let route = graph.shortest_route(n(1), n(3), &cost_per_ton());
        assert!(route.is_ok());
        let Ok(route) = route else { return };
        assert_eq!(route.len(), 5);
        assert!(route.segments().contains(&Segment::Node(n(2))));
        let total = graph.aggregate_on_route(&route, EdgeAttribute::Cost(OptimizationCriterion::CostPerTon));
        assert_eq!(total.map(|t| (t - 3.0).abs() < 1e-12), Ok(true));
    }

    #[test]
    fn shortest_route_prefers_cheaper_detour() {
        let mut graph = line_graph();
        let _ = graph.add_edge(road(12, 1, 3, 10.0));
        let route = graph.shortest_route(n(1), n(3), &cost_per_ton());
        assert_eq!(route.map(|r| r.edge_count()), Ok(2));
        let direct = graph.shortest_route(n(1), n(3), &WeightKey::Attribute(EdgeAttribute::Km));
        assert_eq!(direct.map(|r| r.edge_count()), Ok(1));
    }

    #[test]
    fn shortest_route_missing_endpoint() {
        let graph = line_graph();
        assert_eq!(
            graph.shortest_route(n(1), n(99), &cost_per_ton()),
            Err(NetworkError::MissingNode(n(99)))
        );
    }

    #[test]
    fn shortest_route_disconnected() {
        let mut graph = line_graph();
        graph.add_node(NodeRecord::bare(n(7)));
        assert_eq!(
            graph.shortest_route(n(1), n(7), &cost_per_ton()),
            Err(NetworkError::NoPath { from: n(1), to: n(7) })
        );
    }

    #[test]
    fn shortest_route_same_node() {
        let graph = line_graph();
        let route = graph.shortest_route(n(2), n(2), &cost_per_ton());
        assert_eq!(route.map(|r| r.segments().to_vec()), Ok(vec![Segment::Node(n(2))]));
    }

    #[test]
    fn disruption_excludes_edge_from_available_subgraph() {
        let mut graph = line_graph();
        let outcome = graph.apply_disruption(&[], &[EdgeId::new(10)], 1);
        assert_eq!(outcome.edges, vec![EdgeId::new(10)]);

        let available = graph.available_subgraph();
        assert!(available.edge(n(1), n(2)).is_none());
        assert_eq!(available.node_count(), 3);
        assert_eq!(
            available.shortest_route(n(1), n(3), &cost_per_ton()),
            Err(NetworkError::NoPath { from: n(1), to: n(3) })
        );
    }

    #[test]
    fn disrupted_node_removed_with_its_edges() {
        let mut graph = line_graph();
        let _ = graph.apply_disruption(&[n(2)], &[], 2);
        let available = graph.available_subgraph();
        assert!(!available.contains_node(n(2)));
        assert_eq!(available.edge_count(), 0);
        assert_eq!(graph.disrupted_nodes(), vec![n(2)]);
    }

    #[test]
    fn disruption_decays_one_step_at_a_time() {
        let mut graph = line_graph();
        let _ = graph.apply_disruption(&[], &[EdgeId::new(11)], 3);
        for _ in 0..2 {
            graph.decay_disruptions();
            assert!(graph.edge(n(2), n(3)).is_some_and(TransportEdge::is_disrupted));
        }
        graph.decay_disruptions();
        assert!(graph.edge(n(2), n(3)).is_some_and(|e| e.disruption_duration == 0));
        graph.decay_disruptions();
        assert!(graph.edge(n(2), n(3)).is_some_and(|e| e.disruption_duration == 0));
    }

    #[test]
    fn virtual_edges_are_never_disrupted() {
        let mut graph = line_graph();
        let _ = graph.add_edge(EdgeRecord::new(EdgeId::new(20), n(3), n(4), TransportMode::Virtual));
        let outcome = graph.apply_disruption(&[], &[EdgeId::new(20), EdgeId::new(99)], 5);
        assert!(outcome.edges.is_empty());
        assert_eq!(outcome.unknown_edges, vec![EdgeId::new(99)]);
        assert!(graph.edge(n(3), n(4)).is_some_and(|e| !e.is_disrupted()));
    }

    #[test]
    fn from_records_uses_node_table() {
        let mut named = NodeRecord::bare(n(1));
        named.name = Some(String::from("Port"));
        named.special = true;
        let graph = TransportGraph::from_records(vec![named], vec![road(1, 1, 2, 1.0)]);
        assert!(graph.is_ok());
        let Ok(graph) = graph else { return };
        assert!(graph.node(n(1)).is_some_and(|node| node.special));
        assert!(graph.node(n(2)).is_some_and(|node| node.name.is_none()));
        let km = graph.km_per_mode().get(&TransportMode::Road).copied();
        assert_eq!(km.map(|k| (k - 10.0).abs() < 1e-12), Some(true));
    }

    #[test]
    fn locate_agents_on_nodes() {
        let mut graph = line_graph();
        assert!(graph.locate_firms([(FirmId::new(1), n(1)), (FirmId::new(2), n(1))]).is_ok());
        assert!(graph.node(n(1)).is_some_and(|node| node.firms_there.len() == 2));
        assert!(graph.locate_firms([(FirmId::new(3), n(2))]).is_ok());
        assert!(graph.node(n(1)).is_some_and(|node| node.firms_there.is_empty()));

        assert!(graph.locate_households([(HouseholdId::new(5), n(3))]).is_ok());
        assert!(graph.node(n(3)).is_some_and(|node| node.household_there == Some(HouseholdId::new(5))));
        assert_eq!(
            graph.locate_households([(HouseholdId::new(6), n(42))]),
            Err(NetworkError::MissingNode(n(42)))
        );
    }
}
