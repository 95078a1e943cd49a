//! Routes through the transport graph and the cost queries made on them.
//!
//! A [`Route`] alternates node segments and edge segments, always starting
//! and ending on a node:
//!
//! ```text
//! [Node(n0), Edge(n0, n1), Node(n1), Edge(n1, n2), Node(n2)]
//! ```
//!
//! Edge segments keep the direction of travel. Every cost aggregation skips
//! node segments and virtual edges.

use std::collections::BTreeMap;

use disruptsc_types::{EdgeAttribute, NodeId, OptimizationCriterion, TransportMode};
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::graph::TransportGraph;

/// One element of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// A node the goods pass through.
    Node(NodeId),
    /// An edge travelled from the first node to the second.
    Edge(NodeId, NodeId),
}

/// Ordered path through the transport graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    segments: Vec<Segment>,
}

impl Route {
    /// Build a route from the sequence of visited nodes.
    ///
    /// Returns `None` for an empty path.
    pub fn from_path(path: &[NodeId]) -> Option<Self> {
        let (&first, rest) = path.split_first()?;
        let mut segments = Vec::with_capacity(path.len().saturating_mul(2));
        segments.push(Segment::Node(first));
        let mut previous = first;
        for &node in rest {
            segments.push(Segment::Edge(previous, node));
            segments.push(Segment::Node(node));
            previous = node;
        }
        Some(Self { segments })
    }

    /// Build a route from an explicit segment list, checking that it
    /// alternates node and edge segments, starts and ends on a node, and
    /// that every edge joins its neighbouring node segments.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self, NetworkError> {
        let invalid = |reason: &str| NetworkError::InvalidRoute {
            reason: reason.to_owned(),
        };
        if segments.is_empty() {
            return Err(invalid("empty segment list"));
        }
        let mut last_node: Option<NodeId> = None;
        let mut pending_edge: Option<(NodeId, NodeId)> = None;
        for (index, segment) in segments.iter().enumerate() {
            let expect_node = index % 2 == 0;
            match (*segment, expect_node) {
                (Segment::Node(node), true) => {
                    if let Some((_, to)) = pending_edge.take()
                        && to != node
                    {
                        return Err(invalid("edge does not end on the next node"));
                    }
                    last_node = Some(node);
                }
                (Segment::Edge(from, to), false) => {
                    if last_node != Some(from) {
                        return Err(invalid("edge does not start on the previous node"));
                    }
                    pending_edge = Some((from, to));
                }
                (Segment::Node(_), false) => return Err(invalid("two consecutive nodes")),
                (Segment::Edge(..), true) => return Err(invalid("route must alternate and start on a node")),
            }
        }
        if pending_edge.is_some() {
            return Err(invalid("route must end on a node"));
        }
        Ok(Self { segments })
    }

    /// All segments in travel order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments (`2 * edges + 1`).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a route holds at least its origin node.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Edge segments in travel order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Edge(from, to) => Some((*from, *to)),
            Segment::Node(_) => None,
        })
    }

    /// Node segments in travel order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Node(node) => Some(*node),
            Segment::Edge(..) => None,
        })
    }

    /// Number of edges travelled.
    pub fn edge_count(&self) -> usize {
        self.segments.len() / 2
    }

    /// First node.
    pub fn origin(&self) -> Option<NodeId> {
        self.nodes().next()
    }

    /// Last node.
    pub fn destination(&self) -> Option<NodeId> {
        self.nodes().last()
    }

    /// Whether the route travels exactly the edge `(from, to)`, in that
    /// direction.
    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edges().any(|edge| edge == (from, to))
    }
}

/// Distance and cost features of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteFeatures {
    /// Total length in kilometres.
    pub distance_km: f64,
    /// Total monetised travel time, starting from a floor of 1.
    pub time_cost: f64,
    /// Total cost per ton.
    pub cost_per_ton: f64,
}

/// Grouping used when breaking an aggregate down by edge category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeCategory {
    /// Transport mode.
    pub mode: TransportMode,
    /// Multimodal link tag.
    pub multimodes: Option<String>,
    /// Special infrastructure flag.
    pub special: bool,
}

/// Floor of every time-based route cost; a cost is never exactly zero.
const TIME_COST_FLOOR: f64 = 1.0;

impl TransportGraph {
    /// Sum `attribute` over the non-virtual edges of `route`.
    pub fn aggregate_on_route(
        &self,
        route: &Route,
        attribute: EdgeAttribute,
    ) -> Result<f64, NetworkError> {
        let mut total = 0.0;
        for (from, to) in route.edges() {
            let edge = self.edge_between(from, to)?;
            if !edge.is_virtual() {
                total += edge.attribute(attribute);
            }
        }
        Ok(total)
    }

    /// Sum `attribute` over the non-virtual edges of `route`, broken down
    /// by (mode, multimodal tag, special flag).
    pub fn aggregate_on_route_by_category(
        &self,
        route: &Route,
        attribute: EdgeAttribute,
    ) -> Result<BTreeMap<EdgeCategory, f64>, NetworkError> {
        let mut breakdown: BTreeMap<EdgeCategory, f64> = BTreeMap::new();
        for (from, to) in route.edges() {
            let edge = self.edge_between(from, to)?;
            if edge.is_virtual() {
                continue;
            }
            let category = EdgeCategory {
                mode: edge.mode,
                multimodes: edge.multimodes.clone(),
                special: edge.special,
            };
            *breakdown.entry(category).or_insert(0.0) += edge.attribute(attribute);
        }
        Ok(breakdown)
    }

    /// Distance, time cost and cost per ton of a route.
    pub fn route_features(&self, route: &Route) -> Result<RouteFeatures, NetworkError> {
        let mut features = RouteFeatures {
            distance_km: 0.0,
            time_cost: TIME_COST_FLOOR,
            cost_per_ton: 0.0,
        };
        for (from, to) in route.edges() {
            let edge = self.edge_between(from, to)?;
            if edge.is_virtual() {
                continue;
            }
            features.distance_km += edge.km;
            features.time_cost += edge.costs.get(OptimizationCriterion::TimeCost);
            features.cost_per_ton += edge.costs.get(OptimizationCriterion::CostPerTon);
        }
        Ok(features)
    }

    /// Time cost of a route with each edge's travel time inflated by its
    /// congestion: `1 + sum(cost_variability + cost_travel_time * (1 + congestion))`.
    pub fn route_cost_with_congestion(&self, route: &Route) -> Result<f64, NetworkError> {
        let mut cost = TIME_COST_FLOOR;
        for (from, to) in route.edges() {
            let edge = self.edge_between(from, to)?;
            if edge.is_virtual() {
                continue;
            }
            cost += edge.costs.cost_variability
                + edge.costs.cost_travel_time * (1.0 + edge.congestion);
        }
        Ok(cost)
    }

    /// Extra time cost caused by congestion alone.
    pub fn congestion_time_cost(&self, route: &Route) -> Result<f64, NetworkError> {
        let mut cost = 0.0;
        for (from, to) in route.edges() {
            let edge = self.edge_between(from, to)?;
            if !edge.is_virtual() {
                cost += edge.costs.cost_travel_time * edge.congestion;
            }
        }
        Ok(cost)
    }

    /// Transport modes used along the route, in order of first use.
    pub fn route_modes(&self, route: &Route) -> Result<Vec<TransportMode>, NetworkError> {
        let mut modes = Vec::new();
        for (from, to) in route.edges() {
            let mode = self.edge_between(from, to)?.mode;
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }
        Ok(modes)
    }

    /// Whether every node and edge of the route exists and is undisrupted.
    pub fn is_route_available(&self, route: &Route) -> bool {
        route.segments().iter().all(|segment| match *segment {
            Segment::Node(node) => self.node(node).is_some_and(|n| !n.is_disrupted()),
            Segment::Edge(from, to) => self
                .edge_between(from, to)
                .is_ok_and(|edge| !edge.is_disrupted()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: u64) -> NodeId {
        NodeId::new(id)
    }

    #[test]
    fn route_from_path_alternates_segments() {
        let route = Route::from_path(&[n(0), n(1), n(2)]);
        assert!(route.is_some());
        let Some(route) = route else { return };
        assert_eq!(
            route.segments(),
            &[
                Segment::Node(n(0)),
                Segment::Edge(n(0), n(1)),
                Segment::Node(n(1)),
                Segment::Edge(n(1), n(2)),
                Segment::Node(n(2)),
            ]
        );
        assert_eq!(route.len(), 2 * route.edge_count() + 1);
        assert_eq!(route.origin(), Some(n(0)));
        assert_eq!(route.destination(), Some(n(2)));
    }

    #[test]
    fn single_node_route() {
        let route = Route::from_path(&[n(4)]);
        assert_eq!(route.map(|r| r.len()), Some(1));
        assert!(Route::from_path(&[]).is_none());
    }

    #[test]
    fn contains_edge_is_directional() {
        let Some(route) = Route::from_path(&[n(0), n(1), n(2)]) else {
            return;
        };
        assert!(route.contains_edge(n(0), n(1)));
        assert!(!route.contains_edge(n(1), n(0)));
        assert!(!route.contains_edge(n(0), n(2)));
    }

    #[test]
    fn from_segments_rejects_malformed_lists() {
        assert!(Route::from_segments(vec![]).is_err());
        assert!(Route::from_segments(vec![Segment::Edge(n(0), n(1))]).is_err());
        assert!(
            Route::from_segments(vec![Segment::Node(n(0)), Segment::Edge(n(0), n(1))]).is_err()
        );
        assert!(
            Route::from_segments(vec![
                Segment::Node(n(0)),
                Segment::Edge(n(0), n(1)),
                Segment::Node(n(2)),
            ])
            .is_err()
        );
        assert!(
            Route::from_segments(vec![
                Segment::Node(n(0)),
                Segment::Edge(n(0), n(1)),
                Segment::Node(n(1)),
            ])
            .is_ok()
        );
    }
}
