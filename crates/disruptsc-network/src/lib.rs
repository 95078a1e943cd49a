//! Transport network for the `DisruptSC` simulation.
//!
//! This crate models the multi-modal transport graph goods travel on:
//! nodes and undirected edges with per-step mutable state (load,
//! disruption, shipments, congestion), routing weights recomputed under
//! capacity pressure, and the commercial links whose shipments ride on it.
//!
//! # Modules
//!
//! - [`commercial_link`] -- Buyer-supplier links, initial route choice and
//!   per-step fallback to alternative routes.
//! - [`congestion`] -- Traffic evaluation and the congestion function.
//! - [`edge`] -- [`TransportEdge`] and its normalised [`EdgeKey`].
//! - [`error`] -- Error types for transport-graph operations.
//! - [`flows`] -- Per-segment flow aggregation by [`FlowType`].
//! - [`graph`] -- The graph itself: construction, Dijkstra routing,
//!   disruptions, available subgraph, agent location.
//! - [`node`] -- [`TransportNode`] with its runtime state.
//! - [`route`] -- [`Route`] and the cost queries made on it.
//! - [`shipment`] -- Placing and removing shipment records.
//! - [`weights`] -- Logistics modes, routing weights and capacity burdens.

pub mod commercial_link;
pub mod congestion;
pub mod edge;
pub mod error;
pub mod flows;
pub mod graph;
pub mod node;
pub mod route;
pub mod shipment;
pub mod weights;

// Re-export primary types at crate root.
pub use commercial_link::CommercialLink;
pub use congestion::{CONGESTION_EPSILON, congestion_function};
pub use edge::{EdgeKey, TransportEdge};
pub use error::NetworkError;
pub use flows::{FlowTable, FlowType};
pub use graph::{DisruptionOutcome, TransportGraph};
pub use node::TransportNode;
pub use route::{EdgeCategory, Route, RouteFeatures, Segment};
pub use weights::{CAPACITY_BURDEN, LogisticsMode, LogisticsModes, OTHER_MODE_BURDEN, WeightKey};
