//! Error types for the `disruptsc-network` crate.
//!
//! All fallible operations in this crate return [`NetworkError`] through the
//! standard [`Result`] type. Routing failures ([`NetworkError::MissingNode`],
//! [`NetworkError::NoPath`]) are expected at runtime once disruptions cut
//! the graph; callers recover from them locally.

use disruptsc_types::{EdgeId, NodeId};

/// Errors that can occur during transport-graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// A node was not found in the graph.
    #[error("node not found in the transport network: {0}")]
    MissingNode(NodeId),

    /// Both endpoints exist but no path connects them.
    #[error("no path from {from} to {to}")]
    NoPath {
        /// Origin node.
        from: NodeId,
        /// Destination node.
        to: NodeId,
    },

    /// No edge joins the two nodes.
    #[error("no edge between {from} and {to}")]
    MissingEdge {
        /// First endpoint.
        from: NodeId,
        /// Second endpoint.
        to: NodeId,
    },

    /// An edge already joins the two nodes.
    #[error("duplicate edge between {from} and {to}")]
    DuplicateEdge {
        /// First endpoint.
        from: NodeId,
        /// Second endpoint.
        to: NodeId,
    },

    /// An edge identifier was inserted twice.
    #[error("duplicate edge id: {0}")]
    DuplicateEdgeId(EdgeId),

    /// The requested aggregation key is not supported.
    #[error("unsupported aggregation key: {key:?}")]
    InvalidFlowType {
        /// The rejected key.
        key: String,
    },

    /// The routing weight name matches neither an edge attribute nor a
    /// logistics mode.
    #[error("unknown routing weight: {0:?}")]
    UnknownWeightKey(String),

    /// A segment list does not form a valid route.
    #[error("invalid route: {reason}")]
    InvalidRoute {
        /// What is wrong with the segment list.
        reason: String,
    },
}
