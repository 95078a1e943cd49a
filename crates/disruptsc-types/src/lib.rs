//! Shared type definitions for the `DisruptSC` simulation.
//!
//! This crate is the single source of truth for identifiers, enumerations
//! and plain records used across the `DisruptSC` workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers for nodes, edges, agents and links
//! - [`enums`] -- Transport modes, flow categories, cost criteria
//! - [`structs`] -- Node/edge table rows, shipment records, agent references

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    EdgeAttribute, FlowCategory, OptimizationCriterion, ParseEnumError, RouteChoice,
    TimeResolution, TransportMode,
};
pub use ids::{CommercialLinkId, CountryCode, EdgeId, FirmId, HouseholdId, NodeId, RunId, Sector};
pub use structs::{AgentRef, Coordinates, EdgeCosts, EdgeRecord, NodeRecord, ShipmentRecord};
