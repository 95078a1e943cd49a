//! Configuration, disruptions, and the time-step loop of the `DisruptSC`
//! simulation.
//!
//! # Modules
//!
//! - [`agents`] -- [`EconomicAgents`] collaborator trait and the indicators
//!   of the equilibrium check.
//! - [`clock`] -- Simulation clock counting time steps.
//! - [`config`] -- Configuration loading from `disruptsc-config.yaml` into
//!   strongly-typed structs.
//! - [`disruption`] -- Transport disruptions, capital destructions, and the
//!   list a run draws from.
//! - [`runner`] -- Static and disruption runs with their stop conditions.
//! - [`shippers`] -- [`LinkShippers`], a population of suppliers shipping
//!   along commercial links.
//! - [`step`] -- The per-time-step cycle.
//!
//! [`EconomicAgents`]: agents::EconomicAgents
//! [`LinkShippers`]: shippers::LinkShippers

pub mod agents;
pub mod clock;
pub mod config;
pub mod disruption;
pub mod runner;
pub mod shippers;
pub mod step;
