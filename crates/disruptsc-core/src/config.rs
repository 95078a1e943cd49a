//! Configuration loading and typed config structures for the `DisruptSC`
//! simulation.
//!
//! The canonical configuration lives in `disruptsc-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty document is a valid configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use disruptsc_network::{CommercialLink, FlowType, LogisticsModes};
use disruptsc_types::{EdgeId, FirmId, NodeId, OptimizationCriterion, Sector, TimeResolution};
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `disruptsc-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulation parameters.
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Logistics modes the commercial links route under.
    #[serde(default)]
    pub logistics_modes: LogisticsModes,

    /// Tons of traffic per monetary unit, per sector. When absent, traffic
    /// is measured in monetary units.
    #[serde(default)]
    pub sector_volume_coefficients: Option<BTreeMap<Sector, f64>>,

    /// Disruption events.
    #[serde(default)]
    pub events: Vec<EventConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is unusable.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is unusable.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let simulation = &self.simulation;
        if let Some(epsilon) = simulation.epsilon_stop_condition
            && !(epsilon.is_finite() && epsilon >= 0.0)
        {
            return Err(invalid(format!(
                "epsilon_stop_condition must be a non-negative number, got {epsilon}"
            )));
        }
        if simulation.max_duration.is_none() && simulation.duration_dic.is_empty() {
            return Err(invalid("duration_dic is empty and no max_duration is set"));
        }
        if simulation.max_duration == Some(0) {
            return Err(invalid("max_duration must be at least 1"));
        }
        if self.logistics_modes.0.is_empty() {
            return Err(invalid("at least one logistics mode must be configured"));
        }
        for (name, mode) in self.logistics_modes.iter() {
            if mode.accepted_modes.is_empty() {
                return Err(invalid(format!("logistics mode {name:?} accepts no transport mode")));
            }
        }
        if let Some(coefficients) = &self.sector_volume_coefficients
            && let Some((sector, value)) = coefficients
                .iter()
                .find(|(_, value)| !(value.is_finite() && **value >= 0.0))
        {
            return Err(invalid(format!(
                "volume coefficient of sector {sector} must be non-negative, got {value}"
            )));
        }
        for (index, event) in self.events.iter().enumerate() {
            event
                .validate()
                .map_err(|reason| invalid(format!("event {index}: {reason}")))?;
        }
        Ok(())
    }

    /// Check that every commercial link names a configured logistics mode.
    ///
    /// Links without a mode route on the capacity weight and always pass.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first link whose mode is
    /// unknown.
    pub fn validate_links(&self, links: &[CommercialLink]) -> Result<(), ConfigError> {
        for link in links {
            if let Some(mode) = &link.logistics_mode
                && !self.logistics_modes.contains(mode)
            {
                return Err(invalid(format!(
                    "commercial link {} uses unknown logistics mode {mode:?}",
                    link.id
                )));
            }
        }
        Ok(())
    }
}

/// How the firm-level data of the economy was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirmDataType {
    /// Firms disaggregated from a national input-output table.
    #[default]
    #[serde(rename = "disaggregating IO")]
    DisaggregatingIo,
    /// An observed supplier-buyer network.
    #[serde(rename = "supplier-buyer network")]
    SupplierBuyerNetwork,
    /// A multi-regional input-output table.
    #[serde(rename = "mrio")]
    Mrio,
}

/// Simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Edge cost criterion that routes minimise.
    #[serde(default)]
    pub route_optimization_weight: OptimizationCriterion,

    /// Whether loads above edge capacity burden the routing weights.
    #[serde(default = "default_true")]
    pub capacity_constraint: bool,

    /// Whether traffic congestion is evaluated every time step.
    #[serde(default = "default_true")]
    pub congestion: bool,

    /// Threshold on extra spending and consumption loss below which a
    /// disrupted run is back to equilibrium. `None` disables early stop.
    #[serde(default = "default_epsilon_stop_condition")]
    pub epsilon_stop_condition: Option<f64>,

    /// Whether suppliers pass transport cost increases on to their buyers.
    #[serde(default = "default_true")]
    pub propagate_input_price_change: bool,

    /// Real-world duration of one time step.
    #[serde(default)]
    pub time_resolution: TimeResolution,

    /// Maximum disruption duration to number of simulated time steps.
    #[serde(default = "default_duration_dic")]
    pub duration_dic: BTreeMap<u32, u32>,

    /// Explicit number of time steps, overriding `duration_dic`.
    #[serde(default)]
    pub max_duration: Option<u32>,

    /// Sectors whose goods are delivered without using the network.
    #[serde(default = "default_sectors_no_transport_network")]
    pub sectors_no_transport_network: BTreeSet<Sector>,

    /// How the firm-level data was built.
    #[serde(default)]
    pub firm_data_type: FirmDataType,

    /// Flow types aggregated per edge at time steps 0 and 1.
    #[serde(default = "default_flow_types")]
    pub flow_types: Vec<FlowType>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            route_optimization_weight: OptimizationCriterion::default(),
            capacity_constraint: default_true(),
            congestion: default_true(),
            epsilon_stop_condition: default_epsilon_stop_condition(),
            propagate_input_price_change: default_true(),
            time_resolution: TimeResolution::default(),
            duration_dic: default_duration_dic(),
            max_duration: None,
            sectors_no_transport_network: default_sectors_no_transport_network(),
            firm_data_type: FirmDataType::default(),
            flow_types: default_flow_types(),
        }
    }
}

/// A disruption event as written in the configuration.
///
/// Transport targets are given by id or by name; names are resolved
/// against the transport graph when the disruption list is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventConfig {
    /// Transport nodes and edges become unusable.
    TransportDisruption {
        /// Node ids.
        #[serde(default)]
        nodes: Vec<NodeId>,
        /// Edge ids.
        #[serde(default)]
        edges: Vec<EdgeId>,
        /// Node names.
        #[serde(default)]
        node_names: Vec<String>,
        /// Edge names.
        #[serde(default)]
        edge_names: Vec<String>,
        /// Time step at which the disruption starts.
        start_time: u32,
        /// Number of time steps the targets stay disrupted.
        duration: u32,
    },
    /// Part of the production capital of firms is destroyed.
    CapitalDestruction {
        /// Destroyed fraction of capital per firm.
        firms: BTreeMap<FirmId, f64>,
        /// Time step at which the destruction happens.
        start_time: u32,
        /// Number of time steps until capacity is restored.
        duration: u32,
    },
}

impl EventConfig {
    /// Time step at which the event starts.
    pub const fn start_time(&self) -> u32 {
        match self {
            Self::TransportDisruption { start_time, .. }
            | Self::CapitalDestruction { start_time, .. } => *start_time,
        }
    }

    /// Number of time steps the event lasts.
    pub const fn duration(&self) -> u32 {
        match self {
            Self::TransportDisruption { duration, .. }
            | Self::CapitalDestruction { duration, .. } => *duration,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.duration() == 0 {
            return Err(String::from("duration must be at least 1"));
        }
        match self {
            Self::TransportDisruption {
                nodes,
                edges,
                node_names,
                edge_names,
                ..
            } => {
                if nodes.is_empty() && edges.is_empty() && node_names.is_empty() && edge_names.is_empty() {
                    return Err(String::from("transport disruption targets nothing"));
                }
            }
            Self::CapitalDestruction { firms, .. } => {
                if firms.is_empty() {
                    return Err(String::from("capital destruction targets no firm"));
                }
                if let Some((firm, fraction)) = firms
                    .iter()
                    .find(|(_, fraction)| !(0.0..=1.0).contains(*fraction))
                {
                    return Err(format!(
                        "destroyed fraction of firm {firm} must lie in [0, 1], got {fraction}"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_epsilon_stop_condition() -> Option<f64> {
    Some(1e-3)
}

fn default_duration_dic() -> BTreeMap<u32, u32> {
    BTreeMap::from([(1, 4), (2, 8), (3, 11), (4, 14)])
}

fn default_sectors_no_transport_network() -> BTreeSet<Sector> {
    ["utility", "transport", "trade", "service"]
        .into_iter()
        .map(Sector::new)
        .collect()
}

fn default_flow_types() -> Vec<FlowType> {
    vec![FlowType::Total]
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use disruptsc_types::{FlowCategory, TransportMode};

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.simulation.route_optimization_weight,
            OptimizationCriterion::CostPerTon
        );
        assert_eq!(config.simulation.epsilon_stop_condition, Some(1e-3));
        assert_eq!(config.simulation.duration_dic.get(&3), Some(&11));
        assert!(config.logistics_modes.contains("domestic"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
simulation:
  route_optimization_weight: agg_cost
  capacity_constraint: false
  congestion: false
  epsilon_stop_condition: 0.01
  propagate_input_price_change: false
  time_resolution: day
  duration_dic:
    1: 5
    2: 9
  sectors_no_transport_network: [SER]
  firm_data_type: "supplier-buyer network"
  flow_types: [total, import, AGR]

logistics_modes:
  domestic:
    accepted_modes: [roads, airways]
  international:
    accepted_modes: [roads, maritime, multimodal]
    accepted_multimodal_links: [roads-maritime]

sector_volume_coefficients:
  AGR: 2.5
  SER: 0.0

events:
  - type: transport_disruption
    edges: [2474, 2121]
    start_time: 1
    duration: 2
  - type: transport_disruption
    node_names: ["Sihanoukville international port"]
    start_time: 3
    duration: 1
  - type: capital_destruction
    firms:
      12: 0.5
    start_time: 1
    duration: 3

logging:
  level: debug
  format: json
"#;

        let config = SimulationConfig::parse(yaml).unwrap();
        let simulation = &config.simulation;
        assert_eq!(simulation.route_optimization_weight, OptimizationCriterion::AggCost);
        assert!(!simulation.capacity_constraint);
        assert_eq!(simulation.time_resolution, TimeResolution::Day);
        assert_eq!(simulation.duration_dic.len(), 2);
        assert_eq!(simulation.firm_data_type, FirmDataType::SupplierBuyerNetwork);
        assert_eq!(
            simulation.flow_types,
            vec![
                FlowType::Total,
                FlowType::Category(FlowCategory::Import),
                FlowType::Product(Sector::new("AGR")),
            ]
        );
        let domestic = config.logistics_modes.get("domestic").unwrap();
        assert!(domestic.accepted_modes.contains(&TransportMode::Airways));
        assert_eq!(config.events.len(), 3);
        assert_eq!(config.events.get(2).map(EventConfig::duration), Some(3));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("simulation:\n  max_duration: 6\n").unwrap();
        assert_eq!(config.simulation.max_duration, Some(6));
        assert!(config.simulation.capacity_constraint);
        assert!(config.events.is_empty());
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn unknown_values_are_rejected() {
        let criterion = SimulationConfig::parse("simulation:\n  route_optimization_weight: speed\n");
        assert!(matches!(criterion, Err(ConfigError::Yaml { .. })));

        let firm_data = SimulationConfig::parse("simulation:\n  firm_data_type: census\n");
        assert!(matches!(firm_data, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let negative = SimulationConfig::parse("simulation:\n  epsilon_stop_condition: -1.0\n");
        assert!(matches!(negative, Err(ConfigError::Invalid { .. })));

        let no_modes = SimulationConfig::parse("logistics_modes: {}\n");
        assert!(matches!(no_modes, Err(ConfigError::Invalid { .. })));

        let zero_duration = "events:\n  - type: transport_disruption\n    edges: [1]\n    start_time: 1\n    duration: 0\n";
        assert!(matches!(
            SimulationConfig::parse(zero_duration),
            Err(ConfigError::Invalid { .. })
        ));

        let fraction = "events:\n  - type: capital_destruction\n    firms:\n      1: 1.5\n    start_time: 1\n    duration: 1\n";
        assert!(matches!(SimulationConfig::parse(fraction), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn links_must_use_configured_modes() {
        let link = |mode: &str| -> CommercialLink {
            serde_json::from_value(serde_json::json!({
                "id": 7,
                "supplier": {"kind": "firm", "id": 1},
                "buyer": {"kind": "household", "id": 1},
                "origin": 1,
                "destination": 2,
                "product": "AGR",
                "category": "domestic_B2C",
                "order": 10.0,
                "logistics_mode": mode
            }))
            .unwrap()
        };
        let config = SimulationConfig::default();
        let mut unmoded = link("domestic");
        unmoded.logistics_mode = None;
        assert!(config.validate_links(&[link("domestic"), unmoded]).is_ok());

        let err = config
            .validate_links(&[link("domestic"), link("domestc")])
            .unwrap_err();
        assert!(matches!(&err, ConfigError::Invalid { reason } if reason.contains("domestc")));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("disruptsc-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
