//! Enumeration types for the `DisruptSC` simulation.
//!
//! Every enum that is read from configuration or input tables implements
//! [`FromStr`] with the same spelling as its serde representation, so a
//! typo in a criterion or flow category is caught once, at setup time.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport modes
// ---------------------------------------------------------------------------

/// Physical type of a transport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    /// Road segment.
    #[serde(rename = "road", alias = "roads")]
    Road,
    /// Railway segment.
    #[serde(rename = "railways")]
    Railways,
    /// Inland waterway segment.
    #[serde(rename = "waterways")]
    Waterways,
    /// Maritime shipping lane.
    #[serde(rename = "maritime")]
    Maritime,
    /// Air freight link.
    #[serde(rename = "airways")]
    Airways,
    /// Transfer between two modes (port, airport, rail terminal).
    #[serde(rename = "multimodal")]
    Multimodal,
    /// Non-physical connector; never carries cost, congestion or capacity.
    #[serde(rename = "virtual")]
    Virtual,
}

impl TransportMode {
    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Road => "road",
            Self::Railways => "railways",
            Self::Waterways => "waterways",
            Self::Maritime => "maritime",
            Self::Airways => "airways",
            Self::Multimodal => "multimodal",
            Self::Virtual => "virtual",
        }
    }

    /// Whether this edge type is excluded from cost, congestion and
    /// capacity accounting.
    pub const fn is_virtual(self) -> bool {
        matches!(self, Self::Virtual)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "road" | "roads" => Ok(Self::Road),
            "railways" => Ok(Self::Railways),
            "waterways" => Ok(Self::Waterways),
            "maritime" => Ok(Self::Maritime),
            "airways" => Ok(Self::Airways),
            "multimodal" => Ok(Self::Multimodal),
            "virtual" => Ok(Self::Virtual),
            other => Err(ParseEnumError::new("transport mode", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Commercial flows
// ---------------------------------------------------------------------------

/// Category of a commercial flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlowCategory {
    /// Firm to firm, both inside the country.
    #[serde(rename = "domestic_B2B")]
    DomesticB2B,
    /// Firm to household, inside the country.
    #[serde(rename = "domestic_B2C")]
    DomesticB2C,
    /// Foreign country to domestic buyer.
    #[serde(rename = "import")]
    Import,
    /// Domestic firm to foreign country.
    #[serde(rename = "export")]
    Export,
    /// Foreign country to foreign country, through the network.
    #[serde(rename = "transit")]
    Transit,
}

impl FlowCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::DomesticB2B,
        Self::DomesticB2C,
        Self::Import,
        Self::Export,
        Self::Transit,
    ];

    /// Canonical name, as used in configuration and exports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DomesticB2B => "domestic_B2B",
            Self::DomesticB2C => "domestic_B2C",
            Self::Import => "import",
            Self::Export => "export",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for FlowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("flow category", s))
    }
}

/// Which of its two routes a commercial link currently ships on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteChoice {
    /// The route chosen at initialisation.
    Main,
    /// The fallback route chosen after a disruption.
    Alternative,
}

// ---------------------------------------------------------------------------
// Edge attributes
// ---------------------------------------------------------------------------

/// Edge cost attribute minimised when choosing routes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationCriterion {
    /// Monetary cost per ton transported.
    #[default]
    CostPerTon,
    /// Travel time.
    TravelTime,
    /// Monetised travel time.
    TimeCost,
    /// Monetised travel time, congestion-sensitive part.
    CostTravelTime,
    /// Monetised travel-time variability.
    CostVariability,
    /// Aggregate generalised cost.
    AggCost,
}

impl OptimizationCriterion {
    /// Canonical snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CostPerTon => "cost_per_ton",
            Self::TravelTime => "travel_time",
            Self::TimeCost => "time_cost",
            Self::CostTravelTime => "cost_travel_time",
            Self::CostVariability => "cost_variability",
            Self::AggCost => "agg_cost",
        }
    }
}

impl fmt::Display for OptimizationCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizationCriterion {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cost_per_ton" => Ok(Self::CostPerTon),
            "travel_time" => Ok(Self::TravelTime),
            "time_cost" => Ok(Self::TimeCost),
            "cost_travel_time" => Ok(Self::CostTravelTime),
            "cost_variability" => Ok(Self::CostVariability),
            "agg_cost" => Ok(Self::AggCost),
            other => Err(ParseEnumError::new("optimization criterion", other)),
        }
    }
}

/// Numeric edge attribute that can be summed along a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeAttribute {
    /// Length in kilometres.
    Km,
    /// Capacity in tons per time step.
    Capacity,
    /// One of the cost criteria.
    Cost(OptimizationCriterion),
    /// Tons loaded during the current time step.
    CurrentLoad,
    /// Base routing weight.
    Weight,
    /// Routing weight including capacity burdens.
    CapacityWeight,
    /// Current congestion level.
    Congestion,
    /// Traffic evaluated at the current time step.
    TrafficCurrent,
    /// Traffic evaluated at the initial equilibrium.
    TrafficNormal,
}

impl fmt::Display for EdgeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Km => f.write_str("km"),
            Self::Capacity => f.write_str("capacity"),
            Self::Cost(criterion) => f.write_str(criterion.as_str()),
            Self::CurrentLoad => f.write_str("current_load"),
            Self::Weight => f.write_str("weight"),
            Self::CapacityWeight => f.write_str("capacity_weight"),
            Self::Congestion => f.write_str("congestion"),
            Self::TrafficCurrent => f.write_str("traffic_current"),
            Self::TrafficNormal => f.write_str("traffic_normal"),
        }
    }
}

impl From<OptimizationCriterion> for EdgeAttribute {
    fn from(criterion: OptimizationCriterion) -> Self {
        Self::Cost(criterion)
    }
}

impl FromStr for EdgeAttribute {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "km" => Ok(Self::Km),
            "capacity" => Ok(Self::Capacity),
            "current_load" => Ok(Self::CurrentLoad),
            "weight" => Ok(Self::Weight),
            "capacity_weight" => Ok(Self::CapacityWeight),
            "congestion" => Ok(Self::Congestion),
            "traffic_current" => Ok(Self::TrafficCurrent),
            "traffic_normal" => Ok(Self::TrafficNormal),
            other => other
                .parse::<OptimizationCriterion>()
                .map(Self::Cost)
                .map_err(|_err| ParseEnumError::new("edge attribute", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Real-world duration represented by one time step.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeResolution {
    /// One day per step.
    Day,
    /// One week per step.
    #[default]
    Week,
    /// One month per step.
    Month,
    /// One year per step.
    Year,
}

impl fmt::Display for TimeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_mode_accepts_plural_road() {
        assert_eq!("roads".parse::<TransportMode>().ok(), Some(TransportMode::Road));
        let parsed: Result<TransportMode, _> = serde_json::from_str("\"roads\"");
        assert_eq!(parsed.ok(), Some(TransportMode::Road));
        assert!("teleport".parse::<TransportMode>().is_err());
    }

    #[test]
    fn flow_category_round_trips_through_names() {
        for category in FlowCategory::ALL {
            assert_eq!(category.as_str().parse::<FlowCategory>().ok(), Some(category));
        }
        assert!("domestic_b2b".parse::<FlowCategory>().is_err());
    }

    #[test]
    fn edge_attribute_parses_cost_criteria() {
        assert_eq!(
            "cost_per_ton".parse::<EdgeAttribute>().ok(),
            Some(EdgeAttribute::Cost(OptimizationCriterion::CostPerTon))
        );
        assert_eq!("km".parse::<EdgeAttribute>().ok(), Some(EdgeAttribute::Km));
        let err = "speed".parse::<EdgeAttribute>();
        assert_eq!(
            err.err().map(|e| e.to_string()),
            Some("unknown edge attribute: \"speed\"".to_owned())
        );
    }

    #[test]
    fn criterion_serde_is_snake_case() {
        let json = serde_json::to_string(&OptimizationCriterion::AggCost).ok();
        assert_eq!(json.as_deref(), Some("\"agg_cost\""));
    }
}
