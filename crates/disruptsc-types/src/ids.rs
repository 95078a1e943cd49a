//! Type-safe identifier wrappers.
//!
//! Transport nodes, edges, firms, households and commercial links are all
//! numbered by the input tables, so their identifiers wrap a `u64`. Each
//! entity kind gets its own newtype to prevent accidental mixing of
//! identifiers at compile time. Countries are identified by their trade
//! code and simulation runs by a time-ordered UUID.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around a `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create an identifier from its raw value.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner raw value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a transport node (vertex of the transport graph).
    NodeId
}

define_id! {
    /// Identifier of a transport edge, as given by the edge table.
    EdgeId
}

define_id! {
    /// Identifier of a commercial link (buyer-supplier relationship).
    CommercialLinkId
}

define_id! {
    /// Identifier of a firm.
    FirmId
}

define_id! {
    /// Identifier of a household.
    HouseholdId
}

/// Trade code of a foreign country (e.g. `"CHN"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(pub String);

impl CountryCode {
    /// Create a country code from any string-like value.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl core::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sector (product type) code, e.g. `"AGR"` or `"MAN"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sector(pub String);

impl Sector {
    /// Create a sector code from any string-like value.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the sector code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Sector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of one simulation run (UUID v7, time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_raw_value() {
        assert_eq!(NodeId::new(42).to_string(), "42");
        assert_eq!(EdgeId::from(7).into_inner(), 7);
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&NodeId::new(3)).ok();
        assert_eq!(json.as_deref(), Some("3"));
        let sector: Result<Sector, _> = serde_json::from_str("\"AGR\"");
        assert_eq!(sector.ok(), Some(Sector::new("AGR")));
    }

    #[test]
    fn run_ids_are_distinct() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
