//! Unit of measure a product can be purchased in.

use serde::{Deserialize, Serialize};

/// Purchasing granularity for a product.
///
/// Serialized as `"Case"` / `"Each"`, the spelling used in the order report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitOfMeasure {
    /// A full case.
    Case,
    /// A single unit.
    Each,
}

impl UnitOfMeasure {
    /// All units, in the order they are offered to the customer.
    pub const ALL: [Self; 2] = [Self::Case, Self::Each];

    /// Display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Case => "Case",
            Self::Each => "Each",
        }
    }
}

impl std::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised unit of measure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid unit of measure: {0} (expected Case or Each)")]
pub struct InvalidUnit(pub String);

impl std::str::FromStr for UnitOfMeasure {
    type Err = InvalidUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "case" => Ok(Self::Case),
            "each" => Ok(Self::Each),
            _ => Err(InvalidUnit(s.to_string())),
        }
    }
}
