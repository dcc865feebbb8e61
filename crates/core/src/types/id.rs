//! Newtype identifiers for type-safe entity references.
//!
//! Use the `define_code!` macro to create string-backed identifier wrappers
//! that prevent accidentally mixing item codes and order ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a type-safe, string-backed identifier.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - `as_str()`, `Display` and `AsRef<str>`
///
/// Construction is left to the caller so each type can enforce its own rules.
///
/// # Example
///
/// ```rust
/// # use tany_orders_core::define_code;
/// define_code!(WarehouseCode);
/// ```
#[macro_export]
macro_rules! define_code {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_code!(ItemCode);
define_code!(OrderId);

/// Error returned when an item code is blank.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("item code cannot be empty")]
pub struct EmptyItemCode;

impl ItemCode {
    /// Parse an item code, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyItemCode`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, EmptyItemCode> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyItemCode);
        }
        Ok(Self(s.to_owned()))
    }
}

impl std::str::FromStr for ItemCode {
    type Err = EmptyItemCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl OrderId {
    /// Prefix shared by every order id.
    pub const PREFIX: &'static str = "ORD";

    /// Generate an order id from the submission time plus 32 random bits.
    ///
    /// The timestamp keeps ids human-sortable like the legacy
    /// `ORD-YYYYMMDDHHMMSS` format; the random suffix keeps two submissions in
    /// the same second apart. Callers that need a hard guarantee re-generate
    /// while holding the order collection lock.
    #[must_use]
    pub fn generate(at: DateTime<Utc>) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        let suffix = random.get(..8).unwrap_or(&random);
        Self(format!(
            "{}-{}-{}",
            Self::PREFIX,
            at.format("%Y%m%d%H%M%S"),
            suffix.to_uppercase()
        ))
    }
}

/// Identifier minted when a customer asks to submit their cart.
///
/// It travels with the pending confirmation and is stored on the resulting
/// order, so a repeated confirm for the same submission is recognisable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    /// Create a fresh random submission id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_item_code_trims() {
        assert_eq!(ItemCode::parse("  SKU1 ").unwrap().as_str(), "SKU1");
        assert_eq!(ItemCode::parse("   "), Err(EmptyItemCode));
    }

    #[test]
    fn test_order_id_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 5).unwrap();
        let id = OrderId::generate(at);
        let s = id.as_str();
        assert!(s.starts_with("ORD-20261019083005-"), "{s}");
        assert_eq!(s.len(), "ORD-20261019083005-".len() + 8);
    }

    #[test]
    fn test_order_ids_in_same_second_differ() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 5).unwrap();
        let ids: std::collections::HashSet<_> = (0..64).map(|_| OrderId::generate(at)).collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn test_submission_ids_are_unique() {
        assert_ne!(SubmissionId::new(), SubmissionId::new());
    }
}
