//! Cart lines, quantities and submitted orders.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{ItemCode, OrderId, SubmissionId};
use super::unit::UnitOfMeasure;
use super::user::CustomerProfile;

/// Error returned for a quantity below one.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("quantity must be at least 1 (got {0})")]
pub struct InvalidQuantity(pub i64);

/// A line quantity; always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest valid quantity.
    pub const ONE: Self = Self(1);

    /// Validate a quantity coming from user input.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidQuantity`] if `value` is below one or does not fit a `u32`.
    pub fn new(value: i64) -> Result<Self, InvalidQuantity> {
        match u32::try_from(value) {
            Ok(n) if n >= 1 => Ok(Self(n)),
            _ => Err(InvalidQuantity(value)),
        }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = InvalidQuantity;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product entry in a cart, and later in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_code: ItemCode,
    pub description: String,
    #[serde(default)]
    pub brand: String,
    #[serde(rename = "uom")]
    pub unit_of_measure: UnitOfMeasure,
    pub quantity: Quantity,
}

/// A submitted order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub customer_name: String,
    pub company_name: String,
    pub email: Email,
    pub items: Vec<CartLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<SubmissionId>,
}

/// Accepts RFC 3339 as well as the older `YYYY-MM-DD HH:MM:SS` form, read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// Everything an order needs except the id and timestamp, which the order
/// store assigns when it appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub customer: CustomerProfile,
    pub items: Vec<CartLine>,
    pub submission_id: SubmissionId,
}

impl OrderDraft {
    /// Stamp the draft into an [`Order`].
    #[must_use]
    pub fn into_order(self, order_id: OrderId, timestamp: DateTime<Utc>) -> Order {
        Order {
            order_id,
            timestamp,
            customer_name: self.customer.full_name(),
            company_name: self.customer.company_name,
            email: self.customer.email,
            items: self.items,
            submission_id: Some(self.submission_id),
        }
    }
}
