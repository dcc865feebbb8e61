//! Flat order report: one row per order line.
//!
//! The same rows feed the admin dashboard, the CSV export and the XLSX
//! export, so all three agree on columns and ordering.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Order, UnitOfMeasure};

/// Column headers, in export order.
pub const REPORT_COLUMNS: [&str; 9] = [
    "Order ID",
    "Timestamp",
    "Customer Name",
    "Company Name",
    "Email",
    "Item Code",
    "Description",
    "Quantity",
    "UOM",
];

/// Timestamp format used in reports (UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Base name for exported report files.
pub const REPORT_FILE_STEM: &str = "tany_foods_orders";

/// Format a timestamp the way reports show it.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// One order line with its order's header fields repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReportRow {
    pub order_id: String,
    pub timestamp: String,
    pub customer_name: String,
    pub company_name: String,
    pub email: String,
    pub item_code: String,
    pub description: String,
    pub quantity: u32,
    pub uom: UnitOfMeasure,
}

impl OrderReportRow {
    /// Cell values as text, matching [`REPORT_COLUMNS`].
    #[must_use]
    pub fn to_record(&self) -> [String; 9] {
        [
            self.order_id.clone(),
            self.timestamp.clone(),
            self.customer_name.clone(),
            self.company_name.clone(),
            self.email.clone(),
            self.item_code.clone(),
            self.description.clone(),
            self.quantity.to_string(),
            self.uom.to_string(),
        ]
    }
}

/// Flatten orders into rows, keeping order-then-line order.
#[must_use]
pub fn flatten_orders(orders: &[Order]) -> Vec<OrderReportRow> {
    orders
        .iter()
        .flat_map(|order| {
            let timestamp = format_timestamp(&order.timestamp);
            order.items.iter().map(move |line| OrderReportRow {
                order_id: order.order_id.to_string(),
                timestamp: timestamp.clone(),
                customer_name: order.customer_name.clone(),
                company_name: order.company_name.clone(),
                email: order.email.to_string(),
                item_code: line.item_code.to_string(),
                description: line.description.clone(),
                quantity: line.quantity.get(),
                uom: line.unit_of_measure,
            })
        })
        .collect()
}

/// Admin dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    pub total_orders: usize,
    pub rows: Vec<OrderReportRow>,
}

impl OrderReport {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        Self {
            total_orders: orders.len(),
            rows: flatten_orders(orders),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::{CartLine, Email, ItemCode, Quantity};

    fn line(code: &str, quantity: i64, unit: UnitOfMeasure) -> CartLine {
        CartLine {
            item_code: ItemCode::parse(code).unwrap(),
            description: format!("{code} description"),
            brand: String::new(),
            unit_of_measure: unit,
            quantity: Quantity::new(quantity).unwrap(),
        }
    }

    fn order(id: &str, items: Vec<CartLine>) -> Order {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        Order {
            order_id: serde_json::from_value(serde_json::json!(id)).unwrap(),
            timestamp,
            customer_name: "Ann Lee".to_string(),
            company_name: "Acme".to_string(),
            email: Email::parse("ann@acme.com").unwrap(),
            items,
            submission_id: None,
        }
    }

    #[test]
    fn test_flatten_one_row_per_line() {
        let orders = vec![
            order(
                "ORD-1",
                vec![
                    line("SKU1", 3, UnitOfMeasure::Case),
                    line("SKU2", 1, UnitOfMeasure::Each),
                ],
            ),
            order("ORD-2", vec![line("SKU3", 5, UnitOfMeasure::Each)]),
        ];
        let rows = flatten_orders(&orders);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].order_id, "ORD-1");
        assert_eq!(rows[1].item_code, "SKU2");
        assert_eq!(rows[2].order_id, "ORD-2");
        assert_eq!(rows[0].timestamp, "2024-03-05 14:07:09");
    }

    #[test]
    fn test_record_matches_columns() {
        let rows = flatten_orders(&[order("ORD-1", vec![line("SKU1", 3, UnitOfMeasure::Case)])]);
        let record = rows[0].to_record();
        assert_eq!(record.len(), REPORT_COLUMNS.len());
        assert_eq!(record[4], "ann@acme.com");
        assert_eq!(record[7], "3");
        assert_eq!(record[8], "Case");
    }

    #[test]
    fn test_report_counts_orders_not_lines() {
        let report = OrderReport::from_orders(&[
            order("ORD-1", vec![line("A", 1, UnitOfMeasure::Each), line("B", 1, UnitOfMeasure::Each)]),
            order("ORD-2", vec![]),
        ]);
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.rows.len(), 2);
    }
}
