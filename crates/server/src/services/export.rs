//! Order report export.
//!
//! Both formats carry the same header row ([`REPORT_COLUMNS`]) followed by
//! one row per order line.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use tany_orders_core::report::{OrderReportRow, REPORT_COLUMNS, REPORT_FILE_STEM};

/// Worksheet name used in the XLSX export.
pub const SHEET_NAME: &str = "Orders";

/// Errors that can occur while building an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown export format {0:?}; expected csv or xlsx")]
    UnknownFormat(String),

    #[error("too many rows for one worksheet")]
    TooManyRows,
}

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Download file name, e.g. `tany_foods_orders.csv`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{REPORT_FILE_STEM}.{}", self.extension())
    }

    /// Render `rows` in this format.
    ///
    /// # Errors
    ///
    /// Returns an `ExportError` if the writer fails.
    pub fn render(self, rows: &[OrderReportRow]) -> Result<Vec<u8>, ExportError> {
        match self {
            Self::Csv => to_csv(rows),
            Self::Xlsx => to_xlsx(rows),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// CSV bytes, header row first.
///
/// # Errors
///
/// Returns an `ExportError` if writing fails.
pub fn to_csv(rows: &[OrderReportRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// XLSX bytes with a single `Orders` sheet.
///
/// # Errors
///
/// Returns an `ExportError` if writing fails.
pub fn to_xlsx(rows: &[OrderReportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(REPORT_COLUMNS) {
        sheet.write_string_with_format(0, col, header, &bold)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = u32::try_from(index + 1).map_err(|_| ExportError::TooManyRows)?;
        sheet.write_string(line, 0, &row.order_id)?;
        sheet.write_string(line, 1, &row.timestamp)?;
        sheet.write_string(line, 2, &row.customer_name)?;
        sheet.write_string(line, 3, &row.company_name)?;
        sheet.write_string(line, 4, &row.email)?;
        sheet.write_string(line, 5, &row.item_code)?;
        sheet.write_string(line, 6, &row.description)?;
        sheet.write_number(line, 7, f64::from(row.quantity))?;
        sheet.write_string(line, 8, row.uom.as_str())?;
    }
    sheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader};
    use tany_orders_core::UnitOfMeasure;

    use super::*;

    fn row() -> OrderReportRow {
        OrderReportRow {
            order_id: "ORD-20240305140709-1A2B3C4D".to_string(),
            timestamp: "2024-03-05 14:07:09".to_string(),
            customer_name: "Ann Lee".to_string(),
            company_name: "Acme, Inc.".to_string(),
            email: "ann@acme.com".to_string(),
            item_code: "SKU1".to_string(),
            description: "Rice 5kg".to_string(),
            quantity: 3,
            uom: UnitOfMeasure::Case,
        }
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ExportFormat::Csv.file_name(), "tany_foods_orders.csv");
        assert_eq!(ExportFormat::Xlsx.file_name(), "tany_foods_orders.xlsx");
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_csv_export() {
        let text = String::from_utf8(to_csv(&[row()]).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Order ID,Timestamp,Customer Name,Company Name,Email,Item Code,Description,Quantity,UOM"
        );
        assert_eq!(
            lines.next().unwrap(),
            "ORD-20240305140709-1A2B3C4D,2024-03-05 14:07:09,Ann Lee,\"Acme, Inc.\",ann@acme.com,SKU1,Rice 5kg,3,Case"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_export_empty_has_header() {
        let text = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_xlsx_export() {
        let bytes = to_xlsx(&[row()]).unwrap();
        let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Data::String("Order ID".to_string()));
        assert_eq!(rows[0][8], Data::String("UOM".to_string()));
        assert_eq!(rows[1][3], Data::String("Acme, Inc.".to_string()));
        assert_eq!(rows[1][7], Data::Float(3.0));
    }
}
