//! Catalog upload parsing.
//!
//! Reads a CSV or XLSX product sheet (chosen by file extension) into a full
//! product list. Parsing is all-or-nothing: any bad row rejects the whole
//! file, so a failed upload never touches the stored catalog.
//!
//! # Columns
//!
//! | Header | Required | Default |
//! |--------|----------|---------|
//! | `item_code` | yes | - |
//! | `description` | no | empty |
//! | `category` | no | `Uncategorized` |
//! | `brand` | no | none |
//! | `allow_case` | no | true |
//! | `allow_each` | no | true |
//! | `image` / `image_path` / `image_url` | no | none |
//!
//! Headers are matched case-insensitively and unrecognized columns are
//! ignored. Rows with every cell blank are skipped. When several image
//! columns are present, the first non-blank of `image`, `image_url`,
//! `image_path` is used.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader};
use thiserror::Error;

use tany_orders_core::{ItemCode, Product, ProductRow, ProductRowError};

/// Errors that reject an upload.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Neither `.csv` nor `.xlsx`.
    #[error("unsupported file type {0:?}; upload a .csv or .xlsx file")]
    UnsupportedFormat(String),

    /// The CSV could not be read.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook could not be read.
    #[error("invalid spreadsheet: {0}")]
    Spreadsheet(String),

    /// The workbook has no worksheet.
    #[error("the spreadsheet has no worksheets")]
    NoWorksheet,

    /// A required header is absent.
    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),

    /// A row could not be turned into a product.
    #[error("row {row}: {source}")]
    InvalidRow {
        /// 1-based line in the sheet, header included.
        row: usize,
        #[source]
        source: ProductRowError,
    },

    /// Two rows share an item code.
    #[error("row {row}: duplicate item_code {item_code}")]
    DuplicateItemCode { row: usize, item_code: ItemCode },
}

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl ImportFormat {
    /// Pick the format from a file name's extension.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::UnsupportedFormat` for any other extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, ImportError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(ImportError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

/// Parse an uploaded product sheet.
///
/// # Errors
///
/// Returns an `ImportError` describing the first problem found.
pub fn parse_products(file_name: &str, bytes: &[u8]) -> Result<Vec<Product>, ImportError> {
    let table = match ImportFormat::from_file_name(file_name)? {
        ImportFormat::Csv => read_csv(bytes)?,
        ImportFormat::Xlsx => read_xlsx(bytes)?,
    };
    table.into_products()
}

/// Header row plus data rows, every cell as optional text.
#[derive(Debug, Default)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

fn read_csv(bytes: &[u8]) -> Result<Table, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|cell| Some(cell.to_string()).filter(|c| !c.is_empty()))
                .collect(),
        );
    }

    Ok(Table { headers, rows })
}

fn read_xlsx(bytes: &[u8]) -> Result<Table, ImportError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)?
        .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| cell_text(cell).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(Table { headers, rows })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    item_code: usize,
    description: Option<usize>,
    brand: Option<usize>,
    category: Option<usize>,
    allow_case: Option<usize>,
    allow_each: Option<usize>,
    image: Vec<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, ImportError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Ok(Self {
            item_code: find("item_code").ok_or(ImportError::MissingColumn("item_code"))?,
            description: find("description"),
            brand: find("brand"),
            category: find("category"),
            allow_case: find("allow_case"),
            allow_each: find("allow_each"),
            image: ["image", "image_url", "image_path"]
                .into_iter()
                .filter_map(find)
                .collect(),
        })
    }

    fn row(&self, cells: &[Option<String>]) -> ProductRow {
        let cell = |index: Option<usize>| index.and_then(|i| cells.get(i).cloned().flatten());
        ProductRow {
            item_code: cell(Some(self.item_code)),
            description: cell(self.description),
            brand: cell(self.brand),
            category: cell(self.category),
            allow_case: cell(self.allow_case),
            allow_each: cell(self.allow_each),
            image: self.image.iter().find_map(|i| cell(Some(*i))),
        }
    }
}

impl Table {
    fn into_products(self) -> Result<Vec<Product>, ImportError> {
        let columns = Columns::locate(&self.headers)?;
        let mut seen = HashSet::new();
        let mut products = Vec::with_capacity(self.rows.len());

        for (index, cells) in self.rows.iter().enumerate() {
            // Line 1 is the header.
            let line = index + 2;
            let row = columns.row(cells);
            if row.is_blank() {
                continue;
            }
            let product = row
                .into_product()
                .map_err(|source| ImportError::InvalidRow { row: line, source })?;
            if !seen.insert(product.item_code.clone()) {
                return Err(ImportError::DuplicateItemCode {
                    row: line,
                    item_code: product.item_code,
                });
            }
            products.push(product);
        }

        Ok(products)
    }
}
