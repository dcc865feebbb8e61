//! Catalog import command.
//!
//! # Usage
//!
//! ```bash
//! tany-cli products import catalog.xlsx
//! tany-cli --data-dir /srv/tany/data products import catalog.csv
//! ```
//!
//! Uses the same parser as the upload endpoint: the file is read in full and
//! any bad row rejects it without touching `products.json`. Run it while the
//! server is stopped; a running server keeps its own copy of the catalog.

use std::path::Path;

use tracing::info;

use tany_orders_server::db::Store;
use tany_orders_server::services::import::parse_products;

/// Replace the catalog under `data_dir` with the products in `file`.
///
/// Returns the number of products stored.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the catalog
/// cannot be written.
pub async fn import(data_dir: &Path, file: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(file).await?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let products = parse_products(file_name, &bytes)?;
    info!(path = %file.display(), products = products.len(), "Parsed catalog");

    let store = Store::open_dir(data_dir)?;
    let stored = store.products.replace_all(products).await?;
    info!(data_dir = %data_dir.display(), stored, "Catalog replaced");

    Ok(stored)
}
