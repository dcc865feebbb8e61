//! Order export command.
//!
//! # Usage
//!
//! ```bash
//! # Writes tany_foods_orders.csv in the current directory
//! tany-cli orders export --format csv
//!
//! tany-cli orders export --format xlsx --output /tmp/orders.xlsx
//! ```

use std::path::{Path, PathBuf};

use tracing::info;

use tany_orders_core::report::flatten_orders;
use tany_orders_server::db::Store;
use tany_orders_server::services::export::ExportFormat;

/// Write the order report under `data_dir` to `output`, or to the default
/// download file name when `output` is `None`.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns an error if the report cannot be rendered or written.
pub async fn export(
    data_dir: &Path,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let store = Store::open_dir(data_dir)?;
    let orders = store.orders.all().await;
    let rows = flatten_orders(&orders);
    let bytes = format.render(&rows)?;

    let output = output.unwrap_or_else(|| PathBuf::from(format.file_name()));
    tokio::fs::write(&output, bytes).await?;
    info!(
        path = %output.display(),
        orders = orders.len(),
        rows = rows.len(),
        "Exported orders"
    );

    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_export_without_orders_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("orders.csv");

        let written = export(&dir.path().join("data"), ExportFormat::Csv, Some(output.clone()))
            .await
            .unwrap();
        assert_eq!(written, output);

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("Order ID,Timestamp,"));
        assert_eq!(text.lines().count(), 1);
    }
}
