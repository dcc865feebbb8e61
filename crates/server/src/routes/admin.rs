//! Administrator route handlers.
//!
//! Every handler takes [`RequireAdmin`], so customers and anonymous
//! sessions get 401 before any data is read.

use axum::{
    Json,
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use tany_orders_core::report::{OrderReport, flatten_orders};

use super::pages::ProductView;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::export::ExportFormat;
use crate::services::import::parse_products;
use crate::state::AppState;

/// Multipart field holding the uploaded catalog.
const UPLOAD_FIELD: &str = "file";

/// Response to a catalog upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploaded: usize,
    pub message: String,
}

/// Flattened order report, one row per order line.
#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Json<OrderReport> {
    let orders = state.orders().all().await;
    Json(OrderReport::from_orders(&orders))
}

/// Download the order report as CSV.
///
/// # Errors
///
/// Returns 500 if the report cannot be written.
#[instrument(skip(state))]
pub async fn export_csv(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Response> {
    export(&state, ExportFormat::Csv).await
}

/// Download the order report as XLSX.
///
/// # Errors
///
/// Returns 500 if the workbook cannot be written.
#[instrument(skip(state))]
pub async fn export_xlsx(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Response> {
    export(&state, ExportFormat::Xlsx).await
}

async fn export(state: &AppState, format: ExportFormat) -> Result<Response> {
    let orders = state.orders().all().await;
    let rows = flatten_orders(&orders);
    let bytes = format.render(&rows)?;
    tracing::info!(
        format = format.extension(),
        orders = orders.len(),
        rows = rows.len(),
        "Exported orders"
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.file_name()),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// The current catalog.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Json<Vec<ProductView>> {
    let products = state
        .products()
        .read(|products| products.iter().map(ProductView::from).collect())
        .await;
    Json(products)
}

/// Replace the catalog with an uploaded CSV or XLSX file.
///
/// The file is parsed in full before anything is written; a rejected file
/// leaves the stored catalog unchanged.
///
/// # Errors
///
/// Returns 400 if the `file` field is missing or the file cannot be parsed,
/// and 500 if the catalog cannot be written.
#[instrument(skip(state, multipart))]
pub async fn upload_products(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let (file_name, bytes) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
            .ok_or_else(|| AppError::BadRequest("Please choose a file to upload".to_string()))?;
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        break (file_name, bytes);
    };

    let products = parse_products(&file_name, &bytes)?;
    let uploaded = state.products().replace_all(products).await?;
    tracing::info!(%file_name, uploaded, "Catalog replaced");

    Ok(Json(UploadResponse {
        uploaded,
        message: format!("Uploaded {uploaded} products successfully!"),
    }))
}
