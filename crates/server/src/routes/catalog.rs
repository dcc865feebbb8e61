//! Catalog route handlers (customers only).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use tany_orders_core::{ItemCode, catalog, catalog::CatalogQuery, session::Navigation};

use super::pages::{CatalogView, ProductView};
use crate::error::{AppError, Result};
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// List products, filtered by `q` and `category`.
///
/// # Errors
///
/// Returns 401 unless a customer is signed in.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogView>> {
    session.context.customer()?;

    let view = state
        .products()
        .read(|products| CatalogView::build(products, query))
        .await;
    Ok(Json(view))
}

/// Distinct product categories, sorted.
///
/// # Errors
///
/// Returns 401 unless a customer is signed in.
#[instrument(skip(state, session))]
pub async fn categories(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<String>>> {
    session.context.customer()?;

    Ok(Json(state.products().read(catalog::categories).await))
}

/// Select a product and show its detail page.
///
/// # Errors
///
/// Returns 401 unless a customer is signed in and 404 for an unknown item code.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Path(item_code): Path<String>,
) -> Result<Json<ProductView>> {
    session.context.customer()?;

    let code = ItemCode::parse(&item_code)?;
    let product = state
        .products()
        .find(&code)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Product {code}")))?;

    session.context.navigate(Navigation::Product(code))?;
    session.save().await?;

    Ok(Json(ProductView::from(&product)))
}
