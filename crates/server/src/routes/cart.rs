//! Cart route handlers (customers only).
//!
//! The cart lives in the session context; every change is saved back to
//! the session before the response is sent.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tany_orders_core::{ItemCode, UnitOfMeasure};

use super::pages::CartView;
use crate::error::{AppError, Result};
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_code: String,
    pub uom: String,
    pub quantity: i64,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_code: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_code: String,
}

/// Cart response with a status message.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: String,
    pub cart: CartView,
}

/// Display the cart.
///
/// # Errors
///
/// Returns 401 unless a customer is signed in.
#[instrument(skip(session))]
pub async fn show(session: CurrentSession) -> Result<Json<CartView>> {
    session.context.customer()?;
    Ok(Json(CartView::from(&session.context)))
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns 404 for an unknown product, 400 for a bad unit or quantity, and
/// 409 if the product is already in the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartResponse>> {
    session.context.customer()?;

    let code = ItemCode::parse(&form.item_code)?;
    let unit: UnitOfMeasure = form.uom.parse()?;
    let product = state
        .products()
        .find(&code)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Product {code}")))?;

    let line = session
        .context
        .cart_mut()?
        .add(&product, unit, form.quantity)?;
    session.save().await?;
    tracing::debug!(item_code = %line.item_code, quantity = %line.quantity, "Added to cart");

    Ok(Json(CartResponse {
        message: "Added to cart!".to_string(),
        cart: CartView::from(&session.context),
    }))
}

/// Change a line's quantity.
///
/// # Errors
///
/// Returns 400 for a quantity below 1 and 404 if the line is not in the cart.
#[instrument(skip(session))]
pub async fn update(
    mut session: CurrentSession,
    Form(form): Form<UpdateCartForm>,
) -> Result<Json<CartResponse>> {
    let code = ItemCode::parse(&form.item_code)?;
    session
        .context
        .cart_mut()?
        .set_quantity(&code, form.quantity)?;
    session.save().await?;

    Ok(Json(CartResponse {
        message: "Cart updated".to_string(),
        cart: CartView::from(&session.context),
    }))
}

/// Remove a line. Removing a line that is not in the cart changes nothing.
///
/// # Errors
///
/// Returns 401 unless a customer is signed in.
#[instrument(skip(session))]
pub async fn remove(
    mut session: CurrentSession,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<CartResponse>> {
    let code = ItemCode::parse(&form.item_code)?;
    let removed = session.context.cart_mut()?.remove(&code);
    if removed.is_some() {
        session.save().await?;
    }

    Ok(Json(CartResponse {
        message: "Item removed".to_string(),
        cart: CartView::from(&session.context),
    }))
}
