//! Order submission route handlers (customers only).
//!
//! Submitting is a two-step gate: `request` moves the session to
//! pending confirmation, `confirm` stores the order and clears the cart,
//! `cancel` backs out with the cart untouched.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use tany_orders_core::{Order, OrderId, SubmissionId, checkout::CheckoutError};

use super::pages::CartView;
use crate::db::RepositoryError;
use crate::error::Result;
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Response to a submit request.
#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub message: String,
    pub submission_id: SubmissionId,
    pub cart: CartView,
}

/// Response to a confirmed submission.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub message: String,
    pub order_id: OrderId,
    pub order: Order,
}

/// Response to a cancelled submission.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
    pub cart: CartView,
}

/// Ask to submit the cart.
///
/// # Errors
///
/// Returns 409 if the cart is empty.
#[instrument(skip(session))]
pub async fn request(mut session: CurrentSession) -> Result<Json<RequestResponse>> {
    let submission_id = session.context.request_submit()?;
    session.save().await?;

    Ok(Json(RequestResponse {
        message: "Are you sure you want to submit this order?".to_string(),
        submission_id,
        cart: CartView::from(&session.context),
    }))
}

/// Store the pending order and clear the cart.
///
/// The order is written before the cart is cleared, so a failed write
/// leaves the cart for a retry. A repeated confirmation of an already
/// stored submission clears the cart and answers with an empty-cart error
/// instead of storing a second order.
///
/// # Errors
///
/// Returns 400 without a pending submission, 409 for an empty cart, and 500
/// if the order cannot be stored.
#[instrument(skip(state, session))]
pub async fn confirm(
    State(state): State<AppState>,
    mut session: CurrentSession,
) -> Result<Json<ConfirmResponse>> {
    let draft = session.context.prepare_submit()?;

    let order = match state.orders().append(draft, Utc::now()).await {
        Ok(order) => order,
        Err(RepositoryError::DuplicateSubmission(submission_id)) => {
            tracing::warn!(%submission_id, "Submission already stored");
            session.context.complete_submit();
            session.save().await?;
            return Err(CheckoutError::EmptyCart.into());
        }
        Err(e) => return Err(e.into()),
    };

    session.context.complete_submit();
    session.save().await?;
    tracing::info!(
        order_id = %order.order_id,
        email = %order.email,
        lines = order.items.len(),
        "Order submitted"
    );

    Ok(Json(ConfirmResponse {
        message: format!("Order {} submitted successfully!", order.order_id),
        order_id: order.order_id.clone(),
        order,
    }))
}

/// Back out of a pending submission.
///
/// # Errors
///
/// Returns 400 without a pending submission.
#[instrument(skip(session))]
pub async fn cancel(mut session: CurrentSession) -> Result<Json<CancelResponse>> {
    session.context.cancel_submit()?;
    session.save().await?;

    Ok(Json(CancelResponse {
        message: "Submission cancelled".to_string(),
        cart: CartView::from(&session.context),
    }))
}
