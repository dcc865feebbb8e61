//! Authentication route handlers.
//!
//! Customers register and log in with email and password; the administrator
//! logs in with the configured username and password. A successful login
//! issues a new session id and replaces the whole session context.

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use tany_orders_core::Registration;

use super::pages::{PageView, render};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Customer login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Admin login form data.
#[derive(Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Register a customer account.
///
/// On success the session moves to the login page; the new customer is not
/// signed in.
///
/// # Errors
///
/// Returns 400 for missing fields, mismatched passwords or a malformed
/// email, and 409 if the email is already registered.
#[instrument(skip(state, session, form))]
pub async fn signup(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Form(form): Form<Registration>,
) -> Result<Json<PageView>> {
    let profile = state.auth().signup(form).await?;
    tracing::info!(email = %profile.email, "Customer registered");

    session.context.signed_up();
    session.save().await?;

    let message = "Account created successfully! Please log in.".to_string();
    Ok(Json(render(&state, &session.context, Some(message)).await))
}

/// Log a customer in and show the catalog.
///
/// # Errors
///
/// Returns 404 for an unknown email and 401 for a wrong password.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Form(form): Form<LoginForm>,
) -> Result<Json<PageView>> {
    let profile = state.auth().login(&form.email, &form.password).await?;
    set_sentry_user(&profile.email, Some(profile.email.as_str()));
    tracing::info!(email = %profile.email, "Customer logged in");

    let welcome = format!("Welcome, {}!", profile.first_name);
    session.cycle_id().await?;
    session.context.sign_in_customer(profile);
    session.save().await?;

    Ok(Json(render(&state, &session.context, Some(welcome)).await))
}

/// Log the administrator in and show the dashboard.
///
/// # Errors
///
/// Returns 401 unless both the username and the password match.
#[instrument(skip(state, session, form))]
pub async fn admin_login(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Form(form): Form<AdminLoginForm>,
) -> Result<Json<PageView>> {
    let username = state.auth().login_admin(&form.username, &form.password)?;
    set_sentry_user(&username, None);
    tracing::info!(%username, "Administrator logged in");

    session.cycle_id().await?;
    session.context.sign_in_admin(username);
    session.save().await?;

    Ok(Json(render(&state, &session.context, None).await))
}

/// Log out, dropping the cart and any pending submission.
///
/// # Errors
///
/// Returns 500 if the session store fails.
#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    mut session: CurrentSession,
) -> Result<Json<PageView>> {
    session.context.logout();
    session.save().await?;
    clear_sentry_user();

    let message = "You have been logged out.".to_string();
    Ok(Json(render(&state, &session.context, Some(message)).await))
}
