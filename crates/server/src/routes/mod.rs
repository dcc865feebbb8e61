//! HTTP route handlers.
//!
//! Request bodies are form-encoded (multipart for the catalog upload);
//! responses are JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//! GET  /                           - Current page for this session
//! POST /nav                        - Page navigation
//!
//! # Auth
//! POST /auth/signup                - Register a customer
//! POST /auth/login                 - Customer login
//! POST /auth/admin/login           - Administrator login
//! POST /auth/logout                - Logout
//!
//! # Catalog (customer)
//! GET  /catalog?q=&category=       - Filtered product list
//! GET  /catalog/categories         - Distinct categories
//! GET  /catalog/{item_code}        - Product detail (selects the product)
//!
//! # Cart (customer)
//! GET  /cart                       - Cart view
//! POST /cart/add                   - Add a line
//! POST /cart/update                - Change a line's quantity
//! POST /cart/remove                - Remove a line
//!
//! # Checkout (customer)
//! POST /checkout/request           - Ask to submit the cart
//! POST /checkout/confirm           - Store the order
//! POST /checkout/cancel            - Back out
//!
//! # Admin
//! GET  /admin/orders               - Flattened order report
//! GET  /admin/orders/export.csv    - CSV download
//! GET  /admin/orders/export.xlsx   - XLSX download
//! GET  /admin/products             - Current catalog
//! POST /admin/products/upload      - Replace the catalog (multipart `file`)
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod pages;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Largest accepted catalog upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::show))
        .route("/nav", post(pages::navigate))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/admin/login", post(auth::admin_login))
        .route("/auth/logout", post(auth::logout))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::index))
        .route("/catalog/categories", get(catalog::categories))
        .route("/catalog/{item_code}", get(catalog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout/request", post(checkout::request))
        .route("/checkout/confirm", post(checkout::confirm))
        .route("/checkout/cancel", post(checkout::cancel))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/orders", get(admin::orders))
        .route("/admin/orders/export.csv", get(admin::export_csv))
        .route("/admin/orders/export.xlsx", get(admin::export_xlsx))
        .route("/admin/products", get(admin::products))
        .route(
            "/admin/products/upload",
            post(admin::upload_products).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(cart_routes())
        .merge(checkout_routes())
        .merge(admin_routes())
}
