//! Page rendering and navigation.
//!
//! `GET /` answers with the page the session is on plus the data that page
//! shows. Every other handler that changes the page returns the same
//! [`PageView`] so a client can render straight from the response.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tany_orders_core::{
    CartLine, ItemCode, Product, UnitOfMeasure,
    catalog::{self, CatalogQuery},
    report::OrderReport,
    session::{Navigation, Page, SessionContext},
};

use crate::error::{AppError, Result};
use crate::middleware::CurrentSession;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub item_code: ItemCode,
    pub description: String,
    pub category: String,
    pub brand: Option<String>,
    pub image: Option<String>,
    pub units: Vec<UnitOfMeasure>,
    pub purchasable: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            item_code: product.item_code.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            brand: product.brand().map(String::from),
            image: product.image_src().map(String::from),
            units: product.units(),
            purchasable: product.is_purchasable(),
        }
    }
}

/// Catalog page data.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub query: CatalogQuery,
    pub categories: Vec<String>,
    pub products: Vec<ProductView>,
}

impl CatalogView {
    /// Filter `products` with `query`.
    #[must_use]
    pub fn build(products: &[Product], query: CatalogQuery) -> Self {
        Self {
            categories: catalog::categories(products),
            products: catalog::list(products, &query)
                .into_iter()
                .map(ProductView::from)
                .collect(),
            query,
        }
    }
}

/// Cart page data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub line_count: usize,
    /// A submission is awaiting confirmation.
    pub pending: bool,
}

impl From<&SessionContext> for CartView {
    fn from(ctx: &SessionContext) -> Self {
        Self {
            lines: ctx.cart().snapshot(),
            line_count: ctx.cart().len(),
            pending: ctx.checkout().is_pending(),
        }
    }
}

/// Admin dashboard data.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub report: OrderReport,
    pub products: Vec<ProductView>,
}

/// The page a session is on, with the data it shows.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardView>,
}

impl PageView {
    const fn bare(page: Page, message: Option<String>) -> Self {
        Self {
            page,
            message,
            catalog: None,
            product: None,
            cart: None,
            dashboard: None,
        }
    }
}

/// Build the view for the session's current page.
pub async fn render(state: &AppState, ctx: &SessionContext, message: Option<String>) -> PageView {
    let page = ctx.current_page();
    let mut view = PageView::bare(page, message);

    match page {
        Page::Login | Page::Signup => {}
        Page::Catalog => {
            let catalog = state
                .products()
                .read(|products| CatalogView::build(products, CatalogQuery::default()))
                .await;
            view.catalog = Some(catalog);
        }
        Page::ProductDetail => {
            let product = match ctx.selected_product() {
                Some(code) => state.products().find(code).await,
                None => None,
            };
            if product.is_none() {
                view.message.get_or_insert_with(|| "Product not found".to_string());
            }
            view.product = product.as_ref().map(ProductView::from);
        }
        Page::Cart => view.cart = Some(CartView::from(ctx)),
        Page::AdminDashboard => {
            let orders = state.orders().all().await;
            let products = state
                .products()
                .read(|products| products.iter().map(ProductView::from).collect())
                .await;
            view.dashboard = Some(DashboardView {
                report: OrderReport::from_orders(&orders),
                products,
            });
        }
    }

    view
}

// =============================================================================
// Handlers
// =============================================================================

/// Navigation form data.
#[derive(Debug, Deserialize)]
pub struct NavForm {
    pub to: Page,
    pub item_code: Option<String>,
}

impl NavForm {
    fn into_navigation(self) -> Result<Navigation> {
        match self.to {
            Page::Login => Ok(Navigation::Login),
            Page::Signup => Ok(Navigation::Signup),
            Page::Catalog => Ok(Navigation::Catalog),
            Page::Cart => Ok(Navigation::Cart),
            Page::ProductDetail => {
                let code = self.item_code.as_deref().unwrap_or_default();
                Ok(Navigation::Product(ItemCode::parse(code)?))
            }
            Page::AdminDashboard => Err(AppError::BadRequest(
                "the admin dashboard is reached by logging in".to_string(),
            )),
        }
    }
}

/// Show the current page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: CurrentSession) -> Json<PageView> {
    Json(render(&state, &session.context, None).await)
}

/// Move to another page.
///
/// # Errors
///
/// Returns 400 if the transition is not allowed for this session and 404
/// for an unknown product.
#[instrument(skip(state, session))]
pub async fn navigate(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Form(form): Form<NavForm>,
) -> Result<Json<PageView>> {
    let navigation = form.into_navigation()?;
    if let Navigation::Product(code) = &navigation {
        if state.products().find(code).await.is_none() {
            return Err(AppError::NotFound(format!("Product {code}")));
        }
    }

    session.context.navigate(navigation)?;
    session.save().await?;

    Ok(Json(render(&state, &session.context, None).await))
}
