//! Per-session context and page router.
//!
//! A [`SessionContext`] holds everything that belongs to one browser session:
//! who is signed in, which page they are on, the selected product, the cart
//! and the submission state. It is stored in the session store between
//! requests and handed to every handler explicitly.
//!
//! Page changes go through [`SessionContext::navigate`], which consults the
//! transition table for the current actor:
//!
//! | Actor     | Allowed destinations                |
//! |-----------|-------------------------------------|
//! | Anonymous | Login, Signup                       |
//! | Customer  | Catalog, Cart, ProductDetail(code)  |
//! | Admin     | none (the dashboard is fixed)       |

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::checkout::{CheckoutError, CheckoutState};
use crate::types::{CustomerProfile, ItemCode, OrderDraft, SubmissionId};

/// Who is using the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    #[default]
    Anonymous,
    Customer {
        profile: CustomerProfile,
    },
    Admin {
        username: String,
    },
}

/// Renderable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Login,
    Signup,
    Catalog,
    ProductDetail,
    Cart,
    AdminDashboard,
}

impl Page {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Catalog => "catalog",
            Self::ProductDetail => "product_detail",
            Self::Cart => "cart",
            Self::AdminDashboard => "admin_dashboard",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested page change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Login,
    Signup,
    Catalog,
    Cart,
    Product(ItemCode),
}

impl Navigation {
    const fn target(&self) -> Page {
        match self {
            Self::Login => Page::Login,
            Self::Signup => Page::Signup,
            Self::Catalog => Page::Catalog,
            Self::Cart => Page::Cart,
            Self::Product(_) => Page::ProductDetail,
        }
    }
}

/// Errors from session routing and access checks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The transition table has no edge from the current page to the target.
    #[error("cannot go from {from} to {to}")]
    NavigationNotAllowed { from: Page, to: Page },
    /// The operation needs a signed-in customer.
    #[error("please log in as a customer")]
    CustomerRequired,
    /// The submission workflow rejected the operation.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AuthPage {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CustomerPage {
    #[default]
    Catalog,
    ProductDetail,
    Cart,
}

/// State of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    actor: Actor,
    auth_page: AuthPage,
    customer_page: CustomerPage,
    selected_product: Option<ItemCode>,
    cart: Cart,
    checkout: CheckoutState,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The page to render for this session.
    #[must_use]
    pub const fn current_page(&self) -> Page {
        match self.actor {
            Actor::Anonymous => match self.auth_page {
                AuthPage::Login => Page::Login,
                AuthPage::Signup => Page::Signup,
            },
            Actor::Customer { .. } => match self.customer_page {
                CustomerPage::Catalog => Page::Catalog,
                CustomerPage::ProductDetail => Page::ProductDetail,
                CustomerPage::Cart => Page::Cart,
            },
            Actor::Admin { .. } => Page::AdminDashboard,
        }
    }

    /// Move to another page if the transition table allows it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NavigationNotAllowed`] when the current actor
    /// cannot reach the target page.
    pub fn navigate(&mut self, navigation: Navigation) -> Result<Page, SessionError> {
        let from = self.current_page();
        let to = navigation.target();
        match (&self.actor, navigation) {
            (Actor::Anonymous, Navigation::Login) => self.auth_page = AuthPage::Login,
            (Actor::Anonymous, Navigation::Signup) => self.auth_page = AuthPage::Signup,
            (Actor::Customer { .. }, Navigation::Catalog) => {
                self.customer_page = CustomerPage::Catalog;
            }
            (Actor::Customer { .. }, Navigation::Cart) => self.customer_page = CustomerPage::Cart,
            (Actor::Customer { .. }, Navigation::Product(code)) => {
                self.selected_product = Some(code);
                self.customer_page = CustomerPage::ProductDetail;
            }
            _ => return Err(SessionError::NavigationNotAllowed { from, to }),
        }
        Ok(self.current_page())
    }

    /// A sign-up succeeded: show the login page.
    pub fn signed_up(&mut self) {
        self.auth_page = AuthPage::Login;
    }

    /// Start a fresh customer session on the catalog.
    pub fn sign_in_customer(&mut self, profile: CustomerProfile) {
        *self = Self {
            actor: Actor::Customer { profile },
            ..Self::default()
        };
    }

    /// Start a fresh admin session.
    pub fn sign_in_admin(&mut self, username: String) {
        *self = Self {
            actor: Actor::Admin { username },
            ..Self::default()
        };
    }

    /// Forget the user, the cart and any pending submission; the next
    /// customer login lands on the catalog.
    pub fn logout(&mut self) {
        *self = Self::default();
    }

    /// The signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CustomerRequired`] for anonymous and admin sessions.
    pub const fn customer(&self) -> Result<&CustomerProfile, SessionError> {
        match &self.actor {
            Actor::Customer { profile } => Ok(profile),
            _ => Err(SessionError::CustomerRequired),
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.actor, Actor::Admin { .. })
    }

    #[must_use]
    pub const fn selected_product(&self) -> Option<&ItemCode> {
        self.selected_product.as_ref()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable cart access for a signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CustomerRequired`] if no customer is signed in.
    pub fn cart_mut(&mut self) -> Result<&mut Cart, SessionError> {
        self.customer()?;
        Ok(&mut self.cart)
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutState {
        &self.checkout
    }

    /// Ask to submit the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CustomerRequired`] or a wrapped [`CheckoutError`].
    pub fn request_submit(&mut self) -> Result<SubmissionId, SessionError> {
        self.customer()?;
        Ok(self.checkout.request(&self.cart)?)
    }

    /// Build the order draft for a confirmation; nothing changes until
    /// [`Self::complete_submit`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CustomerRequired`] or a wrapped [`CheckoutError`].
    pub fn prepare_submit(&self) -> Result<OrderDraft, SessionError> {
        let customer = self.customer()?;
        Ok(self.checkout.prepare(&self.cart, customer)?)
    }

    /// The order is stored: clear the cart and return to idle.
    pub fn complete_submit(&mut self) {
        self.checkout.complete(&mut self.cart);
    }

    /// Abandon a pending submission.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CustomerRequired`] or a wrapped [`CheckoutError`].
    pub fn cancel_submit(&mut self) -> Result<(), SessionError> {
        self.customer()?;
        Ok(self.checkout.cancel()?)
    }
}
