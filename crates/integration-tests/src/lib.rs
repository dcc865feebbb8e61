//! Integration tests for Tany Foods ordering.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tany-orders-integration-tests
//! ```
//!
//! Each test starts its own server on an ephemeral port with a fresh data
//! directory, so tests run in parallel without sharing state.
//!
//! # Test Categories
//!
//! - `customer_flow` - Signup, login, cart and order submission
//! - `admin_flow` - Catalog upload, order report and exports
//! - `persistence` - Restarting on the same data directory
//! - `concurrency` - Many sessions submitting at once
//!
//! # Example
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_health() {
//!     let ctx = TestContext::start().await;
//!     let resp = ctx.browser().get("/health").await;
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

#![allow(clippy::missing_panics_doc)]

use std::path::{Path, PathBuf};

use reqwest::{Client, Response, multipart};
use secrecy::SecretString;
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use tany_orders_server::{
    build_app,
    config::{AdminCredentials, ServerConfig},
    services::auth::hash_password,
    state::AppState,
};

/// Administrator username of every test server.
pub const ADMIN_USERNAME: &str = "admin";
/// Administrator password of every test server.
pub const ADMIN_PASSWORD: &str = "admin-test-password";

/// A running server on a private data directory.
pub struct TestContext {
    pub base_url: String,
    data_dir: PathBuf,
    // Held so the directory outlives every restart.
    _tempdir: TempDir,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a server on a fresh, empty data directory.
    pub async fn start() -> Self {
        let tempdir = tempfile::tempdir().expect("failed to create data directory");
        let data_dir = tempdir.path().join("data");
        let (base_url, server) = spawn_server(&data_dir).await;
        Self {
            base_url,
            data_dir,
            _tempdir: tempdir,
            server,
        }
    }

    /// Stop the server and start a new one on the same data directory.
    pub async fn restart(mut self) -> Self {
        self.server.abort();
        let (base_url, server) = spawn_server(&self.data_dir).await;
        self.base_url = base_url;
        self.server = server;
        self
    }

    /// Directory holding `users.json`, `products.json` and `orders.json`.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// A new client with its own cookie jar, i.e. its own session.
    #[must_use]
    pub fn browser(&self) -> Browser {
        Browser {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("failed to build HTTP client"),
            base_url: self.base_url.clone(),
        }
    }

    /// A browser already logged in as the administrator.
    pub async fn admin(&self) -> Browser {
        let browser = self.browser();
        let resp = browser
            .post_form(
                "/auth/admin/login",
                &[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)],
            )
            .await;
        assert_eq!(resp.status(), 200, "admin login failed");
        browser
    }

    /// A browser for a freshly registered and logged in customer.
    pub async fn customer(&self, email: &str, password: &str) -> Browser {
        let browser = self.browser();
        let resp = browser.signup("Test", "Customer", "Test Co", email, password).await;
        assert_eq!(resp.status(), 200, "signup failed for {email}");
        let resp = browser.login(email, password).await;
        assert_eq!(resp.status(), 200, "login failed for {email}");
        browser
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn spawn_server(data_dir: &Path) -> (String, JoinHandle<()>) {
    let config = ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        data_dir: data_dir.to_path_buf(),
        admin: AdminCredentials {
            username: ADMIN_USERNAME.to_string(),
            password_hash: SecretString::from(
                hash_password(ADMIN_PASSWORD).expect("failed to hash admin password"),
            ),
        },
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    };

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("listener has no address");

    let state = AppState::open(config)
        .await
        .expect("failed to open application state");
    let app = build_app(state);

    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });

    (format!("http://{addr}"), server)
}

/// One session against the test server.
pub struct Browser {
    client: Client,
    base_url: String,
}

impl Browser {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// POST with an empty form body.
    pub async fn post(&self, path: &str) -> Response {
        self.post_form(path, &[]).await
    }

    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Response {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        self.client
            .post(self.url("/admin/products/upload"))
            .multipart(form)
            .send()
            .await
            .expect("upload request failed")
    }

    pub async fn signup(
        &self,
        first_name: &str,
        last_name: &str,
        company_name: &str,
        email: &str,
        password: &str,
    ) -> Response {
        self.post_form(
            "/auth/signup",
            &[
                ("first_name", first_name),
                ("last_name", last_name),
                ("company_name", company_name),
                ("email", email),
                ("password", password),
                ("confirm_password", password),
            ],
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/auth/login", &[("email", email), ("password", password)])
            .await
    }

    pub async fn add_to_cart(&self, item_code: &str, uom: &str, quantity: i64) -> Response {
        let quantity = quantity.to_string();
        self.post_form(
            "/cart/add",
            &[("item_code", item_code), ("uom", uom), ("quantity", &quantity)],
        )
        .await
    }

    /// Request and confirm a submission.
    pub async fn submit_order(&self) -> Response {
        let resp = self.post("/checkout/request").await;
        assert_eq!(resp.status(), 200, "submit request failed");
        self.post("/checkout/confirm").await
    }
}

/// Read a JSON response body.
pub async fn json(resp: Response) -> Value {
    resp.json().await.expect("response is not JSON")
}
