//! Integration tests for the Chicken One storefront.
//!
//! Every test gets its own pair of servers on ephemeral ports: the fake API
//! in [`backend`] and the real storefront router pointed at it. Requests go
//! through a cookie-keeping `reqwest` client that does not follow
//! redirects, so tests can assert on each `Location`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p chicken-one-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - sign-in, registration, confirmation, password reset
//! - `guard` - public and private routes, staff gating
//! - `cart_checkout` - cart edits, coupons, delivery time, checkout
//! - `delivery_fees` - staff delivery area management

pub mod backend;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chicken_one_core::Price;
use chicken_one_storefront::{
    app,
    config::{ApiConfig, StorefrontConfig},
    state::AppState,
};
use reqwest::{Client, Response, cookie::Jar, header, redirect::Policy};
use secrecy::SecretString;
use tokio::net::TcpListener;
use url::Url;

pub use backend::Backend;

/// Flat delivery fee the test storefront charges.
pub const DELIVERY_FEE_PIASTRES: i64 = 1500;

const SESSION_SECRET: &str = "k3Yq!9vR#2mW@8zL$5tN^7pB&4xC*1hD";

/// A running fake API plus storefront, and a browser-like client.
pub struct TestContext {
    pub client: Client,
    /// The client's cookie jar, for planting third-party cookies.
    pub jar: Arc<Jar>,
    pub storefront_url: String,
    pub backend: Backend,
}

impl TestContext {
    /// Start both servers with the default seed data.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot bind or the client cannot be built.
    pub async fn start() -> Self {
        let backend = Backend::seeded();
        let api_addr = serve(backend.router()).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("loopback address"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(SESSION_SECRET.to_string()),
            api: ApiConfig {
                base_url: Url::parse(&format!("http://{api_addr}/")).expect("API base URL"),
            },
            delivery_fee: Price::from_piastres(DELIVERY_FEE_PIASTRES),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static")),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config).expect("Failed to build storefront state");
        let storefront_addr = serve(app(state)).await;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            jar,
            storefront_url: format!("http://{storefront_addr}"),
            backend,
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Store a cookie for the storefront origin.
    ///
    /// # Panics
    ///
    /// Panics if the storefront URL does not parse.
    pub fn set_cookie(&self, cookie: &str) {
        let url = Url::parse(&self.storefront_url).expect("storefront URL");
        self.jar.add_cookie_str(cookie, &url);
    }

    /// GET a storefront page.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to the storefront.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET a page and return its body, asserting a 200.
    ///
    /// # Panics
    ///
    /// Panics on a non-200 status or an unreadable body.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), 200, "GET {path} should render a page");
        response.text().await.expect("Failed to read response")
    }

    /// Sign in through the login form and check the redirect home.
    ///
    /// # Panics
    ///
    /// Panics if the sign-in does not succeed.
    pub async fn sign_in(&self, email: &str, password: &str) {
        let response = self
            .post_form("/login", &[("email", email), ("password", password)])
            .await;
        assert_eq!(location(&response), "/", "sign-in as {email} should go home");
    }
}

/// Serve a router on an ephemeral loopback port.
async fn serve(router: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("test server crashed");
    });

    addr
}

/// The `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
