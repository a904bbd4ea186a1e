#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every [`TestApp`] runs the real router, controller, templates and session
//! layer over an in-memory content store, so tests need no external services.

#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vitrina_kernel::auth::{Role, StaticAccounts};
use vitrina_kernel::content::{ContentController, ContentRepository, MemoryContentRepository};
use vitrina_kernel::models::ContentSection;
use vitrina_kernel::models::editor::hash_password;
use vitrina_kernel::routes;
use vitrina_kernel::session::{self, CookiePolicy};
use vitrina_kernel::state::{AppState, SiteSettings};
use vitrina_kernel::theme::ThemeEngine;
use vitrina_test_utils::FlakyRepository;

pub const ADMIN_EMAIL: &str = "admin@vitrina.test";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// Argon2 is slow in debug builds; hash once per test binary.
static ADMIN_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password(ADMIN_PASSWORD).expect("hash admin password"));

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    /// The backing store, for direct inspection and offline simulation.
    pub store: Arc<MemoryContentRepository>,
    /// Call-recording, failure-injecting wrapper the controller talks to.
    pub repo: Arc<FlakyRepository>,
}

impl TestApp {
    /// App with an empty content store.
    pub fn new() -> Self {
        Self::with_sections(Vec::new())
    }

    /// App whose store already holds `sections`.
    pub fn with_sections(sections: Vec<ContentSection>) -> Self {
        let store = Arc::new(MemoryContentRepository::with_sections(sections));
        let repo = Arc::new(FlakyRepository::new(
            store.clone() as Arc<dyn ContentRepository>
        ));

        let auth = StaticAccounts::new().with_account(ADMIN_EMAIL, &ADMIN_HASH, Role::Admin);
        let state = AppState::from_parts(
            ContentController::new(repo.clone()),
            Arc::new(auth),
            Arc::new(ThemeEngine::builtin().expect("built-in templates")),
            SiteSettings {
                name: "Vitrina Test".to_string(),
                footer_text: None,
            },
            None,
        );

        let router = routes::app(
            state.clone(),
            session::memory_layer(CookiePolicy::new("strict", false)),
        );

        Self {
            router,
            state,
            store,
            repo,
        }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// GET a path, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookies: &str) -> Response {
        let mut request = Request::get(path).body(Body::empty()).unwrap();
        add_cookies(&mut request, cookies);
        self.request(request).await
    }

    /// POST an urlencoded form.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)], cookies: &str) -> Response {
        let mut request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body(fields)))
            .unwrap();
        add_cookies(&mut request, cookies);
        self.request(request).await
    }

    /// Sign in as the configured admin and return the session cookie.
    pub async fn login(&self) -> String {
        let page = self.get("/admin/login", "").await;
        assert_eq!(page.status(), StatusCode::OK);
        let cookies = extract_cookies(&page);
        let token = csrf_token(&body_string(page).await);

        let response = self
            .post_form(
                "/admin/login",
                &[
                    ("email", ADMIN_EMAIL),
                    ("password", ADMIN_PASSWORD),
                    ("_token", &token),
                ],
                &cookies,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login failed");
        assert_eq!(location(&response), "/admin");

        let rotated = extract_cookies(&response);
        if rotated.is_empty() { cookies } else { rotated }
    }

    /// Fetch a page and return the CSRF token of its first form.
    pub async fn token_from(&self, path: &str, cookies: &str) -> String {
        let response = self.get(path, cookies).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        csrf_token(&body_string(response).await)
    }

    /// Sections currently in the store, in listing order.
    pub async fn stored(&self) -> Vec<ContentSection> {
        self.store.list().await.unwrap()
    }
}

fn add_cookies(request: &mut Request<Body>, cookies: &str) {
    if !cookies.is_empty() {
        request.headers_mut().insert(
            header::COOKIE,
            cookies.parse().expect("Invalid cookie header"),
        );
    }
}

/// Collect `name=value` pairs from every `Set-Cookie` header.
pub fn extract_cookies(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The redirect target of a response.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default()
}

/// Read a response body as UTF-8.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Pull the first `_token` hidden field value out of a page.
pub fn csrf_token(html: &str) -> String {
    let marker = r#"name="_token" value=""#;
    let start = html.find(marker).expect("page has no CSRF token") + marker.len();
    let end = html[start..].find('"').unwrap();
    html[start..start + end].to_string()
}

/// Encode fields as `application/x-www-form-urlencoded`.
pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
