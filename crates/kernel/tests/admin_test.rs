#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Admin panel integration tests: session guard, dashboard, editor flows.

use axum::http::StatusCode;
use uuid::Uuid;

use vitrina_kernel::content::ContentRepository;

use vitrina_test_utils::assert::{contains, not_contains};
use vitrina_test_utils::{Operation, test_section};

mod common;
use common::{ADMIN_EMAIL, TestApp, body_string, csrf_token, extract_cookies, location};

fn section_fields<'a>(token: &'a str, name: &'a str, title: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("_token", token),
        ("section_name", name),
        ("title", title),
        ("subtitle", ""),
        ("content", "First line\nSecond line"),
        ("image_url", ""),
        ("button_text", ""),
        ("button_url", ""),
        ("order_index", "1"),
        ("is_active", "on"),
        ("op", "save"),
    ]
}

// =============================================================================
// Session guard
// =============================================================================

#[tokio::test]
async fn admin_requires_sign_in() {
    let app = TestApp::new();

    for path in ["/admin", "/admin/sections/new"] {
        let response = app.get(path, "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/admin/login", "{path}");
    }
}

#[tokio::test]
async fn signed_in_user_skips_login_page() {
    let app = TestApp::new();
    let cookies = app.login().await;

    let response = app.get("/admin/login", &cookies).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::new();
    let page = app.get("/admin/login", "").await;
    let cookies = extract_cookies(&page);
    let token = csrf_token(&body_string(page).await);

    let response = app
        .post_form(
            "/admin/login",
            &[("email", ADMIN_EMAIL), ("password", "nope"), ("_token", &token)],
            &cookies,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    contains(&body_string(response).await, "Invalid email or password.");

    let response = app.get("/admin", &cookies).await;
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn login_without_csrf_token_is_refused() {
    let app = TestApp::new();
    let page = app.get("/admin/login", "").await;
    let cookies = extract_cookies(&page);

    let response = app
        .post_form(
            "/admin/login",
            &[("email", ADMIN_EMAIL), ("password", common::ADMIN_PASSWORD)],
            &cookies,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    contains(&body_string(response).await, "Your form has expired");
}

#[tokio::test]
async fn sign_out_ends_session() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin", &cookies).await;

    let response = app
        .post_form("/admin/logout", &[("_token", &token)], &cookies)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");

    let response = app.get("/admin", &cookies).await;
    assert_eq!(location(&response), "/admin/login");
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn dashboard_empty_state() {
    let app = TestApp::new();
    let cookies = app.login().await;

    let html = body_string(app.get("/admin", &cookies).await).await;
    contains(&html, "No content sections yet.");
    contains(&html, ADMIN_EMAIL);
    contains(&html, "(0)");
}

#[tokio::test]
async fn dashboard_lists_all_sections_including_inactive() {
    let app = TestApp::with_sections(vec![
        test_section("hero", "Welcome").with_subtitle("Hello there").build(),
        test_section("about", "About us").at(2).inactive().build(),
    ]);
    let cookies = app.login().await;

    let html = body_string(app.get("/admin", &cookies).await).await;
    contains(&html, "Welcome");
    contains(&html, "Hello there");
    contains(&html, "About us");
    contains(&html, ">Active</button>");
    contains(&html, ">Inactive</button>");
    contains(&html, "(2)");
}

#[tokio::test]
async fn toggle_flips_visibility() {
    let hero = test_section("hero", "Welcome").build();
    let app = TestApp::with_sections(vec![hero.clone()]);
    let cookies = app.login().await;
    let token = app.token_from("/admin", &cookies).await;

    let response = app
        .post_form(
            &format!("/admin/sections/{}/toggle", hero.id),
            &[("_token", &token)],
            &cookies,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    assert!(!app.stored().await[0].is_active);
    contains(
        &body_string(app.get("/", "").await).await,
        "Website under construction",
    );
}

#[tokio::test]
async fn failed_toggle_shows_error_once() {
    let hero = test_section("hero", "Welcome").build();
    let app = TestApp::with_sections(vec![hero.clone()]);
    let cookies = app.login().await;
    let token = app.token_from("/admin", &cookies).await;

    app.repo.fail_next(Operation::Update);
    app.post_form(
        &format!("/admin/sections/{}/toggle", hero.id),
        &[("_token", &token)],
        &cookies,
    )
    .await;

    assert!(app.stored().await[0].is_active);
    let html = body_string(app.get("/admin", &cookies).await).await;
    contains(&html, "Could not update the section. Please try again.");

    let html = body_string(app.get("/admin", &cookies).await).await;
    not_contains(&html, "Could not update the section");
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let hero = test_section("hero", "Welcome").build();
    let app = TestApp::with_sections(vec![hero.clone()]);
    let cookies = app.login().await;
    let path = format!("/admin/sections/{}/delete", hero.id);

    let response = app.get(&path, &cookies).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    contains(&html, "Are you sure you want to delete");
    assert_eq!(app.stored().await.len(), 1);

    let token = csrf_token(&html);
    let response = app.post_form(&path, &[("_token", &token)], &cookies).await;
    assert_eq!(location(&response), "/admin");
    assert!(app.stored().await.is_empty());
    assert_eq!(app.state.content().collection().len(), 0);
}

#[tokio::test]
async fn delete_of_missing_section_reports_error() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin", &cookies).await;

    let response = app
        .post_form(
            &format!("/admin/sections/{}/delete", Uuid::now_v7()),
            &[("_token", &token)],
            &cookies,
        )
        .await;
    assert_eq!(location(&response), "/admin");

    let html = body_string(app.get("/admin", &cookies).await).await;
    contains(&html, "The section no longer exists.");
}

// =============================================================================
// Editor
// =============================================================================

#[tokio::test]
async fn new_section_form_defaults() {
    let app = TestApp::with_sections(vec![
        test_section("hero", "Welcome").build(),
        test_section("about", "About").at(2).build(),
    ]);
    let cookies = app.login().await;

    let html = body_string(app.get("/admin/sections/new", &cookies).await).await;
    contains(&html, "name=\"order_index\" value=\"3\"");
    contains(&html, "value=\"on\" checked");
    contains(&html, "Cancel");
}

#[tokio::test]
async fn create_section_then_public_site_shows_it() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin/sections/new", &cookies).await;

    let response = app
        .post_form(
            "/admin/sections/new",
            &section_fields(&token, "hero", "Hello world"),
            &cookies,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let stored = app.stored().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Hello world");
    assert_eq!(stored[0].subtitle, None);
    assert_eq!(stored[0].content, "First line\nSecond line");
    assert!(stored[0].is_active);

    let html = body_string(app.get("/", "").await).await;
    contains(&html, "<h1>Hello world</h1>");
    contains(&html, "<p>Second line</p>");
}

#[tokio::test]
async fn reserved_characters_survive_form_submission() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin/sections/new", &cookies).await;

    let response = app
        .post_form(
            "/admin/sections/new",
            &section_fields(&token, "pricing", "Tea & biscuits = 100% + tax?"),
            &cookies,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let stored = app.stored().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Tea & biscuits = 100% + tax?");
}

#[tokio::test]
async fn invalid_draft_never_reaches_store() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin/sections/new", &cookies).await;
    app.repo.reset_calls();

    let response = app
        .post_form(
            "/admin/sections/new",
            &section_fields(&token, "", "Kept title"),
            &cookies,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    contains(&html, "Section name is required.");
    contains(&html, "value=\"Kept title\"");
    assert_eq!(app.repo.count(Operation::Create), 0);
    assert!(app.stored().await.is_empty());
}

#[tokio::test]
async fn non_numeric_order_is_a_field_error() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin/sections/new", &cookies).await;

    let mut fields = section_fields(&token, "hero", "Title");
    fields.retain(|(k, _)| *k != "order_index");
    fields.push(("order_index", "first"));

    let response = app.post_form("/admin/sections/new", &fields, &cookies).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    contains(&body_string(response).await, "Order must be a whole number.");
}

#[tokio::test]
async fn preview_renders_without_saving() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin/sections/new", &cookies).await;

    let mut fields = section_fields(&token, "", "");
    fields.retain(|(k, _)| *k != "op");
    fields.push(("op", "preview"));

    let response = app.post_form("/admin/sections/new", &fields, &cookies).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    contains(&html, "<h2>Preview</h2>");
    contains(&html, "Sample title");
    contains(&html, "<p>First line</p>");
    assert_eq!(app.repo.count(Operation::Create), 0);
}

#[tokio::test]
async fn store_failure_keeps_draft_and_skips_refetch() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin/sections/new", &cookies).await;

    app.repo.reset_calls();
    app.repo.fail_next(Operation::Create);

    let response = app
        .post_form(
            "/admin/sections/new",
            &section_fields(&token, "hero", "Unsaved title"),
            &cookies,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let html = body_string(response).await;
    contains(&html, "Could not create the section. Please try again.");
    contains(&html, "value=\"Unsaved title\"");
    assert_eq!(app.repo.calls(), vec![Operation::Create]);
    assert!(app.stored().await.is_empty());
}

#[tokio::test]
async fn successful_mutation_refetches_collection() {
    let app = TestApp::new();
    let cookies = app.login().await;
    let token = app.token_from("/admin/sections/new", &cookies).await;
    app.repo.reset_calls();

    app.post_form(
        "/admin/sections/new",
        &section_fields(&token, "hero", "Fresh"),
        &cookies,
    )
    .await;

    assert_eq!(app.repo.calls(), vec![Operation::Create, Operation::List]);
    assert_eq!(app.state.content().collection().len(), 1);
}

#[tokio::test]
async fn edit_updates_existing_section() {
    let hero = test_section("hero", "Old title").at(4).build();
    let app = TestApp::with_sections(vec![hero.clone()]);
    let cookies = app.login().await;
    let path = format!("/admin/sections/{}/edit", hero.id);

    let html = body_string(app.get(&path, &cookies).await).await;
    contains(&html, "Edit section");
    contains(&html, "value=\"Old title\"");
    contains(&html, "name=\"order_index\" value=\"4\"");

    let token = csrf_token(&html);
    let response = app
        .post_form(&path, &section_fields(&token, "hero", "New title"), &cookies)
        .await;
    assert_eq!(location(&response), "/admin");

    let stored = app.stored().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, hero.id);
    assert_eq!(stored[0].title, "New title");
    assert_eq!(stored[0].order_index, 1);
    assert_eq!(stored[0].created_at, hero.created_at);
}

#[tokio::test]
async fn edit_of_missing_section_is_not_found() {
    let app = TestApp::new();
    let cookies = app.login().await;

    for id in [Uuid::now_v7().to_string(), "not-a-uuid".to_string()] {
        let response = app
            .get(&format!("/admin/sections/{id}/edit"), &cookies)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        contains(&body_string(response).await, "Section not found");
    }
}

#[tokio::test]
async fn edit_of_concurrently_deleted_section_reports_it() {
    let hero = test_section("hero", "Doomed").build();
    let app = TestApp::with_sections(vec![hero.clone()]);
    let cookies = app.login().await;
    let path = format!("/admin/sections/{}/edit", hero.id);
    let token = app.token_from(&path, &cookies).await;

    app.store.delete(hero.id).await.unwrap();

    let response = app
        .post_form(&path, &section_fields(&token, "hero", "Edited"), &cookies)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    contains(&body_string(response).await, "The section no longer exists.");
}
