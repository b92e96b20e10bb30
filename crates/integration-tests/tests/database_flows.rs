//! Integration tests that need `PostgreSQL`.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/cornerstone_test \
//!     cargo test -p cornerstone-integration-tests -- --ignored
//! ```
//!
//! Migrations are applied on connect. Rows are keyed by a per-run suffix so
//! repeated runs against the same database do not collide.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use cornerstone_core::Role;
use cornerstone_integration_tests::{
    app, body_json, database_state, location, request, send, session_token, token,
    unique_suffix,
};
use cornerstone_web::services::AuthService;

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_login_cookie_opens_admin_and_content_api() {
    let state = database_state().await;
    let app = app(state.clone());
    let suffix = unique_suffix();
    let email = format!("site-admin-{suffix}@cornerstone.example");

    let pool = state.db().pool().await.unwrap();
    AuthService::new(pool)
        .create_user(&email, "Site Admin", Role::Admin, "poured-concrete-42")
        .await
        .unwrap();

    let login = json!({ "email": email, "password": "poured-concrete-42" }).to_string();
    let response = send(&app, request("POST", "/api/auth/login", None, Some(&login))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = session_token(&response).unwrap();

    let claims = state.tokens().verify(&session).unwrap();
    assert_eq!(claims.email, email);
    assert!(claims.has_role(Role::Admin));

    let response = send(&app, request("GET", "/admin", Some(&session), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Create a draft project.
    let draft = json!({
        "title": "Riverside Clinic",
        "slug": format!("riverside-clinic-{suffix}"),
        "body": { "location": "Riverside" },
    })
    .to_string();
    let response = send(
        &app,
        request("POST", "/api/content/projects", Some(&session), Some(&draft)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["published"], false);

    let item_uri = format!("/api/content/projects/{id}");

    // Drafts are hidden from the public.
    let response = send(&app, request("GET", &item_uri, None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send(&app, request("GET", &item_uri, Some(&session), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The id does not leak across kinds.
    let other_kind = format!("/api/content/services/{id}");
    let response = send(&app, request("GET", &other_kind, Some(&session), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send(&app, request("DELETE", &other_kind, Some(&session), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Publish it.
    let published = json!({
        "title": "Riverside Clinic",
        "slug": format!("riverside-clinic-{suffix}"),
        "body": { "location": "Riverside" },
        "published": true,
    })
    .to_string();
    let response = send(
        &app,
        request("PUT", &item_uri, Some(&session), Some(&published)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, request("GET", &item_uri, None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Riverside Clinic");

    let response = send(&app, request("DELETE", &item_uri, Some(&session), None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = send(&app, request("GET", &item_uri, Some(&session), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_login_form_sets_cookie_and_redirects() {
    let state = database_state().await;
    let app = app(state.clone());
    let email = format!("form-admin-{}@cornerstone.example", unique_suffix());

    let pool = state.db().pool().await.unwrap();
    AuthService::new(pool)
        .create_user(&email, "Form Admin", Role::Admin, "steel-beam-1234")
        .await
        .unwrap();

    let form = format!("email={}&password=steel-beam-1234", email.replace('@', "%40"));
    let login = axum::http::Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(form))
        .unwrap();
    let response = send(&app, login).await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/admin"));
    let session = session_token(&response).unwrap();

    let response = send(&app, request("GET", "/admin/", Some(&session), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_wrong_password_is_unauthorized() {
    let state = database_state().await;
    let app = app(state.clone());
    let email = format!("editor-{}@cornerstone.example", unique_suffix());

    let pool = state.db().pool().await.unwrap();
    AuthService::new(pool)
        .create_user(&email, "Editor", Role::Editor, "framing-nailer-7")
        .await
        .unwrap();

    for (who, password) in [
        (email.as_str(), "not-the-password"),
        ("nobody@cornerstone.example", "framing-nailer-7"),
    ] {
        let login = json!({ "email": who, "password": password }).to_string();
        let response = send(&app, request("POST", "/api/auth/login", None, Some(&login))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(session_token(&response).is_none());
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_user_email_conflicts() {
    let app = app(database_state().await);
    let admin = token("admin");
    let user = json!({
        "email": format!("estimator-{}@cornerstone.example", unique_suffix()),
        "name": "Estimator",
        "password": "takeoff-sheet-88",
        "role": "viewer",
    })
    .to_string();

    let response = send(&app, request("POST", "/api/users", Some(&admin), Some(&user))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, request("POST", "/api/users", Some(&admin), Some(&user))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_subscribing_twice_keeps_one_row() {
    let app = app(database_state().await);
    let email = format!("homeowner-{}@cornerstone.example", unique_suffix());

    for submitted in [email.clone(), format!("  {}  ", email.to_uppercase())] {
        let body = json!({ "email": submitted }).to_string();
        let response = send(
            &app,
            request("POST", "/api/newsletter/subscribe", None, Some(&body)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);
    }

    let response = send(
        &app,
        request("GET", "/api/newsletter/subscribers", Some(&token("admin")), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let subscribers = body_json(response).await;
    let matching = subscribers
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["email"] == email.as_str())
        .count();
    assert_eq!(matching, 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_hidden_page_is_not_found() {
    let app = app(database_state().await);
    let admin = token("admin");
    let hide = json!({ "visible": false }).to_string();
    let show = json!({ "visible": true }).to_string();

    let response = send(&app, request("PUT", "/api/pages/careers", Some(&admin), Some(&hide))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["visible"], false);

    let response = send(&app, request("GET", "/careers", None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, request("PUT", "/api/pages/careers", Some(&admin), Some(&show))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, request("GET", "/careers", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_unknown_page_flag_is_not_found() {
    let app = app(database_state().await);
    let body = json!({ "visible": false }).to_string();

    let response = send(
        &app,
        request("PUT", "/api/pages/no-such-page", Some(&token("admin")), Some(&body)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
