//! Integration tests for routes that need no session.

use axum::http::{StatusCode, header};

use cornerstone_integration_tests::{app, body_text, request, send, test_state};

#[tokio::test]
async fn test_health() {
    let response = send(&app(test_state()), request("GET", "/health", None, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_login_page_renders() {
    let response = send(&app(test_state()), request("GET", "/login", None, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/login""#));
    assert!(!html.contains(r#"role="alert""#));
}

#[tokio::test]
async fn test_login_page_shows_error() {
    let response = send(
        &app(test_state()),
        request("GET", "/login?error=invalid", None, None),
    )
    .await;

    assert!(body_text(response).await.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let response = send(
        &app(test_state()),
        request("POST", "/api/auth/logout", None, None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_logout_form_redirects_to_login() {
    let response = send(&app(test_state()), request("POST", "/logout", None, None)).await;

    assert!(response.status().is_redirection());
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );
}

#[tokio::test]
async fn test_invalid_subscription_rejected_before_storage() {
    let state = test_state();
    let response = send(
        &app(state.clone()),
        request(
            "POST",
            "/api/newsletter/subscribe",
            None,
            Some(r#"{"email":"not-an-email"}"#),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!state.db().is_connected());
}

#[tokio::test]
async fn test_invalid_contact_rejected_before_storage() {
    let state = test_state();
    let response = send(
        &app(state.clone()),
        request(
            "POST",
            "/api/contact",
            None,
            Some(r#"{"name":"","email":"dana@example.com","message":"Hello"}"#),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!state.db().is_connected());
}
