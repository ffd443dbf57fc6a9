//! Token issuance and the authentication/authorization guards.

use axum::http::{Method, StatusCode};
use bistro_core::Role;
use bistro_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_issue_token_for_profile() {
    let ctx = TestContext::new();

    let res = ctx
        .post("/jwt", None, json!({ "email": "guest@bistro.example", "name": "Guest" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let token = res.body["token"].as_str().unwrap().to_owned();
    let carts = ctx
        .post(
            "/carts",
            Some(&token),
            json!({ "foodId": "6a1f3c2e-8d4b-4f6a-9c1e-2b7d5e8f0a13", "name": "Soup", "price": 6.5 }),
        )
        .await;
    assert_eq!(carts.status, StatusCode::OK);
}

#[tokio::test]
async fn test_issue_token_requires_email() {
    let ctx = TestContext::new();

    let res = ctx.post("/jwt", None, json!({ "name": "Nobody" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].is_string());
}

#[tokio::test]
async fn test_admin_routes_without_token_are_unauthorized() {
    let ctx = TestContext::new();
    let id = "6a1f3c2e-8d4b-4f6a-9c1e-2b7d5e8f0a13";

    let cases = [
        (Method::GET, "/users".to_owned()),
        (Method::PATCH, format!("/users/admin/{id}")),
        (Method::DELETE, format!("/users/{id}")),
        (Method::DELETE, format!("/menus/{id}")),
    ];

    for (method, uri) in cases {
        let res = ctx.send(method.clone(), &uri, None, None).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(res.body["error"], "missing access token");
    }

    let res = ctx
        .post("/menus", None, json!({ "name": "Soup", "price": 5, "category": "soup" }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_tokens_are_unauthorized() {
    let ctx = TestContext::new();

    let res = ctx.get("/users", Some("not-a-jwt")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "invalid access token");

    let request = axum::http::Request::builder()
        .uri("/users")
        .header("authorization", "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let ctx = TestContext::new();
    ctx.seed_user("guest@bistro.example", Role::Customer).await;
    let token = ctx.token("guest@bistro.example");

    let res = ctx.get("/users", Some(&token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"], "admin role required");

    // A valid token for an email with no account is also forbidden.
    let stranger = ctx.token("stranger@bistro.example");
    let res = ctx.get("/users", Some(&stranger)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_is_allowed() {
    let ctx = TestContext::new();
    let token = ctx.admin_token("owner@bistro.example").await;

    let res = ctx.get("/users", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();

    assert_eq!(ctx.get("/health", None).await.status, StatusCode::OK);
    assert_eq!(ctx.get("/health/ready", None).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new();

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-42");
}
