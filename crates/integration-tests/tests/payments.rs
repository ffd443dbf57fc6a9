//! Payment intents.

use axum::http::StatusCode;
use bistro_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_price_is_converted_to_minor_units() {
    let ctx = TestContext::new();
    let token = ctx.token("guest@bistro.example");

    let res = ctx
        .post("/create-payment-intent", Some(&token), json!({ "price": 19.99 }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "clientSecret": "pi_test_1_secret_1999" }));

    assert_eq!(ctx.payments.calls(), vec![(1999, "usd".to_owned())]);
}

#[tokio::test]
async fn test_fractional_cents_are_truncated() {
    let ctx = TestContext::new();
    let token = ctx.token("guest@bistro.example");

    ctx.post("/create-payment-intent", Some(&token), json!({ "price": 10.999 }))
        .await;
    ctx.post("/create-payment-intent", Some(&token), json!({ "price": 25 }))
        .await;

    let amounts: Vec<i64> = ctx.payments.calls().into_iter().map(|(a, _)| a).collect();
    assert_eq!(amounts, vec![1099, 2500]);
}

#[tokio::test]
async fn test_gateway_failure_passes_message_through() {
    let ctx = TestContext::new();
    let token = ctx.token("guest@bistro.example");
    ctx.payments.fail_with("Your card was declined.");

    let res = ctx
        .post("/create-payment-intent", Some(&token), json!({ "price": 5 }))
        .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({ "error": "Your card was declined." }));
}

#[tokio::test]
async fn test_invalid_price_never_reaches_gateway() {
    let ctx = TestContext::new();
    let token = ctx.token("guest@bistro.example");

    for body in [
        json!({ "price": 0 }),
        json!({ "price": -3.5 }),
        json!({ "price": 1e30 }),
        json!({ "price": "abc" }),
        json!({}),
    ] {
        let res = ctx
            .post("/create-payment-intent", Some(&token), body.clone())
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{body}");
    }

    assert!(ctx.payments.calls().is_empty());
}

#[tokio::test]
async fn test_requires_token() {
    let ctx = TestContext::new();

    let res = ctx
        .post("/create-payment-intent", None, json!({ "price": 5 }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(ctx.payments.calls().is_empty());
}
