//! Auth rules of the fake API, checked with a plain HTTP client.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use generix_integration_tests::FakeApi;
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

#[tokio::test]
async fn test_cart_without_bearer_is_rejected() {
    let api = FakeApi::start().await;
    let client = Client::new();

    let resp = client
        .get(format!("{}/cart/get-cart", api.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .get(format!("{}/cart/get-cart", api.base_url()))
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_opens_the_cart() {
    let api = FakeApi::start().await;
    let user = api.seed_user("Juan", "secret", false);

    let resp = Client::new()
        .get(format!("{}/cart/get-cart", api.base_url()))
        .bearer_auth(api.token_for(&user))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Cart is empty" }));
}

#[tokio::test]
async fn test_admin_route_forbids_shoppers() {
    let api = FakeApi::start().await;
    let shopper = api.seed_user("Juan", "secret", false);
    let admin = api.seed_user("Maria", "secret", true);
    let client = Client::new();

    let resp = client
        .get(format!("{}/orders/all-orders", api.base_url()))
        .bearer_auth(api.token_for(&shopper))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Action Forbidden");

    let resp = client
        .get(format!("{}/orders/all-orders", api.base_url()))
        .bearer_auth(api.token_for(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_returns_access_token() {
    let api = FakeApi::start().await;
    api.seed_user("Juan", "secret", false);

    let resp = Client::new()
        .post(format!("{}/users/login", api.base_url()))
        .json(&json!({ "email": "juan@example.ph", "password": "secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body["access"].as_str().is_some_and(|t| !t.is_empty()));
}
