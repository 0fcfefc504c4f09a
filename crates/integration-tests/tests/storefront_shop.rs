//! End-to-end tests for catalog, cart and wishlist.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (angora-cli migrate)
//! - The storefront running (cargo run -p angora-storefront)
//!
//! Run with: cargo test -p angora-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use angora_core::Category;
use angora_integration_tests::{base_url, browser, database, insert_product, unique_email};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

async fn signed_in_browser() -> Client {
    let client = browser();
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({ "email": unique_email(), "password": "longenough", "full_name": "A B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    client
}

async fn get_json(client: &Client, path: &str) -> Value {
    client
        .get(format!("{}{path}", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_json(client: &Client, path: &str, body: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}{path}", base_url()))
        .json(body)
        .send()
        .await
        .unwrap();
    (resp.status(), resp.json().await.unwrap())
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_catalog_listing_search_and_detail() {
    let pool = database().await;
    let marker = Uuid::new_v4().simple().to_string();
    let id = insert_product(&pool, &format!("Pull {marker}"), Category::Femme).await;

    let femme = get_json(&browser(), "/api/products?category=femme").await;
    assert!(femme.as_array().unwrap().iter().any(|p| p["id"] == id));

    let homme = get_json(&browser(), "/api/products?category=homme").await;
    assert!(!homme.as_array().unwrap().iter().any(|p| p["id"] == id));

    let hits = get_json(&browser(), &format!("/api/search?q={}", marker.to_uppercase())).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["priceCents"], 4900);

    let detail = get_json(&browser(), &format!("/api/products/{id}")).await;
    assert_eq!(detail["category"], "femme");

    // A blank query lists the newest active products
    let latest = get_json(&browser(), "/api/search?q=").await;
    let latest = latest.as_array().unwrap();
    assert!(!latest.is_empty() && latest.len() <= 48);
    assert!(latest.iter().any(|p| p["id"] == id));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_cart_add_twice_increments_quantity() {
    let pool = database().await;
    let product_id = insert_product(&pool, "Bonnet", Category::Accessoires).await;
    let client = signed_in_browser().await;

    for _ in 0..2 {
        let (status, body) =
            post_json(&client, "/api/cart/add", &json!({ "productId": product_id })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    let cart = get_json(&client, "/api/cart").await;
    let lines = cart.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 2);

    let counts = get_json(&client, "/api/me/counts").await;
    assert_eq!(counts["cartCount"], 2);

    let line_id = lines[0]["cartItemId"].clone();
    let (status, _) = post_json(
        &client,
        "/api/cart/update",
        &json!({ "cartItemId": line_id, "quantity": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&client, "/api/cart/remove", &json!({ "cartItemId": line_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(get_json(&client, "/api/cart").await, json!([]));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_cart_lines_of_other_users_are_untouched() {
    let pool = database().await;
    let product_id = insert_product(&pool, "Gants", Category::Accessoires).await;
    let owner = signed_in_browser().await;
    let other = signed_in_browser().await;

    post_json(&owner, "/api/cart/add", &json!({ "productId": product_id })).await;
    let line_id = get_json(&owner, "/api/cart").await[0]["cartItemId"].clone();

    let (status, body) = post_json(
        &other,
        "/api/cart/update",
        &json!({ "cartItemId": line_id, "quantity": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, _) = post_json(&other, "/api/cart/remove", &json!({ "cartItemId": line_id })).await;
    assert_eq!(status, StatusCode::OK);

    let cart = get_json(&owner, "/api/cart").await;
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["quantity"], 1);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_cart_rejects_unknown_product() {
    let client = signed_in_browser().await;
    let (status, body) =
        post_json(&client, "/api/cart/add", &json!({ "productId": i32::MAX })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PRODUCT");
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_wishlist_toggle_and_delete() {
    let pool = database().await;
    let product_id = insert_product(&pool, "Écharpe", Category::Accessoires).await;
    let client = signed_in_browser().await;

    let (_, body) = post_json(&client, "/api/wishlist/toggle", &json!({ "productId": product_id })).await;
    assert_eq!(body, json!({ "ok": true, "wished": true }));

    let (_, body) = post_json(&client, "/api/wishlist/toggle", &json!({ "productId": product_id })).await;
    assert_eq!(body, json!({ "ok": true, "wished": false }));

    post_json(&client, "/api/wishlist/toggle", &json!({ "productId": product_id })).await;
    let wishlist = get_json(&client, "/api/wishlist").await;
    let entry_id = wishlist[0]["id"].as_i64().unwrap();
    assert_eq!(wishlist[0]["inStock"], true);

    let url = format!("{}/api/wishlist/{entry_id}", base_url());
    assert_eq!(client.delete(&url).send().await.unwrap().status(), StatusCode::OK);
    assert_eq!(client.delete(&url).send().await.unwrap().status(), StatusCode::NOT_FOUND);

    let bad = format!("{}/api/wishlist/abc", base_url());
    assert_eq!(client.delete(&bad).send().await.unwrap().status(), StatusCode::BAD_REQUEST);
}
