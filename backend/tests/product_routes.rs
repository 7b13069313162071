mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use shared::Role;

async fn create(app: &TestApp, token: &str, body: Value) -> i64 {
    let (status, body) = app.send(Method::POST, "/api/products", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn admin_creates_products_users_cannot() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("admin@example.com", Role::Admin).await;
    let (_, user) = app.user("user@example.com", Role::User).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&admin),
            Some(json!({
                "name": "Produit Test", "sku": "SKU001", "price": 19.99,
                "category": "Accessoires", "stock": 10, "inStock": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["name"], "Produit Test");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&user),
            Some(json!({"name": "Nope", "sku": "SKU002", "price": 10, "category": "Divers"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "error");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            None,
            Some(json!({"name": "Nope", "sku": "SKU003", "price": 10})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");

    let (_, body) = app.send(Method::GET, "/api/products", None, None).await;
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn auth_is_checked_before_the_body() {
    let app = TestApp::new().await;
    let (_, user) = app.user("user@example.com", Role::User).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = app.raw(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::PUT, "/api/products/1", Some(&user), Some(json!({"price": -5})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_sku_conflicts() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("admin@example.com", Role::Admin).await;
    create(&app, &admin, json!({"name": "A", "sku": "DUP", "price": 1})).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&admin),
            Some(json!({"name": "B", "sku": "DUP", "price": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn listing_is_public_paginated_and_filtered() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("admin@example.com", Role::Admin).await;
    for i in 0..12 {
        let category = if i % 2 == 0 { "Informatique" } else { "Test" };
        create(
            &app,
            &admin,
            json!({"name": format!("P{i}"), "sku": format!("SKU{i}"), "price": 5, "category": category, "stock": i}),
        )
        .await;
    }

    let (status, body) = app.send(Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["meta"], json!({"page": 1, "limit": 10, "total": 12, "pages": 2}));

    let (_, body) = app.send(Method::GET, "/api/products?page=2&limit=10", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = app
        .send(Method::GET, "/api/products?category=Informatique&inStock=true", None, None)
        .await;
    // stock 0 product (i = 0) is out of stock
    assert_eq!(body["meta"]["total"], 5);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["category"] == "Informatique" && p["inStock"] == true));

    let (_, body) = app.send(Method::GET, "/api/products?category=&page=1", None, None).await;
    assert_eq!(body["meta"]["total"], 12);

    let (status, body) = app.send(Method::GET, "/api/products?page=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn read_by_id() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("admin@example.com", Role::Admin).await;
    let id = create(
        &app,
        &admin,
        json!({"name": "Produit Unique", "sku": "SKU003", "price": 30, "category": "Informatique"}),
    )
    .await;

    let (status, body) = app.send(Method::GET, &format!("/api/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Produit Unique");
    assert_eq!(body["data"]["inStock"], false);

    let (status, body) = app.send(Method::GET, "/api/products/424242", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn update_is_admin_only() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("admin@example.com", Role::Admin).await;
    let (_, user) = app.user("user@example.com", Role::User).await;
    let id = create(
        &app,
        &admin,
        json!({"name": "Ancien Produit", "sku": "SKU004", "price": 15, "category": "Test"}),
    )
    .await;
    let uri = format!("/api/products/{id}");

    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({"name": "Produit Mis à Jour", "price": 25, "stock": 5})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Produit Mis à Jour");
    assert_eq!(body["data"]["sku"], "SKU004");
    assert_eq!(body["data"]["inStock"], true);

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&user), Some(json!({"name": "Modification refusée"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&admin), Some(json!({"price": -1})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::PUT, "/api/products/999", Some(&admin), Some(json!({"price": 1})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_admin_only() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("admin@example.com", Role::Admin).await;
    let (_, user) = app.user("user@example.com", Role::User).await;
    let id = create(&app, &admin, json!({"name": "Bye", "sku": "SKU006", "price": 5})).await;
    let uri = format!("/api/products/{id}");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
