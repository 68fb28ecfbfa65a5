use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes, token_for};

#[tokio::test]
async fn endpoints_require_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::REPORT).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");

    let res = app.get_without_token(&routes::product(1)).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn malformed_token_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get_with_header(routes::REPORT, "Bearer not-a-jwt").await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");

    let res = app.get_with_header(routes::REPORT, "Basic abc123").await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn create_product_returns_annotated_record() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());

    let res = app
        .post_with_token(
            routes::PRODUCTS,
            &json!({
                "product_name": "  Ibuprofen 400mg  ",
                "quantity": 12,
                "expiry_date": "2099-05-01",
            }),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "unexpected response: {}", res.text);
    assert_eq!(res.body["product_name"], "Ibuprofen 400mg");
    assert_eq!(res.body["quantity"], 12);
    assert_eq!(res.body["expiry_date"], "2099-05-01");
    assert_eq!(res.body["status"], "SAFE");
    assert!(res.body["days_to_expiry"].as_i64().unwrap() > 90);
    assert!(res.body["id"].as_i64().is_some());
}

#[tokio::test]
async fn create_product_validation() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());

    // Blank name.
    let res = app
        .post_with_token(
            routes::PRODUCTS,
            &json!({"product_name": "   ", "quantity": 1, "expiry_date": "2099-01-01"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    // Zero quantity at creation.
    let res = app
        .post_with_token(
            routes::PRODUCTS,
            &json!({"product_name": "Aspirin", "quantity": 0, "expiry_date": "2099-01-01"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    // Malformed date.
    let res = app
        .post_with_token(
            routes::PRODUCTS,
            &json!({"product_name": "Aspirin", "quantity": 1, "expiry_date": "01/31/2099"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.body["message"].as_str().unwrap().contains("01/31/2099"));
}

#[tokio::test]
async fn get_product_by_id() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());

    let id = app.create_product(&token, "Cetirizine", 30, "2099-03-15").await;

    let res = app.get_with_token(&routes::product(id), &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["product_name"], "Cetirizine");
    assert_eq!(res.body["expiry_date"], "2099-03-15");
}

#[tokio::test]
async fn update_quantity_allows_zero_rejects_negative() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());

    let id = app.create_product(&token, "Loratadine", 8, "2099-06-01").await;

    let res = app
        .patch_with_token(&routes::product_quantity(id), &json!({"quantity": 0}), &token)
        .await;
    assert_eq!(res.status, 200, "unexpected response: {}", res.text);
    assert_eq!(res.body["quantity"], 0);

    let res = app
        .patch_with_token(&routes::product_quantity(id), &json!({"quantity": -1}), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_product_then_not_found() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());

    let id = app.create_product(&token, "Omeprazole", 5, "2099-02-01").await;

    let res = app.delete_with_token(&routes::product(id), &token).await;
    assert_eq!(res.status, 204);

    let res = app.get_with_token(&routes::product(id), &token).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn other_owners_products_look_missing() {
    let app = TestApp::spawn().await;
    let token_a = token_for(Uuid::new_v4());
    let token_b = token_for(Uuid::new_v4());

    let id = app.create_product(&token_a, "Metformin", 60, "2099-09-01").await;

    let res = app.get_with_token(&routes::product(id), &token_b).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");

    let res = app
        .patch_with_token(&routes::product_quantity(id), &json!({"quantity": 1}), &token_b)
        .await;
    assert_eq!(res.status, 404);

    let res = app.delete_with_token(&routes::product(id), &token_b).await;
    assert_eq!(res.status, 404);

    // The owner still sees the record untouched.
    let res = app.get_with_token(&routes::product(id), &token_a).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["quantity"], 60);
}
