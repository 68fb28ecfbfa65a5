use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes, token_for};

/// Seed the three-product fixture used across report tests. Against a report
/// date of 2025-01-01 the records land in the EXPIRED, URGENT and SAFE
/// buckets respectively.
async fn seed_pharmacy(app: &TestApp, token: &str) {
    app.create_product(token, "Paracetamol", 10, "2024-12-31").await;
    app.create_product(token, "Amoxicillin", 5, "2025-01-20").await;
    app.create_product(token, "Vitamin C", 20, "2025-06-01").await;
}

#[tokio::test]
async fn report_classifies_and_summarizes() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());
    seed_pharmacy(&app, &token).await;

    let res = app
        .get_with_token(&format!("{}?as_of=2025-01-01", routes::REPORT), &token)
        .await;
    assert_eq!(res.status, 200, "unexpected response: {}", res.text);
    assert_eq!(res.body["as_of"], "2025-01-01");

    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);

    // Sorted ascending by expiry date.
    let names: Vec<&str> = data
        .iter()
        .map(|row| row["product_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Paracetamol", "Amoxicillin", "Vitamin C"]);

    let days: Vec<i64> = data
        .iter()
        .map(|row| row["days_to_expiry"].as_i64().unwrap())
        .collect();
    assert_eq!(days, [-1, 19, 151]);

    let statuses: Vec<&str> = data
        .iter()
        .map(|row| row["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["EXPIRED", "URGENT", "SAFE"]);

    assert_eq!(
        res.body["summary"],
        json!({"expired": 1, "urgent": 1, "warning": 0, "safe": 1})
    );
}

#[tokio::test]
async fn report_windows() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());
    seed_pharmacy(&app, &token).await;
    // 364 days out, beyond the six-month horizon.
    app.create_product(&token, "Insulin", 3, "2025-12-31").await;

    let res = app
        .get_with_token(
            &format!("{}?as_of=2025-01-01&window=within_6_months", routes::REPORT),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 3);

    let res = app
        .get_with_token(
            &format!("{}?as_of=2025-01-01&window=expired_only", routes::REPORT),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);
    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["product_name"], "Paracetamol");
    assert_eq!(
        res.body["summary"],
        json!({"expired": 1, "urgent": 0, "warning": 0, "safe": 0})
    );
}

#[tokio::test]
async fn report_name_search_is_case_insensitive() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());
    seed_pharmacy(&app, &token).await;

    let res = app
        .get_with_token(
            &format!("{}?as_of=2025-01-01&search=para", routes::REPORT),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);
    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["product_name"], "Paracetamol");

    // A blank search keeps everything.
    let res = app
        .get_with_token(
            &format!("{}?as_of=2025-01-01&search=%20%20", routes::REPORT),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn report_rejects_unknown_window_and_bad_date() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());

    let res = app
        .get_with_token(&format!("{}?window=next_week", routes::REPORT), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = app
        .get_with_token(&format!("{}?as_of=2025-13-40", routes::REPORT), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn report_is_scoped_to_the_owner() {
    let app = TestApp::spawn().await;
    let token_a = token_for(Uuid::new_v4());
    let token_b = token_for(Uuid::new_v4());
    seed_pharmacy(&app, &token_a).await;

    let res = app
        .get_with_token(&format!("{}?as_of=2025-01-01", routes::REPORT), &token_b)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 0);
    assert_eq!(
        res.body["summary"],
        json!({"expired": 0, "urgent": 0, "warning": 0, "safe": 0})
    );
}

#[tokio::test]
async fn report_reflects_writes_immediately() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());

    let id = app.create_product(&token, "Paracetamol", 10, "2025-06-01").await;

    // Prime the cache.
    let res = app
        .get_with_token(&format!("{}?as_of=2025-01-01", routes::REPORT), &token)
        .await;
    assert_eq!(res.body["data"].as_array().unwrap().len(), 1);

    // A create shows up in the next report.
    app.create_product(&token, "Amoxicillin", 5, "2025-01-20").await;
    let res = app
        .get_with_token(&format!("{}?as_of=2025-01-01", routes::REPORT), &token)
        .await;
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);

    // So does a quantity change.
    let res_patch = app
        .patch_with_token(&routes::product_quantity(id), &json!({"quantity": 7}), &token)
        .await;
    assert_eq!(res_patch.status, 200);
    let res = app
        .get_with_token(&format!("{}?as_of=2025-01-01", routes::REPORT), &token)
        .await;
    let row = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["id"].as_i64() == Some(id as i64))
        .expect("updated product should be in the report")
        .clone();
    assert_eq!(row["quantity"], 7);

    // And a delete.
    let res_delete = app.delete_with_token(&routes::product(id), &token).await;
    assert_eq!(res_delete.status, 204);
    let res = app
        .get_with_token(&format!("{}?as_of=2025-01-01", routes::REPORT), &token)
        .await;
    assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn csv_export() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());
    seed_pharmacy(&app, &token).await;

    let res = app
        .client
        .get(format!(
            "http://{}{}?as_of=2025-01-01",
            app.addr,
            routes::REPORT_EXPORT
        ))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to send GET request");

    assert_eq!(res.status().as_u16(), 200);
    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"), "got {content_type}");

    let text = res.text().await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "product_name,quantity,expiry_date,status");
    assert_eq!(lines[1], "Paracetamol,10,2024-12-31,EXPIRED");
    assert_eq!(lines[2], "Amoxicillin,5,2025-01-20,URGENT");
    assert_eq!(lines[3], "Vitamin C,20,2025-06-01,SAFE");
    assert_eq!(lines.len(), 4);
    assert!(text.ends_with('\n'));
}

#[tokio::test]
async fn csv_export_honors_filters() {
    let app = TestApp::spawn().await;
    let token = token_for(Uuid::new_v4());
    seed_pharmacy(&app, &token).await;

    let res = app
        .get_with_token(
            &format!(
                "{}?as_of=2025-01-01&window=expired_only",
                routes::REPORT_EXPORT
            ),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(
        res.text,
        "product_name,quantity,expiry_date,status\nParacetamol,10,2024-12-31,EXPIRED\n"
    );
}
