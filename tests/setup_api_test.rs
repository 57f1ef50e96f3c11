mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{response_json, seed_item, seed_setup, seed_warehouse, TestApp};

#[tokio::test]
async fn setup_crud_round_trip_over_http() {
    let app = TestApp::new().await;
    let ctx = app.fresh_tenant();
    let item = seed_item(&app, &ctx, "API-CRUD").await;
    let warehouse = seed_warehouse(&app, &ctx, "WH-API-CRUD").await;

    // Create
    let response = app
        .request(
            Method::POST,
            "/api/v1/setup",
            &ctx,
            Some(json!({
                "item_id": item.id,
                "warehouse_id": warehouse.id,
                "min_stock": 5,
                "max_stock": 50,
                "reorder_point": 10
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["min_stock"], 5);
    let setup_id = body["data"]["id"].as_str().expect("setup id").to_string();

    // Creating the same binding again conflicts
    let response = app
        .request(
            Method::POST,
            "/api/v1/setup",
            &ctx,
            Some(json!({
                "item_id": item.id,
                "warehouse_id": warehouse.id,
                "min_stock": 1
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["error"], "Conflict");

    // Fetch
    let uri = format!("/api/v1/setup/{}", setup_id);
    let response = app.request(Method::GET, &uri, &ctx, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["id"], setup_id.as_str());

    // Update
    let response = app
        .request(
            Method::PUT,
            &uri,
            &ctx,
            Some(json!({"reorder_point": 25})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["reorder_point"], 25);

    // Delete, twice; both succeed
    let response = app.request(Method::DELETE, &uri, &ctx, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "inactive");

    let response = app.request(Method::DELETE, &uri, &ctx, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // A deleted setup is gone from the default read path
    let response = app.request(Method::GET, &uri, &ctx, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validation_errors_surface_in_the_envelope() {
    let app = TestApp::new().await;
    let ctx = app.fresh_tenant();
    let item = seed_item(&app, &ctx, "API-VAL").await;
    let warehouse = seed_warehouse(&app, &ctx, "WH-API-VAL").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/setup",
            &ctx,
            Some(json!({
                "item_id": item.id,
                "warehouse_id": warehouse.id,
                "min_stock": 50,
                "max_stock": 10
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    let message = body["error"]["message"].as_str().expect("message");
    assert!(message.contains("min_stock"));
    assert!(message.contains("max_stock"));
}

#[tokio::test]
async fn listing_paginates_with_total_pages() {
    let app = TestApp::new().await;
    let ctx = app.fresh_tenant();
    let warehouse = seed_warehouse(&app, &ctx, "WH-API-PAGE").await;

    for i in 0..25 {
        let item = seed_item(&app, &ctx, &format!("API-PAGE-{:02}", i)).await;
        seed_setup(&app, &ctx, item.id, warehouse.id).await;
    }

    let response = app
        .request(
            Method::GET,
            "/api/v1/setup?limit=10&page=3",
            &ctx,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().expect("rows").len(), 5);
    assert_eq!(body["pagination"]["page"], 3);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(body["pagination"]["total"], 25);
    assert_eq!(body["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn listing_rejects_malformed_warehouse_filter() {
    let app = TestApp::new().await;
    let ctx = app.fresh_tenant();

    let response = app
        .request(
            Method::GET,
            "/api/v1/setup?warehouse_id=not-a-uuid",
            &ctx,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn bulk_endpoint_skips_foreign_ids() {
    let app = TestApp::new().await;
    let ctx = app.fresh_tenant();
    let other = app.fresh_tenant();

    let item = seed_item(&app, &ctx, "API-BULK").await;
    let warehouse = seed_warehouse(&app, &ctx, "WH-API-BULK").await;
    let mine = seed_setup(&app, &ctx, item.id, warehouse.id).await;

    let foreign_item = seed_item(&app, &other, "API-BULK").await;
    let foreign_wh = seed_warehouse(&app, &other, "WH-API-BULK").await;
    let foreign = seed_setup(&app, &other, foreign_item.id, foreign_wh.id).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/setup/bulk",
            &ctx,
            Some(json!({
                "ids": [mine.id, foreign.id],
                "data": {"min_stock": 9}
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["updated_count"], 1);
    let updated = body["data"]["updated"].as_array().expect("updated rows");
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0]["id"], mine.id.to_string());
    assert_eq!(updated[0]["min_stock"], 9);
}

#[tokio::test]
async fn duplicate_endpoint_returns_created_and_skipped() {
    let app = TestApp::new().await;
    let ctx = app.fresh_tenant();

    let item = seed_item(&app, &ctx, "API-DUP").await;
    let source_wh = seed_warehouse(&app, &ctx, "WH-API-DUP-SRC").await;
    let w1 = seed_warehouse(&app, &ctx, "WH-API-DUP-1").await;
    let w2 = seed_warehouse(&app, &ctx, "WH-API-DUP-2").await;

    let source = seed_setup(&app, &ctx, item.id, source_wh.id).await;
    seed_setup(&app, &ctx, item.id, w1.id).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/setup/duplicate",
            &ctx,
            Some(json!({
                "source_id": source.id,
                "target_warehouse_ids": [w1.id, w2.id],
                "adjustments": {"min_stock": 2, "max_stock": 20}
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    let skipped = body["data"]["skipped"].as_array().expect("skipped");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["warehouse_id"], w1.id.to_string());

    let created = body["data"]["created"].as_array().expect("created");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["warehouse_id"], w2.id.to_string());
    assert_eq!(created[0]["min_stock"], 2);
    assert_eq!(created[0]["max_stock"], 20);
    // Fields without adjustments carry over from the source
    assert_eq!(created[0]["reorder_point"], source.reorder_point.unwrap());
}

#[tokio::test]
async fn items_without_setup_endpoint_paginates() {
    let app = TestApp::new().await;
    let ctx = app.fresh_tenant();

    let configured = seed_item(&app, &ctx, "API-WOS-C").await;
    seed_item(&app, &ctx, "API-WOS-U1").await;
    seed_item(&app, &ctx, "API-WOS-U2").await;
    let warehouse = seed_warehouse(&app, &ctx, "WH-API-WOS").await;
    seed_setup(&app, &ctx, configured.id, warehouse.id).await;

    let response = app
        .request(Method::GET, "/api/v1/items-without-setup?limit=10", &ctx, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 2);
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .all(|row| row["sku"].as_str().unwrap().starts_with("API-WOS-U")));
}

#[tokio::test]
async fn status_probe_answers_without_tenant_headers() {
    let app = TestApp::new().await;
    let ctx = app.fresh_tenant();

    // The probe itself ignores tenant context entirely
    let response = app.request(Method::GET, "/api/v1/status", &ctx, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["service"], "inventory-setup-api");
}
