mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use inventory_setup_api::{
    errors::ServiceError, pagination::PaginationParams, services::setups::SetupFilters,
};

use common::{response_json, seed_item, seed_setup, seed_warehouse, TestApp};

#[tokio::test]
async fn raw_ids_never_resolve_across_tenants() {
    let app = TestApp::new().await;
    let t1 = app.fresh_tenant();
    let t2 = app.fresh_tenant();

    let item = seed_item(&app, &t1, "ISO-ITEM").await;
    let warehouse = seed_warehouse(&app, &t1, "ISO-WH").await;
    let setup = seed_setup(&app, &t1, item.id, warehouse.id).await;

    // Reads under the owning tenant resolve
    assert!(app
        .state
        .services
        .setups
        .get_setup(setup.id, &t1)
        .await
        .is_ok());

    // The same raw ids under another tenant are NotFound across the board
    assert_matches!(
        app.state.services.setups.get_setup(setup.id, &t2).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        app.state.services.items.get_item(item.id, &t2).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        app.state
            .services
            .warehouses
            .get_warehouse(warehouse.id, &t2)
            .await,
        Err(ServiceError::NotFound(_))
    );

    // Mutations are tenant-scoped too
    assert_matches!(
        app.state.services.setups.delete_setup(setup.id, &t2).await,
        Err(ServiceError::NotFound(_))
    );

    // Listings under the other tenant stay empty
    let (rows, total) = app
        .state
        .services
        .setups
        .list_setups(
            &t2,
            &SetupFilters::default(),
            &PaginationParams::default().normalize(),
        )
        .await
        .expect("list under t2");
    assert_eq!(total, 0);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn same_stage_is_part_of_the_isolation_key() {
    let app = TestApp::new().await;
    let t1 = app.fresh_tenant();
    let mut other_stage = t1.clone();
    other_stage.stage_id = "staging".into();

    let item = seed_item(&app, &t1, "STAGE-ITEM").await;

    assert_matches!(
        app.state.services.items.get_item(item.id, &other_stage).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn http_lookup_with_foreign_tenant_headers_is_not_found() {
    let app = TestApp::new().await;
    let t1 = app.fresh_tenant();
    let t2 = app.fresh_tenant();

    let item = seed_item(&app, &t1, "HTTP-ISO-ITEM").await;
    let warehouse = seed_warehouse(&app, &t1, "HTTP-ISO-WH").await;
    let setup = seed_setup(&app, &t1, item.id, warehouse.id).await;

    let uri = format!("/api/v1/setup/{}", setup.id);

    let owned = app.request(Method::GET, &uri, &t1, None).await;
    assert_eq!(owned.status(), StatusCode::OK);

    // Same raw id, wrong tenant headers: indistinguishable from missing
    let foreign = app.request(Method::GET, &uri, &t2, None).await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    let body = response_json(foreign).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["error"], "Not Found");
}
