//! Inventory Setup API Library
//!
//! Tenant-scoped inventory configuration: the per-(item, warehouse) setup
//! records, the bulk-edit and cross-warehouse duplication operations over
//! them, and the tenant-isolation discipline every read and write honors.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod pagination;
pub mod services;
pub mod tenant;
pub mod tracing;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use pagination::PaginationMeta;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Response envelope: every outward-facing success is
/// `{"success": true, "data": ..., "pagination"?: {...}}`. The failure shape
/// lives in [`errors::ErrorResponse`].
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: PaginationMeta) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

// API routes mounted under /api/v1
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Setup API: the per-(item, warehouse) configuration subsystem
        .nest("/setup", handlers::setups::setup_routes())
        // Catalog items lacking an active setup
        .route(
            "/items-without-setup",
            get(handlers::items::list_items_without_setup),
        )
        // Item catalog API
        .nest("/items", handlers::items::item_routes())
        // Warehouse API
        .nest("/warehouses", handlers::warehouses::warehouse_routes())
}

async fn api_status() -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "inventory-setup-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use crate::pagination::{PaginationMeta, PaginationParams};

    #[test]
    fn success_envelope_has_no_pagination_block() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
        assert!(value.get("pagination").is_none());
    }

    #[test]
    fn paginated_envelope_carries_meta() {
        let page = PaginationParams {
            page: Some(3),
            limit: Some(10),
            offset: None,
        }
        .normalize();
        let response = ApiResponse::paginated(vec!["row"], PaginationMeta::new(&page, 25));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["pagination"]["page"], 3);
        assert_eq!(value["pagination"]["limit"], 10);
        assert_eq!(value["pagination"]["total"], 25);
        assert_eq!(value["pagination"]["total_pages"], 3);
    }
}
