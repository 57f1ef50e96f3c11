use axum::{
    extract::{Extension, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::ServiceError,
    handlers::common::{created_response, success_response, validate_input},
    pagination::{PaginationMeta, PaginationParams},
    services::warehouses::{NewWarehouse, WarehouseFilters, WarehousePatch},
    tenant::TenantContext,
    ApiResponse, AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct WarehouseListQuery {
    /// Substring match over code and name
    pub search: Option<String>,
    pub warehouse_type: Option<String>,
    pub include_inactive: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub warehouse_type: String,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct WarehousePatchRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub warehouse_type: Option<String>,
}

/// Create the warehouse router
pub fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_warehouses).post(create_warehouse))
        .route(
            "/:id",
            get(get_warehouse)
                .put(update_warehouse)
                .delete(delete_warehouse),
        )
        .route("/:id/locations", get(list_locations))
}

/// List warehouses
#[utoipa::path(
    get,
    path = "/api/v1/warehouses",
    params(WarehouseListQuery),
    responses(
        (status = 200, description = "Warehouse list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn list_warehouses(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<WarehouseListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filters = WarehouseFilters {
        search: query.search.clone(),
        warehouse_type: query.warehouse_type.clone(),
        include_inactive: query.include_inactive.unwrap_or(false),
    };
    let page = PaginationParams {
        page: query.page,
        limit: query.limit,
        offset: query.offset,
    }
    .normalize();

    let (warehouses, total) = state
        .services
        .warehouses
        .list_warehouses(&ctx, &filters, &page)
        .await?;

    Ok(Json(ApiResponse::paginated(
        warehouses,
        PaginationMeta::new(&page, total),
    )))
}

/// Fetch one warehouse by id
pub async fn get_warehouse(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let warehouse = state.services.warehouses.get_warehouse(id, &ctx).await?;
    Ok(success_response(warehouse))
}

/// Create a warehouse
#[utoipa::path(
    post,
    path = "/api/v1/warehouses",
    request_body = CreateWarehouseRequest,
    responses(
        (status = 201, description = "Warehouse created"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn create_warehouse(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(payload): Json<CreateWarehouseRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let created = state
        .services
        .warehouses
        .create_warehouse(
            NewWarehouse {
                code: payload.code,
                name: payload.name,
                warehouse_type: payload.warehouse_type,
            },
            &ctx,
        )
        .await?;

    Ok(created_response(created))
}

/// Partially update a warehouse
pub async fn update_warehouse(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WarehousePatchRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let updated = state
        .services
        .warehouses
        .update_warehouse(
            id,
            WarehousePatch {
                name: payload.name,
                warehouse_type: payload.warehouse_type,
            },
            &ctx,
        )
        .await?;
    Ok(success_response(updated))
}

/// Soft-delete a warehouse
pub async fn delete_warehouse(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let deleted = state
        .services
        .warehouses
        .deactivate_warehouse(id, &ctx)
        .await?;
    Ok(success_response(deleted))
}

/// List the locations of a warehouse
#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/locations",
    params(("id" = Uuid, Path, description = "Warehouse ID")),
    responses(
        (status = 200, description = "Locations returned"),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn list_locations(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let locations = state.services.warehouses.list_locations(id, &ctx).await?;
    Ok(success_response(locations))
}
