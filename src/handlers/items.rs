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
    entities::TrackingMode,
    errors::ServiceError,
    handlers::common::{created_response, success_response, validate_input},
    pagination::{PaginationMeta, PaginationParams},
    services::items::{ItemFilters, ItemPatch, NewItem},
    tenant::TenantContext,
    ApiResponse, AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ItemListQuery {
    /// Substring match over SKU and name
    pub search: Option<String>,
    pub item_type: Option<String>,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    pub tracking: Option<TrackingMode>,
    pub include_inactive: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<i64>,
}

impl ItemListQuery {
    fn filters(&self) -> ItemFilters {
        ItemFilters {
            search: self.search.clone(),
            item_type: self.item_type.clone(),
            item_group_id: self.item_group_id,
            item_category_id: self.item_category_id,
            tracking_mode: self.tracking,
            include_inactive: self.include_inactive.unwrap_or(false),
        }
    }

    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Query parameters for the items-without-setup listing; `warehouse_id`
/// narrows the check to one warehouse.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ItemsWithoutSetupQuery {
    pub warehouse_id: Option<Uuid>,
    pub search: Option<String>,
    pub item_type: Option<String>,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    pub tracking: Option<TrackingMode>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub item_type: String,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    #[serde(default = "default_tracking_mode")]
    pub tracking_mode: TrackingMode,
}

fn default_tracking_mode() -> TrackingMode {
    TrackingMode::None
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct ItemPatchRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub item_type: Option<String>,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    pub tracking_mode: Option<TrackingMode>,
}

/// Create the item catalog router
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

/// List catalog items
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ItemListQuery),
    responses(
        (status = 200, description = "Item list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<ItemListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = query.pagination().normalize();
    let (items, total) = state
        .services
        .items
        .list_items(&ctx, &query.filters(), &page)
        .await?;

    Ok(Json(ApiResponse::paginated(
        items,
        PaginationMeta::new(&page, total),
    )))
}

/// List items that have no active setup yet
#[utoipa::path(
    get,
    path = "/api/v1/items-without-setup",
    params(ItemsWithoutSetupQuery),
    responses(
        (status = 200, description = "Unconfigured items returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_items_without_setup(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<ItemsWithoutSetupQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filters = ItemFilters {
        search: query.search.clone(),
        item_type: query.item_type.clone(),
        item_group_id: query.item_group_id,
        item_category_id: query.item_category_id,
        tracking_mode: query.tracking,
        include_inactive: false,
    };
    let page = PaginationParams {
        page: query.page,
        limit: query.limit,
        offset: query.offset,
    }
    .normalize();

    let (items, total) = state
        .services
        .items
        .list_items_without_setup(&ctx, &filters, query.warehouse_id, &page)
        .await?;

    Ok(Json(ApiResponse::paginated(
        items,
        PaginationMeta::new(&page, total),
    )))
}

/// Fetch one item by id
pub async fn get_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.items.get_item(id, &ctx).await?;
    Ok(success_response(item))
}

/// Create a catalog item
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let created = state
        .services
        .items
        .create_item(
            NewItem {
                sku: payload.sku,
                name: payload.name,
                item_type: payload.item_type,
                item_group_id: payload.item_group_id,
                item_category_id: payload.item_category_id,
                tracking_mode: payload.tracking_mode,
            },
            &ctx,
        )
        .await?;

    Ok(created_response(created))
}

/// Partially update an item
pub async fn update_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemPatchRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let updated = state
        .services
        .items
        .update_item(
            id,
            ItemPatch {
                name: payload.name,
                item_type: payload.item_type,
                item_group_id: payload.item_group_id,
                item_category_id: payload.item_category_id,
                tracking_mode: payload.tracking_mode,
            },
            &ctx,
        )
        .await?;
    Ok(success_response(updated))
}

/// Soft-delete an item
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let deleted = state.services.items.deactivate_item(id, &ctx).await?;
    Ok(success_response(deleted))
}
