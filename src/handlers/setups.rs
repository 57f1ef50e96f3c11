use axum::{
    extract::{Extension, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    entities::TrackingMode,
    errors::ServiceError,
    handlers::common::{created_response, success_response},
    pagination::{PaginationMeta, PaginationParams},
    services::setups::{NewSetup, SetupFilters, SetupPatch},
    tenant::TenantContext,
    ApiResponse, AppState,
};

/// Query parameters for the setup listing. `warehouse_id` accepts a single
/// id or a comma-separated list; multiple ids are OR-combined.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SetupListQuery {
    pub warehouse_id: Option<String>,
    pub item_type: Option<String>,
    pub tracking: Option<TrackingMode>,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    pub low_stock_configured: Option<bool>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSetupRequest {
    pub item_id: Uuid,
    pub warehouse_id: Uuid,
    #[serde(default)]
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub tracking_override: Option<TrackingMode>,
}

/// Partial update payload; absent fields are left untouched
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SetupPatchRequest {
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub tracking_override: Option<TrackingMode>,
}

impl From<SetupPatchRequest> for SetupPatch {
    fn from(req: SetupPatchRequest) -> Self {
        SetupPatch {
            min_stock: req.min_stock,
            max_stock: req.max_stock,
            reorder_point: req.reorder_point,
            tracking_override: req.tracking_override,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkUpdateSetupsRequest {
    pub ids: Vec<Uuid>,
    pub data: SetupPatchRequest,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DuplicateSetupRequest {
    pub source_id: Uuid,
    pub target_warehouse_ids: Vec<Uuid>,
    #[serde(default)]
    pub adjustments: Option<SetupPatchRequest>,
}

/// Create the setup router
pub fn setup_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_setups).post(create_setup))
        .route("/bulk", post(bulk_update_setups))
        .route("/duplicate", post(duplicate_setup))
        .route(
            "/:id",
            get(get_setup).put(update_setup).delete(delete_setup),
        )
}

fn parse_warehouse_ids(raw: Option<&str>) -> Result<Vec<Uuid>, ServiceError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Uuid::parse_str(part).map_err(|_| {
                ServiceError::InvalidInput(format!("'{}' is not a valid warehouse id", part))
            })
        })
        .collect()
}

impl SetupListQuery {
    fn filters(&self) -> Result<SetupFilters, ServiceError> {
        Ok(SetupFilters {
            warehouse_ids: parse_warehouse_ids(self.warehouse_id.as_deref())?,
            item_type: self.item_type.clone(),
            tracking: self.tracking,
            item_group_id: self.item_group_id,
            item_category_id: self.item_category_id,
            low_stock_configured: self.low_stock_configured,
            is_active: self.is_active,
        })
    }

    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// List setups with filtering and pagination
#[utoipa::path(
    get,
    path = "/api/v1/setup",
    params(SetupListQuery),
    responses(
        (status = 200, description = "Setup list returned"),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "setups"
)]
pub async fn list_setups(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<SetupListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filters = query.filters()?;
    let page = query.pagination().normalize();

    let (rows, total) = state.services.setups.list_setups(&ctx, &filters, &page).await?;

    Ok(Json(ApiResponse::paginated(
        rows,
        PaginationMeta::new(&page, total),
    )))
}

/// Create a setup
#[utoipa::path(
    post,
    path = "/api/v1/setup",
    request_body = CreateSetupRequest,
    responses(
        (status = 201, description = "Setup created"),
        (status = 400, description = "Invalid thresholds or references", body = crate::errors::ErrorResponse),
        (status = 409, description = "Active setup already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "setups"
)]
pub async fn create_setup(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(payload): Json<CreateSetupRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state
        .services
        .setups
        .create_setup(
            NewSetup {
                item_id: payload.item_id,
                warehouse_id: payload.warehouse_id,
                min_stock: payload.min_stock,
                max_stock: payload.max_stock,
                reorder_point: payload.reorder_point,
                tracking_override: payload.tracking_override,
            },
            &ctx,
        )
        .await?;

    Ok(created_response(created))
}

/// Fetch one setup by id
#[utoipa::path(
    get,
    path = "/api/v1/setup/{id}",
    params(("id" = Uuid, Path, description = "Setup ID")),
    responses(
        (status = 200, description = "Setup returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "setups"
)]
pub async fn get_setup(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let setup = state.services.setups.get_setup(id, &ctx).await?;
    Ok(success_response(setup))
}

/// Partially update a setup
#[utoipa::path(
    put,
    path = "/api/v1/setup/{id}",
    params(("id" = Uuid, Path, description = "Setup ID")),
    request_body = SetupPatchRequest,
    responses(
        (status = 200, description = "Setup updated"),
        (status = 400, description = "Invalid thresholds", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "setups"
)]
pub async fn update_setup(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetupPatchRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .setups
        .update_setup(id, payload.into(), &ctx)
        .await?;
    Ok(success_response(updated))
}

/// Soft-delete a setup; idempotent on an already-inactive row
#[utoipa::path(
    delete,
    path = "/api/v1/setup/{id}",
    params(("id" = Uuid, Path, description = "Setup ID")),
    responses(
        (status = 200, description = "Setup deactivated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "setups"
)]
pub async fn delete_setup(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let deleted = state.services.setups.delete_setup(id, &ctx).await?;
    Ok(success_response(deleted))
}

/// Apply the same partial patch to a list of setups
#[utoipa::path(
    post,
    path = "/api/v1/setup/bulk",
    request_body = BulkUpdateSetupsRequest,
    responses(
        (status = 200, description = "Bulk update applied"),
        (status = 400, description = "Invalid patch", body = crate::errors::ErrorResponse)
    ),
    tag = "setups"
)]
pub async fn bulk_update_setups(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(payload): Json<BulkUpdateSetupsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let result = state
        .services
        .setups
        .bulk_update_setups(&payload.ids, payload.data.into(), &ctx)
        .await?;
    Ok(success_response(result))
}

/// Duplicate a setup's configuration to other warehouses
#[utoipa::path(
    post,
    path = "/api/v1/setup/duplicate",
    request_body = DuplicateSetupRequest,
    responses(
        (status = 200, description = "Duplication finished; see created/skipped/failed lists"),
        (status = 404, description = "Source setup not found", body = crate::errors::ErrorResponse)
    ),
    tag = "setups"
)]
pub async fn duplicate_setup(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Json(payload): Json<DuplicateSetupRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let adjustments = payload.adjustments.map(SetupPatch::from).unwrap_or_default();
    let result = state
        .services
        .setups
        .duplicate_setup(payload.source_id, &payload.target_warehouse_ids, adjustments, &ctx)
        .await?;
    Ok(success_response(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warehouse_id_list_parses_single_and_multiple() {
        assert!(parse_warehouse_ids(None).unwrap().is_empty());

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_warehouse_ids(Some(&format!("{}, {}", a, b))).unwrap();
        assert_eq!(parsed, vec![a, b]);

        let single = parse_warehouse_ids(Some(&a.to_string())).unwrap();
        assert_eq!(single, vec![a]);
    }

    #[test]
    fn warehouse_id_list_rejects_junk() {
        let err = parse_warehouse_ids(Some("not-a-uuid")).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn blank_segments_are_ignored() {
        let a = Uuid::new_v4();
        let parsed = parse_warehouse_ids(Some(&format!(",{}, ,", a))).unwrap();
        assert_eq!(parsed, vec![a]);
    }
}
