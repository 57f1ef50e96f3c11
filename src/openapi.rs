use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Setup API",
        version = "0.1.0",
        description = r#"
# Inventory Setup API

Tenant-scoped inventory configuration for a multi-warehouse ERP backend.

## Tenant context

Every endpoint is scoped by the `x-tenant-id` and `x-stage-id` headers.
When absent, the configured defaults apply. A record belonging to another
tenant is indistinguishable from a missing record.

## Pagination

List endpoints accept `page`, `limit` (max 1000) and `offset` query
parameters. A present `page` overrides any explicit offset.

## Error handling

Failures use a consistent envelope:

```json
{
  "success": false,
  "error": {
    "error": "Conflict",
    "message": "An active setup already exists for item ... in warehouse ...",
    "timestamp": "2026-01-01T00:00:00Z"
  }
}
```
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        crate::handlers::setups::list_setups,
        crate::handlers::setups::create_setup,
        crate::handlers::setups::get_setup,
        crate::handlers::setups::update_setup,
        crate::handlers::setups::delete_setup,
        crate::handlers::setups::bulk_update_setups,
        crate::handlers::setups::duplicate_setup,
        crate::handlers::items::list_items,
        crate::handlers::items::list_items_without_setup,
        crate::handlers::items::create_item,
        crate::handlers::warehouses::list_warehouses,
        crate::handlers::warehouses::create_warehouse,
        crate::handlers::warehouses::list_locations,
    ),
    components(schemas(
        crate::entities::LifecycleState,
        crate::entities::TrackingMode,
        crate::entities::item::Model,
        crate::entities::warehouse::Model,
        crate::entities::location::Model,
        crate::entities::inventory_setup::Model,
        crate::handlers::setups::CreateSetupRequest,
        crate::handlers::setups::SetupPatchRequest,
        crate::handlers::setups::BulkUpdateSetupsRequest,
        crate::handlers::setups::DuplicateSetupRequest,
        crate::handlers::items::CreateItemRequest,
        crate::handlers::items::ItemPatchRequest,
        crate::handlers::warehouses::CreateWarehouseRequest,
        crate::handlers::warehouses::WarehousePatchRequest,
        crate::services::setups::SetupRow,
        crate::services::setups::ItemSummary,
        crate::services::setups::WarehouseSummary,
        crate::services::setups::BulkUpdateResult,
        crate::services::setups::SkippedTarget,
        crate::services::setups::FailedTarget,
        crate::services::setups::DuplicationResult,
        crate::errors::ErrorBody,
        crate::errors::ErrorResponse,
        crate::pagination::PaginationMeta,
    )),
    tags(
        (name = "setups", description = "Per-(item, warehouse) configuration, bulk edit and duplication"),
        (name = "items", description = "Item catalog"),
        (name = "warehouses", description = "Warehouses and locations")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /swagger-ui, serving the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).expect("document serializes");
        assert!(json.contains("/api/v1/setup"));
        assert!(json.contains("/api/v1/items-without-setup"));
    }
}
