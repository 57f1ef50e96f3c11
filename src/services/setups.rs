use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, SqlErr,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        inventory_setup::{self, Entity as Setup, Column as SetupColumn},
        item::{self, Entity as Item, Column as ItemColumn},
        warehouse::{self, Entity as Warehouse, Column as WarehouseColumn},
        LifecycleState, TrackingMode,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    pagination::PageRequest,
    tenant::TenantContext,
};

/// Filters accepted by the setup listing endpoint. Item-side filters apply
/// to the joined item master row.
#[derive(Debug, Clone, Default)]
pub struct SetupFilters {
    /// OR-combined warehouse restriction
    pub warehouse_ids: Vec<Uuid>,
    pub item_type: Option<String>,
    pub tracking: Option<TrackingMode>,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    /// true: only setups with a reorder point configured; false: only setups
    /// without one. "Configured" is a presence check, so a reorder point of
    /// zero still counts as configured.
    pub low_stock_configured: Option<bool>,
    /// Defaults to active rows; `Some(false)` selects soft-deleted rows
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewSetup {
    pub item_id: Uuid,
    pub warehouse_id: Uuid,
    pub min_stock: i32,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub tracking_override: Option<TrackingMode>,
}

/// Partial patch over a setup's configuration fields. Absent fields are left
/// untouched. Also used as the adjustment overlay during duplication.
#[derive(Debug, Clone, Default)]
pub struct SetupPatch {
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub tracking_override: Option<TrackingMode>,
}

impl SetupPatch {
    pub fn is_empty(&self) -> bool {
        self.min_stock.is_none()
            && self.max_stock.is_none()
            && self.reorder_point.is_none()
            && self.tracking_override.is_none()
    }
}

/// Item fields carried alongside each setup row in listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemSummary {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub item_type: String,
    pub tracking_mode: TrackingMode,
}

impl From<item::Model> for ItemSummary {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            sku: model.sku,
            name: model.name,
            item_type: model.item_type,
            tracking_mode: model.tracking_mode,
        }
    }
}

/// Warehouse fields carried alongside each setup row in listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WarehouseSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub warehouse_type: String,
}

impl From<warehouse::Model> for WarehouseSummary {
    fn from(model: warehouse::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            warehouse_type: model.warehouse_type,
        }
    }
}

/// A setup annotated with its item and warehouse summaries
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SetupRow {
    #[serde(flatten)]
    pub setup: inventory_setup::Model,
    pub item: Option<ItemSummary>,
    pub warehouse: Option<WarehouseSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkUpdateResult {
    pub updated_count: usize,
    pub updated: Vec<inventory_setup::Model>,
}

/// Target skipped during duplication because an active setup already exists
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkippedTarget {
    pub warehouse_id: Uuid,
    pub existing_setup_id: Uuid,
}

/// Target that failed during duplication; other targets are unaffected
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FailedTarget {
    pub warehouse_id: Uuid,
    pub reason: String,
}

/// Per-target outcome of a duplication batch. The operation is not
/// transactional across targets: entries in `created` stay committed no
/// matter what happened to later targets.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DuplicationResult {
    pub created: Vec<inventory_setup::Model>,
    pub skipped: Vec<SkippedTarget>,
    pub failed: Vec<FailedTarget>,
}

/// Service orchestrating the per-(item, warehouse) configuration records
pub struct InventorySetupService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl InventorySetupService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn scoped(ctx: &TenantContext) -> Select<Setup> {
        Setup::find()
            .filter(SetupColumn::TenantId.eq(&ctx.tenant_id))
            .filter(SetupColumn::StageId.eq(&ctx.stage_id))
    }

    fn scoped_active(ctx: &TenantContext) -> Select<Setup> {
        Self::scoped(ctx).filter(SetupColumn::Status.eq(LifecycleState::Active))
    }

    /// Checks the stock thresholds, naming every offending field so the
    /// caller can surface them verbatim.
    fn validate_thresholds(
        min_stock: i32,
        max_stock: Option<i32>,
        reorder_point: Option<i32>,
    ) -> Result<(), ServiceError> {
        let mut problems = Vec::new();
        if min_stock < 0 {
            problems.push(format!("min_stock ({}) must be non-negative", min_stock));
        }
        if let Some(max) = max_stock {
            if max < 0 {
                problems.push(format!("max_stock ({}) must be non-negative", max));
            } else if min_stock >= 0 && max < min_stock {
                problems.push(format!(
                    "max_stock ({}) must be greater than or equal to min_stock ({})",
                    max, min_stock
                ));
            }
        }
        if let Some(reorder) = reorder_point {
            if reorder < 0 {
                problems.push(format!(
                    "reorder_point ({}) must be non-negative",
                    reorder
                ));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(problems.join("; ")))
        }
    }

    /// Threshold values a row would hold after applying `patch`
    fn merged_thresholds(
        row: &inventory_setup::Model,
        patch: &SetupPatch,
    ) -> (i32, Option<i32>, Option<i32>) {
        (
            patch.min_stock.unwrap_or(row.min_stock),
            patch.max_stock.or(row.max_stock),
            patch.reorder_point.or(row.reorder_point),
        )
    }

    /// First-occurrence-order dedup; the recorded outcome lists stay
    /// deterministic for a given input order.
    fn dedupe_preserving_order(ids: &[Uuid]) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        ids.iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    async fn find_active_binding(
        &self,
        item_id: Uuid,
        warehouse_id: Uuid,
        ctx: &TenantContext,
    ) -> Result<Option<inventory_setup::Model>, ServiceError> {
        let db = &*self.db_pool;
        Self::scoped_active(ctx)
            .filter(SetupColumn::ItemId.eq(item_id))
            .filter(SetupColumn::WarehouseId.eq(warehouse_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(item_id = %item_id, warehouse_id = %warehouse_id, error = %e,
                    "Database error when checking for existing setup");
                ServiceError::db_error(e)
            })
    }

    /// List setups, each annotated with item and warehouse summaries
    #[instrument(skip(self))]
    pub async fn list_setups(
        &self,
        ctx: &TenantContext,
        filters: &SetupFilters,
        page: &PageRequest,
    ) -> Result<(Vec<SetupRow>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Setup::find()
            .find_also_related(Item)
            .filter(SetupColumn::TenantId.eq(&ctx.tenant_id))
            .filter(SetupColumn::StageId.eq(&ctx.stage_id));
        query = match filters.is_active {
            Some(false) => query.filter(SetupColumn::Status.eq(LifecycleState::Inactive)),
            _ => query.filter(SetupColumn::Status.eq(LifecycleState::Active)),
        };
        if !filters.warehouse_ids.is_empty() {
            query = query.filter(SetupColumn::WarehouseId.is_in(filters.warehouse_ids.clone()));
        }
        if let Some(configured) = filters.low_stock_configured {
            query = if configured {
                query.filter(SetupColumn::ReorderPoint.is_not_null())
            } else {
                query.filter(SetupColumn::ReorderPoint.is_null())
            };
        }
        if let Some(item_type) = &filters.item_type {
            query = query.filter(ItemColumn::ItemType.eq(item_type));
        }
        if let Some(tracking) = filters.tracking {
            query = query.filter(ItemColumn::TrackingMode.eq(tracking));
        }
        if let Some(group_id) = filters.item_group_id {
            query = query.filter(ItemColumn::ItemGroupId.eq(group_id));
        }
        if let Some(category_id) = filters.item_category_id {
            query = query.filter(ItemColumn::ItemCategoryId.eq(category_id));
        }
        let query = query.order_by_asc(SetupColumn::CreatedAt);

        let total = query.clone().count(db).await.map_err(|e| {
            error!(error = %e, "Database error when counting setups");
            ServiceError::db_error(e)
        })?;

        let rows = query
            .offset(page.offset)
            .limit(page.limit)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when fetching setups");
                ServiceError::db_error(e)
            })?;

        // Batch-load the referenced warehouses for the summary annotations
        let warehouse_ids: Vec<Uuid> = rows
            .iter()
            .map(|(setup, _)| setup.warehouse_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let warehouses: HashMap<Uuid, warehouse::Model> = if warehouse_ids.is_empty() {
            HashMap::new()
        } else {
            Warehouse::find()
                .filter(WarehouseColumn::TenantId.eq(&ctx.tenant_id))
                .filter(WarehouseColumn::StageId.eq(&ctx.stage_id))
                .filter(WarehouseColumn::Id.is_in(warehouse_ids))
                .all(db)
                .await
                .map_err(|e| {
                    error!(error = %e, "Database error when fetching warehouse summaries");
                    ServiceError::db_error(e)
                })?
                .into_iter()
                .map(|w| (w.id, w))
                .collect()
        };

        let rows = rows
            .into_iter()
            .map(|(setup, item)| {
                let warehouse = warehouses.get(&setup.warehouse_id).cloned();
                SetupRow {
                    setup,
                    item: item.map(ItemSummary::from),
                    warehouse: warehouse.map(WarehouseSummary::from),
                }
            })
            .collect();

        Ok((rows, total))
    }

    /// Get a setup by id, tenant-scoped
    #[instrument(skip(self))]
    pub async fn get_setup(
        &self,
        id: Uuid,
        ctx: &TenantContext,
    ) -> Result<inventory_setup::Model, ServiceError> {
        let db = &*self.db_pool;

        Self::scoped_active(ctx)
            .filter(SetupColumn::Id.eq(id))
            .one(db)
            .await
            .map_err(|e| {
                error!(setup_id = %id, error = %e, "Database error when fetching setup");
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Setup with ID {} not found", id)))
    }

    /// Create a setup binding an item to a warehouse
    #[instrument(skip(self))]
    pub async fn create_setup(
        &self,
        data: NewSetup,
        ctx: &TenantContext,
    ) -> Result<inventory_setup::Model, ServiceError> {
        let db = &*self.db_pool;

        // Validation happens before any write so nothing is persisted on a
        // rejected request
        Self::validate_thresholds(data.min_stock, data.max_stock, data.reorder_point)?;

        // Setups reference their item and warehouse by id only; reject
        // orphaned references instead of persisting them
        let item = Item::find()
            .filter(ItemColumn::TenantId.eq(&ctx.tenant_id))
            .filter(ItemColumn::StageId.eq(&ctx.stage_id))
            .filter(ItemColumn::Id.eq(data.item_id))
            .filter(ItemColumn::Status.eq(LifecycleState::Active))
            .one(db)
            .await
            .map_err(|e| {
                error!(item_id = %data.item_id, error = %e, "Database error when resolving item");
                ServiceError::db_error(e)
            })?;
        if item.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "item_id {} does not reference an active item",
                data.item_id
            )));
        }
        let warehouse = Warehouse::find()
            .filter(WarehouseColumn::TenantId.eq(&ctx.tenant_id))
            .filter(WarehouseColumn::StageId.eq(&ctx.stage_id))
            .filter(WarehouseColumn::Id.eq(data.warehouse_id))
            .filter(WarehouseColumn::Status.eq(LifecycleState::Active))
            .one(db)
            .await
            .map_err(|e| {
                error!(warehouse_id = %data.warehouse_id, error = %e, "Database error when resolving warehouse");
                ServiceError::db_error(e)
            })?;
        if warehouse.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "warehouse_id {} does not reference an active warehouse",
                data.warehouse_id
            )));
        }

        if let Some(existing) = self
            .find_active_binding(data.item_id, data.warehouse_id, ctx)
            .await?
        {
            return Err(ServiceError::Conflict(format!(
                "An active setup ({}) already exists for item {} in warehouse {}",
                existing.id, data.item_id, data.warehouse_id
            )));
        }

        let now = Utc::now();
        let model = inventory_setup::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(ctx.tenant_id.clone()),
            stage_id: Set(ctx.stage_id.clone()),
            item_id: Set(data.item_id),
            warehouse_id: Set(data.warehouse_id),
            min_stock: Set(data.min_stock),
            max_stock: Set(data.max_stock),
            reorder_point: Set(data.reorder_point),
            tracking_override: Set(data.tracking_override),
            status: Set(LifecycleState::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The partial unique index closes the race between two concurrent
        // creates for the same binding; a lost race surfaces as Conflict
        let created = model.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict(format!(
                    "An active setup already exists for item {} in warehouse {}",
                    data.item_id, data.warehouse_id
                ))
            } else {
                error!(item_id = %data.item_id, warehouse_id = %data.warehouse_id, error = %e,
                    "Database error when creating setup");
                ServiceError::db_error(e)
            }
        })?;

        self.event_sender
            .send(Event::SetupCreated {
                tenant_id: ctx.tenant_id.clone(),
                setup_id: created.id,
                item_id: created.item_id,
                warehouse_id: created.warehouse_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(setup_id = %created.id, item_id = %created.item_id,
            warehouse_id = %created.warehouse_id, "Setup created");
        Ok(created)
    }

    fn apply_patch(model: &mut inventory_setup::ActiveModel, patch: &SetupPatch) {
        if let Some(min_stock) = patch.min_stock {
            model.min_stock = Set(min_stock);
        }
        if let Some(max_stock) = patch.max_stock {
            model.max_stock = Set(Some(max_stock));
        }
        if let Some(reorder_point) = patch.reorder_point {
            model.reorder_point = Set(Some(reorder_point));
        }
        if let Some(tracking) = patch.tracking_override {
            model.tracking_override = Set(Some(tracking));
        }
        model.updated_at = Set(Utc::now());
    }

    /// Partially update a setup
    #[instrument(skip(self))]
    pub async fn update_setup(
        &self,
        id: Uuid,
        patch: SetupPatch,
        ctx: &TenantContext,
    ) -> Result<inventory_setup::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get_setup(id, ctx).await?;

        let (min_stock, max_stock, reorder_point) = Self::merged_thresholds(&existing, &patch);
        Self::validate_thresholds(min_stock, max_stock, reorder_point)?;

        let mut model: inventory_setup::ActiveModel = existing.into();
        Self::apply_patch(&mut model, &patch);

        let updated = model.update(db).await.map_err(|e| {
            error!(setup_id = %id, error = %e, "Database error when updating setup");
            ServiceError::db_error(e)
        })?;

        self.event_sender
            .send(Event::SetupUpdated {
                tenant_id: ctx.tenant_id.clone(),
                setup_id: updated.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(setup_id = %updated.id, "Setup updated");
        Ok(updated)
    }

    /// Soft-delete a setup. Deletion is a state transition, not an event: a
    /// second call on an already-inactive row is a no-op success.
    #[instrument(skip(self))]
    pub async fn delete_setup(
        &self,
        id: Uuid,
        ctx: &TenantContext,
    ) -> Result<inventory_setup::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = Self::scoped(ctx)
            .filter(SetupColumn::Id.eq(id))
            .one(db)
            .await
            .map_err(|e| {
                error!(setup_id = %id, error = %e, "Database error when fetching setup");
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Setup with ID {} not found", id)))?;

        if existing.status == LifecycleState::Inactive {
            return Ok(existing);
        }

        let mut model: inventory_setup::ActiveModel = existing.into();
        model.status = Set(LifecycleState::Inactive);
        model.updated_at = Set(Utc::now());

        let updated = model.update(db).await.map_err(|e| {
            error!(setup_id = %id, error = %e, "Database error when deactivating setup");
            ServiceError::db_error(e)
        })?;

        self.event_sender
            .send(Event::SetupDeactivated {
                tenant_id: ctx.tenant_id.clone(),
                setup_id: updated.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(setup_id = %updated.id, "Setup deactivated");
        Ok(updated)
    }

    /// Apply the same partial patch to every id that resolves under this
    /// tenant. Ids that do not resolve are silently skipped: cross-tenant
    /// ids must never error out information about their existence.
    #[instrument(skip(self))]
    pub async fn bulk_update_setups(
        &self,
        ids: &[Uuid],
        patch: SetupPatch,
        ctx: &TenantContext,
    ) -> Result<BulkUpdateResult, ServiceError> {
        let db = &*self.db_pool;

        if ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "ids must contain at least one setup id".into(),
            ));
        }

        let ids = Self::dedupe_preserving_order(ids);

        let resolved: HashMap<Uuid, inventory_setup::Model> = Self::scoped_active(ctx)
            .filter(SetupColumn::Id.is_in(ids.clone()))
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when resolving setups for bulk update");
                ServiceError::db_error(e)
            })?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        // Validate every merged row before writing anything, so a rejected
        // patch leaves no partial state behind
        for id in &ids {
            if let Some(row) = resolved.get(id) {
                let (min_stock, max_stock, reorder_point) =
                    Self::merged_thresholds(row, &patch);
                Self::validate_thresholds(min_stock, max_stock, reorder_point).map_err(|e| {
                    ServiceError::ValidationError(format!(
                        "setup {}: {}",
                        id,
                        match e {
                            ServiceError::ValidationError(msg) => msg,
                            other => other.to_string(),
                        }
                    ))
                })?;
            }
        }

        // Sequential, in input order, so the result list is deterministic
        let mut updated = Vec::new();
        for id in &ids {
            let Some(row) = resolved.get(id) else {
                continue;
            };
            let mut model: inventory_setup::ActiveModel = row.clone().into();
            Self::apply_patch(&mut model, &patch);
            let row = model.update(db).await.map_err(|e| {
                error!(setup_id = %id, error = %e, "Database error during bulk update");
                ServiceError::db_error(e)
            })?;
            updated.push(row);
        }

        self.event_sender
            .send(Event::SetupsBulkUpdated {
                tenant_id: ctx.tenant_id.clone(),
                setup_ids: updated.iter().map(|s| s.id).collect(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(requested = ids.len(), updated = updated.len(), "Bulk setup update applied");
        Ok(BulkUpdateResult {
            updated_count: updated.len(),
            updated,
        })
    }

    /// Copy a setup's configuration to other warehouses, with an optional
    /// adjustment overlay. Each target is an independent unit of work; one
    /// target's failure never rolls back earlier successes.
    #[instrument(skip(self))]
    pub async fn duplicate_setup(
        &self,
        source_id: Uuid,
        target_warehouse_ids: &[Uuid],
        adjustments: SetupPatch,
        ctx: &TenantContext,
    ) -> Result<DuplicationResult, ServiceError> {
        let db = &*self.db_pool;

        let source = self.get_setup(source_id, ctx).await?;

        // The merged configuration is the same for every target, so one
        // validation pass up front covers the whole batch
        let (min_stock, max_stock, reorder_point) =
            Self::merged_thresholds(&source, &adjustments);
        Self::validate_thresholds(min_stock, max_stock, reorder_point)?;
        let tracking_override = adjustments
            .tracking_override
            .or(source.tracking_override);

        let targets: Vec<Uuid> = Self::dedupe_preserving_order(target_warehouse_ids)
            .into_iter()
            .filter(|id| *id != source.warehouse_id)
            .collect();

        let mut result = DuplicationResult::default();

        for target in targets {
            let warehouse = Warehouse::find()
                .filter(WarehouseColumn::TenantId.eq(&ctx.tenant_id))
                .filter(WarehouseColumn::StageId.eq(&ctx.stage_id))
                .filter(WarehouseColumn::Id.eq(target))
                .filter(WarehouseColumn::Status.eq(LifecycleState::Active))
                .one(db)
                .await
                .map_err(|e| {
                    error!(warehouse_id = %target, error = %e, "Database error when resolving target warehouse");
                    ServiceError::db_error(e)
                })?;
            if warehouse.is_none() {
                result.failed.push(FailedTarget {
                    warehouse_id: target,
                    reason: "warehouse does not reference an active warehouse in this tenant context".into(),
                });
                continue;
            }

            if let Some(existing) = self
                .find_active_binding(source.item_id, target, ctx)
                .await?
            {
                result.skipped.push(SkippedTarget {
                    warehouse_id: target,
                    existing_setup_id: existing.id,
                });
                continue;
            }

            let now = Utc::now();
            let model = inventory_setup::ActiveModel {
                id: Set(Uuid::new_v4()),
                tenant_id: Set(ctx.tenant_id.clone()),
                stage_id: Set(ctx.stage_id.clone()),
                item_id: Set(source.item_id),
                warehouse_id: Set(target),
                min_stock: Set(min_stock),
                max_stock: Set(max_stock),
                reorder_point: Set(reorder_point),
                tracking_override: Set(tracking_override),
                status: Set(LifecycleState::Active),
                created_at: Set(now),
                updated_at: Set(now),
            };

            // A failed insert (e.g. a lost uniqueness race) marks this
            // target failed and moves on; earlier creates stay committed
            match model.insert(db).await {
                Ok(created) => result.created.push(created),
                Err(e) => {
                    warn!(source_id = %source.id, warehouse_id = %target, error = %e,
                        "Duplication target failed");
                    let err = ServiceError::db_error(e);
                    result.failed.push(FailedTarget {
                        warehouse_id: target,
                        reason: err.response_message(),
                    });
                }
            }
        }

        self.event_sender
            .send(Event::SetupDuplicated {
                tenant_id: ctx.tenant_id.clone(),
                source_setup_id: source.id,
                created_setup_ids: result.created.iter().map(|s| s.id).collect(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(source_id = %source.id, created = result.created.len(),
            skipped = result.skipped.len(), failed = result.failed.len(),
            "Setup duplication finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn setup_row(min_stock: i32, max_stock: Option<i32>, reorder: Option<i32>) -> inventory_setup::Model {
        inventory_setup::Model {
            id: Uuid::new_v4(),
            tenant_id: "acme".into(),
            stage_id: "dev".into(),
            item_id: Uuid::new_v4(),
            warehouse_id: Uuid::new_v4(),
            min_stock,
            max_stock,
            reorder_point: reorder,
            tracking_override: None,
            status: LifecycleState::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn thresholds_accept_sane_values() {
        assert!(InventorySetupService::validate_thresholds(0, None, None).is_ok());
        assert!(InventorySetupService::validate_thresholds(5, Some(10), Some(0)).is_ok());
        assert!(InventorySetupService::validate_thresholds(5, Some(5), None).is_ok());
    }

    #[test]
    fn thresholds_reject_negative_values() {
        let err = InventorySetupService::validate_thresholds(-1, None, Some(-2)).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(msg) => {
            assert!(msg.contains("min_stock"));
            assert!(msg.contains("reorder_point"));
        });
    }

    #[test]
    fn thresholds_reject_max_below_min_naming_both_fields() {
        let err = InventorySetupService::validate_thresholds(50, Some(10), None).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(msg) => {
            assert!(msg.contains("min_stock"));
            assert!(msg.contains("max_stock"));
        });
    }

    #[test]
    fn merged_thresholds_overlay_patch_on_row() {
        let row = setup_row(5, Some(20), None);
        let patch = SetupPatch {
            min_stock: Some(8),
            reorder_point: Some(3),
            ..Default::default()
        };
        let (min, max, reorder) = InventorySetupService::merged_thresholds(&row, &patch);
        assert_eq!(min, 8);
        assert_eq!(max, Some(20));
        assert_eq!(reorder, Some(3));
    }

    #[test]
    fn dedupe_preserves_first_occurrence_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let deduped =
            InventorySetupService::dedupe_preserving_order(&[b, a, b, c, a]);
        assert_eq!(deduped, vec![b, a, c]);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(SetupPatch::default().is_empty());
        assert!(!SetupPatch {
            min_stock: Some(1),
            ..Default::default()
        }
        .is_empty());
    }
}
