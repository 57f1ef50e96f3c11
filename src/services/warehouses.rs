use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        location::{self, Entity as Location, Column as LocationColumn},
        warehouse::{self, Entity as Warehouse, Column as WarehouseColumn},
        LifecycleState,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    pagination::PageRequest,
    tenant::TenantContext,
};

#[derive(Debug, Clone, Default)]
pub struct WarehouseFilters {
    /// Substring match over code and name
    pub search: Option<String>,
    pub warehouse_type: Option<String>,
    pub include_inactive: bool,
}

#[derive(Debug, Clone)]
pub struct NewWarehouse {
    pub code: String,
    pub name: String,
    pub warehouse_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct WarehousePatch {
    pub name: Option<String>,
    pub warehouse_type: Option<String>,
}

/// Service owning warehouse and location records
pub struct WarehouseService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl WarehouseService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn scoped(ctx: &TenantContext) -> Select<Warehouse> {
        Warehouse::find()
            .filter(WarehouseColumn::TenantId.eq(&ctx.tenant_id))
            .filter(WarehouseColumn::StageId.eq(&ctx.stage_id))
    }

    /// List warehouses with filters and pagination
    #[instrument(skip(self))]
    pub async fn list_warehouses(
        &self,
        ctx: &TenantContext,
        filters: &WarehouseFilters,
        page: &PageRequest,
    ) -> Result<(Vec<warehouse::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Self::scoped(ctx);
        if !filters.include_inactive {
            query = query.filter(WarehouseColumn::Status.eq(LifecycleState::Active));
        }
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            query = query.filter(
                WarehouseColumn::Code
                    .like(&pattern)
                    .or(WarehouseColumn::Name.like(&pattern)),
            );
        }
        if let Some(warehouse_type) = &filters.warehouse_type {
            query = query.filter(WarehouseColumn::WarehouseType.eq(warehouse_type));
        }
        let query = query.order_by_asc(WarehouseColumn::Code);

        let total = query.clone().count(db).await.map_err(|e| {
            error!(error = %e, "Database error when counting warehouses");
            ServiceError::db_error(e)
        })?;

        let warehouses = query
            .offset(page.offset)
            .limit(page.limit)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when fetching warehouses");
                ServiceError::db_error(e)
            })?;

        Ok((warehouses, total))
    }

    /// Get a warehouse by id, tenant-scoped
    #[instrument(skip(self))]
    pub async fn get_warehouse(
        &self,
        id: Uuid,
        ctx: &TenantContext,
    ) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;

        Self::scoped(ctx)
            .filter(WarehouseColumn::Id.eq(id))
            .filter(WarehouseColumn::Status.eq(LifecycleState::Active))
            .one(db)
            .await
            .map_err(|e| {
                error!(warehouse_id = %id, error = %e, "Database error when fetching warehouse");
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Warehouse with ID {} not found", id)))
    }

    /// Create a new warehouse
    #[instrument(skip(self))]
    pub async fn create_warehouse(
        &self,
        data: NewWarehouse,
        ctx: &TenantContext,
    ) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = Self::scoped(ctx)
            .filter(WarehouseColumn::Code.eq(&data.code))
            .one(db)
            .await
            .map_err(|e| {
                error!(code = %data.code, error = %e, "Database error when checking for existing code");
                ServiceError::db_error(e)
            })?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Warehouse with code '{}' already exists",
                data.code
            )));
        }

        let now = Utc::now();
        let model = warehouse::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(ctx.tenant_id.clone()),
            stage_id: Set(ctx.stage_id.clone()),
            code: Set(data.code.clone()),
            name: Set(data.name),
            warehouse_type: Set(data.warehouse_type),
            status: Set(LifecycleState::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(|e| {
            error!(code = %data.code, error = %e, "Database error when creating warehouse");
            ServiceError::db_error(e)
        })?;

        self.event_sender
            .send(Event::WarehouseCreated {
                tenant_id: ctx.tenant_id.clone(),
                warehouse_id: created.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(warehouse_id = %created.id, code = %created.code, "Warehouse created");
        Ok(created)
    }

    /// Partially update a warehouse
    #[instrument(skip(self))]
    pub async fn update_warehouse(
        &self,
        id: Uuid,
        patch: WarehousePatch,
        ctx: &TenantContext,
    ) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get_warehouse(id, ctx).await?;
        let mut model: warehouse::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(warehouse_type) = patch.warehouse_type {
            model.warehouse_type = Set(warehouse_type);
        }
        model.updated_at = Set(Utc::now());

        let updated = model.update(db).await.map_err(|e| {
            error!(warehouse_id = %id, error = %e, "Database error when updating warehouse");
            ServiceError::db_error(e)
        })?;

        self.event_sender
            .send(Event::WarehouseUpdated {
                tenant_id: ctx.tenant_id.clone(),
                warehouse_id: updated.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(warehouse_id = %updated.id, "Warehouse updated");
        Ok(updated)
    }

    /// Soft-delete a warehouse; idempotent on an already-inactive row
    #[instrument(skip(self))]
    pub async fn deactivate_warehouse(
        &self,
        id: Uuid,
        ctx: &TenantContext,
    ) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = Self::scoped(ctx)
            .filter(WarehouseColumn::Id.eq(id))
            .one(db)
            .await
            .map_err(|e| {
                error!(warehouse_id = %id, error = %e, "Database error when fetching warehouse");
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Warehouse with ID {} not found", id))
            })?;

        if existing.status == LifecycleState::Inactive {
            return Ok(existing);
        }

        let mut model: warehouse::ActiveModel = existing.into();
        model.status = Set(LifecycleState::Inactive);
        model.updated_at = Set(Utc::now());

        let updated = model.update(db).await.map_err(|e| {
            error!(warehouse_id = %id, error = %e, "Database error when deactivating warehouse");
            ServiceError::db_error(e)
        })?;

        self.event_sender
            .send(Event::WarehouseDeactivated {
                tenant_id: ctx.tenant_id.clone(),
                warehouse_id: updated.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(warehouse_id = %updated.id, "Warehouse deactivated");
        Ok(updated)
    }

    /// List the locations belonging to a warehouse
    #[instrument(skip(self))]
    pub async fn list_locations(
        &self,
        warehouse_id: Uuid,
        ctx: &TenantContext,
    ) -> Result<Vec<location::Model>, ServiceError> {
        let db = &*self.db_pool;

        // Resolve the warehouse first so an unknown or cross-tenant id is a
        // NotFound rather than an empty list
        self.get_warehouse(warehouse_id, ctx).await?;

        Location::find()
            .filter(LocationColumn::TenantId.eq(&ctx.tenant_id))
            .filter(LocationColumn::StageId.eq(&ctx.stage_id))
            .filter(LocationColumn::WarehouseId.eq(warehouse_id))
            .filter(LocationColumn::Status.eq(LifecycleState::Active))
            .order_by_asc(LocationColumn::Code)
            .all(db)
            .await
            .map_err(|e| {
                error!(warehouse_id = %warehouse_id, error = %e, "Database error when fetching locations");
                ServiceError::db_error(e)
            })
    }
}
