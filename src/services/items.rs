use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select, Set,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        inventory_setup,
        item::{self, Entity as Item, Column as ItemColumn},
        LifecycleState, TrackingMode,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    pagination::PageRequest,
    tenant::TenantContext,
};

/// Filters accepted by the item listing endpoints.
#[derive(Debug, Clone, Default)]
pub struct ItemFilters {
    /// Substring match over SKU and name
    pub search: Option<String>,
    pub item_type: Option<String>,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    pub tracking_mode: Option<TrackingMode>,
    pub include_inactive: bool,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub sku: String,
    pub name: String,
    pub item_type: String,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    pub tracking_mode: TrackingMode,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub item_type: Option<String>,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    pub tracking_mode: Option<TrackingMode>,
}

/// Service owning the item master records
pub struct ItemService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ItemService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Base query scoped to the caller's tenant and stage. Every operation
    /// in this service starts from here; an id from another tenant never
    /// resolves.
    fn scoped(ctx: &TenantContext) -> Select<Item> {
        Item::find()
            .filter(ItemColumn::TenantId.eq(&ctx.tenant_id))
            .filter(ItemColumn::StageId.eq(&ctx.stage_id))
    }

    fn apply_filters(mut query: Select<Item>, filters: &ItemFilters) -> Select<Item> {
        if !filters.include_inactive {
            query = query.filter(ItemColumn::Status.eq(LifecycleState::Active));
        }
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            query = query.filter(
                ItemColumn::Sku
                    .like(&pattern)
                    .or(ItemColumn::Name.like(&pattern)),
            );
        }
        if let Some(item_type) = &filters.item_type {
            query = query.filter(ItemColumn::ItemType.eq(item_type));
        }
        if let Some(group_id) = filters.item_group_id {
            query = query.filter(ItemColumn::ItemGroupId.eq(group_id));
        }
        if let Some(category_id) = filters.item_category_id {
            query = query.filter(ItemColumn::ItemCategoryId.eq(category_id));
        }
        if let Some(tracking) = filters.tracking_mode {
            query = query.filter(ItemColumn::TrackingMode.eq(tracking));
        }
        query
    }

    /// List items with filters and pagination
    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        ctx: &TenantContext,
        filters: &ItemFilters,
        page: &PageRequest,
    ) -> Result<(Vec<item::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let query =
            Self::apply_filters(Self::scoped(ctx), filters).order_by_asc(ItemColumn::Sku);

        let total = query.clone().count(db).await.map_err(|e| {
            error!(error = %e, "Database error when counting items");
            ServiceError::db_error(e)
        })?;

        let items = query
            .offset(page.offset)
            .limit(page.limit)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when fetching items");
                ServiceError::db_error(e)
            })?;

        Ok((items, total))
    }

    /// List items that have no active setup, optionally restricted to a
    /// single warehouse. Relies on the at-most-one-active-setup invariant.
    #[instrument(skip(self))]
    pub async fn list_items_without_setup(
        &self,
        ctx: &TenantContext,
        filters: &ItemFilters,
        warehouse_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<(Vec<item::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut configured = inventory_setup::Entity::find()
            .select_only()
            .column(inventory_setup::Column::ItemId)
            .filter(inventory_setup::Column::TenantId.eq(&ctx.tenant_id))
            .filter(inventory_setup::Column::StageId.eq(&ctx.stage_id))
            .filter(inventory_setup::Column::Status.eq(LifecycleState::Active));
        if let Some(warehouse_id) = warehouse_id {
            configured =
                configured.filter(inventory_setup::Column::WarehouseId.eq(warehouse_id));
        }

        let query = Self::apply_filters(Self::scoped(ctx), filters)
            .filter(ItemColumn::Id.not_in_subquery(configured.into_query()))
            .order_by_asc(ItemColumn::Sku);

        let total = query.clone().count(db).await.map_err(|e| {
            error!(error = %e, "Database error when counting items without setup");
            ServiceError::db_error(e)
        })?;

        let items = query
            .offset(page.offset)
            .limit(page.limit)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when fetching items without setup");
                ServiceError::db_error(e)
            })?;

        Ok((items, total))
    }

    /// Get an item by id, tenant-scoped
    #[instrument(skip(self))]
    pub async fn get_item(
        &self,
        id: Uuid,
        ctx: &TenantContext,
    ) -> Result<item::Model, ServiceError> {
        let db = &*self.db_pool;

        Self::scoped(ctx)
            .filter(ItemColumn::Id.eq(id))
            .filter(ItemColumn::Status.eq(LifecycleState::Active))
            .one(db)
            .await
            .map_err(|e| {
                error!(item_id = %id, error = %e, "Database error when fetching item");
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Item with ID {} not found", id)))
    }

    /// Create a new item
    #[instrument(skip(self))]
    pub async fn create_item(
        &self,
        data: NewItem,
        ctx: &TenantContext,
    ) -> Result<item::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = Self::scoped(ctx)
            .filter(ItemColumn::Sku.eq(&data.sku))
            .one(db)
            .await
            .map_err(|e| {
                error!(sku = %data.sku, error = %e, "Database error when checking for existing SKU");
                ServiceError::db_error(e)
            })?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Item with SKU '{}' already exists",
                data.sku
            )));
        }

        let now = Utc::now();
        let model = item::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(ctx.tenant_id.clone()),
            stage_id: Set(ctx.stage_id.clone()),
            sku: Set(data.sku.clone()),
            name: Set(data.name),
            item_type: Set(data.item_type),
            item_group_id: Set(data.item_group_id),
            item_category_id: Set(data.item_category_id),
            tracking_mode: Set(data.tracking_mode),
            status: Set(LifecycleState::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(|e| {
            error!(sku = %data.sku, error = %e, "Database error when creating item");
            ServiceError::db_error(e)
        })?;

        self.event_sender
            .send(Event::ItemCreated {
                tenant_id: ctx.tenant_id.clone(),
                item_id: created.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(item_id = %created.id, sku = %created.sku, "Item created");
        Ok(created)
    }

    /// Partially update an item
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        id: Uuid,
        patch: ItemPatch,
        ctx: &TenantContext,
    ) -> Result<item::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get_item(id, ctx).await?;
        let mut model: item::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(item_type) = patch.item_type {
            model.item_type = Set(item_type);
        }
        if let Some(group_id) = patch.item_group_id {
            model.item_group_id = Set(Some(group_id));
        }
        if let Some(category_id) = patch.item_category_id {
            model.item_category_id = Set(Some(category_id));
        }
        if let Some(tracking) = patch.tracking_mode {
            model.tracking_mode = Set(tracking);
        }
        model.updated_at = Set(Utc::now());

        let updated = model.update(db).await.map_err(|e| {
            error!(item_id = %id, error = %e, "Database error when updating item");
            ServiceError::db_error(e)
        })?;

        self.event_sender
            .send(Event::ItemUpdated {
                tenant_id: ctx.tenant_id.clone(),
                item_id: updated.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(item_id = %updated.id, "Item updated");
        Ok(updated)
    }

    /// Soft-delete an item. A second call on an already-inactive item is a
    /// no-op success.
    #[instrument(skip(self))]
    pub async fn deactivate_item(
        &self,
        id: Uuid,
        ctx: &TenantContext,
    ) -> Result<item::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = Self::scoped(ctx)
            .filter(ItemColumn::Id.eq(id))
            .one(db)
            .await
            .map_err(|e| {
                error!(item_id = %id, error = %e, "Database error when fetching item");
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Item with ID {} not found", id)))?;

        if existing.status == LifecycleState::Inactive {
            return Ok(existing);
        }

        let mut model: item::ActiveModel = existing.into();
        model.status = Set(LifecycleState::Inactive);
        model.updated_at = Set(Utc::now());

        let updated = model.update(db).await.map_err(|e| {
            error!(item_id = %id, error = %e, "Database error when deactivating item");
            ServiceError::db_error(e)
        })?;

        self.event_sender
            .send(Event::ItemDeactivated {
                tenant_id: ctx.tenant_id.clone(),
                item_id: updated.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(item_id = %updated.id, "Item deactivated");
        Ok(updated)
    }
}
