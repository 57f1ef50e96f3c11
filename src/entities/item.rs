use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{LifecycleState, TrackingMode};

/// Item master record: one row per catalog item per tenant+stage.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Item)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: String,
    pub stage_id: String,
    pub sku: String,
    pub name: String,
    pub item_type: String,
    pub item_group_id: Option<Uuid>,
    pub item_category_id: Option<Uuid>,
    pub tracking_mode: TrackingMode,
    pub status: LifecycleState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_setup::Entity")]
    InventorySetups,
}

impl Related<super::inventory_setup::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventorySetups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
