use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_items_table::Migration),
            Box::new(m20250601_000002_create_warehouses_table::Migration),
            Box::new(m20250601_000003_create_locations_table::Migration),
            Box::new(m20250601_000004_create_inventory_setups_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250601_000001_create_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000001_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Items::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Items::TenantId).string_len(64).not_null())
                        .col(ColumnDef::new(Items::StageId).string_len(64).not_null())
                        .col(ColumnDef::new(Items::Sku).string_len(100).not_null())
                        .col(ColumnDef::new(Items::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Items::ItemType).string_len(64).not_null())
                        .col(ColumnDef::new(Items::ItemGroupId).uuid().null())
                        .col(ColumnDef::new(Items::ItemCategoryId).uuid().null())
                        .col(
                            ColumnDef::new(Items::TrackingMode)
                                .string_len(16)
                                .not_null()
                                .default("none"),
                        )
                        .col(
                            ColumnDef::new(Items::Status)
                                .string_len(16)
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Items::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Items::UpdatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            // SKU is unique per tenant+stage
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_tenant_stage_sku")
                        .table(Items::Table)
                        .col(Items::TenantId)
                        .col(Items::StageId)
                        .col(Items::Sku)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_tenant_stage_status")
                        .table(Items::Table)
                        .col(Items::TenantId)
                        .col(Items::StageId)
                        .col(Items::Status)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Items {
        Table,
        Id,
        TenantId,
        StageId,
        Sku,
        Name,
        ItemType,
        ItemGroupId,
        ItemCategoryId,
        TrackingMode,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250601_000002_create_warehouses_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000002_create_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::TenantId)
                                .string_len(64)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::StageId)
                                .string_len(64)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Warehouses::Code).string_len(64).not_null())
                        .col(ColumnDef::new(Warehouses::Name).string_len(255).not_null())
                        .col(
                            ColumnDef::new(Warehouses::WarehouseType)
                                .string_len(64)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::Status)
                                .string_len(16)
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Warehouses::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Warehouses::UpdatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_warehouses_tenant_stage_code")
                        .table(Warehouses::Table)
                        .col(Warehouses::TenantId)
                        .col(Warehouses::StageId)
                        .col(Warehouses::Code)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Warehouses {
        Table,
        Id,
        TenantId,
        StageId,
        Code,
        Name,
        WarehouseType,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250601_000003_create_locations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000003_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Locations::TenantId)
                                .string_len(64)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Locations::StageId).string_len(64).not_null())
                        .col(ColumnDef::new(Locations::WarehouseId).uuid().not_null())
                        .col(ColumnDef::new(Locations::Code).string_len(64).not_null())
                        .col(ColumnDef::new(Locations::Name).string_len(255).not_null())
                        .col(
                            ColumnDef::new(Locations::Status)
                                .string_len(16)
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Locations::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Locations::UpdatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_locations_warehouse_id")
                        .table(Locations::Table)
                        .col(Locations::WarehouseId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Id,
        TenantId,
        StageId,
        WarehouseId,
        Code,
        Name,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250601_000004_create_inventory_setups_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000004_create_inventory_setups_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventorySetups::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventorySetups::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventorySetups::TenantId)
                                .string_len(64)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventorySetups::StageId)
                                .string_len(64)
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventorySetups::ItemId).uuid().not_null())
                        .col(
                            ColumnDef::new(InventorySetups::WarehouseId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventorySetups::MinStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(InventorySetups::MaxStock).integer().null())
                        .col(
                            ColumnDef::new(InventorySetups::ReorderPoint)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventorySetups::TrackingOverride)
                                .string_len(16)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventorySetups::Status)
                                .string_len(16)
                                .not_null()
                                .default("active"),
                        )
                        .col(
                            ColumnDef::new(InventorySetups::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventorySetups::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_setups_tenant_stage_item")
                        .table(InventorySetups::Table)
                        .col(InventorySetups::TenantId)
                        .col(InventorySetups::StageId)
                        .col(InventorySetups::ItemId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_setups_tenant_stage_warehouse")
                        .table(InventorySetups::Table)
                        .col(InventorySetups::TenantId)
                        .col(InventorySetups::StageId)
                        .col(InventorySetups::WarehouseId)
                        .to_owned(),
                )
                .await?;

            // At most one ACTIVE setup per (tenant, stage, item, warehouse).
            // Partial unique indexes are not expressible through the schema
            // builder; both SQLite and Postgres accept this form.
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_inventory_setups_active_binding \
                     ON inventory_setups (tenant_id, stage_id, item_id, warehouse_id) \
                     WHERE status = 'active'",
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventorySetups::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum InventorySetups {
        Table,
        Id,
        TenantId,
        StageId,
        ItemId,
        WarehouseId,
        MinStock,
        MaxStock,
        ReorderPoint,
        TrackingOverride,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}
