pub mod common;
pub mod items;
pub mod setups;
pub mod warehouses;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    items::ItemService, setups::InventorySetupService, warehouses::WarehouseService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates the business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub items: Arc<ItemService>,
    pub warehouses: Arc<WarehouseService>,
    pub setups: Arc<InventorySetupService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            items: Arc::new(ItemService::new(db_pool.clone(), event_sender.clone())),
            warehouses: Arc::new(WarehouseService::new(db_pool.clone(), event_sender.clone())),
            setups: Arc::new(InventorySetupService::new(db_pool, event_sender)),
        }
    }
}
