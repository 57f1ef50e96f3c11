use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    routing::get,
    Router,
};
use serde_json::Value;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

use inventory_setup_api::{
    config::AppConfig,
    db::{self, DbPool},
    entities::TrackingMode,
    events,
    handlers::AppServices,
    services::items::NewItem,
    services::setups::NewSetup,
    services::warehouses::NewWarehouse,
    tenant::{TenantContext, TenantDefaults},
    tracing as api_tracing, AppState,
};

static POOL: OnceCell<Arc<DbPool>> = OnceCell::const_new();

/// Shared in-memory database, migrated exactly once per test binary. Tests
/// isolate themselves by using a fresh tenant each, which doubles as a
/// standing exercise of the tenant-scoping discipline.
pub async fn shared_pool() -> Arc<DbPool> {
    POOL.get_or_init(|| async {
        // Each `#[tokio::test]` spins up its own runtime, so a
        // `:memory:?cache=shared` database would be torn down when the first
        // test's runtime (and its backing connection) drops, leaving later
        // tests querying a fresh, empty database. A process-local temp file
        // keeps the once-per-binary schema alive across those runtimes.
        let db_path = std::env::temp_dir()
            .join(format!("inventory_setup_test_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&db_path);
        let cfg = db::DbConfig {
            url: format!("sqlite://{}?mode=rwc", db_path.display()),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&cfg)
            .await
            .expect("connect to in-memory sqlite");
        db::run_migrations(&pool).await.expect("run migrations");
        Arc::new(pool)
    })
    .await
    .clone()
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:?cache=shared".into(),
        host: "127.0.0.1".into(),
        port: 18_080,
        environment: "test".into(),
        log_level: "info".into(),
        log_json: false,
        auto_migrate: false,
        default_tenant_id: "default".into(),
        default_stage_id: "test".into(),
        db_max_connections: 5,
        db_min_connections: 1,
        db_connect_timeout_secs: 30,
        db_idle_timeout_secs: 600,
        db_acquire_timeout_secs: 8,
        cors_allowed_origins: None,
        cors_allow_any_origin: true,
        cors_allow_credentials: false,
    }
}

/// Test harness: real router over the shared in-memory database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = shared_pool().await;
        let cfg = test_config();

        let (event_sender, event_rx) = events::channel(1024);
        tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(pool.clone(), Arc::new(event_sender.clone()));
        let state = AppState {
            db: pool,
            config: cfg.clone(),
            event_sender,
            services,
        };

        let router = Router::new()
            .route("/", get(|| async { "inventory-setup-api up" }))
            .nest("/api/v1", inventory_setup_api::api_v1_routes())
            .layer(axum::middleware::from_fn_with_state(
                TenantDefaults::from(&cfg),
                inventory_setup_api::tenant::tenant_context_middleware,
            ))
            .layer(axum::middleware::from_fn(api_tracing::request_id_middleware))
            .with_state(state.clone());

        Self { router, state }
    }

    /// Fresh tenant for this test; nothing else in the shared database can
    /// collide with it.
    pub fn fresh_tenant(&self) -> TenantContext {
        TenantContext::new(format!("t-{}", Uuid::new_v4().simple()), "test")
    }

    /// Issue a request carrying the given tenant's isolation headers
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        ctx: &TenantContext,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-tenant-id", &ctx.tenant_id)
            .header("x-stage-id", &ctx.stage_id);
        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder
                    .body(Body::from(serde_json::to_vec(&json).unwrap()))
                    .unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

#[allow(dead_code)]
pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Seed an item through the service layer
pub async fn seed_item(
    app: &TestApp,
    ctx: &TenantContext,
    sku: &str,
) -> inventory_setup_api::entities::item::Model {
    app.state
        .services
        .items
        .create_item(
            NewItem {
                sku: sku.to_string(),
                name: format!("{} name", sku),
                item_type: "finished_good".into(),
                item_group_id: None,
                item_category_id: None,
                tracking_mode: TrackingMode::None,
            },
            ctx,
        )
        .await
        .expect("seed item")
}

/// Seed a warehouse through the service layer
pub async fn seed_warehouse(
    app: &TestApp,
    ctx: &TenantContext,
    code: &str,
) -> inventory_setup_api::entities::warehouse::Model {
    app.state
        .services
        .warehouses
        .create_warehouse(
            NewWarehouse {
                code: code.to_string(),
                name: format!("{} warehouse", code),
                warehouse_type: "distribution".into(),
            },
            ctx,
        )
        .await
        .expect("seed warehouse")
}

/// Seed a setup through the service layer
pub async fn seed_setup(
    app: &TestApp,
    ctx: &TenantContext,
    item_id: Uuid,
    warehouse_id: Uuid,
) -> inventory_setup_api::entities::inventory_setup::Model {
    app.state
        .services
        .setups
        .create_setup(
            NewSetup {
                item_id,
                warehouse_id,
                min_stock: 5,
                max_stock: Some(50),
                reorder_point: Some(10),
                tracking_override: None,
            },
            ctx,
        )
        .await
        .expect("seed setup")
}
