use std::sync::Arc;

use anyhow::Context as _;
use vspheredb_core::InventorySyncService;
use vspheredb_domain::{Config, VCenter};
use vspheredb_infra::{
    DbManager, HttpPropertyCollector, SqliteInventoryRepository, SqliteVCenterRepository,
};

/// Wired adapters and the sync service for one invocation.
pub struct AppContext {
    pub db: Arc<DbManager>,
    pub service: InventorySyncService,
}

impl AppContext {
    /// Open the database, apply the schema and wire the adapters.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let db = Arc::new(
            DbManager::from_config(&config.database)
                .with_context(|| format!("failed to open database {}", config.database.path))?,
        );

        let collector = HttpPropertyCollector::from_config(&config.vcenter, &config.http)
            .context("failed to build property collector")?;

        let vcenter = VCenter::new(
            config.vcenter.instance_uuid,
            config.vcenter.name.clone(),
            config.vcenter.api_url.clone(),
        );

        let service = InventorySyncService::new(
            vcenter,
            Arc::new(collector),
            Arc::new(SqliteInventoryRepository::new(Arc::clone(&db))),
            Arc::new(SqliteVCenterRepository::new(Arc::clone(&db))),
        )
        .with_kinds(&config.sync.object_kinds);

        tracing::info!(
            vcenter = %config.vcenter.name,
            db_path = %db.path().display(),
            kinds = ?service.kinds(),
            "application context ready"
        );

        Ok(Self { db, service })
    }
}
