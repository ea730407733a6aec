//! mdm-wholesale Service - 批发流通主数据

use std::sync::Arc;

use batch_core::BatchContext;
use config::AppConfig;
use mdm_wholesale::application::MasterDataService;
use mdm_wholesale::config::CollectionConfig;
use mdm_wholesale::infrastructure::persistence::InMemoryStore;
use mdm_wholesale::scheduler::{ConfiguredHolidaySource, HolidayCollectionJob, JobRunner};
use tracing::info;

const CONFIG_DIR: &str = "config";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(CONFIG_DIR)?;
    let _metrics = telemetry::init(&config.telemetry)?;
    info!(app = %config.app_name, env = %config.app_env, "Initializing mdm-wholesale service...");

    let store = InMemoryStore::new();
    let service = Arc::new(MasterDataService::new(store.ports(), &config.batch));
    info!("Master data service initialized");

    if !config.scheduler.enabled {
        info!("Holiday collection scheduler disabled");
        tokio::signal::ctrl_c().await?;
        return Ok(());
    }

    let collection = CollectionConfig::load(CONFIG_DIR)?;
    let source = Arc::new(ConfiguredHolidaySource::new(collection.holidays));
    let mut job = HolidayCollectionJob::new(
        source,
        service.clone(),
        BatchContext::new(collection.tenant_id),
    );
    if let Some(warehouse_id) = collection.warehouse_id {
        job = job.for_warehouse(warehouse_id);
    }

    let runner = Arc::new(JobRunner::from_config(Arc::new(job), &config.scheduler)?);
    let handle = runner.start();
    info!(cron = %config.scheduler.cron, "Holiday collection scheduler started");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    handle.stop().await;

    Ok(())
}
