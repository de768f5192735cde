use bufi::config::StoreBackend;
use bufi::{create_router, AppConfig, CsvRowStore, LedgerService, MemoryRowStore, RowStore, SheetsRowStore};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

fn build_store(config: &AppConfig) -> Arc<dyn RowStore> {
    match config.store.backend {
        StoreBackend::Sheets => {
            if config.sheets.access_token.as_deref().unwrap_or("").is_empty() {
                warn!("No sheets access token configured (BUFI__SHEETS__ACCESS_TOKEN); requests will be unauthenticated");
            }
            Arc::new(SheetsRowStore::new(&config.sheets))
        }
        StoreBackend::Csv => Arc::new(CsvRowStore::new(&config.store.csv_dir)),
        StoreBackend::Memory => {
            warn!("Using in-memory store, data is lost on exit");
            Arc::new(MemoryRowStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "bufi=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting server with config: {:?}", config);

    let store = build_store(&config);
    info!("Row store ready ({:?})", config.store.backend);

    let service = Arc::new(LedgerService::new(
        store,
        config.ranges.clone(),
        config.people.clone(),
    ));
    let app = create_router(service);

    let addr = config.bind_addr();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET    /expenses[?since=DD/MM/YYYY]");
    info!("  GET    /budget");
    info!("  POST   /expense");
    info!("  DELETE /expense?id=<key>");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
