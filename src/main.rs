use axum::serve;
use shop_category::api::routes::create_router;
use shop_category::config::AppConfig;
use shop_category::logic::CategoryService;
use shop_category::store::PostgresStore;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    let config = AppConfig::load()?;
    log::info!(
        "configuration loaded: server={}:{}",
        config.server.host,
        config.server.port
    );

    log::info!("connecting to PostgreSQL...");
    let database_url = config.database_url()?;
    let store = PostgresStore::new(&database_url, config.database.max_connections).await?;

    log::info!("running database migrations...");
    store.migrate().await?;

    let service = Arc::new(CategoryService::new(Arc::new(store)));
    let app = create_router().with_state(service);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("category server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
