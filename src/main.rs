use nafs::{AppState, Config, Nafs, Store, SystemClock, router};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    tokio::fs::create_dir_all(&config.data_dir).await?;
    info!("storing data in {}", config.data_dir.display());

    let store = Store::with_data_dir(&config.data_dir);
    let nafs = Nafs::open(store, Arc::new(SystemClock));
    let app = router(AppState::new(nafs));

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
