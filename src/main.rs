use activity_tracker::{resolve_data_dir, router, AppState, JsonFileStore, Tracker};
use std::{env, net::IpAddr, net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_dir = resolve_data_dir();
    fs::create_dir_all(&data_dir).await?;
    info!("storing data in {}", data_dir.display());

    let mut tracker = Tracker::open(Arc::new(JsonFileStore::new(data_dir)));
    tracker.subscribe(|activities, goals| {
        debug!(activities = activities.len(), goals = goals.len(), "collections changed");
    });
    let app = router(AppState::new(tracker));

    let host = env::var("APP_HOST")
        .ok()
        .and_then(|value| value.parse::<IpAddr>().ok())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]));
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::new(host, port);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
