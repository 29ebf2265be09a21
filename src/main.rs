use std::sync::Arc;
use std::time::Duration;

use pickup_booking::{
    router,
    state::{AppConfig, AppState},
};
use tracing_subscriber::EnvFilter;

fn spawn_quote_purger(state: Arc<AppState>) {
    let period = Duration::from_secs(state.config.quote_purge_interval_seconds);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            state.pricing_service.purge_expired_quotes().await;
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pickup_booking=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();

    let app_state = Arc::new(AppState::new(config));
    spawn_quote_purger(app_state.clone());

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("pickup-booking listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
