use app1_service::config::Config;
use app1_service::handlers::AppState;
use app1_service::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app1_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting App1 service");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let policy = Arc::new(config.audience_policy().map_err(|e| {
        error!("Failed to build audience policy: {}", e);
        e
    })?);

    info!(
        issuer = %config.issuer,
        audience = %config.audience,
        auth_service = %config.auth_service_url,
        "Validation policy configured"
    );

    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState::from_config(config).map_err(|e| {
        error!("Failed to build HTTP clients: {}", e);
        e
    })?);

    let app = routes::build_routes(state, policy);

    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("App1 service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
