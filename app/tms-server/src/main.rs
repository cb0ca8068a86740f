use std::net::SocketAddr;

use tracing::{error, info};

use tms_api::{routes::build_router, state::AppState};
use tms_infrastructure::database::connection;
use tms_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    tms_shared::telemetry::init_telemetry();

    info!("TMS server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to Database
    let pool =
        connection::create_pool(&config.database.url, config.database.max_connections).await?;
    info!("Database connection established.");

    connection::run_migrations(&pool).await?;
    info!("Migrations applied.");

    // Build state + router
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));

    let state = AppState::build(pool, config);
    let app = build_router(state);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
