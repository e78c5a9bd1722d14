//! geopoints service - HTTP microservice serving PostGIS points as GeoJSON.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DB_HOST` | Database host | `localhost` |
//! | `DB_PORT` | Database port | 5432 |
//! | `DB_USER` | Database user | `postgres` |
//! | `DB_PASSWORD` | Database password | None |
//! | `DB_NAME` | Database name | `mnaccidents` |
//! | `DB_SSLMODE` | TLS mode (`disable`, `prefer`, `require`, ...) | `disable` |
//! | `DB_MAX_CONNECTIONS` | Connection pool size | 10 |
//! | `GEOPOINTS_PORT` | HTTP server port | 8080 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /points/geojson` - All points as a GeoJSON FeatureCollection

use std::net::SocketAddr;
use std::sync::Arc;

use geopoints::{DatabaseConfig, PgFeatureStore, PointsService};
use geopoints_service::{router, AppState};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geopoints_service=info,geopoints=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("GEOPOINTS_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let db_config = DatabaseConfig::from_env()?;

    tracing::info!(
        db_host = %db_config.host,
        db_port = db_config.port,
        db_name = %db_config.database,
        max_connections = db_config.max_connections,
        port = port,
        "Starting geopoints service"
    );

    // No degraded mode: an unreachable database stops the process here
    let store = PgFeatureStore::connect(&db_config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to database");
        e
    })?;
    let points_service = PointsService::new(store);

    let state = Arc::new(AppState {
        points_service: points_service.clone(),
    });

    let app = router(state).layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    points_service.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
