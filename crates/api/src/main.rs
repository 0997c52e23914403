use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_api::app::build_app;
use campus_api::config::ServerConfig;
use campus_api::documents::FileSystemGenerator;
use campus_api::notifications::NotificationRouter;
use campus_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_api=debug,campus_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = campus_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    campus_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    campus_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Document storage ---
    let documents = Arc::new(FileSystemGenerator::new(&config.certificate_storage_dir));
    tracing::info!(
        storage_dir = %documents.storage_dir().display(),
        "Certificate storage configured"
    );

    // --- Event bus ---
    let event_bus = Arc::new(campus_events::EventBus::default());

    let persistence_handle = tokio::spawn(campus_events::EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));

    let notification_router = NotificationRouter::new(pool.clone());
    let router_handle = tokio::spawn(notification_router.run(event_bus.subscribe()));

    tracing::info!("Event services started (persistence, notification router)");

    // --- App state ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );

    let state = AppState {
        pool,
        config: Arc::new(config),
        event_bus: Arc::clone(&event_bus),
        documents,
    };

    let app = build_app(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The router's state held the other bus handles and is gone by now;
    // dropping the last sender closes the channel so both loops drain and exit.
    drop(event_bus);
    let _ = tokio::time::timeout(shutdown_timeout, persistence_handle).await;
    let _ = tokio::time::timeout(shutdown_timeout, router_handle).await;
    tracing::info!("Event services shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
