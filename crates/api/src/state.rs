use std::sync::Arc;

use campus_core::document::DocumentGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing workflow events.
    pub event_bus: Arc<campus_events::EventBus>,
    /// Produces and serves certificate artifacts.
    pub documents: Arc<dyn DocumentGenerator>,
}
