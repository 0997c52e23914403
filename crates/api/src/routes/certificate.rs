use axum::routing::{get, post};
use axum::Router;

use crate::handlers::certificate;
use crate::state::AppState;

/// Routes mounted at `/certificates`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(certificate::submit_certificate))
        .route("/mine", get(certificate::list_my_certificates))
        .route("/queue", get(certificate::list_queue))
        .route("/{id}", get(certificate::get_certificate))
        .route("/{id}/history", get(certificate::get_history))
        .route("/{id}/process", post(certificate::process_certificate))
        .route("/{id}/generate", post(certificate::generate_certificate))
        .route("/{id}/download", get(certificate::download_certificate))
}
