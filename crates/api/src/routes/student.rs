use axum::routing::{get, post};
use axum::Router;

use crate::handlers::student;
use crate::state::AppState;

/// Routes mounted at `/admin/students`. Every handler requires the admin role.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(student::create_student))
        .route("/{id}", get(student::get_student))
        .route("/{id}/deactivate", post(student::deactivate_student))
}
