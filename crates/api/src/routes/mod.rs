pub mod certificate;
pub mod health;
pub mod notification;
pub mod student;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /certificates                                    submit (student)
/// /certificates/mine                               own requests (student)
/// /certificates/queue                              reviewer queue (staff)
/// /certificates/{id}                               get (owner or staff)
/// /certificates/{id}/history                       approval history
/// /certificates/{id}/process                       approve/forward/reject (reviewer)
/// /certificates/{id}/generate                      issue certificate (office)
/// /certificates/{id}/download                      artifact (owner or staff)
///
/// /notifications                                   list (any authenticated user)
/// /notifications/{id}/read                         mark read
///
/// /admin/students                                  register (admin only)
/// /admin/students/{id}                             get
/// /admin/students/{id}/deactivate                  deactivate
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/certificates", certificate::router())
        .nest("/notifications", notification::router())
        .nest("/admin/students", student::router())
}
