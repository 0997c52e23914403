//! Admin handlers for the student registry (`/admin/students`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::student::CreateStudent;
use campus_db::repositories::StudentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn require_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} is required"
        ))));
    }
    Ok(trimmed.to_string())
}

/// POST /api/v1/admin/students
///
/// Register a student. A duplicate registration number or user id is a 409.
pub async fn create_student(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateStudent>,
) -> AppResult<impl IntoResponse> {
    let input = CreateStudent {
        user_id: input.user_id,
        registration_number: require_text(&input.registration_number, "registration_number")?,
        full_name: require_text(&input.full_name, "full_name")?,
        department: input
            .department
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    };

    let student = StudentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        student_id = student.id,
        registration_number = %student.registration_number,
        "Student registered"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

/// GET /api/v1/admin/students/{id}
pub async fn get_student(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let student = StudentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id,
        })?;
    Ok(Json(DataResponse { data: student }))
}

/// POST /api/v1/admin/students/{id}/deactivate
///
/// Inactive students can no longer submit requests; existing requests are
/// unaffected.
pub async fn deactivate_student(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !StudentRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }));
    }

    tracing::info!(user_id = admin.user_id, student_id = id, "Student deactivated");
    Ok(StatusCode::NO_CONTENT)
}
