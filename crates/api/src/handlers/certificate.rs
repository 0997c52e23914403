//! Handlers for the `/certificates` resource.
//!
//! Students submit and track their own requests; reviewers work their queue
//! and act on requests; the office generates the final certificate.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use campus_core::certificate::{ApprovalAction, CertificateType, WorkflowStatus};
use campus_core::document::{artifact_file_name, DocumentError};
use campus_core::error::CoreError;
use campus_core::pagination::page_window;
use campus_core::roles::UserRole;
use campus_core::types::DbId;
use campus_db::models::certificate::{
    CertificateFilter, CertificatePage, CertificateRequest, CertificateRequestResponse,
    GenerateCertificateResponse, ProcessCertificateRequest, SubmitCertificateRequest,
};
use campus_db::repositories::{ApprovalEventRepo, CertificateRequestRepo, StudentRepo};

use crate::engine::certificate_workflow;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireOffice, RequireReviewer, RequireStaff, RequireStudent};
use crate::query::QueueParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Students may only see their own requests; every staff role sees all.
fn ensure_can_view(auth: &AuthUser, request: &CertificateRequest) -> AppResult<()> {
    if auth.role.is_staff() || request.student_user_id == auth.user_id {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You can only view your own certificate requests".into(),
    )))
}

/// Resolve the `status` query parameter into a stage filter.
///
/// Absent means the stages `role` can act on (no filter for admins);
/// `all` removes the filter.
fn resolve_statuses(
    status: Option<&str>,
    role: UserRole,
) -> Result<Option<Vec<WorkflowStatus>>, CoreError> {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => Ok(Some(vec![s.parse()?])),
        None => Ok(role.as_reviewer().map(WorkflowStatus::actionable_by)),
    }
}

/// POST /api/v1/certificates
pub async fn submit_certificate(
    RequireStudent(auth): RequireStudent,
    State(state): State<AppState>,
    Json(input): Json<SubmitCertificateRequest>,
) -> AppResult<impl IntoResponse> {
    let certificate_type: CertificateType = input.certificate_type.parse()?;

    let request =
        certificate_workflow::submit(&state, auth.user_id, certificate_type, &input.reason)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CertificateRequestResponse::from(request),
        }),
    ))
}

/// GET /api/v1/certificates/mine
///
/// The caller's requests, newest first.
pub async fn list_my_certificates(
    RequireStudent(auth): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CertificateRequestResponse>>>> {
    let student = StudentRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id: auth.user_id,
        })?;

    let requests = CertificateRequestRepo::list_for_student(&state.pool, student.id).await?;

    Ok(Json(DataResponse {
        data: requests.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/v1/certificates/queue
///
/// Paginated reviewer queue, oldest first.
pub async fn list_queue(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<QueueParams>,
) -> AppResult<Json<DataResponse<CertificatePage>>> {
    let statuses = resolve_statuses(params.status.as_deref(), auth.role)?;
    let (page, page_size, offset) = page_window(params.page, params.page_size);

    let filter = CertificateFilter {
        statuses,
        search: params.search,
        limit: page_size,
        offset,
    };

    let items = CertificateRequestRepo::list(&state.pool, &filter).await?;
    let total = CertificateRequestRepo::count(&state.pool, &filter).await?;

    Ok(Json(DataResponse {
        data: CertificatePage {
            items: items.into_iter().map(Into::into).collect(),
            total,
            page,
            page_size,
        },
    }))
}

/// GET /api/v1/certificates/{id}
pub async fn get_certificate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CertificateRequestResponse>>> {
    let request = certificate_workflow::load_request(&state, id).await?;
    ensure_can_view(&auth, &request)?;

    Ok(Json(DataResponse {
        data: request.into(),
    }))
}

/// GET /api/v1/certificates/{id}/history
///
/// Approval events in the order they happened.
pub async fn get_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = certificate_workflow::load_request(&state, id).await?;
    ensure_can_view(&auth, &request)?;

    let events = ApprovalEventRepo::list_for_request(&state.pool, id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/certificates/{id}/process
///
/// Approve, forward, or reject a request at the caller's stage.
pub async fn process_certificate(
    RequireReviewer(auth, role): RequireReviewer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ProcessCertificateRequest>,
) -> AppResult<Json<DataResponse<CertificateRequestResponse>>> {
    let action: ApprovalAction = input.action.parse()?;

    let outcome = certificate_workflow::process(
        &state,
        id,
        auth.user_id,
        role,
        action,
        input.remarks.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse {
        data: outcome.request.into(),
    }))
}

/// POST /api/v1/certificates/{id}/generate
pub async fn generate_certificate(
    RequireOffice(auth): RequireOffice,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GenerateCertificateResponse>>> {
    let request = certificate_workflow::generate(&state, id, auth.user_id).await?;

    let certificate_url = request.certificate_url.clone().ok_or_else(|| {
        AppError::InternalError("generated request is missing its certificate URL".into())
    })?;

    Ok(Json(DataResponse {
        data: GenerateCertificateResponse {
            certificate_url,
            request: request.into(),
        },
    }))
}

/// GET /api/v1/certificates/{id}/download
///
/// Streams the stored artifact as an attachment.
pub async fn download_certificate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = certificate_workflow::load_request(&state, id).await?;
    ensure_can_view(&auth, &request)?;

    if !request.is_generated() {
        return Err(AppError::Core(CoreError::InvalidState(
            "certificate has not been generated yet".into(),
        )));
    }

    let reference = request.reference();
    let bytes = state.documents.open(&reference).await.map_err(|e| match e {
        DocumentError::NotFound(_) => AppError::InternalError(format!(
            "artifact for generated request {id} is missing"
        )),
        other => AppError::Core(CoreError::Upstream(format!(
            "document generator failed: {other}"
        ))),
    })?;

    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact_file_name(&reference)),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn absent_status_defaults_to_actionable_stages() {
        assert_eq!(
            resolve_statuses(None, UserRole::Advisor).unwrap(),
            Some(vec![WorkflowStatus::Submitted, WorkflowStatus::WithAdvisor])
        );
        assert_eq!(
            resolve_statuses(Some("  "), UserRole::Hod).unwrap(),
            Some(vec![WorkflowStatus::WithHod])
        );
    }

    #[test]
    fn admin_without_status_sees_everything() {
        assert_eq!(resolve_statuses(None, UserRole::Admin).unwrap(), None);
    }

    #[test]
    fn all_removes_the_filter() {
        assert_eq!(resolve_statuses(Some("ALL"), UserRole::Office).unwrap(), None);
    }

    #[test]
    fn explicit_status_is_parsed() {
        assert_eq!(
            resolve_statuses(Some("with_principal"), UserRole::Office).unwrap(),
            Some(vec![WorkflowStatus::WithPrincipal])
        );
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert_matches!(
            resolve_statuses(Some("PENDING"), UserRole::Office),
            Err(CoreError::Validation(_))
        );
    }
}
