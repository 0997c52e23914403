//! Submit, process, and generate operations for certificate requests.
//!
//! Every state change follows the same shape: validate, persist atomically,
//! then publish an event. Events are only published after the database work
//! has committed, so subscribers never see a change that was rolled back.

use campus_core::certificate::{
    ensure_generatable, plan_transition, validate_reason, ApprovalAction, CertificateType,
    WorkflowStatus,
};
use campus_core::document::CertificateDocument;
use campus_core::error::CoreError;
use campus_core::roles::ReviewerRole;
use campus_core::types::DbId;
use campus_db::models::approval::ApprovalEvent;
use campus_db::models::certificate::CertificateRequest;
use campus_db::repositories::{ApprovalEventRepo, CertificateRequestRepo, StudentRepo};
use campus_events::event_types::{
    CERTIFICATE_COMPLETED, CERTIFICATE_FORWARDED, CERTIFICATE_GENERATED,
    CERTIFICATE_GENERATION_FAILED, CERTIFICATE_REJECTED, CERTIFICATE_SUBMITTED,
};
use campus_events::PlatformEvent;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Outcome of a reviewer action.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub request: CertificateRequest,
    pub event: ApprovalEvent,
}

/// Load a request or fail with `NotFound`.
pub async fn load_request(state: &AppState, id: DbId) -> AppResult<CertificateRequest> {
    CertificateRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "CertificateRequest",
                id,
            })
        })
}

/// File a new request on behalf of the student signed in as `user_id`.
pub async fn submit(
    state: &AppState,
    user_id: DbId,
    certificate_type: CertificateType,
    reason: &str,
) -> AppResult<CertificateRequest> {
    let reason = validate_reason(reason)?;

    let student = StudentRepo::find_by_user_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id: user_id,
        })?;
    if !student.is_active {
        return Err(CoreError::Validation("student is not active".into()).into());
    }

    let request =
        CertificateRequestRepo::create(&state.pool, student.id, certificate_type, &reason).await?;

    tracing::info!(
        user_id,
        certificate_request_id = request.id,
        certificate_type = %certificate_type,
        "Certificate request submitted"
    );

    state.event_bus.publish(
        PlatformEvent::certificate(CERTIFICATE_SUBMITTED, request.id)
            .with_actor(user_id)
            .with_payload(event_payload(&request)),
    );

    Ok(request)
}

/// Apply one reviewer action.
///
/// The request row is locked for the duration of the transaction, so two
/// concurrent actions on the same request are serialized: the second one
/// re-validates against the state the first one committed.
pub async fn process(
    state: &AppState,
    id: DbId,
    actor_user_id: DbId,
    role: ReviewerRole,
    action: ApprovalAction,
    remarks: Option<&str>,
) -> AppResult<ProcessOutcome> {
    let mut tx = state.pool.begin().await?;

    let current = CertificateRequestRepo::find_for_update(&mut tx, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "CertificateRequest",
            id,
        })?;

    let transition = plan_transition(current.workflow_status, role, action, remarks)?;

    let event = ApprovalEventRepo::append(&mut tx, id, actor_user_id, &transition).await?;
    let request = CertificateRequestRepo::apply_transition(&mut tx, id, &transition).await?;

    tx.commit().await?;

    tracing::info!(
        user_id = actor_user_id,
        certificate_request_id = id,
        role = %role,
        action = %action,
        from = %transition.from,
        to = %transition.to,
        "Certificate request processed"
    );

    let event_type = match transition.to {
        WorkflowStatus::Rejected => CERTIFICATE_REJECTED,
        WorkflowStatus::Completed => CERTIFICATE_COMPLETED,
        _ => CERTIFICATE_FORWARDED,
    };
    let mut payload = event_payload(&request);
    payload["role"] = json!(role);
    payload["action"] = json!(action);
    payload["from_status"] = json!(transition.from);
    payload["remarks"] = json!(transition.remarks);

    state.event_bus.publish(
        PlatformEvent::certificate(event_type, id)
            .with_actor(actor_user_id)
            .with_payload(payload),
    );

    Ok(ProcessOutcome { request, event })
}

/// Produce the certificate artifact for a completed request.
///
/// The generator runs outside any transaction. A generator failure leaves
/// the request untouched so the office can retry; a lost race against a
/// concurrent generation is reported as `InvalidState`.
pub async fn generate(
    state: &AppState,
    id: DbId,
    actor_user_id: DbId,
) -> AppResult<CertificateRequest> {
    let request = load_request(state, id).await?;
    ensure_generatable(request.workflow_status, request.is_generated())?;

    let document = CertificateDocument {
        certificate_request_id: request.id,
        reference: request.reference(),
        certificate_type: request.certificate_type,
        student_name: request.student_name.clone(),
        registration_number: request.registration_number.clone(),
        department: request.department.clone(),
        reason: request.reason.clone(),
        requested_at: request.requested_at,
        issued_at: chrono::Utc::now(),
        institution_name: state.config.institution_name.clone(),
    };

    let generated = match state.documents.generate(&document).await {
        Ok(generated) => generated,
        Err(e) => {
            tracing::warn!(
                certificate_request_id = id,
                error = %e,
                "Certificate generation failed"
            );
            let mut payload = event_payload(&request);
            payload["error"] = json!(e.to_string());
            state.event_bus.publish(
                PlatformEvent::certificate(CERTIFICATE_GENERATION_FAILED, id)
                    .with_actor(actor_user_id)
                    .with_payload(payload),
            );
            return Err(CoreError::Upstream(format!("document generator failed: {e}")).into());
        }
    };

    let updated =
        CertificateRequestRepo::mark_generated(&state.pool, id, &generated.certificate_url)
            .await?
            .ok_or_else(|| {
                CoreError::InvalidState("certificate has already been generated".into())
            })?;

    tracing::info!(
        user_id = actor_user_id,
        certificate_request_id = id,
        checksum = %generated.checksum,
        size_bytes = generated.size_bytes,
        "Certificate generated"
    );

    let mut payload = event_payload(&updated);
    payload["certificate_url"] = json!(generated.certificate_url);
    payload["checksum"] = json!(generated.checksum);
    state.event_bus.publish(
        PlatformEvent::certificate(CERTIFICATE_GENERATED, id)
            .with_actor(actor_user_id)
            .with_payload(payload),
    );

    Ok(updated)
}

/// Fields every certificate event carries.
fn event_payload(request: &CertificateRequest) -> serde_json::Value {
    json!({
        "reference": request.reference(),
        "student_user_id": request.student_user_id,
        "certificate_type": request.certificate_type,
        "workflow_status": request.workflow_status,
        "status": request.status(),
    })
}
