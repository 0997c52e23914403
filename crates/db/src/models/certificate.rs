//! Certificate request models and DTOs.

use campus_core::certificate::{
    certificate_reference, CertificateStatus, CertificateType, WorkflowStatus,
};
use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `certificate_requests`, joined with the owning student's
/// name and registration number.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CertificateRequest {
    pub id: DbId,
    pub student_id: DbId,
    pub student_user_id: DbId,
    pub student_name: String,
    pub registration_number: String,
    pub department: Option<String>,
    #[sqlx(try_from = "String")]
    pub certificate_type: CertificateType,
    pub reason: String,
    #[sqlx(try_from = "String")]
    pub workflow_status: WorkflowStatus,
    pub rejection_reason: Option<String>,
    pub certificate_url: Option<String>,
    pub generated_at: Option<Timestamp>,
    pub requested_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CertificateRequest {
    /// Whether the certificate artifact has been produced.
    pub fn is_generated(&self) -> bool {
        self.certificate_url.is_some()
    }

    /// Externally visible outcome, derived from the workflow stage.
    pub fn status(&self) -> CertificateStatus {
        CertificateStatus::derive(self.workflow_status, self.is_generated())
    }

    /// Human-readable tracking reference.
    pub fn reference(&self) -> String {
        certificate_reference(self.certificate_type, self.requested_at, self.id)
    }
}

/// API representation of a request: the row plus derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateRequestResponse {
    #[serde(flatten)]
    pub request: CertificateRequest,
    pub reference: String,
    pub status: CertificateStatus,
}

impl From<CertificateRequest> for CertificateRequestResponse {
    fn from(request: CertificateRequest) -> Self {
        Self {
            reference: request.reference(),
            status: request.status(),
            request,
        }
    }
}

/// Request body for `POST /certificates`.
///
/// Missing fields default to empty strings so the handler reports them as
/// validation errors rather than deserialization failures.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitCertificateRequest {
    /// Parsed into [`CertificateType`] by the handler.
    #[serde(rename = "type", default)]
    pub certificate_type: String,
    #[serde(default)]
    pub reason: String,
}

/// Request body for `POST /certificates/{id}/process`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessCertificateRequest {
    #[serde(default)]
    pub action: String,
    pub remarks: Option<String>,
}

/// Filter for reviewer queue listings.
#[derive(Debug, Clone, Default)]
pub struct CertificateFilter {
    /// Restrict to these stages; `None` means every stage.
    pub statuses: Option<Vec<WorkflowStatus>>,
    /// Case-insensitive substring matched against student name and
    /// registration number.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// One page of a reviewer queue.
#[derive(Debug, Clone, Serialize)]
pub struct CertificatePage {
    pub items: Vec<CertificateRequestResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Response body for a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateCertificateResponse {
    pub certificate_url: String,
    pub request: CertificateRequestResponse,
}
