//! Document generator seam for issuing certificate artifacts.
//!
//! The workflow only needs "given a completed request, produce a downloadable
//! artifact". [`DocumentGenerator`] is that contract; the API crate ships a
//! filesystem-backed implementation and tests substitute failing ones.

use async_trait::async_trait;
use serde::Serialize;

use crate::certificate::CertificateType;
use crate::types::{DbId, Timestamp};

/// Everything a generator needs to render one certificate.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateDocument {
    pub certificate_request_id: DbId,
    pub reference: String,
    pub certificate_type: CertificateType,
    pub student_name: String,
    pub registration_number: String,
    pub department: Option<String>,
    pub reason: String,
    pub requested_at: Timestamp,
    pub issued_at: Timestamp,
    pub institution_name: String,
}

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    /// Where the artifact can be downloaded from.
    pub certificate_url: String,
    /// SHA-256 of the artifact bytes.
    pub checksum: String,
    pub size_bytes: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Produces and retrieves certificate artifacts.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Render and store the artifact for `document`.
    async fn generate(&self, document: &CertificateDocument)
        -> Result<GeneratedDocument, DocumentError>;

    /// Read back the stored artifact for the request with `reference`.
    async fn open(&self, reference: &str) -> Result<Vec<u8>, DocumentError>;
}

/// File name an artifact is stored under.
pub fn artifact_file_name(reference: &str) -> String {
    format!("{reference}.txt")
}

/// Render the plain-text body of a certificate.
pub fn render_text(document: &CertificateDocument) -> String {
    let department = document
        .department
        .as_deref()
        .map(|d| format!(" of the Department of {d}"))
        .unwrap_or_default();

    format!(
        "{institution}\n\
         {title}\n\
         Reference: {reference}\n\
         \n\
         This is to certify that {name} (Reg. No. {reg}){department} is a student \
         of this institution.\n\
         \n\
         Purpose: {reason}\n\
         Requested on: {requested}\n\
         Issued on: {issued}\n",
        institution = document.institution_name,
        title = document.certificate_type.title(),
        reference = document.reference,
        name = document.student_name,
        reg = document.registration_number,
        reason = document.reason,
        requested = document.requested_at.format("%d %B %Y"),
        issued = document.issued_at.format("%d %B %Y"),
    )
}
