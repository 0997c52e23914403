//! Certificate request workflow rules.
//!
//! A request moves through a strictly linear chain of reviewers:
//!
//! ```text
//! SUBMITTED / WITH_ADVISOR --advisor--> WITH_HOD --hod--> WITH_OFFICE
//!     --office--> WITH_PRINCIPAL --principal--> COMPLETED
//! ```
//!
//! Any reviewer whose turn it is may instead reject, which ends the request
//! in `REJECTED`. The whole table lives in [`WorkflowStatus::authorized_role`]
//! and [`WorkflowStatus::next`]; [`plan_transition`] is the single guard every
//! reviewer action goes through before anything is written.

use chrono::Datelike;
use serde::Serialize;

use crate::error::CoreError;
use crate::roles::ReviewerRole;
use crate::types::{DbId, Timestamp};

/// Maximum length (in characters) of a submission reason.
pub const MAX_REASON_LEN: usize = 2000;

/// Maximum length (in characters) of reviewer remarks.
pub const MAX_REMARKS_LEN: usize = 2000;

define_text_enum! {
    /// Kind of certificate a student can request.
    CertificateType("certificate type") {
        Bonafide = "BONAFIDE",
        CourseCompletion = "COURSE_COMPLETION",
        Transfer = "TRANSFER",
        Character = "CHARACTER",
        Other = "OTHER",
    }
}

define_text_enum! {
    /// Fine-grained position of a request in the reviewer chain.
    WorkflowStatus("workflow status") {
        Submitted = "SUBMITTED",
        WithAdvisor = "WITH_ADVISOR",
        WithHod = "WITH_HOD",
        WithOffice = "WITH_OFFICE",
        WithPrincipal = "WITH_PRINCIPAL",
        Completed = "COMPLETED",
        Rejected = "REJECTED",
    }
}

define_text_enum! {
    /// Coarse, externally visible outcome of a request.
    CertificateStatus("certificate status") {
        Pending = "PENDING",
        Approved = "APPROVED",
        Rejected = "REJECTED",
        Generated = "GENERATED",
    }
}

define_text_enum! {
    /// What a reviewer does with a request.
    ApprovalAction("action") {
        Approve = "APPROVE",
        Reject = "REJECT",
        Forward = "FORWARD",
    }
}

impl CertificateType {
    /// Short prefix used in human-readable request references.
    pub fn reference_prefix(self) -> &'static str {
        match self {
            CertificateType::Bonafide => "BON",
            CertificateType::CourseCompletion => "CC",
            CertificateType::Transfer => "TC",
            CertificateType::Character => "CHR",
            CertificateType::Other => "OTH",
        }
    }

    /// Title printed on the generated certificate.
    pub fn title(self) -> &'static str {
        match self {
            CertificateType::Bonafide => "Bonafide Certificate",
            CertificateType::CourseCompletion => "Course Completion Certificate",
            CertificateType::Transfer => "Transfer Certificate",
            CertificateType::Character => "Character Certificate",
            CertificateType::Other => "Certificate",
        }
    }
}

impl WorkflowStatus {
    /// `COMPLETED` and `REJECTED` accept no further reviewer actions.
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowStatus::Completed | WorkflowStatus::Rejected)
    }

    /// The reviewer whose turn it is, or `None` for terminal states.
    ///
    /// `SUBMITTED` and `WITH_ADVISOR` both belong to the advisor.
    pub fn authorized_role(self) -> Option<ReviewerRole> {
        match self {
            WorkflowStatus::Submitted | WorkflowStatus::WithAdvisor => Some(ReviewerRole::Advisor),
            WorkflowStatus::WithHod => Some(ReviewerRole::Hod),
            WorkflowStatus::WithOffice => Some(ReviewerRole::Office),
            WorkflowStatus::WithPrincipal => Some(ReviewerRole::Principal),
            WorkflowStatus::Completed | WorkflowStatus::Rejected => None,
        }
    }

    /// The stage reached by applying `action` here, or `None` when terminal.
    pub fn next(self, action: ApprovalAction) -> Option<WorkflowStatus> {
        use WorkflowStatus::*;

        match (self, action) {
            (Completed | Rejected, _) => None,
            (_, ApprovalAction::Reject) => Some(Rejected),
            (Submitted | WithAdvisor, _) => Some(WithHod),
            (WithHod, _) => Some(WithOffice),
            (WithOffice, _) => Some(WithPrincipal),
            (WithPrincipal, _) => Some(Completed),
        }
    }

    /// Stages on which `role` is currently allowed to act.
    pub fn actionable_by(role: ReviewerRole) -> Vec<WorkflowStatus> {
        WorkflowStatus::ALL
            .iter()
            .copied()
            .filter(|s| s.authorized_role() == Some(role))
            .collect()
    }
}

impl CertificateStatus {
    /// Compute the outcome from the workflow stage and whether an artifact exists.
    pub fn derive(workflow: WorkflowStatus, generated: bool) -> Self {
        match workflow {
            WorkflowStatus::Rejected => CertificateStatus::Rejected,
            WorkflowStatus::Completed if generated => CertificateStatus::Generated,
            WorkflowStatus::Completed => CertificateStatus::Approved,
            _ => CertificateStatus::Pending,
        }
    }
}

/// A validated reviewer action, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub role: ReviewerRole,
    pub action: ApprovalAction,
    pub from: WorkflowStatus,
    pub to: WorkflowStatus,
    /// Trimmed remarks; `None` when absent or blank.
    pub remarks: Option<String>,
}

impl Transition {
    /// The value for `rejection_reason` after this transition.
    pub fn rejection_reason(&self) -> Option<&str> {
        match self.to {
            WorkflowStatus::Rejected => self.remarks.as_deref(),
            _ => None,
        }
    }
}

/// Validate a reviewer action against the current stage.
///
/// Check order: terminal stage, whose turn it is, then remarks (a reject
/// must carry them).
pub fn plan_transition(
    current: WorkflowStatus,
    role: ReviewerRole,
    action: ApprovalAction,
    remarks: Option<&str>,
) -> Result<Transition, CoreError> {
    let Some(authorized) = current.authorized_role() else {
        return Err(CoreError::InvalidTransition(format!(
            "request is already {current}"
        )));
    };

    if role != authorized {
        return Err(CoreError::InvalidTransition(format!(
            "not your turn to act: request is {current}, awaiting {authorized}"
        )));
    }

    let remarks = normalize_remarks(remarks)?;

    if action == ApprovalAction::Reject && remarks.is_none() {
        return Err(CoreError::Validation(
            "remarks are required to reject a request".into(),
        ));
    }

    let to = current.next(action).ok_or_else(|| {
        CoreError::InvalidTransition(format!("request is already {current}"))
    })?;

    Ok(Transition {
        role,
        action,
        from: current,
        to,
        remarks,
    })
}

/// Check that a request may have its certificate generated.
pub fn ensure_generatable(workflow: WorkflowStatus, generated: bool) -> Result<(), CoreError> {
    if workflow != WorkflowStatus::Completed {
        return Err(CoreError::InvalidState(format!(
            "certificate can only be generated once the request is COMPLETED (currently {workflow})"
        )));
    }
    if generated {
        return Err(CoreError::InvalidState(
            "certificate has already been generated".into(),
        ));
    }
    Ok(())
}

/// Validate and trim a submission reason.
pub fn validate_reason(reason: &str) -> Result<String, CoreError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("reason is required".into()));
    }
    if trimmed.chars().count() > MAX_REASON_LEN {
        return Err(CoreError::Validation(format!(
            "reason must be at most {MAX_REASON_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_remarks(remarks: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = remarks.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_REMARKS_LEN {
        return Err(CoreError::Validation(format!(
            "remarks must be at most {MAX_REMARKS_LEN} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Human-readable tracking reference, e.g. `BON-2026-000042`.
pub fn certificate_reference(kind: CertificateType, requested_at: Timestamp, id: DbId) -> String {
    format!("{}-{}-{id:06}", kind.reference_prefix(), requested_at.year())
}
