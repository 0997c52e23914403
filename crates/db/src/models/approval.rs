//! Approval history model (append-only).

use campus_core::certificate::{ApprovalAction, WorkflowStatus};
use campus_core::roles::ReviewerRole;
use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `approval_events` table. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalEvent {
    pub id: DbId,
    pub certificate_request_id: DbId,
    #[sqlx(try_from = "String")]
    pub role: ReviewerRole,
    #[sqlx(try_from = "String")]
    pub action: ApprovalAction,
    pub remarks: Option<String>,
    pub actor_user_id: DbId,
    #[sqlx(try_from = "String")]
    pub from_status: WorkflowStatus,
    #[sqlx(try_from = "String")]
    pub to_status: WorkflowStatus,
    pub created_at: Timestamp,
}
