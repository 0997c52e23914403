//! Repository for the append-only `approval_events` table.

use campus_core::certificate::Transition;
use campus_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::approval::ApprovalEvent;

/// Column list for approval_events queries.
const COLUMNS: &str = "id, certificate_request_id, role, action, remarks, \
    actor_user_id, from_status, to_status, created_at";

/// Provides insert and read operations for approval history. There is no
/// update or delete.
pub struct ApprovalEventRepo;

impl ApprovalEventRepo {
    /// Append the event describing `transition`.
    ///
    /// Must run in the same transaction as the status update it records.
    pub async fn append(
        conn: &mut PgConnection,
        certificate_request_id: DbId,
        actor_user_id: DbId,
        transition: &Transition,
    ) -> Result<ApprovalEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO approval_events
                (certificate_request_id, role, action, remarks, actor_user_id, from_status, to_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApprovalEvent>(&query)
            .bind(certificate_request_id)
            .bind(transition.role.as_str())
            .bind(transition.action.as_str())
            .bind(transition.remarks.as_deref())
            .bind(actor_user_id)
            .bind(transition.from.as_str())
            .bind(transition.to.as_str())
            .fetch_one(&mut *conn)
            .await
    }

    /// Full history of a request in the order it happened.
    pub async fn list_for_request(
        pool: &PgPool,
        certificate_request_id: DbId,
    ) -> Result<Vec<ApprovalEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM approval_events
             WHERE certificate_request_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ApprovalEvent>(&query)
            .bind(certificate_request_id)
            .fetch_all(pool)
            .await
    }

    /// Number of events recorded for a request.
    pub async fn count_for_request(
        pool: &PgPool,
        certificate_request_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM approval_events WHERE certificate_request_id = $1",
        )
        .bind(certificate_request_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
