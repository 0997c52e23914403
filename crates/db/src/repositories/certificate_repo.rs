//! Repository for the `certificate_requests` table.
//!
//! Every read joins the owning student so callers get the name and
//! registration number without a second query. Writes that return a row use
//! a CTE (`WITH cr AS (… RETURNING *)`) for the same reason.

use campus_core::certificate::{CertificateType, Transition, WorkflowStatus};
use campus_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::certificate::{CertificateFilter, CertificateRequest};

/// Column list for joined certificate request queries (`cr` = request, `s` = student).
const COLUMNS: &str = "\
    cr.id, cr.student_id, s.user_id AS student_user_id, s.full_name AS student_name, \
    s.registration_number, s.department, cr.certificate_type, cr.reason, \
    cr.workflow_status, cr.rejection_reason, cr.certificate_url, cr.generated_at, \
    cr.requested_at, cr.updated_at";

/// Join clause shared by every read.
const FROM_JOINED: &str = "certificate_requests cr JOIN students s ON s.id = cr.student_id";

/// Filter clause for queue listings; binds `$1` (status array) and `$2` (search pattern).
const FILTER: &str = "\
    WHERE ($1::TEXT[] IS NULL OR cr.workflow_status = ANY($1)) \
      AND ($2::TEXT IS NULL \
           OR s.full_name ILIKE $2 ESCAPE '\\' \
           OR s.registration_number ILIKE $2 ESCAPE '\\')";

/// Provides persistence operations for certificate requests.
pub struct CertificateRequestRepo;

impl CertificateRequestRepo {
    /// Insert a new request in the `SUBMITTED` stage, returning the joined row.
    pub async fn create(
        pool: &PgPool,
        student_id: DbId,
        certificate_type: CertificateType,
        reason: &str,
    ) -> Result<CertificateRequest, sqlx::Error> {
        let query = format!(
            "WITH cr AS (
                INSERT INTO certificate_requests (student_id, certificate_type, reason, workflow_status)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {COLUMNS} FROM cr JOIN students s ON s.id = cr.student_id"
        );
        sqlx::query_as::<_, CertificateRequest>(&query)
            .bind(student_id)
            .bind(certificate_type.as_str())
            .bind(reason)
            .bind(WorkflowStatus::Submitted.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a request by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CertificateRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE cr.id = $1");
        sqlx::query_as::<_, CertificateRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a request and lock its row until the surrounding transaction ends.
    ///
    /// A concurrent locker blocks here and then observes the committed state.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<CertificateRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE cr.id = $1 FOR UPDATE OF cr");
        sqlx::query_as::<_, CertificateRequest>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// List a student's requests, newest first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<CertificateRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED}
             WHERE cr.student_id = $1
             ORDER BY cr.requested_at DESC, cr.id DESC"
        );
        sqlx::query_as::<_, CertificateRequest>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// List requests matching `filter`, oldest first so queues are worked in order.
    pub async fn list(
        pool: &PgPool,
        filter: &CertificateFilter,
    ) -> Result<Vec<CertificateRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED} {FILTER}
             ORDER BY cr.requested_at ASC, cr.id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, CertificateRequest>(&query)
            .bind(status_names(filter))
            .bind(search_pattern(filter))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Count requests matching `filter` (ignores limit/offset).
    pub async fn count(pool: &PgPool, filter: &CertificateFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*)::BIGINT FROM {FROM_JOINED} {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(status_names(filter))
            .bind(search_pattern(filter))
            .fetch_one(pool)
            .await
    }

    /// Move a locked request to the stage planned by `transition`.
    ///
    /// Must run inside the transaction that called [`Self::find_for_update`].
    pub async fn apply_transition(
        conn: &mut PgConnection,
        id: DbId,
        transition: &Transition,
    ) -> Result<CertificateRequest, sqlx::Error> {
        let query = format!(
            "WITH cr AS (
                UPDATE certificate_requests
                SET workflow_status = $2, rejection_reason = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM cr JOIN students s ON s.id = cr.student_id"
        );
        sqlx::query_as::<_, CertificateRequest>(&query)
            .bind(id)
            .bind(transition.to.as_str())
            .bind(transition.rejection_reason())
            .fetch_one(&mut *conn)
            .await
    }

    /// Record the artifact URL for a completed request.
    ///
    /// Only succeeds if the request is still `COMPLETED` and has no artifact;
    /// returns `None` when another caller generated it first.
    pub async fn mark_generated(
        pool: &PgPool,
        id: DbId,
        certificate_url: &str,
    ) -> Result<Option<CertificateRequest>, sqlx::Error> {
        let query = format!(
            "WITH cr AS (
                UPDATE certificate_requests
                SET certificate_url = $2, generated_at = NOW(), updated_at = NOW()
                WHERE id = $1 AND workflow_status = $3 AND certificate_url IS NULL
                RETURNING *
             )
             SELECT {COLUMNS} FROM cr JOIN students s ON s.id = cr.student_id"
        );
        sqlx::query_as::<_, CertificateRequest>(&query)
            .bind(id)
            .bind(certificate_url)
            .bind(WorkflowStatus::Completed.as_str())
            .fetch_optional(pool)
            .await
    }
}

fn status_names(filter: &CertificateFilter) -> Option<Vec<String>> {
    filter
        .statuses
        .as_ref()
        .map(|statuses| statuses.iter().map(|s| s.as_str().to_string()).collect())
}

fn search_pattern(filter: &CertificateFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)))
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("21CS_04%"), "21CS\\_04\\%");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn blank_search_is_no_filter() {
        let filter = CertificateFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(search_pattern(&filter), None);
    }

    #[test]
    fn search_is_wrapped_in_wildcards() {
        let filter = CertificateFilter {
            search: Some(" asha ".into()),
            ..Default::default()
        };
        assert_eq!(search_pattern(&filter).as_deref(), Some("%asha%"));
    }

    #[test]
    fn statuses_bind_as_wire_names() {
        let filter = CertificateFilter {
            statuses: Some(vec![WorkflowStatus::Submitted, WorkflowStatus::WithAdvisor]),
            ..Default::default()
        };
        assert_eq!(
            status_names(&filter),
            Some(vec!["SUBMITTED".to_string(), "WITH_ADVISOR".to_string()])
        );
    }
}
