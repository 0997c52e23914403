//! Integration tests for the certificate request, approval history, and
//! student repositories against a real database.

use campus_core::certificate::{
    plan_transition, ApprovalAction, CertificateStatus, CertificateType, WorkflowStatus,
};
use campus_core::roles::ReviewerRole;
use campus_db::models::certificate::CertificateFilter;
use campus_db::models::student::{CreateStudent, Student};
use campus_db::repositories::{ApprovalEventRepo, CertificateRequestRepo, StudentRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_student(pool: &PgPool, user_id: i64, reg: &str, name: &str) -> Student {
    StudentRepo::create(
        pool,
        &CreateStudent {
            user_id,
            registration_number: reg.to_string(),
            full_name: name.to_string(),
            department: Some("Physics".to_string()),
        },
    )
    .await
    .expect("student creation should succeed")
}

/// Apply one reviewer action inside its own transaction.
async fn act(
    pool: &PgPool,
    id: i64,
    role: ReviewerRole,
    action: ApprovalAction,
    remarks: Option<&str>,
) {
    let mut tx = pool.begin().await.unwrap();
    let current = CertificateRequestRepo::find_for_update(&mut tx, id)
        .await
        .unwrap()
        .expect("request should exist");
    let transition = plan_transition(current.workflow_status, role, action, remarks).unwrap();
    ApprovalEventRepo::append(&mut tx, id, 900, &transition)
        .await
        .unwrap();
    CertificateRequestRepo::apply_transition(&mut tx, id, &transition)
        .await
        .unwrap();
    tx.commit().await.unwrap();
}

fn filter(statuses: Option<Vec<WorkflowStatus>>, search: Option<&str>) -> CertificateFilter {
    CertificateFilter {
        statuses,
        search: search.map(str::to_string),
        limit: 20,
        offset: 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_request_starts_submitted(pool: PgPool) {
    let student = new_student(&pool, 42, "21PH001", "Asha Menon").await;

    let request =
        CertificateRequestRepo::create(&pool, student.id, CertificateType::Bonafide, "bank loan")
            .await
            .unwrap();

    assert_eq!(request.student_id, student.id);
    assert_eq!(request.student_user_id, 42);
    assert_eq!(request.student_name, "Asha Menon");
    assert_eq!(request.workflow_status, WorkflowStatus::Submitted);
    assert_eq!(request.status(), CertificateStatus::Pending);
    assert!(request.rejection_reason.is_none());
    assert!(request.certificate_url.is_none());
    assert!(request.reference().starts_with("BON-"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_chain_records_history_in_order(pool: PgPool) {
    let student = new_student(&pool, 1, "21PH002", "Ravi Kumar").await;
    let request =
        CertificateRequestRepo::create(&pool, student.id, CertificateType::Transfer, "relocating")
            .await
            .unwrap();

    act(&pool, request.id, ReviewerRole::Advisor, ApprovalAction::Forward, None).await;
    act(&pool, request.id, ReviewerRole::Hod, ApprovalAction::Approve, Some("ok")).await;
    act(&pool, request.id, ReviewerRole::Office, ApprovalAction::Forward, None).await;
    act(&pool, request.id, ReviewerRole::Principal, ApprovalAction::Approve, None).await;

    let updated = CertificateRequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.workflow_status, WorkflowStatus::Completed);
    assert_eq!(updated.status(), CertificateStatus::Approved);

    let history = ApprovalEventRepo::list_for_request(&pool, request.id)
        .await
        .unwrap();
    let path: Vec<_> = history.iter().map(|e| (e.role, e.from_status, e.to_status)).collect();
    assert_eq!(
        path,
        vec![
            (ReviewerRole::Advisor, WorkflowStatus::Submitted, WorkflowStatus::WithHod),
            (ReviewerRole::Hod, WorkflowStatus::WithHod, WorkflowStatus::WithOffice),
            (ReviewerRole::Office, WorkflowStatus::WithOffice, WorkflowStatus::WithPrincipal),
            (ReviewerRole::Principal, WorkflowStatus::WithPrincipal, WorkflowStatus::Completed),
        ]
    );
    assert_eq!(history[1].remarks.as_deref(), Some("ok"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_sets_rejection_reason(pool: PgPool) {
    let student = new_student(&pool, 2, "21PH003", "Meera Das").await;
    let request =
        CertificateRequestRepo::create(&pool, student.id, CertificateType::Character, "visa")
            .await
            .unwrap();

    act(
        &pool,
        request.id,
        ReviewerRole::Advisor,
        ApprovalAction::Reject,
        Some("missing documents"),
    )
    .await;

    let updated = CertificateRequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.workflow_status, WorkflowStatus::Rejected);
    assert_eq!(updated.status(), CertificateStatus::Rejected);
    assert_eq!(updated.rejection_reason.as_deref(), Some("missing documents"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_generated_only_once(pool: PgPool) {
    let student = new_student(&pool, 3, "21PH004", "John Varghese").await;
    let request =
        CertificateRequestRepo::create(&pool, student.id, CertificateType::Bonafide, "scholarship")
            .await
            .unwrap();

    // Not completed yet: the guarded update matches nothing.
    let early = CertificateRequestRepo::mark_generated(&pool, request.id, "/x")
        .await
        .unwrap();
    assert!(early.is_none());

    for (role, action) in [
        (ReviewerRole::Advisor, ApprovalAction::Forward),
        (ReviewerRole::Hod, ApprovalAction::Forward),
        (ReviewerRole::Office, ApprovalAction::Forward),
        (ReviewerRole::Principal, ApprovalAction::Forward),
    ] {
        act(&pool, request.id, role, action, None).await;
    }

    let generated = CertificateRequestRepo::mark_generated(&pool, request.id, "/download")
        .await
        .unwrap()
        .expect("first generation should win");
    assert_eq!(generated.status(), CertificateStatus::Generated);
    assert!(generated.generated_at.is_some());

    let second = CertificateRequestRepo::mark_generated(&pool, request.id, "/other")
        .await
        .unwrap();
    assert!(second.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_status_and_search(pool: PgPool) {
    let asha = new_student(&pool, 10, "21CS_01", "Asha Menon").await;
    let ravi = new_student(&pool, 11, "21CS001", "Ravi Kumar").await;

    let a = CertificateRequestRepo::create(&pool, asha.id, CertificateType::Bonafide, "loan")
        .await
        .unwrap();
    CertificateRequestRepo::create(&pool, ravi.id, CertificateType::Bonafide, "loan")
        .await
        .unwrap();
    act(&pool, a.id, ReviewerRole::Advisor, ApprovalAction::Forward, None).await;

    let advisor_queue = CertificateRequestRepo::list(
        &pool,
        &filter(Some(WorkflowStatus::actionable_by(ReviewerRole::Advisor)), None),
    )
    .await
    .unwrap();
    assert_eq!(advisor_queue.len(), 1);
    assert_eq!(advisor_queue[0].student_name, "Ravi Kumar");

    let everything = filter(None, None);
    assert_eq!(CertificateRequestRepo::count(&pool, &everything).await.unwrap(), 2);

    let by_name = filter(None, Some("asha"));
    let found = CertificateRequestRepo::list(&pool, &by_name).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, a.id);

    // Underscore is matched literally, not as a wildcard.
    let by_reg = filter(None, Some("CS_0"));
    assert_eq!(CertificateRequestRepo::count(&pool, &by_reg).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_student_newest_first(pool: PgPool) {
    let student = new_student(&pool, 20, "21ME010", "Nila P").await;
    let first = CertificateRequestRepo::create(&pool, student.id, CertificateType::Other, "one")
        .await
        .unwrap();
    let second = CertificateRequestRepo::create(&pool, student.id, CertificateType::Other, "two")
        .await
        .unwrap();

    let mine = CertificateRequestRepo::list_for_student(&pool, student.id)
        .await
        .unwrap();
    assert_eq!(mine.iter().map(|r| r.id).collect::<Vec<_>>(), vec![second.id, first.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approval_events_are_append_only(pool: PgPool) {
    let student = new_student(&pool, 30, "21EE001", "Kiran S").await;
    let request =
        CertificateRequestRepo::create(&pool, student.id, CertificateType::Bonafide, "passport")
            .await
            .unwrap();
    act(&pool, request.id, ReviewerRole::Advisor, ApprovalAction::Forward, None).await;

    let update = sqlx::query("UPDATE approval_events SET remarks = 'edited'")
        .execute(&pool)
        .await;
    assert!(update.is_err(), "approval events must not be editable");

    let delete = sqlx::query("DELETE FROM approval_events")
        .execute(&pool)
        .await;
    assert!(delete.is_err(), "approval events must not be deletable");

    assert_eq!(
        ApprovalEventRepo::count_for_request(&pool, request.id).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_registration_number_violates_constraint(pool: PgPool) {
    new_student(&pool, 40, "21CE001", "First").await;
    let result = StudentRepo::create(
        &pool,
        &CreateStudent {
            user_id: 41,
            registration_number: "21CE001".to_string(),
            full_name: "Second".to_string(),
            department: None,
        },
    )
    .await;

    let err = result.expect_err("duplicate registration number must fail");
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("uq_students_registration_number"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate_student(pool: PgPool) {
    let student = new_student(&pool, 50, "21CE050", "Leaving").await;
    assert!(StudentRepo::deactivate(&pool, student.id).await.unwrap());
    let reloaded = StudentRepo::find_by_user_id(&pool, 50).await.unwrap().unwrap();
    assert!(!reloaded.is_active);
    assert!(!StudentRepo::deactivate(&pool, 999_999).await.unwrap());
}
