//! Workflow events, notification routing, and the `/notifications` endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use campus_api::app::build_app;
use campus_api::documents::FileSystemGenerator;
use campus_api::engine::certificate_workflow;
use campus_api::notifications::NotificationRouter;
use campus_core::certificate::{ApprovalAction, CertificateType};
use campus_core::roles::{ReviewerRole, UserRole};
use campus_events::PlatformEvent;
use common::{body_json, get_auth, post_auth, seed_student, test_state, token_for};
use sqlx::PgPool;
use tokio::sync::broadcast::error::TryRecvError;

const STUDENT_USER: i64 = 42;

#[sqlx::test(migrations = "../../db/migrations")]
async fn workflow_publishes_events_after_each_change(pool: PgPool) {
    seed_student(&pool, STUDENT_USER, "21CS042", "Asha Menon").await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(pool, Arc::new(FileSystemGenerator::new(dir.path())));
    let mut rx = state.event_bus.subscribe();

    let request =
        certificate_workflow::submit(&state, STUDENT_USER, CertificateType::Bonafide, "loan")
            .await
            .unwrap();
    let submitted = rx.recv().await.unwrap();
    assert_eq!(submitted.event_type, "certificate.submitted");
    assert_eq!(submitted.source_entity_id, Some(request.id));
    assert_eq!(submitted.payload["student_user_id"], STUDENT_USER);

    // A rejected attempt publishes nothing.
    let err = certificate_workflow::process(
        &state,
        request.id,
        9002,
        ReviewerRole::Hod,
        ApprovalAction::Forward,
        None,
    )
    .await;
    assert!(err.is_err());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    certificate_workflow::process(
        &state,
        request.id,
        9001,
        ReviewerRole::Advisor,
        ApprovalAction::Reject,
        Some("photo missing"),
    )
    .await
    .unwrap();
    let rejected = rx.recv().await.unwrap();
    assert_eq!(rejected.event_type, "certificate.rejected");
    assert_eq!(rejected.actor_user_id, Some(9001));
    assert_eq!(rejected.payload["remarks"], "photo missing");
    assert_eq!(rejected.payload["workflow_status"], "REJECTED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn routed_events_become_student_notifications(pool: PgPool) {
    seed_student(&pool, STUDENT_USER, "21CS042", "Asha Menon").await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(pool.clone(), Arc::new(FileSystemGenerator::new(dir.path())));
    let mut rx = state.event_bus.subscribe();
    let router = NotificationRouter::new(pool);

    let request =
        certificate_workflow::submit(&state, STUDENT_USER, CertificateType::Transfer, "moving")
            .await
            .unwrap();
    certificate_workflow::process(
        &state,
        request.id,
        9001,
        ReviewerRole::Advisor,
        ApprovalAction::Forward,
        None,
    )
    .await
    .unwrap();

    for _ in 0..2 {
        let event: PlatformEvent = rx.recv().await.unwrap();
        router.route_event(&event).await.unwrap();
    }

    let app = build_app(state);
    let token = token_for(STUDENT_USER, UserRole::Student);

    let json = body_json(get_auth(app.clone(), "/api/v1/notifications", &token).await).await;
    let notifications = json["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    // Newest first.
    assert_eq!(notifications[0]["event_type"], "certificate.forwarded");
    assert_eq!(notifications[0]["certificate_request_id"], request.id);
    assert!(notifications[0]["body"].as_str().unwrap().contains("WITH_HOD"));
    assert_eq!(notifications[1]["event_type"], "certificate.submitted");

    let first_id = notifications[0]["id"].as_i64().unwrap();
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/notifications/{first_id}/read"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Marking twice is harmless.
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/notifications/{first_id}/read"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let unread = body_json(
        get_auth(app.clone(), "/api/v1/notifications?unread_only=true", &token).await,
    )
    .await;
    assert_eq!(unread["data"].as_array().unwrap().len(), 1);

    // Someone else's notification is not found for this caller.
    let other = token_for(43, UserRole::Student);
    let response = post_auth(app, &format!("/api/v1/notifications/{first_id}/read"), &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
