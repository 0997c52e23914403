//! Event-to-notification routing.
//!
//! [`NotificationRouter`] subscribes to the event bus and turns certificate
//! events into in-app notifications for the student who owns the request.

use campus_core::types::DbId;
use campus_db::models::notification::CreateNotification;
use campus_db::repositories::NotificationRepo;
use campus_db::DbPool;
use campus_events::event_types::{
    CERTIFICATE_COMPLETED, CERTIFICATE_FORWARDED, CERTIFICATE_GENERATED, CERTIFICATE_REJECTED,
    CERTIFICATE_SUBMITTED,
};
use campus_events::PlatformEvent;
use tokio::sync::broadcast;

/// Routes workflow events to student notifications.
pub struct NotificationRouter {
    pool: DbPool,
}

impl NotificationRouter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the main routing loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](campus_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver the notification for one event, if it warrants one.
    pub async fn route_event(&self, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        let Some(notification) = compose(event) else {
            return Ok(());
        };
        let created = NotificationRepo::create(&self.pool, &notification).await?;
        tracing::debug!(
            notification_id = created.id,
            user_id = created.user_id,
            event_type = %created.event_type,
            "Notification delivered"
        );
        Ok(())
    }
}

/// Build the student-facing notification for `event`.
///
/// Returns `None` for events students are not told about (including
/// generation failures, which are an office concern) and for payloads
/// without a `student_user_id`.
pub fn compose(event: &PlatformEvent) -> Option<CreateNotification> {
    let user_id: DbId = event.payload.get("student_user_id")?.as_i64()?;
    let reference = event
        .payload
        .get("reference")
        .and_then(|v| v.as_str())
        .unwrap_or("your request");

    let (title, body) = match event.event_type.as_str() {
        CERTIFICATE_SUBMITTED => (
            "Certificate request submitted",
            format!("Your request {reference} has been submitted for review."),
        ),
        CERTIFICATE_FORWARDED => {
            let stage = event
                .payload
                .get("workflow_status")
                .and_then(|v| v.as_str())
                .unwrap_or("the next reviewer");
            (
                "Certificate request forwarded",
                format!("Your request {reference} has moved to {stage}."),
            )
        }
        CERTIFICATE_REJECTED => {
            let remarks = event
                .payload
                .get("remarks")
                .and_then(|v| v.as_str())
                .unwrap_or("no reason given");
            (
                "Certificate request rejected",
                format!("Your request {reference} was rejected: {remarks}"),
            )
        }
        CERTIFICATE_COMPLETED => (
            "Certificate request approved",
            format!("Your request {reference} has been approved and will be issued by the office."),
        ),
        CERTIFICATE_GENERATED => (
            "Certificate ready",
            format!("Your certificate {reference} is ready to download."),
        ),
        _ => return None,
    };

    Some(CreateNotification {
        user_id,
        event_type: event.event_type.clone(),
        title: title.to_string(),
        body,
        certificate_request_id: event.source_entity_id,
    })
}
