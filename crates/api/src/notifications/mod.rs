//! In-app notifications for students.

pub mod router;

pub use router::NotificationRouter;
