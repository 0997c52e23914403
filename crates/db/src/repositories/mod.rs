//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a transaction's `&mut PgConnection`) as the first
//! argument.

pub mod approval_repo;
pub mod certificate_repo;
pub mod event_repo;
pub mod notification_repo;
pub mod student_repo;

pub use approval_repo::ApprovalEventRepo;
pub use certificate_repo::CertificateRequestRepo;
pub use event_repo::EventRepo;
pub use notification_repo::NotificationRepo;
pub use student_repo::StudentRepo;
