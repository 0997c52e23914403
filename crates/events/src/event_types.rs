//! Dot-separated names of certificate workflow events.

/// Source entity type attached to every certificate event.
pub const ENTITY_CERTIFICATE_REQUEST: &str = "certificate_request";

pub const CERTIFICATE_SUBMITTED: &str = "certificate.submitted";
pub const CERTIFICATE_FORWARDED: &str = "certificate.forwarded";
pub const CERTIFICATE_REJECTED: &str = "certificate.rejected";
pub const CERTIFICATE_COMPLETED: &str = "certificate.completed";
pub const CERTIFICATE_GENERATED: &str = "certificate.generated";
pub const CERTIFICATE_GENERATION_FAILED: &str = "certificate.generation_failed";
