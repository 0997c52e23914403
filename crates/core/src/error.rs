use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The caller may not move the request from its current workflow stage.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// The request is not in a state that allows the requested operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A collaborator outside the service (e.g. the document generator) failed.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
