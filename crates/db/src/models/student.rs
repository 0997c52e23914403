//! Student registry models.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    /// Identity subject that signs in as this student.
    pub user_id: DbId,
    pub registration_number: String,
    pub full_name: String,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a student.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub user_id: DbId,
    pub registration_number: String,
    pub full_name: String,
    pub department: Option<String>,
}
