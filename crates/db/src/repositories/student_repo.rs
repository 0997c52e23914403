//! Repository for the `students` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::student::{CreateStudent, Student};

/// Column list for students queries.
const COLUMNS: &str = "id, user_id, registration_number, full_name, department, \
    is_active, created_at, updated_at";

/// Provides the student registry operations the certificate workflow needs.
pub struct StudentRepo;

impl StudentRepo {
    /// Register a student, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStudent) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (user_id, registration_number, full_name, department)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(input.user_id)
            .bind(input.registration_number.trim())
            .bind(input.full_name.trim())
            .bind(input.department.as_deref().map(str::trim))
            .fetch_one(pool)
            .await
    }

    /// Find a student by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the student record linked to an identity subject.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE user_id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a student. Returns `true` if the row was found.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE students SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
