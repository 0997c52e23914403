//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement with 403 Forbidden. Whose *turn* it is on a given
//! request is a workflow rule, not an RBAC one, and is checked by the engine.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use campus_core::error::CoreError;
use campus_core::roles::{ReviewerRole, UserRole};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

fn forbidden(message: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(message.into()))
}

/// Requires the `admin` role.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(forbidden("Admin role required"));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires the `student` role.
pub struct RequireStudent(pub AuthUser);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Student {
            return Err(forbidden("Student role required"));
        }
        Ok(RequireStudent(user))
    }
}

/// Requires one of the four reviewer roles; carries the resolved
/// [`ReviewerRole`] alongside the user.
pub struct RequireReviewer(pub AuthUser, pub ReviewerRole);

impl FromRequestParts<AppState> for RequireReviewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let role = user
            .role
            .as_reviewer()
            .ok_or_else(|| forbidden("Reviewer role required"))?;
        Ok(RequireReviewer(user, role))
    }
}

/// Requires the `office` role.
pub struct RequireOffice(pub AuthUser);

impl FromRequestParts<AppState> for RequireOffice {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Office {
            return Err(forbidden("Office role required"));
        }
        Ok(RequireOffice(user))
    }
}

/// Requires any non-student role (reviewers and admins).
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(forbidden("Staff role required"));
        }
        Ok(RequireStaff(user))
    }
}
