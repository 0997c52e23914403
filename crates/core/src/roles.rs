//! Closed role enumerations and normalization of identity claims.
//!
//! Tokens issued by different identity providers carry the caller's role
//! either as a singular `role` string or as a `roles` array, with assorted
//! spellings. [`normalize_role_claims`] folds every accepted shape into one
//! [`UserRole`] at the HTTP boundary; nothing downstream parses claims.

use crate::error::CoreError;

define_text_enum! {
    /// Every role a caller of the service can hold.
    UserRole("role") {
        Student = "student",
        Advisor = "advisor",
        Hod = "hod",
        Office = "office",
        Principal = "principal",
        Admin = "admin",
    }
}

define_text_enum! {
    /// The reviewer roles that take part in the certificate approval chain.
    ReviewerRole("reviewer role") {
        Advisor = "advisor",
        Hod = "hod",
        Office = "office",
        Principal = "principal",
    }
}

impl UserRole {
    /// The reviewer role this user acts as, if any.
    pub fn as_reviewer(self) -> Option<ReviewerRole> {
        match self {
            UserRole::Advisor => Some(ReviewerRole::Advisor),
            UserRole::Hod => Some(ReviewerRole::Hod),
            UserRole::Office => Some(ReviewerRole::Office),
            UserRole::Principal => Some(ReviewerRole::Principal),
            UserRole::Student | UserRole::Admin => None,
        }
    }

    /// Staff are every role except students.
    pub fn is_staff(self) -> bool {
        self != UserRole::Student
    }

    /// Parse a role name from a token claim, accepting known aliases.
    ///
    /// Returns `None` for names that do not map to any role.
    pub fn from_claim(name: &str) -> Option<UserRole> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "head_of_department" | "hod" => Some(UserRole::Hod),
            "class_advisor" | "faculty_advisor" | "advisor" => Some(UserRole::Advisor),
            other => other.parse().ok(),
        }
    }
}

impl From<ReviewerRole> for UserRole {
    fn from(role: ReviewerRole) -> Self {
        match role {
            ReviewerRole::Advisor => UserRole::Advisor,
            ReviewerRole::Hod => UserRole::Hod,
            ReviewerRole::Office => UserRole::Office,
            ReviewerRole::Principal => UserRole::Principal,
        }
    }
}

/// Resolve the caller's single role from the raw token claims.
///
/// The singular `role` claim wins when it names a known role; otherwise the
/// first recognised entry of `roles` is used.
pub fn normalize_role_claims(role: Option<&str>, roles: &[String]) -> Result<UserRole, CoreError> {
    role.and_then(UserRole::from_claim)
        .or_else(|| roles.iter().find_map(|r| UserRole::from_claim(r)))
        .ok_or_else(|| CoreError::Unauthorized("Token does not carry a recognised role".into()))
}
