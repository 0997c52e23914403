//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts, where the entity is created
//!   from request input

pub mod approval;
pub mod certificate;
pub mod event;
pub mod notification;
pub mod student;
