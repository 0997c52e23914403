//! Domain types and pure business rules for the campus certificate service.
//!
//! Nothing in this crate touches the database or the network; the `db` and
//! `api` crates build on the types and validation functions defined here.

#[macro_use]
mod macros;

pub mod certificate;
pub mod document;
pub mod error;
pub mod hashing;
pub mod pagination;
pub mod roles;
pub mod types;
