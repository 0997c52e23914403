//! Campus certificate workflow API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! workflow engine) so integration tests and the binary entrypoint can both
//! access them.

pub mod app;
pub mod auth;
pub mod config;
pub mod documents;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
