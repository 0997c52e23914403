//! Campus event bus.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the canonical domain event envelope.
//! - [`EventPersistence`] -- background service that durably writes every
//!   event to the `events` table.
//! - [`event_types`] -- names of the events the certificate workflow emits.

pub mod bus;
pub mod event_types;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
