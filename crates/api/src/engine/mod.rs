//! Certificate approval workflow engine.
//!
//! Orchestrates the pure rules in `campus_core::certificate` against the
//! database, the document generator, and the event bus. Handlers stay thin:
//! they authenticate, parse input, and delegate here.

pub mod certificate_workflow;
