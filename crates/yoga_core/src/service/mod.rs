//! Core use-case services.
//!
//! # Responsibility
//! - Turn a registration submission into an accept/reject decision.
//! - Keep the HTTP layer decoupled from storage details.

pub mod cooldown;
pub mod registration_service;
