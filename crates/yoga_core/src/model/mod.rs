//! Registration domain model.
//!
//! # Responsibility
//! - Define the participant record shared by storage and the registration
//!   use case.
//!
//! # Invariants
//! - Stored participants are append-only; a re-registration is a new row.

pub mod participant;
