//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the registration use case depends on.
//! - Isolate SQLite query details from registration decisions.
//!
//! # Invariants
//! - Repository writes must enforce `NewParticipant::validate()` before
//!   persistence.

pub mod participant_repo;
