//! Core domain logic for yoga class registration.
//! This crate is the single source of truth for registration rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::participant::{
    NewParticipant, Participant, ParticipantId, ParticipantValidationError,
};
pub use repo::participant_repo::{
    ParticipantRepository, RepoError, RepoResult, SqliteParticipantRepository,
};
pub use service::cooldown::{one_month_before, within_cooldown};
pub use service::registration_service::{
    RegistrationError, RegistrationOutcome, RegistrationService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
