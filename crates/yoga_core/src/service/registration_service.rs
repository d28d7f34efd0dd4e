//! Registration use-case service.
//!
//! # Responsibility
//! - Decide whether a submission is accepted or rejected.
//! - Append accepted submissions through the repository.
//!
//! # Invariants
//! - Invalid input never reaches the repository.
//! - An accepted submission performs exactly one insert.
//! - A rejected submission performs no writes.
//! - Business rejections are outcomes, not errors.

use crate::model::participant::{
    NewParticipant, Participant, ParticipantId, ParticipantValidationError,
};
use crate::repo::participant_repo::{ParticipantRepository, RepoError, RepoResult};
use crate::service::cooldown::within_cooldown;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ALREADY_REGISTERED_MESSAGE: &str = "Error: Already registered";
pub const BATCH_CHANGE_TOO_SOON_MESSAGE: &str =
    "Error: You cannot change the batch wait for 1 month";
pub const INVALID_INPUT_MESSAGE: &str = "Error: Invalid registration details.";
pub const LOOKUP_FAILED_MESSAGE: &str = "Error checking registration status.";
pub const INSERT_FAILED_MESSAGE: &str = "Error submitting the form.";

/// Result of a submission that was processed without storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new row was stored.
    Registered(ParticipantId),
    /// The latest registration already has this age and batch.
    AlreadyRegistered,
    /// Same age, new batch, but the latest registration is under a month old.
    BatchChangeTooSoon { registered_on: NaiveDate },
}

impl RegistrationOutcome {
    /// Plain-text message for rejections; `None` when registered.
    pub fn rejection_message(&self) -> Option<&'static str> {
        match self {
            Self::Registered(_) => None,
            Self::AlreadyRegistered => Some(ALREADY_REGISTERED_MESSAGE),
            Self::BatchChangeTooSoon { .. } => Some(BATCH_CHANGE_TOO_SOON_MESSAGE),
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::Registered(_) => "registered",
            Self::AlreadyRegistered => "already_registered",
            Self::BatchChangeTooSoon { .. } => "batch_change_too_soon",
        }
    }
}

/// Service error for registration use-cases.
#[derive(Debug)]
pub enum RegistrationError {
    /// Submission failed field validation.
    InvalidInput(ParticipantValidationError),
    /// Reading the latest registration failed.
    Lookup(RepoError),
    /// Storing the accepted registration failed.
    Insert(RepoError),
}

impl RegistrationError {
    /// Plain-text message shown to the submitter.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => INVALID_INPUT_MESSAGE,
            Self::Lookup(_) => LOOKUP_FAILED_MESSAGE,
            Self::Insert(_) => INSERT_FAILED_MESSAGE,
        }
    }
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid registration: {err}"),
            Self::Lookup(err) => write!(f, "registration lookup failed: {err}"),
            Self::Insert(err) => write!(f, "registration insert failed: {err}"),
        }
    }
}

impl Error for RegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Lookup(err) | Self::Insert(err) => Some(err),
        }
    }
}

/// Use-case service wrapper for registrations.
pub struct RegistrationService<R: ParticipantRepository> {
    repo: R,
}

impl<R: ParticipantRepository> RegistrationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers `submission` as of the local calendar date.
    pub fn register_today(
        &self,
        submission: &NewParticipant,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        self.register(submission, Local::now().date_naive())
    }

    /// Registers `submission` as of `today`.
    ///
    /// # Contract
    /// - No prior registration: stored.
    /// - Same age and batch as the latest registration: `AlreadyRegistered`.
    /// - Same age, other batch, latest registration within one calendar
    ///   month of `today`: `BatchChangeTooSoon`.
    /// - Anything else: stored as a new row.
    pub fn register(
        &self,
        submission: &NewParticipant,
        today: NaiveDate,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        if let Err(err) = submission.validate() {
            warn!("event=registration module=service status=invalid error={err}");
            return Err(RegistrationError::InvalidInput(err));
        }

        let latest = self
            .repo
            .find_latest_by_name(&submission.name)
            .map_err(|err| {
                warn!(
                    "event=registration module=service status=error error_code=lookup_failed error={err}"
                );
                RegistrationError::Lookup(err)
            })?;

        if let Some(existing) = latest.as_ref() {
            if let Some(rejection) = rejection_for(existing, submission, today) {
                info!(
                    "event=registration module=service status=rejected reason={} previous_id={}",
                    rejection.reason(),
                    existing.id
                );
                return Ok(rejection);
            }
        }

        let id = self.repo.insert(submission, today).map_err(|err| {
            warn!(
                "event=registration module=service status=error error_code=insert_failed error={err}"
            );
            RegistrationError::Insert(err)
        })?;

        let outcome = RegistrationOutcome::Registered(id);
        info!(
            "event=registration module=service status=ok reason={} id={} returning={}",
            outcome.reason(),
            id,
            latest.is_some()
        );
        Ok(outcome)
    }

    /// Lists every stored registration for `name`, most recent first.
    pub fn history(&self, name: &str) -> RepoResult<Vec<Participant>> {
        self.repo.list_by_name(name.trim())
    }
}

fn rejection_for(
    existing: &Participant,
    submission: &NewParticipant,
    today: NaiveDate,
) -> Option<RegistrationOutcome> {
    if existing.is_same_registration(submission) {
        return Some(RegistrationOutcome::AlreadyRegistered);
    }
    if existing.is_batch_change(submission) && within_cooldown(existing.registration_date, today) {
        return Some(RegistrationOutcome::BatchChangeTooSoon {
            registered_on: existing.registration_date,
        });
    }
    None
}
