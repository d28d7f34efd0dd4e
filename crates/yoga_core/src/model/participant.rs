//! Participant domain model.
//!
//! # Responsibility
//! - Define the write model accepted from the registration form.
//! - Define the persisted registration row.
//! - Own input validation rules shared by service and repository.
//!
//! # Invariants
//! - `name` and `batch` are stored trimmed and non-empty.
//! - `age` lies within `MIN_AGE..=MAX_AGE`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate row id assigned by SQLite.
pub type ParticipantId = i64;

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 150;
pub const MAX_TEXT_CHARS: usize = 100;

/// Validation failure for a registration submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    EmptyName,
    EmptyBatch,
    AgeOutOfRange(i64),
    FieldTooLong { field: &'static str, max_chars: usize },
}

impl Display for ParticipantValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::EmptyBatch => write!(f, "batch cannot be empty"),
            Self::AgeOutOfRange(age) => {
                write!(f, "age {age} is outside {MIN_AGE}..={MAX_AGE}")
            }
            Self::FieldTooLong { field, max_chars } => {
                write!(f, "{field} exceeds {max_chars} characters")
            }
        }
    }
}

impl Error for ParticipantValidationError {}

/// Registration submission, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParticipant {
    pub name: String,
    pub age: i64,
    /// Class/session grouping, e.g. `morning`.
    pub batch: String,
}

impl NewParticipant {
    /// Builds a submission with `name` and `batch` trimmed.
    ///
    /// Does not validate; call [`NewParticipant::validate`] before storing.
    pub fn new(name: impl AsRef<str>, age: i64, batch: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            age,
            batch: batch.as_ref().trim().to_string(),
        }
    }

    /// Checks field-level rules.
    pub fn validate(&self) -> Result<(), ParticipantValidationError> {
        validate_fields(&self.name, self.age, &self.batch)
    }
}

/// One stored registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub age: i64,
    pub batch: String,
    pub registration_date: NaiveDate,
}

impl Participant {
    /// Checks field-level rules on a row read back from storage.
    pub fn validate(&self) -> Result<(), ParticipantValidationError> {
        validate_fields(&self.name, self.age, &self.batch)
    }

    /// Whether a submission asks for exactly this age and batch again.
    pub fn is_same_registration(&self, candidate: &NewParticipant) -> bool {
        self.age == candidate.age && self.batch == candidate.batch
    }

    /// Whether a submission keeps the age but moves to another batch.
    pub fn is_batch_change(&self, candidate: &NewParticipant) -> bool {
        self.age == candidate.age && self.batch != candidate.batch
    }
}

fn validate_fields(name: &str, age: i64, batch: &str) -> Result<(), ParticipantValidationError> {
    if name.trim().is_empty() {
        return Err(ParticipantValidationError::EmptyName);
    }
    if batch.trim().is_empty() {
        return Err(ParticipantValidationError::EmptyBatch);
    }
    if name.chars().count() > MAX_TEXT_CHARS {
        return Err(ParticipantValidationError::FieldTooLong {
            field: "name",
            max_chars: MAX_TEXT_CHARS,
        });
    }
    if batch.chars().count() > MAX_TEXT_CHARS {
        return Err(ParticipantValidationError::FieldTooLong {
            field: "batch",
            max_chars: MAX_TEXT_CHARS,
        });
    }
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ParticipantValidationError::AgeOutOfRange(age));
    }
    Ok(())
}
