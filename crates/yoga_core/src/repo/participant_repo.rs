//! Participant repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Look up the most recent registration for a name.
//! - Append new registrations.
//!
//! # Invariants
//! - Write paths call `NewParticipant::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - "Most recent" means latest `registration_date`, then highest `id`.

use crate::db::DbError;
use crate::model::participant::{
    NewParticipant, Participant, ParticipantId, ParticipantValidationError,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage format of `participants.registration_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const PARTICIPANT_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    batch,
    registration_date
FROM participants";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for participant persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    Validation(ParticipantValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted participant data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ParticipantValidationError> for RepoError {
    fn from(value: ParticipantValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface consumed by the registration service.
pub trait ParticipantRepository {
    /// Returns the most recent registration stored under `name`.
    fn find_latest_by_name(&self, name: &str) -> RepoResult<Option<Participant>>;
    /// Appends a registration dated `registered_on`.
    fn insert(
        &self,
        participant: &NewParticipant,
        registered_on: NaiveDate,
    ) -> RepoResult<ParticipantId>;
    /// Lists every registration under `name`, most recent first.
    fn list_by_name(&self, name: &str) -> RepoResult<Vec<Participant>>;
}

/// SQLite-backed participant repository.
pub struct SqliteParticipantRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParticipantRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ParticipantRepository for SqliteParticipantRepository<'_> {
    fn find_latest_by_name(&self, name: &str) -> RepoResult<Option<Participant>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{PARTICIPANT_SELECT_SQL}
             WHERE name = ?1
             ORDER BY registration_date DESC, id DESC
             LIMIT 1;"
        ))?;

        stmt.query_row([name], RawParticipant::from_row)
            .optional()?
            .map(RawParticipant::into_participant)
            .transpose()
    }

    fn insert(
        &self,
        participant: &NewParticipant,
        registered_on: NaiveDate,
    ) -> RepoResult<ParticipantId> {
        participant.validate()?;

        self.conn.execute(
            "INSERT INTO participants (name, age, batch, registration_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                participant.name.as_str(),
                participant.age,
                participant.batch.as_str(),
                registered_on.format(DATE_FORMAT).to_string(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_by_name(&self, name: &str) -> RepoResult<Vec<Participant>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{PARTICIPANT_SELECT_SQL}
             WHERE name = ?1
             ORDER BY registration_date DESC, id DESC;"
        ))?;

        let mut rows = stmt.query([name])?;
        let mut participants = Vec::new();
        while let Some(row) = rows.next()? {
            participants.push(RawParticipant::from_row(row)?.into_participant()?);
        }

        Ok(participants)
    }
}

/// Row columns as stored, before date parsing and validation.
struct RawParticipant {
    id: ParticipantId,
    name: String,
    age: i64,
    batch: String,
    registration_date: String,
}

impl RawParticipant {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            batch: row.get("batch")?,
            registration_date: row.get("registration_date")?,
        })
    }

    fn into_participant(self) -> RepoResult<Participant> {
        let registration_date = parse_registration_date(&self.registration_date)?;
        let participant = Participant {
            id: self.id,
            name: self.name,
            age: self.age,
            batch: self.batch,
            registration_date,
        };
        participant.validate().map_err(|err| {
            RepoError::InvalidData(format!("participant {}: {err}", participant.id))
        })?;
        Ok(participant)
    }
}

fn parse_registration_date(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{value}` in participants.registration_date"
        ))
    })
}
