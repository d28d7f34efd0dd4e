use chrono::NaiveDate;
use yoga_core::db::open_db_in_memory;
use yoga_core::{
    NewParticipant, ParticipantRepository, ParticipantValidationError, RepoError,
    SqliteParticipantRepository,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn insert_and_find_latest_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteParticipantRepository::new(&conn);

    let submission = NewParticipant::new("Alice", 30, "morning");
    let id = repo.insert(&submission, date(2024, 6, 1)).unwrap();

    let loaded = repo.find_latest_by_name("Alice").unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.name, "Alice");
    assert_eq!(loaded.age, 30);
    assert_eq!(loaded.batch, "morning");
    assert_eq!(loaded.registration_date, date(2024, 6, 1));
}

#[test]
fn find_latest_returns_none_for_unknown_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteParticipantRepository::new(&conn);

    repo.insert(&NewParticipant::new("Alice", 30, "morning"), date(2024, 6, 1))
        .unwrap();

    assert!(repo.find_latest_by_name("alice").unwrap().is_none());
    assert!(repo.find_latest_by_name("Bob").unwrap().is_none());
}

#[test]
fn find_latest_prefers_newest_date_then_highest_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteParticipantRepository::new(&conn);

    repo.insert(&NewParticipant::new("Alice", 30, "morning"), date(2024, 6, 1))
        .unwrap();
    repo.insert(&NewParticipant::new("Alice", 30, "evening"), date(2024, 4, 1))
        .unwrap();
    let latest = repo.find_latest_by_name("Alice").unwrap().unwrap();
    assert_eq!(latest.batch, "morning");

    let same_day = repo
        .insert(&NewParticipant::new("Alice", 31, "noon"), date(2024, 6, 1))
        .unwrap();
    let latest = repo.find_latest_by_name("Alice").unwrap().unwrap();
    assert_eq!(latest.id, same_day);
    assert_eq!(latest.batch, "noon");
}

#[test]
fn list_by_name_returns_history_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteParticipantRepository::new(&conn);

    repo.insert(&NewParticipant::new("Alice", 30, "morning"), date(2024, 1, 10))
        .unwrap();
    repo.insert(&NewParticipant::new("Bob", 25, "morning"), date(2024, 2, 10))
        .unwrap();
    repo.insert(&NewParticipant::new("Alice", 30, "evening"), date(2024, 3, 10))
        .unwrap();

    let history = repo.list_by_name("Alice").unwrap();
    let batches: Vec<&str> = history.iter().map(|p| p.batch.as_str()).collect();
    assert_eq!(batches, vec!["evening", "morning"]);
    assert!(repo.list_by_name("Carol").unwrap().is_empty());
}

#[test]
fn insert_rejects_invalid_participant_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteParticipantRepository::new(&conn);

    let err = repo
        .insert(&NewParticipant::new("", 30, "morning"), date(2024, 6, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ParticipantValidationError::EmptyName)
    ));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM participants;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn find_latest_rejects_unparseable_registration_date() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO participants (name, age, batch, registration_date)
         VALUES ('Alice', 30, 'morning', 'not-a-date');",
        [],
    )
    .unwrap();
    let repo = SqliteParticipantRepository::new(&conn);

    let err = repo.find_latest_by_name("Alice").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("not-a-date")));
}

#[test]
fn find_latest_rejects_invalid_persisted_age() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO participants (name, age, batch, registration_date)
         VALUES ('Alice', -4, 'morning', '2024-06-01');",
        [],
    )
    .unwrap();
    let repo = SqliteParticipantRepository::new(&conn);

    let err = repo.find_latest_by_name("Alice").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
