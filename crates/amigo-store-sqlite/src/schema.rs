//! SQL schema for the Amigo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS groups (
    group_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id INTEGER NOT NULL UNIQUE,   -- caller-supplied, e.g. a chat id
    name        TEXT    NOT NULL,
    drawn       INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT    NOT NULL           -- ISO 8601 UTC
);

-- Rows are owned by their group; AUTOINCREMENT keeps join order stable.
CREATE TABLE IF NOT EXISTS participants (
    participant_id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_id       INTEGER NOT NULL REFERENCES groups(group_id) ON DELETE CASCADE,
    external_id    INTEGER NOT NULL,       -- caller-supplied, e.g. a user id
    name           TEXT    NOT NULL,
    assignee_id    INTEGER REFERENCES participants(participant_id) ON DELETE SET NULL,
    joined_at      TEXT    NOT NULL,
    UNIQUE (group_id, external_id),
    CHECK  (assignee_id IS NULL OR assignee_id != participant_id)
);

CREATE INDEX IF NOT EXISTS participants_external_idx ON participants(external_id);

PRAGMA user_version = 1;
";
