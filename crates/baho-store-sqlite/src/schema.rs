//! SQL schema for the Baho SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS staff (
    staff_id  INTEGER PRIMARY KEY,   -- caller-supplied
    name      TEXT NOT NULL,
    position  TEXT NOT NULL,
    region    TEXT NOT NULL
);

-- No enforced foreign key: a vote for an unknown staff id is accepted.
-- Deleting a staff row cascades through the trigger below.
CREATE TABLE IF NOT EXISTS votes (
    vote_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_id    INTEGER NOT NULL,
    kind        TEXT NOT NULL CHECK (kind IN ('like', 'neutral', 'dislike')),
    created_at  TEXT NOT NULL        -- RFC 3339 UTC, second precision
);

CREATE INDEX IF NOT EXISTS votes_staff_idx   ON votes(staff_id);
CREATE INDEX IF NOT EXISTS votes_created_idx ON votes(created_at);

CREATE TRIGGER IF NOT EXISTS staff_delete_cascade
AFTER DELETE ON staff
BEGIN
    DELETE FROM votes WHERE staff_id = OLD.staff_id;
END;

PRAGMA user_version = 1;
";
