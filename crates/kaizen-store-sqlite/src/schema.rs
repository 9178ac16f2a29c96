//! SQL schema for the Kaizen SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are fixed-width RFC 3339 UTC strings
/// (`YYYY-MM-DDTHH:MM:SS.ffffffZ`), so string comparison is chronological.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS departments (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL,   -- English
    label     TEXT NOT NULL,   -- primary (Korean)
    label_th  TEXT
);

CREATE TABLE IF NOT EXISTS employees (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    name_secondary  TEXT,
    department_id   INTEGER REFERENCES departments(id)
);

CREATE TABLE IF NOT EXISTS issues (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    description  TEXT,
    priority     INTEGER NOT NULL CHECK (priority BETWEEN 1 AND 4),
    status       TEXT NOT NULL,   -- 'open' | 'in_progress' | 'done' | 'verified' | 'closed'
    reporter_id  INTEGER REFERENCES employees(id),
    solver_id    INTEGER REFERENCES employees(id),
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    issue_id    INTEGER NOT NULL REFERENCES issues(id),
    author_id   INTEGER NOT NULL REFERENCES employees(id),
    body        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS issues_solver_idx    ON issues(solver_id, status);
CREATE INDEX IF NOT EXISTS issues_created_idx   ON issues(created_at);
CREATE INDEX IF NOT EXISTS comments_author_idx  ON comments(author_id);
CREATE INDEX IF NOT EXISTS comments_created_idx ON comments(created_at);

PRAGMA user_version = 1;
";
