//! SQL schema for the Presensi SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS attendance_sessions (
    session_id      TEXT PRIMARY KEY,
    day_number      INTEGER NOT NULL UNIQUE CHECK (day_number >= 0),
    day_title       TEXT NOT NULL,
    is_active       INTEGER NOT NULL DEFAULT 0 CHECK (is_active IN (0, 1)),
    start_time      TEXT,
    end_time        TEXT,
    auto_close_time TEXT,
    created_by      TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

-- At most one open session, enforced by the store itself.
CREATE UNIQUE INDEX IF NOT EXISTS attendance_sessions_single_active
    ON attendance_sessions(is_active) WHERE is_active = 1;

CREATE TABLE IF NOT EXISTS attendance_submissions (
    submission_id        TEXT PRIMARY KEY,
    session_id           TEXT NOT NULL REFERENCES attendance_sessions(session_id),
    user_email           TEXT NOT NULL,
    full_name            TEXT NOT NULL,
    username             TEXT NOT NULL,
    status_kehadiran     TEXT NOT NULL,   -- 'present' | 'absent' | 'arriving_late' | 'leaving_early'
    reason               TEXT NOT NULL,
    scheduled_clock_time TEXT,            -- HH:MM:SS
    evidence_photo_url   TEXT,
    approval_status      TEXT NOT NULL DEFAULT 'pending',
    feedback_admin       TEXT,
    created_at           TEXT NOT NULL,
    updated_at           TEXT NOT NULL,
    UNIQUE (user_email, session_id)
);

CREATE INDEX IF NOT EXISTS submissions_approval_idx
    ON attendance_submissions(approval_status, created_at);
CREATE INDEX IF NOT EXISTS submissions_session_idx
    ON attendance_submissions(session_id, created_at);

PRAGMA user_version = 1;
";
