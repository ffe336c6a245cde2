//! `SQLite` schema definitions for babycare.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the babies table.
pub const CREATE_BABIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS babies (
    id INTEGER PRIMARY KEY,
    nickname TEXT NOT NULL,
    birth_date TEXT NOT NULL,
    gender TEXT NOT NULL,
    gestational_weeks INTEGER,
    gestational_days INTEGER,
    height_cm REAL,
    weight_kg REAL,
    head_circumference_cm REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the care records table.
///
/// The activity-specific fields live in `payload` as JSON; `kind` and
/// `recorded_at` are broken out for filtering.
pub const CREATE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS care_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    baby_id INTEGER NOT NULL,
    kind TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    payload TEXT NOT NULL,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on baby and time for per-day queries.
pub const CREATE_RECORDS_BABY_TIME_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_records_baby_time ON care_records(baby_id, recorded_at DESC)
";

/// SQL statement to create an index on `kind` for filtering.
pub const CREATE_RECORDS_KIND_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_records_kind ON care_records(kind)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_BABIES_TABLE,
    CREATE_RECORDS_TABLE,
    CREATE_RECORDS_BABY_TIME_INDEX,
    CREATE_RECORDS_KIND_INDEX,
    CREATE_METADATA_TABLE,
];
