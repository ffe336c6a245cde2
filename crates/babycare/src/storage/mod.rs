//! Storage layer for babycare.
//!
//! This module provides `SQLite`-based persistent storage for baby profiles,
//! care records, and small pieces of application state kept in the metadata
//! table.

pub mod migrations;
pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::baby::{BabyProfile, Gender};
use crate::error::{Error, Result};
use crate::records::{CareRecord, RecordEntry, RecordKind, TIMESTAMP_FORMAT};
use crate::store::BabyRepository;

/// Metadata key holding the id of the selected baby.
pub const CURRENT_BABY_KEY: &str = "current_baby_id";

/// Metadata key set once the first profile has been created.
pub const ONBOARDED_KEY: &str = "onboarding_complete";

const DATE_FORMAT: &str = "%Y-%m-%d";

const RECORD_COLUMNS: &str = "id, baby_id, kind, recorded_at, payload, notes";

/// Storage engine for babies and their care records.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Baby profiles through [`BabyRepository`]
/// - Care records filtered by kind and time range
/// - Key/value metadata
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

/// Filter for [`Storage::list_records`].
///
/// `since` is inclusive and `until` exclusive. A `limit` of `None` returns
/// every matching record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Only records of this kind.
    pub kind: Option<RecordKind>,
    /// Only records at or after this time.
    pub since: Option<NaiveDateTime>,
    /// Only records before this time.
    pub until: Option<NaiveDateTime>,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

impl RecordFilter {
    /// Records in `[since, until)`, unlimited.
    #[must_use]
    pub fn between(since: NaiveDateTime, until: NaiveDateTime) -> Self {
        Self {
            since: Some(since),
            until: Some(until),
            ..Self::default()
        }
    }

    /// Records on a single calendar day.
    #[must_use]
    pub fn on_day(date: NaiveDate) -> Self {
        let start = date.and_time(chrono::NaiveTime::MIN);
        Self::between(start, start + chrono::Duration::days(1))
    }
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Care records ===

    /// Validate and insert a care record, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid or the database operation fails.
    pub fn insert_record(&self, record: &CareRecord) -> Result<i64> {
        record.validate()?;

        let payload = serde_json::to_string(&record.entry)?;
        self.conn.execute(
            r"
            INSERT INTO care_records (baby_id, kind, recorded_at, payload, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                record.baby_id,
                record.kind().as_str(),
                record.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
                payload,
                record.notes,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted {} record {} for baby {}", record.kind(), id, record.baby_id);
        Ok(id)
    }

    /// Get a care record by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_record(&self, id: i64) -> Result<Option<CareRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM care_records WHERE id = ?1");
        let record = self
            .conn
            .query_row(&sql, [id], Self::row_to_record)
            .optional()?;
        Ok(record)
    }

    /// List a baby's care records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_records(&self, baby_id: i64, filter: &RecordFilter) -> Result<Vec<CareRecord>> {
        let sql = format!(
            r"
            SELECT {RECORD_COLUMNS} FROM care_records
            WHERE baby_id = ?1
              AND (?2 IS NULL OR kind = ?2)
              AND (?3 IS NULL OR recorded_at >= ?3)
              AND (?4 IS NULL OR recorded_at < ?4)
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?5
            "
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let kind = filter.kind.map(RecordKind::as_str);
        let since = filter
            .since
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string());
        let until = filter
            .until
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string());
        // SQLite treats a negative LIMIT as "no limit".
        let limit = filter
            .limit
            .map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

        let records = stmt
            .query_map(
                params![baby_id, kind, since, until, limit],
                Self::row_to_record,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Listed {} records for baby {}", records.len(), baby_id);
        Ok(records)
    }

    /// Delete a care record by id.
    ///
    /// Returns `true` if a record was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_record(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM care_records WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Delete every care record belonging to a baby.
    ///
    /// Returns the number of records deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_records_for_baby(&self, baby_id: i64) -> Result<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM care_records WHERE baby_id = ?1", [baby_id])?;
        if affected > 0 {
            info!("Deleted {} records for baby {}", affected, baby_id);
        }
        Ok(affected)
    }

    /// Count care records, optionally for one baby.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_records(&self, baby_id: Option<i64>) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM care_records WHERE ?1 IS NULL OR baby_id = ?1",
            [baby_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // === Metadata ===

    /// Read a metadata value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write a metadata value, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            (key, value),
        )?;
        Ok(())
    }

    /// Remove a metadata value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_metadata(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM metadata WHERE key = ?1", [key])?;
        Ok(())
    }

    /// The persisted current-baby selection, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn current_baby_id(&self) -> Result<Option<i64>> {
        let value = self.get_metadata(CURRENT_BABY_KEY)?;
        Ok(value.and_then(|v| match v.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Ignoring unparseable current baby id: {}", v);
                None
            }
        }))
    }

    /// Persist the current-baby selection. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_current_baby_id(&self, id: Option<i64>) -> Result<()> {
        match id {
            Some(id) => self.set_metadata(CURRENT_BABY_KEY, &id.to_string()),
            None => self.delete_metadata(CURRENT_BABY_KEY),
        }
    }

    /// Whether onboarding has been completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn is_onboarded(&self) -> Result<bool> {
        Ok(self.get_metadata(ONBOARDED_KEY)?.as_deref() == Some("true"))
    }

    /// Mark onboarding as completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_onboarded(&self) -> Result<()> {
        self.set_metadata(ONBOARDED_KEY, "true")
    }

    // === Statistics ===

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let babies: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM babies", [], |row| row.get(0))?;

        let mut records_by_kind = BTreeMap::new();
        let mut stmt = self
            .conn
            .prepare("SELECT kind, COUNT(*) FROM care_records GROUP BY kind")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (kind, count) = row?;
            match kind.parse::<RecordKind>() {
                Ok(kind) => {
                    records_by_kind.insert(kind.as_str(), count);
                }
                Err(_) => warn!("Skipping unknown record kind in stats: {}", kind),
            }
        }
        let total_records = records_by_kind.values().sum();

        let oldest = self.record_time_bound("ASC")?;
        let newest = self.record_time_bound("DESC")?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            babies,
            total_records,
            records_by_kind,
            oldest_record: oldest,
            newest_record: newest,
            db_size_bytes,
        })
    }

    fn record_time_bound(&self, order: &str) -> Result<Option<NaiveDateTime>> {
        let sql = format!("SELECT recorded_at FROM care_records ORDER BY recorded_at {order} LIMIT 1");
        let value: Option<String> = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .optional()?;
        Ok(value.and_then(|s| NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).ok()))
    }

    // === Row mapping ===

    /// Convert a database row to a [`CareRecord`].
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<CareRecord> {
        let id: i64 = row.get(0)?;
        let baby_id: i64 = row.get(1)?;
        let kind: String = row.get(2)?;
        let recorded_at: String = row.get(3)?;
        let payload: String = row.get(4)?;
        let notes: Option<String> = row.get(5)?;

        let recorded_at = NaiveDateTime::parse_from_str(&recorded_at, TIMESTAMP_FORMAT)
            .map_err(|e| conversion_error(3, e))?;
        let entry: RecordEntry =
            serde_json::from_str(&payload).map_err(|e| conversion_error(4, e))?;

        if entry.kind().as_str() != kind {
            warn!(
                "Record {} has kind column '{}' but payload kind '{}'",
                id,
                kind,
                entry.kind()
            );
        }

        Ok(CareRecord {
            id: Some(id),
            baby_id,
            recorded_at,
            notes,
            entry,
        })
    }

    /// Convert a database row to a [`BabyProfile`].
    fn row_to_baby(row: &rusqlite::Row) -> rusqlite::Result<BabyProfile> {
        let birth_date: String = row.get(2)?;
        let gender: String = row.get(3)?;
        let created_at: String = row.get(9)?;
        let updated_at: String = row.get(10)?;

        let birth_date = NaiveDate::parse_from_str(&birth_date, DATE_FORMAT)
            .map_err(|e| conversion_error(2, e))?;
        let gender = match gender.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            other => return Err(conversion_error(3, format!("unknown gender: {other}"))),
        };

        Ok(BabyProfile {
            id: row.get(0)?,
            nickname: row.get(1)?,
            birth_date,
            gender,
            gestational_weeks: row.get(4)?,
            gestational_days: row.get(5)?,
            height_cm: row.get(6)?,
            weight_kg: row.get(7)?,
            head_circumference_cm: row.get(8)?,
            created_at: parse_utc(&created_at),
            updated_at: parse_utc(&updated_at),
        })
    }
}

impl BabyRepository for Storage {
    fn load(&self) -> Result<Vec<BabyProfile>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, nickname, birth_date, gender, gestational_weeks, gestational_days,
                   height_cm, weight_kg, head_circumference_cm, created_at, updated_at
            FROM babies ORDER BY id ASC
            ",
        )?;

        let babies = stmt
            .query_map([], Self::row_to_baby)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Loaded {} babies from storage", babies.len());
        Ok(babies)
    }

    fn save(&self, babies: &[BabyProfile]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("DELETE FROM babies", [])?;
        {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO babies (id, nickname, birth_date, gender, gestational_weeks,
                    gestational_days, height_cm, weight_kg, head_circumference_cm,
                    created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ",
            )?;
            for baby in babies {
                stmt.execute(params![
                    baby.id,
                    baby.nickname,
                    baby.birth_date.format(DATE_FORMAT).to_string(),
                    baby.gender.to_string(),
                    baby.gestational_weeks,
                    baby.gestational_days,
                    baby.height_cm,
                    baby.weight_kg,
                    baby.head_circumference_cm,
                    baby.created_at.to_rfc3339(),
                    baby.updated_at.to_rfc3339(),
                ])?;
            }
        }

        tx.commit()?;
        debug!("Saved {} babies to storage", babies.len());
        Ok(())
    }
}

fn conversion_error(
    column: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, err.into())
}

fn parse_utc(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).map_or_else(
        |_| {
            warn!("Unparseable stored timestamp '{}', using now", value);
            Utc::now()
        },
        |dt| dt.with_timezone(&Utc),
    )
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of baby profiles.
    pub babies: i64,
    /// Total number of care records.
    pub total_records: i64,
    /// Record counts keyed by kind name.
    pub records_by_kind: BTreeMap<&'static str, i64>,
    /// Time of the oldest record.
    pub oldest_record: Option<NaiveDateTime>,
    /// Time of the newest record.
    pub newest_record: Option<NaiveDateTime>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Diaper, DiaperType, Feeding, Growth, PoopColor, Sleep, SleepType};

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn bottle(baby_id: i64, when: NaiveDateTime, ml: f64) -> CareRecord {
        CareRecord::new(baby_id, when, RecordEntry::Feeding(Feeding::bottle(ml)))
    }

    fn sample_baby(id: i64, name: &str) -> BabyProfile {
        let mut baby = BabyProfile::new(
            name,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            Gender::Female,
        );
        baby.id = id;
        baby
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_babies_round_trip() {
        let storage = create_test_storage();
        let mut mimi = sample_baby(1, "Mimi");
        mimi.gestational_weeks = Some(34);
        mimi.gestational_days = Some(2);
        mimi.weight_kg = Some(4.35);
        let dou = sample_baby(2, "豆豆");

        storage.save(&[mimi.clone(), dou.clone()]).unwrap();
        let loaded = storage.load().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].nickname, "Mimi");
        assert_eq!(loaded[0].gestational_weeks, Some(34));
        assert_eq!(loaded[0].gestational_days, Some(2));
        assert_eq!(loaded[0].weight_kg, Some(4.35));
        assert_eq!(loaded[0].birth_date, mimi.birth_date);
        assert_eq!(loaded[1].nickname, "豆豆");
        assert!(loaded[1].height_cm.is_none());
    }

    #[test]
    fn test_save_replaces_all() {
        let storage = create_test_storage();
        storage
            .save(&[sample_baby(1, "A"), sample_baby(2, "B")])
            .unwrap();
        storage.save(&[sample_baby(2, "B")]).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 2);
    }

    #[test]
    fn test_load_empty() {
        let storage = create_test_storage();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_get_record() {
        let storage = create_test_storage();
        let record = bottle(1, at(1, 8, 30), 150.0).with_notes(Some("burped".to_string()));

        let id = storage.insert_record(&record).unwrap();
        let retrieved = storage.get_record(id).unwrap().unwrap();

        assert_eq!(retrieved.id, Some(id));
        assert_eq!(retrieved.baby_id, 1);
        assert_eq!(retrieved.recorded_at, at(1, 8, 30));
        assert_eq!(retrieved.notes.as_deref(), Some("burped"));
        assert_eq!(retrieved.entry, record.entry);
    }

    #[test]
    fn test_insert_rejects_invalid_record() {
        let storage = create_test_storage();
        let record = bottle(1, at(1, 8, 0), -5.0);

        assert!(storage.insert_record(&record).is_err());
        assert_eq!(storage.count_records(None).unwrap(), 0);
    }

    #[test]
    fn test_get_nonexistent_record() {
        let storage = create_test_storage();
        assert!(storage.get_record(99999).unwrap().is_none());
    }

    #[test]
    fn test_list_records_newest_first() {
        let storage = create_test_storage();
        storage.insert_record(&bottle(1, at(1, 6, 0), 90.0)).unwrap();
        storage.insert_record(&bottle(1, at(1, 12, 0), 120.0)).unwrap();
        storage.insert_record(&bottle(1, at(1, 9, 0), 100.0)).unwrap();

        let records = storage.list_records(1, &RecordFilter::default()).unwrap();
        let times: Vec<_> = records.iter().map(|r| r.recorded_at).collect();
        assert_eq!(times, vec![at(1, 12, 0), at(1, 9, 0), at(1, 6, 0)]);
    }

    #[test]
    fn test_list_records_by_baby() {
        let storage = create_test_storage();
        storage.insert_record(&bottle(1, at(1, 6, 0), 90.0)).unwrap();
        storage.insert_record(&bottle(2, at(1, 7, 0), 90.0)).unwrap();

        let records = storage.list_records(2, &RecordFilter::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].baby_id, 2);
    }

    #[test]
    fn test_list_records_by_kind() {
        let storage = create_test_storage();
        storage.insert_record(&bottle(1, at(1, 6, 0), 90.0)).unwrap();
        storage
            .insert_record(&CareRecord::new(
                1,
                at(1, 7, 0),
                RecordEntry::Diaper(Diaper::new(DiaperType::Pee)),
            ))
            .unwrap();

        let filter = RecordFilter {
            kind: Some(RecordKind::Diaper),
            ..RecordFilter::default()
        };
        let records = storage.list_records(1, &filter).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), RecordKind::Diaper);
    }

    #[test]
    fn test_list_records_on_day() {
        let storage = create_test_storage();
        storage.insert_record(&bottle(1, at(1, 23, 59), 90.0)).unwrap();
        storage.insert_record(&bottle(1, at(2, 0, 0), 90.0)).unwrap();
        storage.insert_record(&bottle(1, at(2, 23, 0), 90.0)).unwrap();
        storage.insert_record(&bottle(1, at(3, 0, 0), 90.0)).unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let records = storage.list_records(1, &RecordFilter::on_day(day)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.recorded_at.date() == day));
    }

    #[test]
    fn test_list_records_limit() {
        let storage = create_test_storage();
        for h in 0..5 {
            storage.insert_record(&bottle(1, at(1, h, 0), 60.0)).unwrap();
        }

        let filter = RecordFilter {
            limit: Some(2),
            ..RecordFilter::default()
        };
        let records = storage.list_records(1, &filter).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].recorded_at, at(1, 4, 0));

        let filter = RecordFilter {
            limit: Some(0),
            ..RecordFilter::default()
        };
        assert!(storage.list_records(1, &filter).unwrap().is_empty());
    }

    #[test]
    fn test_all_entry_kinds_round_trip() {
        let storage = create_test_storage();
        let mut diaper = Diaper::new(DiaperType::Poop);
        diaper.poop_color = Some(PoopColor::Green);
        let entries = vec![
            RecordEntry::Feeding(Feeding::solid("米粉")),
            RecordEntry::Sleep(Sleep {
                sleep_type: SleepType::Nap,
                end_time: Some(at(1, 11, 30)),
                quality: None,
                wake_count: 1,
            }),
            RecordEntry::Diaper(diaper),
            RecordEntry::Growth(Growth::weight(6.2)),
        ];

        for entry in entries {
            let record = CareRecord::new(1, at(1, 10, 0), entry);
            let id = storage.insert_record(&record).unwrap();
            let back = storage.get_record(id).unwrap().unwrap();
            assert_eq!(back.entry, record.entry);
        }
    }

    #[test]
    fn test_delete_record() {
        let storage = create_test_storage();
        let id = storage.insert_record(&bottle(1, at(1, 6, 0), 90.0)).unwrap();

        assert!(storage.delete_record(id).unwrap());
        assert!(storage.get_record(id).unwrap().is_none());
        assert!(!storage.delete_record(id).unwrap());
    }

    #[test]
    fn test_delete_records_for_baby() {
        let storage = create_test_storage();
        storage.insert_record(&bottle(1, at(1, 6, 0), 90.0)).unwrap();
        storage.insert_record(&bottle(1, at(1, 7, 0), 90.0)).unwrap();
        storage.insert_record(&bottle(2, at(1, 8, 0), 90.0)).unwrap();

        assert_eq!(storage.delete_records_for_baby(1).unwrap(), 2);
        assert_eq!(storage.count_records(Some(1)).unwrap(), 0);
        assert_eq!(storage.count_records(Some(2)).unwrap(), 1);
        assert_eq!(storage.count_records(None).unwrap(), 1);
    }

    #[test]
    fn test_metadata() {
        let storage = create_test_storage();
        assert!(storage.get_metadata("missing").unwrap().is_none());

        storage.set_metadata("theme", "light").unwrap();
        storage.set_metadata("theme", "dark").unwrap();
        assert_eq!(storage.get_metadata("theme").unwrap().as_deref(), Some("dark"));

        storage.delete_metadata("theme").unwrap();
        assert!(storage.get_metadata("theme").unwrap().is_none());
    }

    #[test]
    fn test_current_baby_id() {
        let storage = create_test_storage();
        assert!(storage.current_baby_id().unwrap().is_none());

        storage.set_current_baby_id(Some(3)).unwrap();
        assert_eq!(storage.current_baby_id().unwrap(), Some(3));

        storage.set_current_baby_id(None).unwrap();
        assert!(storage.current_baby_id().unwrap().is_none());

        storage.set_metadata(CURRENT_BABY_KEY, "garbage").unwrap();
        assert!(storage.current_baby_id().unwrap().is_none());
    }

    #[test]
    fn test_onboarding_flag() {
        let storage = create_test_storage();
        assert!(!storage.is_onboarded().unwrap());
        storage.set_onboarded().unwrap();
        assert!(storage.is_onboarded().unwrap());
    }

    #[test]
    fn test_stats_empty() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();

        assert_eq!(stats.babies, 0);
        assert_eq!(stats.total_records, 0);
        assert!(stats.records_by_kind.is_empty());
        assert!(stats.oldest_record.is_none());
        assert!(stats.newest_record.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let storage = create_test_storage();
        storage.save(&[sample_baby(1, "Mimi")]).unwrap();
        storage.insert_record(&bottle(1, at(1, 6, 0), 90.0)).unwrap();
        storage.insert_record(&bottle(1, at(3, 6, 0), 90.0)).unwrap();
        storage
            .insert_record(&CareRecord::new(
                1,
                at(2, 6, 0),
                RecordEntry::Growth(Growth::weight(5.0)),
            ))
            .unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.babies, 1);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.records_by_kind.get("feeding"), Some(&2));
        assert_eq!(stats.records_by_kind.get("growth"), Some(&1));
        assert_eq!(stats.oldest_record, Some(at(1, 6, 0)));
        assert_eq!(stats.newest_record, Some(at(3, 6, 0)));
    }

    #[test]
    fn test_open_file_based() {
        crate::logging::init_test_logging();
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("babycare_test_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&db_path);

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.save(&[sample_baby(1, "Mimi")]).unwrap();
            storage.insert_record(&bottle(1, at(1, 6, 0), 90.0)).unwrap();
            assert!(storage.stats().unwrap().db_size_bytes > 0);
        }

        let storage = Storage::open(&db_path).unwrap();
        assert_eq!(storage.load().unwrap().len(), 1);
        assert_eq!(storage.count_records(Some(1)).unwrap(), 1);

        drop(storage);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = std::env::temp_dir();
        let nested_dir = temp_dir.join(format!("babycare_nested_{}", std::process::id()));
        let db_path = nested_dir.join("a").join("b").join("babycare.db");
        let _ = std::fs::remove_dir_all(&nested_dir);

        let storage = Storage::open(&db_path);
        assert!(storage.is_ok());
        assert!(db_path.exists());

        drop(storage);
        let _ = std::fs::remove_dir_all(&nested_dir);
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        let storage = create_test_storage();
        storage
            .conn
            .execute(
                "INSERT INTO care_records (baby_id, kind, recorded_at, payload) VALUES (1, 'feeding', '2024-03-01T08:00:00', 'not json')",
                [],
            )
            .unwrap();

        assert!(storage.list_records(1, &RecordFilter::default()).is_err());
    }
}
