//! Care records for feeding, sleep, diapers, and growth.
//!
//! Every record shares the same envelope, [`CareRecord`], which ties an entry
//! to a baby and a local wall-clock time. The entry itself is one of the
//! per-activity types:
//!
//! - [`Feeding`]: milk (breast, formula, mixed) or solid food
//! - [`Sleep`]: naps and night sleep, with optional end time
//! - [`Diaper`]: wet/dirty diapers with colour checks
//! - [`Growth`]: weight, height, and head circumference
//!
//! # Example
//!
//! ```
//! use babycare::records::{CareRecord, Feeding, RecordEntry};
//! use chrono::NaiveDate;
//!
//! let at = NaiveDate::from_ymd_opt(2024, 3, 1)
//!     .unwrap()
//!     .and_hms_opt(8, 30, 0)
//!     .unwrap();
//! let record = CareRecord::new(1, at, RecordEntry::Feeding(Feeding::bottle(150.0)));
//! assert!(record.validate().is_ok());
//! ```

mod diaper;
mod feeding;
mod growth;
mod sleep;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use diaper::{Diaper, DiaperStatus, DiaperType, PeeColor, PoopColor};
pub use feeding::{Acceptance, Feeding, FeedingMethod, FeedingType};
pub use growth::Growth;
pub use sleep::{Sleep, SleepQuality, SleepType};

/// Format used for wall-clock timestamps in storage and output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The kind of a care record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Feeding record.
    Feeding,
    /// Sleep record.
    Sleep,
    /// Diaper record.
    Diaper,
    /// Growth record.
    Growth,
}

impl RecordKind {
    /// All record kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Feeding, Self::Sleep, Self::Diaper, Self::Growth];

    /// Stable string form used in storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feeding => "feeding",
            Self::Sleep => "sleep",
            Self::Diaper => "diaper",
            Self::Growth => "growth",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::invalid_record("care", format!("unknown kind: {s}")))
    }
}

/// The activity-specific part of a care record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordEntry {
    /// A feeding.
    Feeding(Feeding),
    /// A sleep session.
    Sleep(Sleep),
    /// A diaper change.
    Diaper(Diaper),
    /// A growth measurement.
    Growth(Growth),
}

impl RecordEntry {
    /// The kind of this entry.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Feeding(_) => RecordKind::Feeding,
            Self::Sleep(_) => RecordKind::Sleep,
            Self::Diaper(_) => RecordKind::Diaper,
            Self::Growth(_) => RecordKind::Growth,
        }
    }
}

/// A single care record for a baby.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareRecord {
    /// Unique identifier (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The baby this record belongs to.
    pub baby_id: i64,

    /// Local wall-clock time of the event (sleep start for sleep records).
    pub recorded_at: NaiveDateTime,

    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// What happened.
    pub entry: RecordEntry,
}

impl CareRecord {
    /// Create a new, unsaved record.
    #[must_use]
    pub fn new(baby_id: i64, recorded_at: NaiveDateTime, entry: RecordEntry) -> Self {
        Self {
            id: None,
            baby_id,
            recorded_at,
            notes: None,
            entry,
        }
    }

    /// Attach notes, ignoring blank text.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }

    /// The kind of this record.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.entry.kind()
    }

    /// Validate the record's entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        match &self.entry {
            RecordEntry::Feeding(feeding) => feeding.validate(),
            RecordEntry::Sleep(sleep) => sleep.validate(self.recorded_at),
            RecordEntry::Diaper(diaper) => diaper.validate(),
            RecordEntry::Growth(growth) => growth.validate(),
        }
    }

    /// Health warnings raised by this record, if any.
    #[must_use]
    pub fn warnings(&self) -> Vec<&'static str> {
        match &self.entry {
            RecordEntry::Diaper(diaper) => diaper.warnings(),
            RecordEntry::Feeding(feeding) if feeding.is_allergic => {
                vec!["喂食后出现过敏反应，请留意皮疹、呕吐等症状，必要时就医"]
            }
            _ => Vec::new(),
        }
    }

    /// One-line human description.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.entry {
            RecordEntry::Feeding(feeding) => feeding.describe(),
            RecordEntry::Sleep(sleep) => sleep.describe(self.recorded_at),
            RecordEntry::Diaper(diaper) => diaper.describe(),
            RecordEntry::Growth(growth) => growth.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_record_kind_round_trip_str() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        }
        assert!("bath".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_entry_kind() {
        let record = CareRecord::new(1, at(8, 0), RecordEntry::Growth(Growth::weight(5.0)));
        assert_eq!(record.kind(), RecordKind::Growth);
    }

    #[test]
    fn test_with_notes_drops_blank() {
        let record = CareRecord::new(1, at(8, 0), RecordEntry::Feeding(Feeding::bottle(90.0)))
            .with_notes(Some("  ".to_string()));
        assert!(record.notes.is_none());

        let record = record.with_notes(Some("spat up".to_string()));
        assert_eq!(record.notes.as_deref(), Some("spat up"));
    }

    #[test]
    fn test_entry_serializes_with_kind_tag() {
        let entry = RecordEntry::Feeding(Feeding::bottle(120.0));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"kind\":\"feeding\""));
        assert!(json.contains("\"feeding_type\":\"formula\""));

        let back: RecordEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_allergic_feeding_warns() {
        let mut feeding = Feeding::solid("鸡蛋");
        feeding.is_allergic = true;
        let record = CareRecord::new(1, at(12, 0), RecordEntry::Feeding(feeding));
        assert_eq!(record.warnings().len(), 1);
    }

    #[test]
    fn test_validate_dispatches_to_sleep() {
        let sleep = Sleep {
            sleep_type: SleepType::Nap,
            end_time: Some(at(7, 0)),
            quality: None,
            wake_count: 0,
        };
        let record = CareRecord::new(1, at(9, 0), RecordEntry::Sleep(sleep));
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("sleep"));
    }
}
