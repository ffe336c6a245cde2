//! Sleep records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Night sleep or daytime nap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepType {
    /// Night sleep.
    NightSleep,
    /// Daytime nap.
    Nap,
}

impl SleepType {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::NightSleep => "夜间睡眠",
            Self::Nap => "小睡",
        }
    }
}

/// Subjective sleep quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    /// Slept well.
    Good,
    /// Some fussing.
    Fair,
    /// Restless.
    Poor,
}

impl SleepQuality {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Good => "好",
            Self::Fair => "一般",
            Self::Poor => "差",
        }
    }
}

/// A sleep session. Its start is the record's `recorded_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sleep {
    /// Night sleep or nap.
    pub sleep_type: SleepType,
    /// When the baby woke up; `None` while still asleep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    /// Subjective quality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<SleepQuality>,
    /// Number of times the baby woke during the session.
    #[serde(default)]
    pub wake_count: u32,
}

impl Sleep {
    /// Whether the session has not ended yet.
    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }

    /// Duration in whole minutes; 0 while ongoing.
    #[must_use]
    pub fn duration_minutes(&self, start: NaiveDateTime) -> i64 {
        self.end_time
            .map_or(0, |end| (end - start).num_minutes().max(0))
    }

    pub(crate) fn validate(&self, start: NaiveDateTime) -> Result<()> {
        match self.end_time {
            Some(end) if end < start => Err(Error::invalid_record(
                "sleep",
                "end time is before start time",
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn describe(&self, start: NaiveDateTime) -> String {
        let mut text = self.sleep_type.display_name().to_string();
        if self.is_ongoing() {
            text.push_str(&format!(" {} 起 (进行中)", start.format("%H:%M")));
        } else {
            let minutes = self.duration_minutes(start);
            text.push_str(&format!(" {}h{:02}m", minutes / 60, minutes % 60));
        }
        if self.wake_count > 0 {
            text.push_str(&format!(" · 醒{}次", self.wake_count));
        }
        if let Some(quality) = self.quality {
            text.push_str(&format!(" · 质量{}", quality.display_name()));
        }
        text
    }
}
