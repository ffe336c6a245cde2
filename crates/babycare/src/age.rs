//! Chronological and corrected age calculation.
//!
//! Chronological age is decomposed with calendar-aware borrowing: months are
//! counted by calendar component, and a negative day difference borrows the
//! length of the month before `today`. Corrected age for preterm infants uses
//! a fixed 30-day month instead. The two decompositions differ on purpose and
//! must not be unified.
//!
//! Everything here is total: out-of-range inputs clamp to zero or suppress
//! the corrected age, nothing returns an error.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Gestational weeks below which an infant counts as preterm.
pub const PREMATURE_THRESHOLD_WEEKS: u32 = 37;

/// Gestational length of a full-term pregnancy in weeks.
pub const FULL_TERM_WEEKS: u32 = 40;

/// Largest accepted gestational week value.
pub const MAX_GESTATIONAL_WEEKS: u32 = 42;

/// Largest accepted gestational day value (days past the last full week).
pub const MAX_GESTATIONAL_DAYS: u32 = 6;

/// Month length used when decomposing corrected age.
const CORRECTED_MONTH_DAYS: i64 = 30;

/// Birth data supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthRecord {
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Completed gestational weeks at birth, if known.
    pub gestational_weeks: Option<u32>,
    /// Extra gestational days past `gestational_weeks`, if known.
    pub gestational_days: Option<u32>,
}

/// Result of an age calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeResult {
    /// Calendar days since birth, excluding the birth day.
    pub days: i64,
    /// Whole calendar months since birth.
    pub months: i64,
    /// Days left over after `months`.
    pub remainder_days: i64,
    /// Chronological age, e.g. `"3月12天"`.
    pub display_text: String,
    /// Corrected age for preterm infants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_display_text: Option<String>,
}

impl BirthRecord {
    /// Create a birth record without gestational data.
    #[must_use]
    pub fn new(birth_date: NaiveDate) -> Self {
        Self {
            birth_date,
            gestational_weeks: None,
            gestational_days: None,
        }
    }

    /// Attach gestational age at birth.
    #[must_use]
    pub fn with_gestation(mut self, weeks: u32, days: Option<u32>) -> Self {
        self.gestational_weeks = Some(weeks);
        self.gestational_days = days;
        self
    }

    /// Whether this birth was preterm.
    #[must_use]
    pub fn is_premature(&self) -> bool {
        is_premature(self.gestational_weeks)
    }

    /// Compute chronological age on `today`, with corrected age when preterm.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> AgeResult {
        let mut result = compute_age(self.birth_date, today);
        result.corrected_display_text = compute_corrected_age(
            self.birth_date,
            self.gestational_weeks,
            self.gestational_days,
            today,
        );
        result
    }
}

/// Compute chronological age.
///
/// A birth date after `today` counts as zero elapsed time.
#[must_use]
pub fn compute_age(birth_date: NaiveDate, today: NaiveDate) -> AgeResult {
    if birth_date > today {
        return AgeResult {
            days: 0,
            months: 0,
            remainder_days: 0,
            display_text: render(0, 0),
            corrected_display_text: None,
        };
    }

    let days = days_between(birth_date, today);

    let mut months = i64::from(today.year() - birth_date.year()) * 12
        + i64::from(today.month()) - i64::from(birth_date.month());
    let mut remainder = i64::from(today.day()) - i64::from(birth_date.day());

    if remainder < 0 {
        months -= 1;
        remainder += i64::from(days_in_previous_month(today));
    }

    // A single borrow can still leave a deficit (Jan 31 -> Mar 1); the
    // remainder is floored rather than borrowing a second time.
    let remainder = remainder.max(0);

    AgeResult {
        days,
        months,
        remainder_days: remainder,
        display_text: render(months, remainder),
        corrected_display_text: None,
    }
}

/// Compute corrected age for a preterm infant.
///
/// Returns `None` unless `gestational_weeks` is present, within range, and
/// below [`PREMATURE_THRESHOLD_WEEKS`]. Missing `gestational_days` counts as 0;
/// out-of-range days suppress the result.
#[must_use]
pub fn compute_corrected_age(
    birth_date: NaiveDate,
    gestational_weeks: Option<u32>,
    gestational_days: Option<u32>,
    today: NaiveDate,
) -> Option<String> {
    let weeks = gestational_weeks?;
    if !is_premature(Some(weeks)) {
        return None;
    }
    let extra_days = gestational_days.unwrap_or(0);
    if extra_days > MAX_GESTATIONAL_DAYS {
        return None;
    }

    let weeks_to_correct = i64::from(FULL_TERM_WEEKS - weeks);
    let days_to_correct = weeks_to_correct * 7 - i64::from(extra_days);
    let corrected_days = days_between(birth_date, today) - days_to_correct;

    if corrected_days <= 0 {
        return Some(render(0, 0));
    }

    Some(render(
        corrected_days / CORRECTED_MONTH_DAYS,
        corrected_days % CORRECTED_MONTH_DAYS,
    ))
}

/// Whether the given gestational weeks indicate a preterm birth.
#[must_use]
pub fn is_premature(gestational_weeks: Option<u32>) -> bool {
    gestational_weeks.is_some_and(|w| w < PREMATURE_THRESHOLD_WEEKS)
}

/// Describe gestational age at birth, e.g. `"32周3天"` or `"38周"`.
#[must_use]
pub fn gestational_age_text(weeks: Option<u32>, days: Option<u32>) -> Option<String> {
    let weeks = weeks?;
    match days.unwrap_or(0) {
        0 => Some(format!("{weeks}周")),
        d => Some(format!("{weeks}周{d}天")),
    }
}

/// Calendar days from `from` to `to`, excluding `from`, floored at zero.
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(0)
}

fn render(months: i64, days: i64) -> String {
    match (months, days) {
        (m, d) if m > 0 && d > 0 => format!("{m}月{d}天"),
        (m, _) if m > 0 => format!("{m}月"),
        (_, d) => format!("{d}天"),
    }
}

/// Number of days in the month before the one containing `date`.
fn days_in_previous_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map_or(30, |last| last.day())
}
