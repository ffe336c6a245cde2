//! Daily and weekly summaries of care records.
//!
//! Summaries are computed from already-loaded records and never touch
//! storage. Records outside the requested day or week are ignored, so callers
//! may pass a wider slice than needed.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::records::{Acceptance, CareRecord, Growth, RecordEntry, SleepType};

/// Totals for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySummary {
    /// The summarized day.
    pub date: NaiveDate,
    /// Number of records on this day.
    pub record_count: u32,
    /// Milk feeds (breast milk, formula, mixed).
    pub milk_count: u32,
    /// Measured milk volume in millilitres.
    pub milk_volume_ml: f64,
    /// Minutes spent nursing.
    pub nursing_minutes: i64,
    /// Solid-food feeds.
    pub food_count: u32,
    /// Distinct foods eaten, in the order first eaten.
    pub foods: Vec<String>,
    /// Naps.
    pub nap_count: u32,
    /// Total nap minutes.
    pub nap_minutes: i64,
    /// Total night sleep minutes.
    pub night_sleep_minutes: i64,
    /// Night wakings.
    pub night_wake_count: u32,
    /// Diaper changes.
    pub diaper_count: u32,
    /// Wet diapers.
    pub wet_count: u32,
    /// Dirty diapers.
    pub dirty_count: u32,
    /// The last growth measurement taken this day.
    pub latest_growth: Option<Growth>,
    /// Things worth a parent's attention.
    pub alerts: Vec<String>,
}

impl DailySummary {
    /// Summarize the records that fall on `date`.
    #[must_use]
    pub fn from_records(date: NaiveDate, records: &[CareRecord]) -> Self {
        let mut day: Vec<&CareRecord> = records
            .iter()
            .filter(|r| r.recorded_at.date() == date)
            .collect();
        day.sort_by_key(|r| r.recorded_at);

        let mut summary = Self {
            date,
            ..Self::default()
        };

        for record in day {
            summary.record_count += 1;
            let time = record.recorded_at.format("%H:%M");

            match &record.entry {
                RecordEntry::Feeding(feeding) => {
                    if feeding.feeding_type.is_milk() {
                        summary.milk_count += 1;
                        summary.milk_volume_ml += feeding.milk_volume_ml().unwrap_or(0.0);
                        summary.nursing_minutes += feeding.duration_minutes().unwrap_or(0);
                    } else {
                        summary.food_count += 1;
                        if let Some(food) = &feeding.food {
                            if !summary.foods.contains(food) {
                                summary.foods.push(food.clone());
                            }
                        }
                    }
                    if feeding.acceptance == Acceptance::Refused {
                        summary.alerts.push(format!(
                            "{time} 拒绝进食 ({})",
                            feeding.feeding_type.display_name()
                        ));
                    }
                }
                RecordEntry::Sleep(sleep) => {
                    let minutes = sleep.duration_minutes(record.recorded_at);
                    match sleep.sleep_type {
                        SleepType::Nap => {
                            summary.nap_count += 1;
                            summary.nap_minutes += minutes;
                        }
                        SleepType::NightSleep => {
                            summary.night_sleep_minutes += minutes;
                            summary.night_wake_count += sleep.wake_count;
                        }
                    }
                }
                RecordEntry::Diaper(diaper) => {
                    summary.diaper_count += 1;
                    if diaper.diaper_type.has_pee() {
                        summary.wet_count += 1;
                    }
                    if diaper.diaper_type.has_poop() {
                        summary.dirty_count += 1;
                    }
                }
                RecordEntry::Growth(growth) => summary.latest_growth = Some(*growth),
            }

            for warning in record.warnings() {
                summary.alerts.push(format!("{time} {warning}"));
            }
        }

        summary
    }

    /// Whether anything was recorded on this day.
    #[must_use]
    pub fn has_records(&self) -> bool {
        self.record_count > 0
    }

    /// Total sleep minutes, naps and night combined.
    #[must_use]
    pub fn total_sleep_minutes(&self) -> i64 {
        self.nap_minutes + self.night_sleep_minutes
    }

    /// Whether the measured milk volume reached `target_ml`.
    #[must_use]
    pub fn meets_milk_target(&self, target_ml: f64) -> bool {
        self.milk_volume_ml >= target_ml
    }
}

/// Totals for a Monday-based week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// One summary per day, Monday first.
    pub days: Vec<DailySummary>,
    /// Milk volume over the week.
    pub total_milk_ml: f64,
    /// Solid-food feeds over the week.
    pub total_food_count: u32,
    /// Sleep minutes over the week.
    pub total_sleep_minutes: i64,
    /// Night wakings over the week.
    pub total_night_wakes: u32,
    /// Days with at least one record.
    pub recorded_days: u32,
    /// Average milk volume per recorded day.
    pub avg_milk_ml: f64,
    /// Average sleep minutes per recorded day.
    pub avg_sleep_minutes: f64,
    /// Daily milk target the week was measured against.
    pub milk_target_ml: f64,
    /// Days that reached the milk target.
    pub milk_target_met_days: u32,
}

/// The Monday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

impl WeeklySummary {
    /// Summarize the week containing `any_day`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn for_week(any_day: NaiveDate, records: &[CareRecord], milk_target_ml: f64) -> Self {
        let start = week_start(any_day);
        let days: Vec<DailySummary> = (0..7)
            .map(|offset| DailySummary::from_records(start + Duration::days(offset), records))
            .collect();

        let total_milk_ml: f64 = days.iter().map(|d| d.milk_volume_ml).sum();
        let total_food_count: u32 = days.iter().map(|d| d.food_count).sum();
        let total_sleep_minutes: i64 = days.iter().map(DailySummary::total_sleep_minutes).sum();
        let total_night_wakes: u32 = days.iter().map(|d| d.night_wake_count).sum();

        let recorded: Vec<&DailySummary> = days.iter().filter(|d| d.has_records()).collect();
        let recorded_days = u32::try_from(recorded.len()).unwrap_or(u32::MAX);
        let milk_target_met_days = u32::try_from(
            recorded
                .iter()
                .filter(|d| d.meets_milk_target(milk_target_ml))
                .count(),
        )
        .unwrap_or(u32::MAX);

        let (avg_milk_ml, avg_sleep_minutes) = if recorded_days == 0 {
            (0.0, 0.0)
        } else {
            let n = f64::from(recorded_days);
            (total_milk_ml / n, total_sleep_minutes as f64 / n)
        };

        Self {
            week_start: start,
            days,
            total_milk_ml,
            total_food_count,
            total_sleep_minutes,
            total_night_wakes,
            recorded_days,
            avg_milk_ml,
            avg_sleep_minutes,
            milk_target_ml,
            milk_target_met_days,
        }
    }

    /// Last day of the week (Sunday).
    #[must_use]
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Diaper, DiaperType, Feeding, PeeColor, Sleep};
    use chrono::NaiveDateTime;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record(when: NaiveDateTime, entry: RecordEntry) -> CareRecord {
        CareRecord::new(1, when, entry)
    }

    fn sleep(sleep_type: SleepType, end: NaiveDateTime, wakes: u32) -> RecordEntry {
        RecordEntry::Sleep(Sleep {
            sleep_type,
            end_time: Some(end),
            quality: None,
            wake_count: wakes,
        })
    }

    #[test]
    fn test_empty_day() {
        let summary = DailySummary::from_records(date(4), &[]);
        assert!(!summary.has_records());
        assert_eq!(summary.milk_volume_ml, 0.0);
        assert!(summary.alerts.is_empty());
    }

    #[test]
    fn test_feedings() {
        let records = vec![
            record(at(4, 6, 0), RecordEntry::Feeding(Feeding::bottle(120.0))),
            record(
                at(4, 9, 0),
                RecordEntry::Feeding(Feeding::nursing(at(4, 9, 0), at(4, 9, 25))),
            ),
            record(at(4, 12, 0), RecordEntry::Feeding(Feeding::solid("米粉"))),
            record(at(4, 17, 0), RecordEntry::Feeding(Feeding::solid("南瓜"))),
            record(at(4, 18, 0), RecordEntry::Feeding(Feeding::solid("米粉"))),
        ];
        let summary = DailySummary::from_records(date(4), &records);

        assert_eq!(summary.milk_count, 2);
        assert_eq!(summary.milk_volume_ml, 120.0);
        assert_eq!(summary.nursing_minutes, 25);
        assert_eq!(summary.food_count, 3);
        assert_eq!(summary.foods, vec!["米粉".to_string(), "南瓜".to_string()]);
    }

    #[test]
    fn test_other_days_are_ignored() {
        let records = vec![
            record(at(3, 23, 0), RecordEntry::Feeding(Feeding::bottle(90.0))),
            record(at(4, 1, 0), RecordEntry::Feeding(Feeding::bottle(60.0))),
            record(at(5, 0, 0), RecordEntry::Feeding(Feeding::bottle(30.0))),
        ];
        let summary = DailySummary::from_records(date(4), &records);
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.milk_volume_ml, 60.0);
    }

    #[test]
    fn test_sleep_and_diapers() {
        let records = vec![
            record(at(4, 0, 30), sleep(SleepType::NightSleep, at(4, 6, 30), 2)),
            record(at(4, 10, 0), sleep(SleepType::Nap, at(4, 11, 15), 0)),
            record(at(4, 14, 0), sleep(SleepType::Nap, at(4, 14, 45), 0)),
            record(
                at(4, 7, 0),
                RecordEntry::Diaper(Diaper::new(DiaperType::Pee)),
            ),
            record(
                at(4, 8, 0),
                RecordEntry::Diaper(Diaper::new(DiaperType::Both)),
            ),
        ];
        let summary = DailySummary::from_records(date(4), &records);

        assert_eq!(summary.night_sleep_minutes, 360);
        assert_eq!(summary.night_wake_count, 2);
        assert_eq!(summary.nap_count, 2);
        assert_eq!(summary.nap_minutes, 120);
        assert_eq!(summary.total_sleep_minutes(), 480);
        assert_eq!(summary.diaper_count, 2);
        assert_eq!(summary.wet_count, 2);
        assert_eq!(summary.dirty_count, 1);
    }

    #[test]
    fn test_latest_growth_wins() {
        let early = crate::records::Growth::weight(6.0);
        let late = crate::records::Growth::weight(6.1);
        let records = vec![
            record(at(4, 20, 0), RecordEntry::Growth(late)),
            record(at(4, 8, 0), RecordEntry::Growth(early)),
        ];
        let summary = DailySummary::from_records(date(4), &records);
        assert_eq!(summary.latest_growth, Some(late));
    }

    #[test]
    fn test_alerts() {
        let mut diaper = Diaper::new(DiaperType::Pee);
        diaper.pee_color = Some(PeeColor::Red);
        let mut refused = Feeding::solid("西兰花");
        refused.acceptance = Acceptance::Refused;

        let records = vec![
            record(at(4, 7, 5), RecordEntry::Diaper(diaper)),
            record(at(4, 12, 0), RecordEntry::Feeding(refused)),
        ];
        let summary = DailySummary::from_records(date(4), &records);

        assert_eq!(summary.alerts.len(), 2);
        assert!(summary.alerts[0].starts_with("07:05"));
        assert!(summary.alerts[1].contains("拒绝进食"));
    }

    #[test]
    fn test_meets_milk_target() {
        let records = vec![
            record(at(4, 6, 0), RecordEntry::Feeding(Feeding::bottle(400.0))),
            record(at(4, 18, 0), RecordEntry::Feeding(Feeding::bottle(400.0))),
        ];
        let summary = DailySummary::from_records(date(4), &records);
        assert!(summary.meets_milk_target(800.0));
        assert!(!summary.meets_milk_target(801.0));
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-03-04 is a Monday.
        assert_eq!(week_start(date(4)), date(4));
        assert_eq!(week_start(date(6)), date(4));
        assert_eq!(week_start(date(10)), date(4));
        assert_eq!(week_start(date(11)), date(11));
    }

    #[test]
    fn test_weekly_summary() {
        let records = vec![
            record(at(4, 6, 0), RecordEntry::Feeding(Feeding::bottle(800.0))),
            record(at(5, 6, 0), RecordEntry::Feeding(Feeding::bottle(400.0))),
            record(at(5, 10, 0), sleep(SleepType::Nap, at(5, 11, 0), 0)),
            record(at(6, 0, 0), sleep(SleepType::NightSleep, at(6, 8, 0), 1)),
            // Previous week.
            record(at(3, 6, 0), RecordEntry::Feeding(Feeding::bottle(999.0))),
        ];
        let week = WeeklySummary::for_week(date(7), &records, 800.0);

        assert_eq!(week.week_start, date(4));
        assert_eq!(week.week_end(), date(10));
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.total_milk_ml, 1200.0);
        assert_eq!(week.total_sleep_minutes, 540);
        assert_eq!(week.total_night_wakes, 1);
        assert_eq!(week.recorded_days, 3);
        assert_eq!(week.avg_milk_ml, 400.0);
        assert_eq!(week.avg_sleep_minutes, 180.0);
        assert_eq!(week.milk_target_met_days, 1);
    }

    #[test]
    fn test_weekly_summary_without_records() {
        let week = WeeklySummary::for_week(date(7), &[], 800.0);
        assert_eq!(week.recorded_days, 0);
        assert_eq!(week.avg_milk_ml, 0.0);
        assert_eq!(week.avg_sleep_minutes, 0.0);
    }
}
