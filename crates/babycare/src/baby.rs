//! Baby profiles.
//!
//! A [`BabyProfile`] holds the identity and birth data of one infant along with
//! the most recent growth measurements.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::age::{self, AgeResult, BirthRecord, MAX_GESTATIONAL_DAYS, MAX_GESTATIONAL_WEEKS};
use crate::error::{Error, Result};
use crate::records::Growth;

/// Gender of a baby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Boy.
    Male,
    /// Girl.
    Female,
}

impl Gender {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Male => "男孩",
            Self::Female => "女孩",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(Error::invalid_profile(format!("unknown gender: {other}"))),
        }
    }
}

/// A baby profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyProfile {
    /// Identifier assigned by the store (0 until added).
    pub id: i64,
    /// Display name.
    pub nickname: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Gender.
    pub gender: Gender,
    /// Completed gestational weeks at birth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gestational_weeks: Option<u32>,
    /// Extra gestational days (0-6).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gestational_days: Option<u32>,
    /// Latest height in centimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Latest weight in kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Latest head circumference in centimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_circumference_cm: Option<f64>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last modified.
    pub updated_at: DateTime<Utc>,
}

impl BabyProfile {
    /// Create a new, unsaved profile.
    #[must_use]
    pub fn new(nickname: impl Into<String>, birth_date: NaiveDate, gender: Gender) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            nickname: nickname.into(),
            birth_date,
            gender,
            gestational_weeks: None,
            gestational_days: None,
            height_cm: None,
            weight_kg: None,
            head_circumference_cm: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Birth data for the age calculator.
    #[must_use]
    pub fn birth_record(&self) -> BirthRecord {
        BirthRecord {
            birth_date: self.birth_date,
            gestational_weeks: self.gestational_weeks,
            gestational_days: self.gestational_days,
        }
    }

    /// Age on the given day, including corrected age when preterm.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> AgeResult {
        self.birth_record().age_on(today)
    }

    /// The "day N" counter: days since birth, excluding the birth day.
    #[must_use]
    pub fn day_of_life(&self, today: NaiveDate) -> i64 {
        age::days_between(self.birth_date, today)
    }

    /// Whether this baby was born preterm.
    #[must_use]
    pub fn is_premature(&self) -> bool {
        age::is_premature(self.gestational_weeks)
    }

    /// Gestational age at birth, if recorded.
    #[must_use]
    pub fn gestational_age_text(&self) -> Option<String> {
        age::gestational_age_text(self.gestational_weeks, self.gestational_days)
    }

    /// Copy measurements from a growth record onto the profile.
    ///
    /// Only the measurements present in `growth` are overwritten.
    pub fn apply_growth(&mut self, growth: &Growth) {
        if let Some(weight) = growth.weight_kg {
            self.weight_kg = Some(weight);
        }
        if let Some(height) = growth.height_cm {
            self.height_cm = Some(height);
        }
        if let Some(head) = growth.head_circumference_cm {
            self.head_circumference_cm = Some(head);
        }
    }

    /// Validate the profile against `today`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfile`] describing the first problem found.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.nickname.trim().is_empty() {
            return Err(Error::invalid_profile("nickname must not be empty"));
        }

        if self.birth_date > today {
            return Err(Error::invalid_profile(format!(
                "birth date {} is in the future",
                self.birth_date
            )));
        }

        match (self.gestational_weeks, self.gestational_days) {
            (Some(weeks), _) if weeks > MAX_GESTATIONAL_WEEKS => {
                return Err(Error::invalid_profile(format!(
                    "gestational weeks must be between 0 and {MAX_GESTATIONAL_WEEKS}, got {weeks}"
                )));
            }
            (_, Some(days)) if days > MAX_GESTATIONAL_DAYS => {
                return Err(Error::invalid_profile(format!(
                    "gestational days must be between 0 and {MAX_GESTATIONAL_DAYS}, got {days}"
                )));
            }
            (None, Some(_)) => {
                return Err(Error::invalid_profile(
                    "gestational days given without gestational weeks",
                ));
            }
            _ => {}
        }

        for (name, value) in [
            ("height", self.height_cm),
            ("weight", self.weight_kg),
            ("head circumference", self.head_circumference_cm),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(Error::invalid_profile(format!(
                        "{name} must be a positive number, got {v}"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> BabyProfile {
        BabyProfile::new("Mimi", date(2024, 1, 10), Gender::Female)
    }

    #[test]
    fn test_new_profile_defaults() {
        let baby = sample();
        assert_eq!(baby.id, 0);
        assert_eq!(baby.nickname, "Mimi");
        assert!(baby.gestational_weeks.is_none());
        assert_eq!(baby.created_at, baby.updated_at);
    }

    #[test]
    fn test_gender_parse_and_display() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(Gender::Female.to_string(), "female");
        assert_eq!(Gender::Male.display_name(), "男孩");
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_age_on_uses_calculator() {
        let baby = sample();
        let age = baby.age_on(date(2024, 3, 15));
        assert_eq!(age.display_text, "2月5天");
        assert!(age.corrected_display_text.is_none());
    }

    #[test]
    fn test_premature_profile_has_corrected_age() {
        let mut baby = sample();
        baby.gestational_weeks = Some(34);
        baby.gestational_days = Some(2);
        let age = baby.age_on(date(2024, 4, 10));
        assert!(baby.is_premature());
        assert!(age.corrected_display_text.is_some());
        assert_eq!(baby.gestational_age_text().as_deref(), Some("34周2天"));
    }

    #[test]
    fn test_day_of_life() {
        let baby = sample();
        assert_eq!(baby.day_of_life(date(2024, 1, 10)), 0);
        assert_eq!(baby.day_of_life(date(2024, 1, 20)), 10);
    }

    #[test]
    fn test_apply_growth_only_overwrites_present_values() {
        let mut baby = sample();
        baby.height_cm = Some(55.0);
        baby.apply_growth(&Growth {
            weight_kg: Some(5.2),
            height_cm: None,
            head_circumference_cm: Some(38.5),
        });
        assert_eq!(baby.weight_kg, Some(5.2));
        assert_eq!(baby.height_cm, Some(55.0));
        assert_eq!(baby.head_circumference_cm, Some(38.5));
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate(date(2024, 6, 1)).is_ok());
    }

    #[test]
    fn test_validate_empty_nickname() {
        let mut baby = sample();
        baby.nickname = "   ".to_string();
        let err = baby.validate(date(2024, 6, 1)).unwrap_err();
        assert!(err.to_string().contains("nickname"));
    }

    #[test]
    fn test_validate_future_birth_date() {
        let err = sample().validate(date(2024, 1, 9)).unwrap_err();
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn test_validate_gestation_ranges() {
        let mut baby = sample();
        baby.gestational_weeks = Some(43);
        assert!(baby.validate(date(2024, 6, 1)).is_err());

        baby.gestational_weeks = Some(30);
        baby.gestational_days = Some(7);
        assert!(baby.validate(date(2024, 6, 1)).is_err());

        baby.gestational_weeks = None;
        baby.gestational_days = Some(3);
        let err = baby.validate(date(2024, 6, 1)).unwrap_err();
        assert!(err.to_string().contains("without gestational weeks"));
    }

    #[test]
    fn test_validate_measurements() {
        let mut baby = sample();
        baby.weight_kg = Some(0.0);
        let err = baby.validate(date(2024, 6, 1)).unwrap_err();
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn test_profile_serialization_skips_empty_fields() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"gender\":\"female\""));
        assert!(!json.contains("gestational_weeks"));
    }
}
