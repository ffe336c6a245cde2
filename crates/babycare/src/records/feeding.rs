//! Feeding records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What was fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingType {
    /// Breast milk.
    BreastMilk,
    /// Formula.
    Formula,
    /// Breast milk and formula.
    Mixed,
    /// Solid food.
    SolidFood,
}

impl FeedingType {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::BreastMilk => "母乳",
            Self::Formula => "奶粉",
            Self::Mixed => "混合",
            Self::SolidFood => "辅食",
        }
    }

    /// Whether this is a milk feed.
    #[must_use]
    pub fn is_milk(self) -> bool {
        !matches!(self, Self::SolidFood)
    }
}

/// How milk was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingMethod {
    /// Nursing at the breast.
    Breastfeeding,
    /// Bottle.
    Bottle,
}

impl FeedingMethod {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Breastfeeding => "亲喂",
            Self::Bottle => "瓶装",
        }
    }
}

/// How much of the feed was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// Finished everything.
    #[default]
    Full,
    /// About half.
    Half,
    /// Very little.
    Little,
    /// Refused.
    Refused,
}

impl Acceptance {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Full => "全部吃完",
            Self::Half => "吃了一半",
            Self::Little => "吃得很少",
            Self::Refused => "拒绝",
        }
    }
}

/// A feeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feeding {
    /// What was fed.
    pub feeding_type: FeedingType,
    /// How milk was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<FeedingMethod>,
    /// Name of the solid food.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<String>,
    /// Amount: millilitres for milk, servings for solids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Unit of `amount` when not the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Nursing session start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
    /// Nursing session end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    /// How much was taken.
    #[serde(default)]
    pub acceptance: Acceptance,
    /// Whether an allergic reaction was observed.
    #[serde(default)]
    pub is_allergic: bool,
}

impl Feeding {
    /// A formula bottle of `ml` millilitres.
    #[must_use]
    pub fn bottle(ml: f64) -> Self {
        Self {
            feeding_type: FeedingType::Formula,
            method: Some(FeedingMethod::Bottle),
            food: None,
            amount: Some(ml),
            unit: Some("ml".to_string()),
            start_time: None,
            end_time: None,
            acceptance: Acceptance::Full,
            is_allergic: false,
        }
    }

    /// A nursing session between `start` and `end`.
    #[must_use]
    pub fn nursing(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            feeding_type: FeedingType::BreastMilk,
            method: Some(FeedingMethod::Breastfeeding),
            food: None,
            amount: None,
            unit: None,
            start_time: Some(start),
            end_time: Some(end),
            acceptance: Acceptance::Full,
            is_allergic: false,
        }
    }

    /// A serving of solid food.
    #[must_use]
    pub fn solid(food: impl Into<String>) -> Self {
        Self {
            feeding_type: FeedingType::SolidFood,
            method: None,
            food: Some(food.into()),
            amount: None,
            unit: None,
            start_time: None,
            end_time: None,
            acceptance: Acceptance::Full,
            is_allergic: false,
        }
    }

    /// Nursing duration in whole minutes, when both times are known.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<i64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_minutes()),
            _ => None,
        }
    }

    /// Milk volume in millilitres, if this is a measured milk feed.
    #[must_use]
    pub fn milk_volume_ml(&self) -> Option<f64> {
        if !self.feeding_type.is_milk() {
            return None;
        }
        match self.unit.as_deref() {
            None | Some("ml") => self.amount,
            Some(_) => None,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            if !(amount.is_finite() && amount > 0.0) {
                return Err(Error::invalid_record(
                    "feeding",
                    format!("amount must be positive, got {amount}"),
                ));
            }
        }
        if let Some(minutes) = self.duration_minutes() {
            if minutes < 0 {
                return Err(Error::invalid_record(
                    "feeding",
                    "end time is before start time",
                ));
            }
        }
        if self.feeding_type == FeedingType::SolidFood
            && self.food.as_deref().map_or(true, |f| f.trim().is_empty())
        {
            return Err(Error::invalid_record("feeding", "solid food needs a food name"));
        }
        if self.feeding_type == FeedingType::SolidFood
            && self.method == Some(FeedingMethod::Breastfeeding)
        {
            return Err(Error::invalid_record(
                "feeding",
                "solid food cannot be breastfed",
            ));
        }
        Ok(())
    }

    pub(crate) fn describe(&self) -> String {
        let mut text = self.feeding_type.display_name().to_string();
        if let Some(method) = self.method {
            text.push_str(&format!(" ({})", method.display_name()));
        }
        if let Some(food) = &self.food {
            text.push_str(&format!(" {food}"));
        }
        if let Some(amount) = self.amount {
            let unit = self.unit.as_deref().unwrap_or(if self.feeding_type.is_milk() {
                "ml"
            } else {
                "份"
            });
            text.push_str(&format!(" {amount}{unit}"));
        }
        if let Some(minutes) = self.duration_minutes() {
            text.push_str(&format!(" {minutes}分钟"));
        }
        if self.acceptance != Acceptance::Full {
            text.push_str(&format!(" · {}", self.acceptance.display_name()));
        }
        if self.is_allergic {
            text.push_str(" · 过敏");
        }
        text
    }
}
