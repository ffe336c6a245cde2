//! Diaper records and colour checks.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What was in the diaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperType {
    /// Wet.
    Pee,
    /// Dirty.
    Poop,
    /// Wet and dirty.
    Both,
}

impl DiaperType {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pee => "尿尿",
            Self::Poop => "便便",
            Self::Both => "尿尿+便便",
        }
    }

    /// Whether the diaper was wet.
    #[must_use]
    pub fn has_pee(self) -> bool {
        matches!(self, Self::Pee | Self::Both)
    }

    /// Whether the diaper was dirty.
    #[must_use]
    pub fn has_poop(self) -> bool {
        matches!(self, Self::Poop | Self::Both)
    }
}

/// Consistency of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperStatus {
    /// Normal.
    Normal,
    /// Drier than usual.
    Dry,
    /// Looser than usual.
    Loose,
}

impl DiaperStatus {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "正常",
            Self::Dry => "较干",
            Self::Loose => "较稀",
        }
    }
}

/// Urine colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeeColor {
    /// Clear to pale.
    Clear,
    /// Light yellow.
    LightYellow,
    /// Yellow.
    Yellow,
    /// Dark yellow.
    DarkYellow,
    /// Orange.
    Orange,
    /// Red.
    Red,
    /// Brown.
    Brown,
}

impl PeeColor {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Clear => "透明淡黄",
            Self::LightYellow => "淡黄色",
            Self::Yellow => "黄色",
            Self::DarkYellow => "深黄色",
            Self::Orange => "橙色",
            Self::Red => "红色",
            Self::Brown => "棕色",
        }
    }

    /// Whether the colour is within the normal range.
    #[must_use]
    pub fn is_normal(self) -> bool {
        self.warning().is_none()
    }

    /// Advice for abnormal colours.
    #[must_use]
    pub fn warning(self) -> Option<&'static str> {
        match self {
            Self::Clear | Self::LightYellow | Self::Yellow => None,
            Self::DarkYellow => Some("深黄色尿液可能提示饮水不足，建议多喝水"),
            Self::Orange => Some("橙色尿液可能与脱水或肝脏问题有关，建议就医"),
            Self::Red => Some("红色尿液可能含有血液，建议立即就医"),
            Self::Brown => Some("棕色尿液可能提示肝脏或胆道问题，建议立即就医"),
        }
    }
}

/// Stool colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoopColor {
    /// Yellow.
    Yellow,
    /// Golden.
    Golden,
    /// Brown.
    Brown,
    /// Green.
    Green,
    /// Black.
    Black,
    /// White or pale.
    White,
    /// Red.
    Red,
}

impl PoopColor {
    /// Localized display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Yellow => "黄色",
            Self::Golden => "金黄色",
            Self::Brown => "棕色",
            Self::Green => "绿色",
            Self::Black => "黑色",
            Self::White => "白色",
            Self::Red => "红色",
        }
    }

    /// Whether the colour is within the normal range.
    #[must_use]
    pub fn is_normal(self) -> bool {
        self.warning().is_none()
    }

    /// Advice for abnormal colours.
    #[must_use]
    pub fn warning(self) -> Option<&'static str> {
        match self {
            Self::Yellow | Self::Golden | Self::Brown => None,
            Self::Green => Some("绿色便便可能与消化、饮食有关，持续出现建议咨询医生"),
            Self::Black => Some("黑色便便（非新生儿）可能提示消化道出血，建议就医"),
            Self::White => Some("白色便便可能提示胆道问题，建议立即就医"),
            Self::Red => Some("红色便便可能含有血液，建议立即就医"),
        }
    }
}

/// A diaper change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diaper {
    /// Wet, dirty, or both.
    pub diaper_type: DiaperType,
    /// Urine consistency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pee_status: Option<DiaperStatus>,
    /// Urine colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pee_color: Option<PeeColor>,
    /// Stool consistency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poop_status: Option<DiaperStatus>,
    /// Stool colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poop_color: Option<PoopColor>,
}

impl Diaper {
    /// A diaper of the given type with no further detail.
    #[must_use]
    pub fn new(diaper_type: DiaperType) -> Self {
        Self {
            diaper_type,
            pee_status: None,
            pee_color: None,
            poop_status: None,
            poop_color: None,
        }
    }

    /// Warnings for abnormal colours, pee first.
    #[must_use]
    pub fn warnings(&self) -> Vec<&'static str> {
        self.pee_color
            .and_then(PeeColor::warning)
            .into_iter()
            .chain(self.poop_color.and_then(PoopColor::warning))
            .collect()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.diaper_type.has_pee() && (self.pee_color.is_some() || self.pee_status.is_some())
        {
            return Err(Error::invalid_record(
                "diaper",
                "pee details given for a diaper without pee",
            ));
        }
        if !self.diaper_type.has_poop()
            && (self.poop_color.is_some() || self.poop_status.is_some())
        {
            return Err(Error::invalid_record(
                "diaper",
                "poop details given for a diaper without poop",
            ));
        }
        Ok(())
    }

    pub(crate) fn describe(&self) -> String {
        let mut text = self.diaper_type.display_name().to_string();
        if let Some(color) = self.pee_color {
            text.push_str(&format!(" · 尿{}", color.display_name()));
        }
        if let Some(status) = self.poop_status {
            text.push_str(&format!(" · 便{}", status.display_name()));
        }
        if let Some(color) = self.poop_color {
            text.push_str(&format!(" · 便{}", color.display_name()));
        }
        if !self.warnings().is_empty() {
            text.push_str(" ⚠");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_flags() {
        assert!(DiaperType::Pee.has_pee());
        assert!(!DiaperType::Pee.has_poop());
        assert!(DiaperType::Both.has_pee());
        assert!(DiaperType::Both.has_poop());
    }

    #[test]
    fn test_normal_colours_have_no_warning() {
        for color in [PeeColor::Clear, PeeColor::LightYellow, PeeColor::Yellow] {
            assert!(color.is_normal());
        }
        for color in [PoopColor::Yellow, PoopColor::Golden, PoopColor::Brown] {
            assert!(color.is_normal());
        }
        assert!(!PeeColor::DarkYellow.is_normal());
        assert!(!PoopColor::White.is_normal());
    }

    #[test]
    fn test_warnings_collects_both() {
        let diaper = Diaper {
            diaper_type: DiaperType::Both,
            pee_status: None,
            pee_color: Some(PeeColor::Red),
            poop_status: Some(DiaperStatus::Loose),
            poop_color: Some(PoopColor::Green),
        };
        let warnings = diaper.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("尿液"));
        assert!(warnings[1].contains("便便"));
    }

    #[test]
    fn test_validate_rejects_mismatched_details() {
        let mut diaper = Diaper::new(DiaperType::Pee);
        diaper.poop_color = Some(PoopColor::Yellow);
        assert!(diaper.validate().is_err());

        let mut diaper = Diaper::new(DiaperType::Poop);
        diaper.pee_color = Some(PeeColor::Yellow);
        assert!(diaper.validate().is_err());

        let mut diaper = Diaper::new(DiaperType::Both);
        diaper.pee_color = Some(PeeColor::Yellow);
        diaper.poop_color = Some(PoopColor::Golden);
        assert!(diaper.validate().is_ok());
    }

    #[test]
    fn test_colour_serialization() {
        let json = serde_json::to_string(&PeeColor::LightYellow).unwrap();
        assert_eq!(json, "\"light_yellow\"");
    }

    #[test]
    fn test_describe_flags_warning() {
        let mut diaper = Diaper::new(DiaperType::Poop);
        diaper.poop_color = Some(PoopColor::Black);
        assert_eq!(diaper.describe(), "便便 · 便黑色 ⚠");
    }
}
