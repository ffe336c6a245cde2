//! Growth measurements.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A growth measurement. At least one value must be present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    /// Weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Height in centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Head circumference in centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_circumference_cm: Option<f64>,
}

impl Growth {
    /// A weight-only measurement.
    #[must_use]
    pub fn weight(kg: f64) -> Self {
        Self {
            weight_kg: Some(kg),
            height_cm: None,
            head_circumference_cm: None,
        }
    }

    fn values(&self) -> [(&'static str, Option<f64>); 3] {
        [
            ("weight", self.weight_kg),
            ("height", self.height_cm),
            ("head circumference", self.head_circumference_cm),
        ]
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let values = self.values();
        if values.iter().all(|(_, v)| v.is_none()) {
            return Err(Error::invalid_record(
                "growth",
                "at least one measurement is required",
            ));
        }
        for (name, value) in values {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(Error::invalid_record(
                        "growth",
                        format!("{name} must be positive, got {v}"),
                    ));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(w) = self.weight_kg {
            parts.push(format!("体重 {w:.2}kg"));
        }
        if let Some(h) = self.height_cm {
            parts.push(format!("身高 {h:.1}cm"));
        }
        if let Some(hc) = self.head_circumference_cm {
            parts.push(format!("头围 {hc:.1}cm"));
        }
        format!("生长 {}", parts.join(" · "))
    }
}
