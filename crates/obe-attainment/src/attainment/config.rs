use serde::{Deserialize, Serialize};

use super::error::PolicyViolation;

/// Grading options applied by the engine on top of the fixed banding and blend rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub survey_scale: SurveyScale,
    pub missing_indirect: MissingIndirect,
}

/// Range of the Likert-style levels used by indirect surveys. Always spans at least one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScaleBounds", into = "ScaleBounds")]
pub struct SurveyScale {
    min: u8,
    max: u8,
}

#[derive(Serialize, Deserialize)]
struct ScaleBounds {
    min: u8,
    max: u8,
}

impl SurveyScale {
    /// The scale direct attainment is expressed on.
    pub const ATTAINMENT: SurveyScale = SurveyScale { min: 0, max: 3 };

    pub fn new(min: u8, max: u8) -> Result<Self, PolicyViolation> {
        if max <= min {
            return Err(PolicyViolation::InvalidSurveyScale { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> u8 {
        self.min
    }

    pub const fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, level: u8) -> bool {
        (self.min..=self.max).contains(&level)
    }

    /// Map a response onto the 0..=3 attainment band. Identity for the attainment scale.
    pub fn normalize(&self, level: u8) -> f64 {
        if *self == Self::ATTAINMENT {
            return f64::from(level);
        }
        let span = f64::from(self.max - self.min);
        f64::from(level.saturating_sub(self.min)) / span * f64::from(Self::ATTAINMENT.max)
    }
}

impl Default for SurveyScale {
    fn default() -> Self {
        Self::ATTAINMENT
    }
}

impl TryFrom<ScaleBounds> for SurveyScale {
    type Error = PolicyViolation;

    fn try_from(bounds: ScaleBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.min, bounds.max)
    }
}

impl From<SurveyScale> for ScaleBounds {
    fn from(scale: SurveyScale) -> Self {
        Self {
            min: scale.min,
            max: scale.max,
        }
    }
}

/// How an outcome with no survey responses is blended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingIndirect {
    /// Blend as if the indirect component were zero.
    #[default]
    TreatAsZero,
    /// Score the outcome from its direct component alone.
    DirectOnly,
}

impl MissingIndirect {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zero" | "treat-as-zero" => Some(Self::TreatAsZero),
            "direct-only" | "direct" => Some(Self::DirectOnly),
            _ => None,
        }
    }
}
