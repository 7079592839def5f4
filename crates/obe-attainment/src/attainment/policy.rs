use super::config::MissingIndirect;
use super::domain::AttainmentLevel;

/// Share of the final score taken from direct (assessment based) attainment.
pub const DIRECT_WEIGHT: f64 = 0.8;
/// Share of the final score taken from indirect (survey based) attainment.
pub const INDIRECT_WEIGHT: f64 = 0.2;

/// Band a cohort pass percentage against the course threshold.
pub fn attainment_level(percentage: f64, threshold: f64) -> AttainmentLevel {
    if percentage >= threshold + 20.0 {
        AttainmentLevel::High
    } else if percentage >= threshold + 10.0 {
        AttainmentLevel::Medium
    } else if percentage >= threshold {
        AttainmentLevel::Low
    } else {
        AttainmentLevel::NotAttained
    }
}

/// Combine direct and indirect components into the final outcome score.
pub fn blend(direct: f64, indirect: Option<f64>, missing: MissingIndirect) -> f64 {
    match (indirect, missing) {
        (Some(indirect), _) => DIRECT_WEIGHT * direct + INDIRECT_WEIGHT * indirect,
        (None, MissingIndirect::TreatAsZero) => DIRECT_WEIGHT * direct,
        (None, MissingIndirect::DirectOnly) => direct,
    }
}

/// Weighted mean helper shared by the calculators; zero weight resolves to zero.
pub(crate) fn weighted_mean(total: f64, weight: f64) -> f64 {
    if weight > 0.0 {
        total / weight
    } else {
        0.0
    }
}
