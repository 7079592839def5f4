use super::domain::{AcademicPeriod, AssessmentId, CloId, CourseId, OutcomeRef};
use super::repository::RepositoryError;

/// A required entity is missing or carries an invalid state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("CLO {0} not found")]
    CloNotFound(CloId),
    #[error("CLO {clo_id} has no usable attainment record for {period}: every record reports an empty cohort")]
    EmptyCohort { clo_id: CloId, period: AcademicPeriod },
    #[error("attainment record for CLO {clo_id} / assessment {assessment_id} reports {attained} attained out of {students} students")]
    AttainedExceedsCohort {
        clo_id: CloId,
        assessment_id: AssessmentId,
        attained: u32,
        students: u32,
    },
    #[error("survey response level {level} for {outcome} lies outside the {min}..={max} scale")]
    ResponseOutOfScale {
        outcome: OutcomeRef,
        level: u8,
        min: u8,
        max: u8,
    },
    #[error("assessment weightage {weightage} for CLO {clo_id} must be a finite, non-negative number")]
    InvalidWeightage { clo_id: CloId, weightage: f64 },
    #[error("course threshold {0} must be a finite percentage")]
    InvalidThreshold(f64),
}

/// Articulation or grading policy rule broken by the supplied data or configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error("correlation {0} must be between 0 and 3")]
    CorrelationOutOfRange(i64),
    #[error("survey scale {min}..={max} must span at least one level")]
    InvalidSurveyScale { min: u8, max: u8 },
}

/// Error raised by the attainment engine.
#[derive(Debug, thiserror::Error)]
pub enum AttainmentError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
