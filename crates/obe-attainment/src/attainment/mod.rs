//! Attainment computation: direct CLO attainment from cohort counts, indirect
//! PO/PSO attainment from surveys, and the composite resolver that blends them.

mod composite;
pub mod config;
mod direct;
pub mod domain;
mod engine;
pub mod error;
mod indirect;
pub mod policy;
pub mod repository;

#[cfg(test)]
mod tests;

pub use composite::{FinalAttainment, OutcomeScore};
pub use config::{EngineConfig, MissingIndirect, SurveyScale};
pub use direct::{AssessmentContribution, CloAttainment};
pub use domain::{
    AcademicPeriod, AssessmentId, AssessmentMapping, AttainmentLevel, AttainmentRecord, Clo,
    CloId, Correlation, Course, CourseId, DepartmentId, OutcomeMapping, OutcomeRef, PoId, PsoId,
    SurveyResponse,
};
pub use engine::AttainmentEngine;
pub use error::{AttainmentError, DataError, PolicyViolation};
pub use indirect::{IndirectAttainment, OutcomeMean};
pub use repository::{AttainmentRepository, RepositoryError};
