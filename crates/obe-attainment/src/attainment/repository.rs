use super::domain::{
    AcademicPeriod, AssessmentId, AttainmentRecord, Clo, CloId, Course, CourseId, DepartmentId,
    SurveyResponse,
};

/// Read-only data source the engine is built on.
///
/// Implementations own persistence, caching and retry policy; the engine only
/// issues lookups scoped to a course or department and an academic period.
pub trait AttainmentRepository: Send + Sync {
    fn course(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError>;

    /// Active CLOs of a course with their assessment and PO/PSO mappings, in a stable order.
    fn active_clos(&self, course_id: &CourseId) -> Result<Vec<Clo>, RepositoryError>;

    fn attainment_record(
        &self,
        clo_id: &CloId,
        assessment_id: &AssessmentId,
        period: &AcademicPeriod,
    ) -> Result<Option<AttainmentRecord>, RepositoryError>;

    /// Survey responses whose PO or PSO belongs to the department.
    fn survey_responses(
        &self,
        department_id: &DepartmentId,
        period: &AcademicPeriod,
    ) -> Result<Vec<SurveyResponse>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
