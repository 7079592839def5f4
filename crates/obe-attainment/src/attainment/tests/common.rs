use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::attainment::{
    AcademicPeriod, AssessmentId, AssessmentMapping, AttainmentEngine, AttainmentRecord,
    AttainmentRepository, Clo, CloId, Correlation, Course, CourseId, DepartmentId, EngineConfig,
    OutcomeMapping, OutcomeRef, PoId, PsoId, RepositoryError, SurveyResponse,
};

pub(super) fn period() -> AcademicPeriod {
    AcademicPeriod::new("2024-25", 5)
}

pub(super) fn department() -> DepartmentId {
    DepartmentId::new("cse")
}

pub(super) fn course_id() -> CourseId {
    CourseId::new("cs101")
}

pub(super) fn course(threshold: f64) -> Course {
    Course {
        id: course_id(),
        code: "CS101".to_string(),
        department_id: department(),
        threshold,
    }
}

pub(super) fn clo(id: &str, assessments: &[(&str, f64)], outcomes: &[(OutcomeRef, u8)]) -> Clo {
    Clo {
        id: CloId::new(id),
        course_id: course_id(),
        code: id.to_ascii_uppercase(),
        is_active: true,
        assessments: assessments
            .iter()
            .map(|(assessment, weightage)| AssessmentMapping {
                assessment_id: AssessmentId::new(*assessment),
                weightage: *weightage,
            })
            .collect(),
        outcomes: outcomes
            .iter()
            .map(|(outcome, correlation)| OutcomeMapping {
                outcome: outcome.clone(),
                correlation: Correlation::new(*correlation).expect("valid correlation"),
            })
            .collect(),
    }
}

pub(super) fn po(id: &str) -> OutcomeRef {
    OutcomeRef::Po(PoId::new(id))
}

pub(super) fn pso(id: &str) -> OutcomeRef {
    OutcomeRef::Pso(PsoId::new(id))
}

pub(super) fn record(
    clo: &str,
    assessment: &str,
    attained: u32,
    students: u32,
) -> AttainmentRecord {
    AttainmentRecord {
        clo_id: CloId::new(clo),
        assessment_id: AssessmentId::new(assessment),
        period: period(),
        attained_count: attained,
        student_count: students,
    }
}

pub(super) fn survey(outcome: OutcomeRef, level: u8) -> SurveyResponse {
    SurveyResponse {
        outcome,
        department_id: department(),
        period: period(),
        response_level: level,
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) courses: Mutex<HashMap<CourseId, Course>>,
    pub(super) clos: Mutex<Vec<Clo>>,
    pub(super) records: Mutex<Vec<AttainmentRecord>>,
    pub(super) surveys: Mutex<Vec<SurveyResponse>>,
    pub(super) record_lookups: AtomicUsize,
}

impl MemoryRepository {
    pub(super) fn with_course(course: Course) -> Self {
        let repository = Self::default();
        repository
            .courses
            .lock()
            .expect("repository mutex poisoned")
            .insert(course.id.clone(), course);
        repository
    }

    pub(super) fn add_clo(&self, clo: Clo) {
        self.clos.lock().expect("repository mutex poisoned").push(clo);
    }

    pub(super) fn add_record(&self, record: AttainmentRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(record);
    }

    pub(super) fn add_survey(&self, response: SurveyResponse) {
        self.surveys
            .lock()
            .expect("repository mutex poisoned")
            .push(response);
    }

    pub(super) fn record_lookups(&self) -> usize {
        self.record_lookups.load(Ordering::SeqCst)
    }
}

impl AttainmentRepository for MemoryRepository {
    fn course(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError> {
        let guard = self.courses.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_clos(&self, course_id: &CourseId) -> Result<Vec<Clo>, RepositoryError> {
        let guard = self.clos.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|clo| &clo.course_id == course_id && clo.is_active)
            .cloned()
            .collect())
    }

    fn attainment_record(
        &self,
        clo_id: &CloId,
        assessment_id: &AssessmentId,
        period: &AcademicPeriod,
    ) -> Result<Option<AttainmentRecord>, RepositoryError> {
        self.record_lookups.fetch_add(1, Ordering::SeqCst);
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| {
                &record.clo_id == clo_id
                    && &record.assessment_id == assessment_id
                    && &record.period == period
            })
            .cloned())
    }

    fn survey_responses(
        &self,
        department_id: &DepartmentId,
        period: &AcademicPeriod,
    ) -> Result<Vec<SurveyResponse>, RepositoryError> {
        let guard = self.surveys.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|response| {
                &response.department_id == department_id && &response.period == period
            })
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl AttainmentRepository for UnavailableRepository {
    fn course(&self, _id: &CourseId) -> Result<Option<Course>, RepositoryError> {
        Ok(Some(course(60.0)))
    }

    fn active_clos(&self, _course_id: &CourseId) -> Result<Vec<Clo>, RepositoryError> {
        Ok(vec![clo("clo-1", &[("mid-1", 1.0)], &[(po("po-1"), 3)])])
    }

    fn attainment_record(
        &self,
        _clo_id: &CloId,
        _assessment_id: &AssessmentId,
        _period: &AcademicPeriod,
    ) -> Result<Option<AttainmentRecord>, RepositoryError> {
        Ok(Some(record("clo-1", "mid-1", 40, 50)))
    }

    fn survey_responses(
        &self,
        _department_id: &DepartmentId,
        _period: &AcademicPeriod,
    ) -> Result<Vec<SurveyResponse>, RepositoryError> {
        Err(RepositoryError::Unavailable("survey store offline".to_string()))
    }
}

/// Repository view over borrowed test data.
pub(super) struct BorrowedRepository<'a>(pub(super) &'a MemoryRepository);

impl AttainmentRepository for BorrowedRepository<'_> {
    fn course(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError> {
        self.0.course(id)
    }

    fn active_clos(&self, course_id: &CourseId) -> Result<Vec<Clo>, RepositoryError> {
        self.0.active_clos(course_id)
    }

    fn attainment_record(
        &self,
        clo_id: &CloId,
        assessment_id: &AssessmentId,
        period: &AcademicPeriod,
    ) -> Result<Option<AttainmentRecord>, RepositoryError> {
        self.0.attainment_record(clo_id, assessment_id, period)
    }

    fn survey_responses(
        &self,
        department_id: &DepartmentId,
        period: &AcademicPeriod,
    ) -> Result<Vec<SurveyResponse>, RepositoryError> {
        self.0.survey_responses(department_id, period)
    }
}

pub(super) fn engine(repository: Arc<MemoryRepository>) -> AttainmentEngine<MemoryRepository> {
    AttainmentEngine::new(repository, EngineConfig::default())
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
