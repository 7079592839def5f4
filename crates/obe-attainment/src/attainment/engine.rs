use std::sync::Arc;
use std::thread;

use tracing::{info, info_span, Span};

use super::composite::{self, FinalAttainment};
use super::config::EngineConfig;
use super::direct::{self, CloAttainment};
use super::domain::{AcademicPeriod, Clo, Course, CourseId, DepartmentId};
use super::error::{AttainmentError, DataError};
use super::indirect::{self, IndirectAttainment};
use super::repository::AttainmentRepository;

/// Stateless attainment calculator over an injected repository.
///
/// Every operation only reads from the repository, so a single engine can be
/// shared across threads and invoked concurrently for different courses or
/// periods.
pub struct AttainmentEngine<R> {
    repository: Arc<R>,
    config: EngineConfig,
}

impl<R> AttainmentEngine<R>
where
    R: AttainmentRepository,
{
    pub fn new(repository: Arc<R>, config: EngineConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Leveled attainment for every active CLO of a course.
    pub fn compute_direct_attainment(
        &self,
        course_id: &CourseId,
        period: &AcademicPeriod,
    ) -> Result<Vec<CloAttainment>, AttainmentError> {
        let _span = info_span!("direct_attainment", course = %course_id, %period).entered();

        let course = self.load_course(course_id)?;
        let clos = self.repository.active_clos(course_id)?;
        let results = self.direct_for(&course, &clos, period)?;

        info!(clos = results.len(), "computed direct attainment");
        Ok(results)
    }

    /// Mean survey level for each PO and PSO of a department.
    pub fn compute_indirect_attainment(
        &self,
        department_id: &DepartmentId,
        period: &AcademicPeriod,
    ) -> Result<IndirectAttainment, AttainmentError> {
        let _span =
            info_span!("indirect_attainment", department = %department_id, %period).entered();

        let result = self.indirect_for(department_id, period)?;

        info!(
            pos = result.po.len(),
            psos = result.pso.len(),
            "computed indirect attainment"
        );
        Ok(result)
    }

    /// Blend direct CLO attainment, propagated through the correlation mappings,
    /// with the department's indirect attainment.
    pub fn compute_final_attainment(
        &self,
        course_id: &CourseId,
        period: &AcademicPeriod,
    ) -> Result<FinalAttainment, AttainmentError> {
        let _span = info_span!("final_attainment", course = %course_id, %period).entered();

        let course = self.load_course(course_id)?;
        let clos = self.repository.active_clos(course_id)?;

        let span = Span::current();
        let (direct, indirect) = thread::scope(|scope| {
            let indirect = scope.spawn(|| {
                span.in_scope(|| self.indirect_for(&course.department_id, period))
            });
            let direct = self.direct_for(&course, &clos, period);
            let indirect = match indirect.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            (direct, indirect)
        });
        let direct = direct?;
        let indirect = indirect?;

        let resolved =
            composite::resolve(&clos, &direct, &indirect, self.config.missing_indirect);

        info!(
            clos = direct.len(),
            pos = resolved.po.len(),
            psos = resolved.pso.len(),
            "computed final attainment"
        );

        Ok(FinalAttainment {
            course_id: course.id,
            period: period.clone(),
            direct,
            indirect,
            final_po: resolved.po,
            final_pso: resolved.pso,
        })
    }

    fn load_course(&self, course_id: &CourseId) -> Result<Course, AttainmentError> {
        self.repository
            .course(course_id)?
            .ok_or_else(|| DataError::CourseNotFound(course_id.clone()).into())
    }

    fn direct_for(
        &self,
        course: &Course,
        clos: &[Clo],
        period: &AcademicPeriod,
    ) -> Result<Vec<CloAttainment>, AttainmentError> {
        direct::compute(self.repository.as_ref(), course, clos, period)
    }

    fn indirect_for(
        &self,
        department_id: &DepartmentId,
        period: &AcademicPeriod,
    ) -> Result<IndirectAttainment, AttainmentError> {
        let responses = self.repository.survey_responses(department_id, period)?;
        let result = indirect::compute(
            &responses,
            department_id,
            period,
            self.config.survey_scale,
        )?;
        Ok(result)
    }
}
