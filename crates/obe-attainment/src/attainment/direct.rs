use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{AcademicPeriod, AssessmentId, AttainmentLevel, Clo, CloId, Course};
use super::error::{AttainmentError, DataError};
use super::policy::{attainment_level, weighted_mean};
use super::repository::AttainmentRepository;

/// Leveled attainment for a single CLO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloAttainment {
    pub clo_id: CloId,
    pub clo_code: String,
    /// Weighted mean of the assessment levels, on the 0..=3 scale.
    pub attainment: f64,
    pub contributions: Vec<AssessmentContribution>,
    /// Records ignored because their cohort was empty.
    pub skipped_empty_cohorts: usize,
}

impl CloAttainment {
    pub fn has_data(&self) -> bool {
        !self.contributions.is_empty()
    }
}

/// Discrete contribution of one assessment, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentContribution {
    pub assessment_id: AssessmentId,
    pub weightage: f64,
    pub percentage: f64,
    pub level: AttainmentLevel,
}

pub(crate) fn compute<R>(
    repository: &R,
    course: &Course,
    clos: &[Clo],
    period: &AcademicPeriod,
) -> Result<Vec<CloAttainment>, AttainmentError>
where
    R: AttainmentRepository + ?Sized,
{
    if !course.threshold.is_finite() {
        return Err(DataError::InvalidThreshold(course.threshold).into());
    }

    clos.iter()
        .filter(|clo| clo.is_active)
        .map(|clo| clo_attainment(repository, course, clo, period))
        .collect()
}

fn clo_attainment<R>(
    repository: &R,
    course: &Course,
    clo: &Clo,
    period: &AcademicPeriod,
) -> Result<CloAttainment, AttainmentError>
where
    R: AttainmentRepository + ?Sized,
{
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    let mut contributions = Vec::new();
    let mut skipped_empty_cohorts = 0;

    for mapping in &clo.assessments {
        if !mapping.weightage.is_finite() || mapping.weightage < 0.0 {
            return Err(DataError::InvalidWeightage {
                clo_id: clo.id.clone(),
                weightage: mapping.weightage,
            }
            .into());
        }

        let Some(record) = repository.attainment_record(&clo.id, &mapping.assessment_id, period)?
        else {
            continue;
        };

        if record.student_count == 0 {
            warn!(
                clo = %clo.id,
                assessment = %mapping.assessment_id,
                "skipping attainment record with empty cohort"
            );
            skipped_empty_cohorts += 1;
            continue;
        }

        if record.attained_count > record.student_count {
            return Err(DataError::AttainedExceedsCohort {
                clo_id: clo.id.clone(),
                assessment_id: mapping.assessment_id.clone(),
                attained: record.attained_count,
                students: record.student_count,
            }
            .into());
        }

        let percentage =
            100.0 * f64::from(record.attained_count) / f64::from(record.student_count);
        let level = attainment_level(percentage, course.threshold);

        weighted_sum += f64::from(level.value()) * mapping.weightage;
        weight_sum += mapping.weightage;
        contributions.push(AssessmentContribution {
            assessment_id: mapping.assessment_id.clone(),
            weightage: mapping.weightage,
            percentage,
            level,
        });
    }

    if contributions.is_empty() && skipped_empty_cohorts > 0 {
        return Err(DataError::EmptyCohort {
            clo_id: clo.id.clone(),
            period: period.clone(),
        }
        .into());
    }

    let attainment = weighted_mean(weighted_sum, weight_sum);
    debug!(
        clo = %clo.id,
        attainment,
        assessments = contributions.len(),
        "computed direct CLO attainment"
    );

    Ok(CloAttainment {
        clo_id: clo.id.clone(),
        clo_code: clo.code.clone(),
        attainment,
        contributions,
        skipped_empty_cohorts,
    })
}
