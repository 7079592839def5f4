//! In-memory attainment repository backed by a JSON dataset, with CSV importers
//! for cohort counts, survey exports and CLO articulation matrices.

mod import;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attainment::{
    AcademicPeriod, AssessmentId, AttainmentRecord, AttainmentRepository, Clo, CloId, Course,
    CourseId, DataError, DepartmentId, PolicyViolation, RepositoryError, SurveyResponse,
};

/// Snapshot of the curriculum and measurement data for one or more departments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub clos: Vec<Clo>,
    #[serde(default)]
    pub records: Vec<AttainmentRecord>,
    #[serde(default)]
    pub surveys: Vec<SurveyResponse>,
}

/// Error raised while loading or importing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("inconsistent dataset: {0}")]
    Integrity(String),
}

impl Dataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_reader(reader)?;
        dataset.validate()?;
        debug!(
            courses = dataset.courses.len(),
            clos = dataset.clos.len(),
            records = dataset.records.len(),
            surveys = dataset.surveys.len(),
            "loaded attainment dataset"
        );
        Ok(dataset)
    }

    /// Append cohort counts from a CSV export.
    pub fn import_records<R: Read>(&mut self, reader: R) -> Result<usize, DatasetError> {
        let records = import::parse_records(reader)?;
        if let Some(record) = records
            .iter()
            .find(|record| !self.clos.iter().any(|clo| clo.id == record.clo_id))
        {
            return Err(DataError::CloNotFound(record.clo_id.clone()).into());
        }

        let imported = records.len();
        self.records.extend(records);
        Ok(imported)
    }

    /// Append indirect survey responses from a CSV export.
    pub fn import_surveys<R: Read>(&mut self, reader: R) -> Result<usize, DatasetError> {
        let responses = import::parse_surveys(reader)?;
        let departments = self.departments();
        if let Some(response) = responses
            .iter()
            .find(|response| !departments.contains(&response.department_id))
        {
            return Err(unknown_department(response));
        }

        let imported = responses.len();
        self.surveys.extend(responses);
        Ok(imported)
    }

    /// Replace or add CLO to PO/PSO mappings from an articulation matrix export.
    pub fn import_mappings<R: Read>(&mut self, reader: R) -> Result<usize, DatasetError> {
        let mappings = import::parse_mappings(reader)?;
        if let Some((clo_id, _)) = mappings
            .iter()
            .find(|(clo_id, _)| !self.clos.iter().any(|clo| &clo.id == clo_id))
        {
            return Err(DataError::CloNotFound(clo_id.clone()).into());
        }

        let imported = mappings.len();
        for (clo_id, mapping) in mappings {
            let Some(clo) = self.clos.iter_mut().find(|clo| clo.id == clo_id) else {
                continue;
            };

            match clo
                .outcomes
                .iter_mut()
                .find(|existing| existing.outcome == mapping.outcome)
            {
                Some(existing) => existing.correlation = mapping.correlation,
                None => clo.outcomes.push(mapping),
            }
        }

        Ok(imported)
    }

    /// Check the references a repository would enforce with foreign keys.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut course_ids = HashSet::new();
        for course in &self.courses {
            if !course_ids.insert(&course.id) {
                return Err(DatasetError::Integrity(format!(
                    "duplicate course {}",
                    course.id
                )));
            }
        }

        let mut clo_ids = HashSet::new();
        for clo in &self.clos {
            if !course_ids.contains(&clo.course_id) {
                return Err(DatasetError::Integrity(format!(
                    "CLO {} references unknown course {}",
                    clo.id, clo.course_id
                )));
            }
            if !clo_ids.insert(&clo.id) {
                return Err(DatasetError::Integrity(format!("duplicate CLO {}", clo.id)));
            }
        }

        if let Some(record) = self
            .records
            .iter()
            .find(|record| !clo_ids.contains(&record.clo_id))
        {
            return Err(DataError::CloNotFound(record.clo_id.clone()).into());
        }

        let departments = self.departments();
        if let Some(response) = self
            .surveys
            .iter()
            .find(|response| !departments.contains(&response.department_id))
        {
            return Err(unknown_department(response));
        }

        Ok(())
    }

    /// Departments that own at least one course.
    fn departments(&self) -> HashSet<&DepartmentId> {
        self.courses
            .iter()
            .map(|course| &course.department_id)
            .collect()
    }
}

fn unknown_department(response: &SurveyResponse) -> DatasetError {
    DatasetError::Integrity(format!(
        "survey response for {} references unknown department {}",
        response.outcome, response.department_id
    ))
}

impl AttainmentRepository for Dataset {
    fn course(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError> {
        Ok(self.courses.iter().find(|course| &course.id == id).cloned())
    }

    fn active_clos(&self, course_id: &CourseId) -> Result<Vec<Clo>, RepositoryError> {
        Ok(self
            .clos
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
        Ok(self
            .records
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
        Ok(self
            .surveys
            .iter()
            .filter(|response| {
                &response.department_id == department_id && &response.period == period
            })
            .cloned()
            .collect())
    }
}
