use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::attainment::{
    AcademicPeriod, AssessmentId, AttainmentRecord, CloId, Correlation, DepartmentId,
    OutcomeMapping, OutcomeRef, PoId, PsoId, SurveyResponse,
};

use super::DatasetError;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<AttainmentRecord>, DatasetError> {
    let mut records = Vec::new();
    for row in csv_reader(reader).deserialize::<RecordRow>() {
        let row = row?;
        records.push(AttainmentRecord {
            clo_id: CloId(row.clo_id),
            assessment_id: AssessmentId(row.assessment_id),
            period: AcademicPeriod::new(row.academic_year, row.semester),
            attained_count: row.attained_count,
            student_count: row.student_count,
        });
    }
    Ok(records)
}

pub(crate) fn parse_surveys<R: Read>(reader: R) -> Result<Vec<SurveyResponse>, DatasetError> {
    let mut responses = Vec::new();
    for (index, row) in csv_reader(reader).deserialize::<SurveyRow>().enumerate() {
        let row = row?;
        let outcome = outcome_from_columns(row.po_id, row.pso_id, index)?;
        responses.push(SurveyResponse {
            outcome,
            department_id: DepartmentId(row.department_id),
            period: AcademicPeriod::new(row.academic_year, row.semester),
            response_level: row.response_level,
        });
    }
    Ok(responses)
}

pub(crate) fn parse_mappings<R: Read>(
    reader: R,
) -> Result<Vec<(CloId, OutcomeMapping)>, DatasetError> {
    let mut mappings = Vec::new();
    for (index, row) in csv_reader(reader).deserialize::<MappingRow>().enumerate() {
        let row = row?;
        let outcome = outcome_from_columns(row.po_id, row.pso_id, index)?;
        let correlation = Correlation::try_from(row.correlation)?;
        mappings.push((
            CloId(row.clo_id),
            OutcomeMapping {
                outcome,
                correlation,
            },
        ));
    }
    Ok(mappings)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn outcome_from_columns(
    po_id: Option<String>,
    pso_id: Option<String>,
    index: usize,
) -> Result<OutcomeRef, DatasetError> {
    match (po_id, pso_id) {
        (Some(po), None) => Ok(OutcomeRef::Po(PoId(po))),
        (None, Some(pso)) => Ok(OutcomeRef::Pso(PsoId(pso))),
        _ => Err(DatasetError::Integrity(format!(
            "row {} must reference exactly one of po_id or pso_id",
            index + 1
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct RecordRow {
    clo_id: String,
    assessment_id: String,
    academic_year: String,
    semester: u8,
    attained_count: u32,
    student_count: u32,
}

#[derive(Debug, Deserialize)]
struct SurveyRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    po_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pso_id: Option<String>,
    department_id: String,
    academic_year: String,
    semester: u8,
    response_level: u8,
}

#[derive(Debug, Deserialize)]
struct MappingRow {
    clo_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    po_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pso_id: Option<String>,
    correlation: i64,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
