use chrono::{DateTime, Utc};
use obe_attainment::attainment::AcademicPeriod;
use obe_attainment::error::AppError;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Operation {
    Direct,
    Indirect,
    Final,
}

#[derive(Debug, Serialize)]
struct Envelope<'a, T> {
    operation: Operation,
    period: &'a AcademicPeriod,
    generated_at: DateTime<Utc>,
    result: &'a T,
}

pub(crate) fn write_envelope<W: Write, T: Serialize>(
    mut writer: W,
    operation: Operation,
    period: &AcademicPeriod,
    result: &T,
) -> Result<(), AppError> {
    let envelope = Envelope {
        operation,
        period,
        generated_at: Utc::now(),
        result,
    };
    serde_json::to_writer_pretty(&mut writer, &envelope)?;
    writeln!(writer)?;
    Ok(())
}
