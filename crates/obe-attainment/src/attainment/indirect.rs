use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::SurveyScale;
use super::domain::{AcademicPeriod, DepartmentId, OutcomeRef, PoId, PsoId, SurveyResponse};
use super::error::DataError;

/// Mean survey level per PO and PSO. Outcomes without responses are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndirectAttainment {
    pub po: BTreeMap<PoId, OutcomeMean>,
    pub pso: BTreeMap<PsoId, OutcomeMean>,
}

impl IndirectAttainment {
    pub fn level(&self, outcome: &OutcomeRef) -> Option<f64> {
        match outcome {
            OutcomeRef::Po(id) => self.po.get(id).map(|mean| mean.mean),
            OutcomeRef::Pso(id) => self.pso.get(id).map(|mean| mean.mean),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.po.is_empty() && self.pso.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMean {
    pub mean: f64,
    pub responses: usize,
}

#[derive(Default)]
struct Tally {
    total: f64,
    count: usize,
}

impl Tally {
    fn mean(&self) -> OutcomeMean {
        OutcomeMean {
            mean: self.total / self.count as f64,
            responses: self.count,
        }
    }
}

pub(crate) fn compute(
    responses: &[SurveyResponse],
    department_id: &DepartmentId,
    period: &AcademicPeriod,
    scale: SurveyScale,
) -> Result<IndirectAttainment, DataError> {
    let mut po: BTreeMap<PoId, Tally> = BTreeMap::new();
    let mut pso: BTreeMap<PsoId, Tally> = BTreeMap::new();

    for response in responses
        .iter()
        .filter(|response| &response.department_id == department_id && &response.period == period)
    {
        if !scale.contains(response.response_level) {
            return Err(DataError::ResponseOutOfScale {
                outcome: response.outcome.clone(),
                level: response.response_level,
                min: scale.min(),
                max: scale.max(),
            });
        }

        let tally = match &response.outcome {
            OutcomeRef::Po(id) => po.entry(id.clone()).or_default(),
            OutcomeRef::Pso(id) => pso.entry(id.clone()).or_default(),
        };
        tally.total += scale.normalize(response.response_level);
        tally.count += 1;
    }

    debug!(
        department = %department_id,
        pos = po.len(),
        psos = pso.len(),
        "aggregated indirect survey responses"
    );

    Ok(IndirectAttainment {
        po: po.into_iter().map(|(id, tally)| (id, tally.mean())).collect(),
        pso: pso.into_iter().map(|(id, tally)| (id, tally.mean())).collect(),
    })
}
