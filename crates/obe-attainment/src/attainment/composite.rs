use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::MissingIndirect;
use super::direct::CloAttainment;
use super::domain::{AcademicPeriod, Clo, CloId, CourseId, OutcomeRef, PoId, PsoId};
use super::indirect::IndirectAttainment;
use super::policy::{blend, weighted_mean};

/// Final PO/PSO attainment for a course together with the intermediate stage results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAttainment {
    pub course_id: CourseId,
    pub period: AcademicPeriod,
    pub direct: Vec<CloAttainment>,
    pub indirect: IndirectAttainment,
    pub final_po: BTreeMap<PoId, OutcomeScore>,
    pub final_pso: BTreeMap<PsoId, OutcomeScore>,
}

impl FinalAttainment {
    pub fn score(&self, outcome: &OutcomeRef) -> Option<f64> {
        match outcome {
            OutcomeRef::Po(id) => self.final_po.get(id).map(|score| score.score),
            OutcomeRef::Pso(id) => self.final_pso.get(id).map(|score| score.score),
        }
    }
}

/// Blended score for one outcome. `indirect` is `None` when the outcome was never surveyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeScore {
    pub direct: f64,
    pub indirect: Option<f64>,
    pub score: f64,
}

/// Correlation-weighted running sum for one outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct OutcomeAccumulator {
    total: f64,
    weight: f64,
}

impl OutcomeAccumulator {
    fn add(&mut self, attainment: f64, weight: f64) {
        self.total += attainment * weight;
        self.weight += weight;
    }

    fn direct_component(&self) -> f64 {
        weighted_mean(self.total, self.weight)
    }
}

pub(crate) struct ResolvedOutcomes {
    pub(crate) po: BTreeMap<PoId, OutcomeScore>,
    pub(crate) pso: BTreeMap<PsoId, OutcomeScore>,
}

/// Propagate CLO attainment to each PO/PSO through its correlation weights and blend in the
/// indirect level. Correlation 0 mappings carry no weight, so an outcome reached only through
/// them has no direct component and is left out of the result rather than scored as 0.
pub(crate) fn resolve(
    clos: &[Clo],
    direct: &[CloAttainment],
    indirect: &IndirectAttainment,
    missing: MissingIndirect,
) -> ResolvedOutcomes {
    let attainment_by_clo: HashMap<&CloId, f64> = direct
        .iter()
        .map(|entry| (&entry.clo_id, entry.attainment))
        .collect();

    let mut po: BTreeMap<PoId, OutcomeAccumulator> = BTreeMap::new();
    let mut pso: BTreeMap<PsoId, OutcomeAccumulator> = BTreeMap::new();

    for clo in clos {
        let Some(&attainment) = attainment_by_clo.get(&clo.id) else {
            continue;
        };

        let mut mapped = 0;
        for mapping in clo
            .outcomes
            .iter()
            .filter(|mapping| mapping.correlation.contributes())
        {
            let accumulator = match &mapping.outcome {
                OutcomeRef::Po(id) => po.entry(id.clone()).or_default(),
                OutcomeRef::Pso(id) => pso.entry(id.clone()).or_default(),
            };
            accumulator.add(attainment, mapping.correlation.weight());
            mapped += 1;
        }

        if mapped == 0 {
            warn!(clo = %clo.id, code = %clo.code, "CLO is not mapped to any PO or PSO");
        }
    }

    let finish = |outcome: OutcomeRef, accumulator: OutcomeAccumulator| {
        let direct = accumulator.direct_component();
        let indirect = indirect.level(&outcome);
        let score = blend(direct, indirect, missing);
        debug!(%outcome, direct, ?indirect, score, "resolved outcome attainment");
        OutcomeScore {
            direct,
            indirect,
            score,
        }
    };

    ResolvedOutcomes {
        po: po
            .into_iter()
            .map(|(id, accumulator)| {
                let value = finish(OutcomeRef::Po(id.clone()), accumulator);
                (id, value)
            })
            .collect(),
        pso: pso
            .into_iter()
            .map(|(id, accumulator)| {
                let value = finish(OutcomeRef::Pso(id.clone()), accumulator);
                (id, value)
            })
            .collect(),
    }
}
