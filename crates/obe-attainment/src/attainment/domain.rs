use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::PolicyViolation;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier wrapper for courses.
    CourseId
);
string_id!(
    /// Identifier wrapper for course learning outcomes.
    CloId
);
string_id!(
    /// Identifier wrapper for assessments (tests, assignments, projects).
    AssessmentId
);
string_id!(
    /// Identifier wrapper for programme outcomes.
    PoId
);
string_id!(
    /// Identifier wrapper for programme-specific outcomes.
    PsoId
);
string_id!(DepartmentId);

/// Academic year and semester scoping a computation run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AcademicPeriod {
    pub academic_year: String,
    pub semester: u8,
}

impl AcademicPeriod {
    pub fn new(academic_year: impl Into<String>, semester: u8) -> Self {
        Self {
            academic_year: academic_year.into(),
            semester,
        }
    }
}

impl fmt::Display for AcademicPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} semester {}", self.academic_year, self.semester)
    }
}

/// Course owning a set of CLOs and the pass threshold used for banding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub department_id: DepartmentId,
    /// Minimum percentage of a cohort that must pass for an assessment to count as attained.
    pub threshold: f64,
}

/// Course learning outcome together with its assessment and outcome mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clo {
    pub id: CloId,
    pub course_id: CourseId,
    pub code: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub assessments: Vec<AssessmentMapping>,
    #[serde(default)]
    pub outcomes: Vec<OutcomeMapping>,
}

fn default_active() -> bool {
    true
}

/// Relative contribution of an assessment towards a CLO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMapping {
    pub assessment_id: AssessmentId,
    pub weightage: f64,
}

/// Programme level outcome a CLO can map onto. POs and PSOs live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeRef {
    Po(PoId),
    Pso(PsoId),
}

impl fmt::Display for OutcomeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeRef::Po(id) => write!(f, "PO {id}"),
            OutcomeRef::Pso(id) => write!(f, "PSO {id}"),
        }
    }
}

/// Weighted CLO to PO/PSO articulation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMapping {
    pub outcome: OutcomeRef,
    pub correlation: Correlation,
}

/// Strength of a CLO to PO/PSO articulation, restricted to 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Correlation(u8);

impl Correlation {
    pub const NONE: Correlation = Correlation(0);
    pub const LOW: Correlation = Correlation(1);
    pub const MODERATE: Correlation = Correlation(2);
    pub const STRONG: Correlation = Correlation(3);

    pub fn new(value: u8) -> Result<Self, PolicyViolation> {
        if value > 3 {
            return Err(PolicyViolation::CorrelationOutOfRange(i64::from(value)));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn weight(self) -> f64 {
        f64::from(self.0)
    }

    pub fn contributes(self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<u8> for Correlation {
    type Error = PolicyViolation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Correlation {
    type Error = PolicyViolation;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| PolicyViolation::CorrelationOutOfRange(value))
            .and_then(Self::new)
    }
}

impl From<Correlation> for u8 {
    fn from(value: Correlation) -> Self {
        value.0
    }
}

/// Cohort counts for a (CLO, assessment, period) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttainmentRecord {
    pub clo_id: CloId,
    pub assessment_id: AssessmentId,
    pub period: AcademicPeriod,
    pub attained_count: u32,
    pub student_count: u32,
}

/// Indirect survey answer recorded against exactly one PO or PSO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub outcome: OutcomeRef,
    pub department_id: DepartmentId,
    pub period: AcademicPeriod,
    pub response_level: u8,
}

/// Discrete attainment band assigned to a single CLO-assessment pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttainmentLevel {
    NotAttained,
    Low,
    Medium,
    High,
}

impl AttainmentLevel {
    pub fn ordered() -> [AttainmentLevel; 4] {
        [
            AttainmentLevel::NotAttained,
            AttainmentLevel::Low,
            AttainmentLevel::Medium,
            AttainmentLevel::High,
        ]
    }

    pub fn value(self) -> u8 {
        match self {
            AttainmentLevel::NotAttained => 0,
            AttainmentLevel::Low => 1,
            AttainmentLevel::Medium => 2,
            AttainmentLevel::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttainmentLevel::NotAttained => "not attained",
            AttainmentLevel::Low => "low",
            AttainmentLevel::Medium => "medium",
            AttainmentLevel::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_rejects_values_above_three() {
        assert!(Correlation::new(3).is_ok());
        match Correlation::new(4) {
            Err(PolicyViolation::CorrelationOutOfRange(4)) => {}
            other => panic!("expected out of range violation, got {other:?}"),
        }
        assert!(Correlation::try_from(-1_i64).is_err());
    }

    #[test]
    fn correlation_deserialization_validates_range() {
        let ok: Correlation = serde_json::from_str("2").expect("valid correlation");
        assert_eq!(ok, Correlation::MODERATE);
        assert!(serde_json::from_str::<Correlation>("5").is_err());
    }

    #[test]
    fn outcome_refs_keep_po_and_pso_apart() {
        let po = OutcomeRef::Po(PoId::new("1"));
        let pso = OutcomeRef::Pso(PsoId::new("1"));
        assert_ne!(po, pso);

        let json = serde_json::to_string(&pso).expect("serializes");
        assert_eq!(json, r#"{"pso":"1"}"#);
    }

    #[test]
    fn levels_expose_numeric_values() {
        let values: Vec<u8> = AttainmentLevel::ordered()
            .into_iter()
            .map(AttainmentLevel::value)
            .collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
        assert_eq!(AttainmentLevel::High.label(), "high");
    }
}
