//! Independent rule evaluators, one per diagnostic module.
//!
//! Evaluators only read the shared [`RuleContext`]; none depends on another's
//! output, so they can run in any order.

mod anomalies;
mod competitiveness;
mod compliance;
mod cost;
mod fairness;
mod structure;
mod talent;

pub use anomalies::{
    AnomalyEvaluator, AnomalyFindings, DataIntegrityIssue, Direction, SalaryAnomaly,
};
pub use competitiveness::{
    CompetitivenessEvaluator, CompetitivenessFindings, KeyPositionRisk, MarketPosition,
    PositionCompetitiveness,
};
pub use compliance::{
    ComplianceEvaluator, ComplianceFindings, ComplianceRecommendation, MinimumWageCompliance,
    Urgency,
};
pub use cost::{
    CostEfficiencyEvaluator, CostEfficiencyFindings, DepartmentCost, DepartmentEfficiency,
    EfficiencyRating, ProductivityComparison,
};
pub use fairness::{
    FairnessEvaluator, FairnessFindings, GapStatus, GenderPayGap, LevelRange, PositionFairness,
    SalaryBand, TenureSegment,
};
pub use structure::{
    CategoryPayMix, IncentiveEffectiveness, IncentiveRating, MixStatus, StructureEvaluator,
    StructureFindings,
};
pub use talent::{KeyTalentProfile, RetentionRisk, TalentEvaluator, TalentFindings};

pub(crate) use fairness::gender_pay_gap;

use super::domain::{Employee, ModuleKind, ModuleResult};
use super::normalizer::ExcludedRecord;
use super::policy::DiagnosticPolicy;
use super::stats::{Correlation, StatsError};

/// Failure that makes a single module unavailable without touching the others.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModuleError {
    #[error("no valid employee records to analyze")]
    NoEmployees,
    #[error("statistic could not be computed: {0}")]
    Statistics(#[from] StatsError),
}

/// Read-only inputs shared by every evaluator.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub employees: &'a [Employee],
    pub excluded: &'a [ExcludedRecord],
    pub policy: &'a DiagnosticPolicy,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        employees: &'a [Employee],
        excluded: &'a [ExcludedRecord],
        policy: &'a DiagnosticPolicy,
    ) -> Self {
        Self {
            employees,
            excluded,
            policy,
        }
    }

    pub(crate) fn require_employees(&self) -> Result<&'a [Employee], ModuleError> {
        if self.employees.is_empty() {
            Err(ModuleError::NoEmployees)
        } else {
            Ok(self.employees)
        }
    }

    pub(crate) fn salaries(&self) -> Vec<f64> {
        self.employees.iter().map(|employee| employee.salary).collect()
    }

    /// Correlation between performance score and base salary across all employees.
    pub(crate) fn performance_salary_correlation(&self) -> Result<Correlation, StatsError> {
        let performance: Vec<f64> = self
            .employees
            .iter()
            .map(|employee| employee.performance)
            .collect();
        super::stats::correlation(&performance, &self.salaries())
    }
}

pub trait RuleEvaluator {
    type Findings;

    const MODULE: ModuleKind;

    fn evaluate(&self, context: &RuleContext<'_>)
        -> Result<ModuleResult<Self::Findings>, ModuleError>;
}

pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
