use super::super::aggregate::GroupAggregator;
use super::super::domain::{Issue, IssueKind, ModuleKind, ModuleResult, ModuleStatus, Severity};
use super::super::stats;
use super::{ModuleError, RuleContext, RuleEvaluator};
use serde::Serialize;

/// Industry fixed-pay share used when the policy carries no benchmark.
pub const FALLBACK_FIXED_RATIO: f64 = 0.7;

const ADJUSTMENT_PENALTY: f64 = 10.0;
const ADJUSTMENT_PENALTY_CAP: f64 = 40.0;
const WEAK_INCENTIVE_PENALTY: f64 = 15.0;
const EFFECTIVE_CORRELATION: f64 = 0.5;
const MODERATE_CORRELATION: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MixStatus {
    Optimal,
    NeedsAdjustment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPayMix {
    pub category: String,
    pub headcount: usize,
    pub fixed_ratio: f64,
    pub variable_ratio: f64,
    pub benchmark_fixed_ratio: f64,
    pub benchmark_is_fallback: bool,
    pub deviation: f64,
    pub status: MixStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncentiveRating {
    Effective,
    Moderate,
    Weak,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncentiveEffectiveness {
    pub participants: usize,
    pub correlation: f64,
    pub rating: IncentiveRating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureFindings {
    pub categories: Vec<CategoryPayMix>,
    pub company_fixed_ratio: f64,
    pub incentive: IncentiveEffectiveness,
    pub issues: Vec<Issue>,
}

pub struct StructureEvaluator;

impl RuleEvaluator for StructureEvaluator {
    type Findings = StructureFindings;

    const MODULE: ModuleKind = ModuleKind::Structure;

    fn evaluate(
        &self,
        context: &RuleContext<'_>,
    ) -> Result<ModuleResult<StructureFindings>, ModuleError> {
        let employees = context.require_employees()?;
        let policy = context.policy;
        let mut status = ModuleStatus::full();
        let mut fallback_categories = Vec::new();

        let categories: Vec<CategoryPayMix> =
            GroupAggregator::group_by(employees, |employee| employee.position.clone())
                .into_iter()
                .map(|(category, members)| {
                    let base: f64 = members.iter().map(|employee| employee.annual_base()).sum();
                    let total: f64 = members
                        .iter()
                        .map(|employee| employee.annual_total_compensation)
                        .sum();
                    let fixed_ratio = fixed_share(base, total);

                    let (benchmark_fixed_ratio, benchmark_is_fallback) =
                        match policy.pay_mix_benchmark(&category) {
                            Some(ratio) => (ratio, false),
                            None => (
                                policy.default_fixed_ratio.unwrap_or(FALLBACK_FIXED_RATIO),
                                true,
                            ),
                        };
                    if benchmark_is_fallback {
                        fallback_categories.push(category.clone());
                    }

                    let deviation = fixed_ratio - benchmark_fixed_ratio;
                    let mix_status = if deviation.abs() > policy.pay_mix_tolerance {
                        MixStatus::NeedsAdjustment
                    } else {
                        MixStatus::Optimal
                    };

                    CategoryPayMix {
                        category,
                        headcount: members.len(),
                        fixed_ratio,
                        variable_ratio: 1.0 - fixed_ratio,
                        benchmark_fixed_ratio,
                        benchmark_is_fallback,
                        deviation,
                        status: mix_status,
                    }
                })
                .collect();

        if !fallback_categories.is_empty() && policy.default_fixed_ratio.is_none() {
            status.reduce(format!(
                "industry pay-mix benchmark missing for {}; using {:.0}% fixed",
                fallback_categories.join(", "),
                FALLBACK_FIXED_RATIO * 100.0
            ));
        }

        let company_base: f64 = employees.iter().map(|employee| employee.annual_base()).sum();
        let company_total: f64 = employees
            .iter()
            .map(|employee| employee.annual_total_compensation)
            .sum();

        let incentive = incentive_effectiveness(context)?;
        if incentive.rating == IncentiveRating::InsufficientData {
            status.reduce(if incentive.participants == 0 {
                "no variable pay recorded; incentive effectiveness not assessed"
            } else {
                "variable pay or performance does not vary; incentive effectiveness not assessed"
            });
        }

        let mut issues = Vec::new();
        let needs_adjustment: Vec<&CategoryPayMix> = categories
            .iter()
            .filter(|category| category.status == MixStatus::NeedsAdjustment)
            .collect();
        for category in &needs_adjustment {
            issues.push(Issue::new(
                IssueKind::PayMixDeviation,
                Severity::Low,
                category.headcount,
                format!(
                    "{} fixed pay share {:.0}% vs benchmark {:.0}%",
                    category.category,
                    category.fixed_ratio * 100.0,
                    category.benchmark_fixed_ratio * 100.0
                ),
            ));
        }
        if incentive.rating == IncentiveRating::Weak {
            issues.push(Issue::new(
                IssueKind::WeakIncentive,
                Severity::Medium,
                incentive.participants,
                format!(
                    "variable pay barely tracks performance (correlation {:.2})",
                    incentive.correlation
                ),
            ));
        }

        let mut score = 100.0;
        score -= (needs_adjustment.len() as f64 * ADJUSTMENT_PENALTY).min(ADJUSTMENT_PENALTY_CAP);
        if incentive.rating == IncentiveRating::Weak {
            score -= WEAK_INCENTIVE_PENALTY;
        }

        let findings = StructureFindings {
            categories,
            company_fixed_ratio: fixed_share(company_base, company_total),
            incentive,
            issues,
        };

        Ok(ModuleResult::new(Self::MODULE, score, status, findings))
    }
}

fn fixed_share(base: f64, total: f64) -> f64 {
    if total > 0.0 {
        (base / total).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn incentive_effectiveness(context: &RuleContext<'_>) -> Result<IncentiveEffectiveness, ModuleError> {
    let participants = context
        .employees
        .iter()
        .filter(|employee| employee.variable_pay() > 0.0)
        .count();

    if participants == 0 {
        return Ok(IncentiveEffectiveness {
            participants,
            correlation: 0.0,
            rating: IncentiveRating::InsufficientData,
        });
    }

    let variable: Vec<f64> = context
        .employees
        .iter()
        .map(|employee| employee.variable_pay())
        .collect();
    let performance: Vec<f64> = context
        .employees
        .iter()
        .map(|employee| employee.performance)
        .collect();
    let correlation = stats::correlation(&variable, &performance)?;
    if correlation.insufficient_data {
        return Ok(IncentiveEffectiveness {
            participants,
            correlation: 0.0,
            rating: IncentiveRating::InsufficientData,
        });
    }

    let correlation = correlation.coefficient;
    let rating = if correlation >= EFFECTIVE_CORRELATION {
        IncentiveRating::Effective
    } else if correlation >= MODERATE_CORRELATION {
        IncentiveRating::Moderate
    } else {
        IncentiveRating::Weak
    };

    Ok(IncentiveEffectiveness {
        participants,
        correlation,
        rating,
    })
}
