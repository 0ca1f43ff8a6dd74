use super::aggregate::GroupAggregator;
use super::domain::clamp_score;
use super::rules::{gender_pay_gap, RuleContext};
use super::stats;
use serde::Serialize;

const BASELINE: f64 = 85.0;
const GENDER_GAP_PENALTY: i16 = 10;
const DEPARTMENT_GAP_PENALTY: i16 = 8;
const PERFORMANCE_MISMATCH_PENALTY: i16 = 15;
const BELOW_MARKET_PENALTY: i16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    GenderPayGap,
    DepartmentPayGap,
    PerformancePayMismatch,
    BelowMarket,
}

/// One deduction from the baseline, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthPenalty {
    pub kind: PenaltyKind,
    pub points: i16,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthScore {
    pub score: u8,
    pub baseline: u8,
    pub penalties: Vec<HealthPenalty>,
}

/// Composite score from cross-cutting conditions; independent of module scores.
pub struct HealthScorer;

impl HealthScorer {
    pub fn score(context: &RuleContext<'_>) -> HealthScore {
        let policy = context.policy;
        let employees = context.employees;
        let mut penalties = Vec::new();

        let gap = gender_pay_gap(employees, policy.gender_gap_threshold);
        if gap.is_warning() {
            penalties.push(HealthPenalty {
                kind: PenaltyKind::GenderPayGap,
                points: GENDER_GAP_PENALTY,
                notes: format!("gender pay gap {:.1}%", gap.gap_percentage),
            });
        }

        let departments = GroupAggregator::by_department(employees);
        if departments.len() >= 2 {
            let highest = departments
                .iter()
                .map(|stat| stat.average)
                .fold(f64::NEG_INFINITY, f64::max);
            let lowest = departments
                .iter()
                .map(|stat| stat.average)
                .fold(f64::INFINITY, f64::min);
            if highest > 0.0 && (highest - lowest) / highest > policy.department_gap_threshold {
                penalties.push(HealthPenalty {
                    kind: PenaltyKind::DepartmentPayGap,
                    points: DEPARTMENT_GAP_PENALTY,
                    notes: format!(
                        "department averages range from {:.0} to {:.0}",
                        lowest, highest
                    ),
                });
            }
        }

        if !employees.is_empty() {
            let correlation = context
                .performance_salary_correlation()
                .map_or(0.0, |correlation| correlation.coefficient);
            if correlation < policy.performance_correlation_floor {
                penalties.push(HealthPenalty {
                    kind: PenaltyKind::PerformancePayMismatch,
                    points: PERFORMANCE_MISMATCH_PENALTY,
                    notes: format!("performance-salary correlation {:.2}", correlation),
                });
            }
        }

        if let Some(market_average) = policy.market_average_salary {
            let average = stats::mean(&context.salaries());
            if !employees.is_empty() && average < market_average * policy.market_salary_floor {
                penalties.push(HealthPenalty {
                    kind: PenaltyKind::BelowMarket,
                    points: BELOW_MARKET_PENALTY,
                    notes: format!(
                        "average salary {:.0} is below {:.0}% of the market average {:.0}",
                        average,
                        policy.market_salary_floor * 100.0,
                        market_average
                    ),
                });
            }
        }

        let deducted: f64 = penalties.iter().map(|penalty| f64::from(penalty.points)).sum();

        HealthScore {
            score: clamp_score(BASELINE - deducted),
            baseline: BASELINE as u8,
            penalties,
        }
    }
}
