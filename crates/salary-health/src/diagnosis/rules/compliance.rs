use super::super::domain::{
    AffectedEmployee, Issue, IssueKind, ModuleKind, ModuleResult, ModuleStatus, Severity,
};
use super::{percentage, plural, ModuleError, RuleContext, RuleEvaluator};
use serde::Serialize;

const COMPLIANT_SCORE: f64 = 95.0;
const VIOLATION_PENALTY: f64 = 10.0;
const SCORE_FLOOR: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Urgent,
    Important,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimumWageCompliance {
    pub threshold: f64,
    pub count: usize,
    pub percentage: f64,
    /// `current` is the monthly salary, `suggested` the minimum wage.
    pub violations: Vec<AffectedEmployee>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceRecommendation {
    pub urgency: Urgency,
    pub title: String,
    pub description: String,
    pub affected_count: usize,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceFindings {
    pub minimum_wage: MinimumWageCompliance,
    pub buffer_line: f64,
    pub near_threshold: Vec<AffectedEmployee>,
    pub risks: Vec<Issue>,
    pub recommendations: Vec<ComplianceRecommendation>,
}

impl ComplianceFindings {
    pub fn annual_remediation_cost(&self) -> f64 {
        self.minimum_wage
            .violations
            .iter()
            .map(|violation| violation.shortfall() * 12.0)
            .sum()
    }
}

pub struct ComplianceEvaluator;

impl RuleEvaluator for ComplianceEvaluator {
    type Findings = ComplianceFindings;

    const MODULE: ModuleKind = ModuleKind::Compliance;

    fn evaluate(
        &self,
        context: &RuleContext<'_>,
    ) -> Result<ModuleResult<ComplianceFindings>, ModuleError> {
        let employees = context.require_employees()?;
        let minimum_wage = context.policy.minimum_wage;
        let buffer_line = minimum_wage * (1.0 + context.policy.minimum_wage_buffer);

        let violations: Vec<AffectedEmployee> = employees
            .iter()
            .filter(|employee| employee.salary < minimum_wage)
            .map(|employee| AffectedEmployee::new(employee, employee.salary, minimum_wage))
            .collect();

        let near_threshold: Vec<AffectedEmployee> = employees
            .iter()
            .filter(|employee| employee.salary >= minimum_wage && employee.salary < buffer_line)
            .map(|employee| AffectedEmployee::new(employee, employee.salary, buffer_line))
            .collect();

        let count = violations.len();
        let overall_score = if count == 0 {
            COMPLIANT_SCORE
        } else {
            (COMPLIANT_SCORE - count as f64 * VIOLATION_PENALTY).max(SCORE_FLOOR)
        };

        let mut risks = Vec::new();
        if count > 0 {
            risks.push(
                Issue::new(
                    IssueKind::MinimumWageViolation,
                    Severity::High,
                    count,
                    format!(
                        "{count} employee{} paid below the minimum wage of {minimum_wage:.0}",
                        plural(count)
                    ),
                )
                .with_employees(violations.clone()),
            );
        } else {
            risks.push(Issue::new(
                IssueKind::MinimumWageViolation,
                Severity::Low,
                0,
                format!("all base salaries meet the minimum wage of {minimum_wage:.0}"),
            ));
        }

        if !near_threshold.is_empty() {
            risks.push(
                Issue::new(
                    IssueKind::MinimumWageBuffer,
                    Severity::Medium,
                    near_threshold.len(),
                    format!(
                        "{} employee{} within {:.0}% of the minimum wage",
                        near_threshold.len(),
                        plural(near_threshold.len()),
                        context.policy.minimum_wage_buffer * 100.0
                    ),
                )
                .with_employees(near_threshold.clone()),
            );
        }

        let mut recommendations = Vec::new();
        if count > 0 {
            let estimated_cost = violations
                .iter()
                .map(|violation| violation.shortfall() * 12.0)
                .sum();
            recommendations.push(ComplianceRecommendation {
                urgency: Urgency::Urgent,
                title: "Raise salaries to the statutory minimum".to_string(),
                description: format!(
                    "Lift {count} base salar{} to at least {minimum_wage:.0} per month and back-pay the difference",
                    if count == 1 { "y" } else { "ies" }
                ),
                affected_count: count,
                estimated_cost,
            });
        }

        if !near_threshold.is_empty() {
            let estimated_cost = near_threshold
                .iter()
                .map(|employee| employee.shortfall() * 12.0)
                .sum();
            recommendations.push(ComplianceRecommendation {
                urgency: Urgency::Important,
                title: "Build headroom above the minimum wage".to_string(),
                description: format!(
                    "Move near-threshold salaries to {buffer_line:.0} so the next statutory increase does not create violations"
                ),
                affected_count: near_threshold.len(),
                estimated_cost,
            });
        }

        let findings = ComplianceFindings {
            minimum_wage: MinimumWageCompliance {
                threshold: minimum_wage,
                count,
                percentage: percentage(count, employees.len()),
                violations,
            },
            buffer_line,
            near_threshold,
            risks,
            recommendations,
        };

        Ok(ModuleResult::new(
            Self::MODULE,
            overall_score,
            ModuleStatus::full(),
            findings,
        ))
    }
}
