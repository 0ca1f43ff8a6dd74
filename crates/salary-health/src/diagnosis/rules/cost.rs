use super::super::aggregate::GroupAggregator;
use super::super::domain::{Issue, IssueKind, ModuleKind, ModuleResult, ModuleStatus, Severity};
use super::super::stats;
use super::{ModuleError, RuleContext, RuleEvaluator};
use serde::Serialize;

const UNCONFIGURED_SCORE: f64 = 70.0;
const EFFICIENT_THRESHOLD: f64 = 1.5;
const ACCEPTABLE_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyRating {
    Efficient,
    Acceptable,
    NeedsImprovement,
}

impl EfficiencyRating {
    pub fn classify(efficiency: f64) -> Self {
        if efficiency >= EFFICIENT_THRESHOLD {
            Self::Efficient
        } else if efficiency >= ACCEPTABLE_THRESHOLD {
            Self::Acceptable
        } else {
            Self::NeedsImprovement
        }
    }

    const fn score(self) -> f64 {
        match self {
            Self::Efficient => 100.0,
            Self::Acceptable => 75.0,
            Self::NeedsImprovement => 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCost {
    pub department: String,
    pub headcount: usize,
    pub total_annual_cost: f64,
    pub average_salary: f64,
    pub payroll_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentEfficiency {
    pub department: String,
    pub revenue_contribution: f64,
    pub cost_percentage: f64,
    pub efficiency: f64,
    pub rating: EfficiencyRating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivityComparison {
    pub category: String,
    pub headcount: usize,
    pub average_output: f64,
    pub average_annual_salary: f64,
    pub productivity_ratio: f64,
    pub benchmark_ratio: f64,
    pub above_benchmark: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEfficiencyFindings {
    pub total_annual_cost: f64,
    pub cost_structure: Vec<DepartmentCost>,
    pub departments: Vec<DepartmentEfficiency>,
    pub productivity: Vec<ProductivityComparison>,
    pub issues: Vec<Issue>,
}

pub struct CostEfficiencyEvaluator;

impl RuleEvaluator for CostEfficiencyEvaluator {
    type Findings = CostEfficiencyFindings;

    const MODULE: ModuleKind = ModuleKind::CostEfficiency;

    fn evaluate(
        &self,
        context: &RuleContext<'_>,
    ) -> Result<ModuleResult<CostEfficiencyFindings>, ModuleError> {
        let employees = context.require_employees()?;
        let policy = context.policy;
        let mut status = ModuleStatus::full();

        let total_annual_cost: f64 = employees
            .iter()
            .map(|employee| employee.annual_total_compensation)
            .sum();

        let by_department =
            GroupAggregator::group_by(employees, |employee| employee.department.clone());

        let mut cost_structure = Vec::new();
        let mut departments = Vec::new();
        let mut unconfigured = Vec::new();

        for (department, members) in &by_department {
            let department_cost: f64 = members
                .iter()
                .map(|employee| employee.annual_total_compensation)
                .sum();
            let salaries: Vec<f64> = members.iter().map(|employee| employee.salary).collect();
            let cost_percentage = if total_annual_cost > 0.0 {
                department_cost / total_annual_cost * 100.0
            } else {
                0.0
            };

            cost_structure.push(DepartmentCost {
                department: department.clone(),
                headcount: members.len(),
                total_annual_cost: department_cost,
                average_salary: stats::mean(&salaries),
                payroll_share: cost_percentage,
            });

            match policy.revenue_share(department) {
                Some(revenue_contribution) if cost_percentage > 0.0 => {
                    let efficiency = revenue_contribution / cost_percentage;
                    departments.push(DepartmentEfficiency {
                        department: department.clone(),
                        revenue_contribution,
                        cost_percentage,
                        efficiency,
                        rating: EfficiencyRating::classify(efficiency),
                    });
                }
                _ => unconfigured.push(department.clone()),
            }
        }

        if !unconfigured.is_empty() {
            status.reduce(format!(
                "revenue contribution not configured for {}",
                unconfigured.join(", ")
            ));
        }

        let mut productivity = Vec::new();
        for (category, members) in
            GroupAggregator::group_by(employees, |employee| employee.position.clone())
        {
            let Some(benchmark) = policy.productivity_benchmark(&category) else {
                continue;
            };

            let outputs: Vec<f64> = members.iter().filter_map(|employee| employee.output).collect();
            let average_output = if outputs.is_empty() {
                match benchmark.average_output {
                    Some(output) => output,
                    None => {
                        status.reduce(format!("no output figures available for {category}"));
                        continue;
                    }
                }
            } else {
                stats::mean(&outputs)
            };

            let annual: Vec<f64> = members.iter().map(|employee| employee.annual_base()).collect();
            let average_annual_salary = stats::mean(&annual);
            let productivity_ratio = if average_annual_salary > 0.0 {
                average_output / average_annual_salary
            } else {
                0.0
            };

            productivity.push(ProductivityComparison {
                category,
                headcount: members.len(),
                average_output,
                average_annual_salary,
                productivity_ratio,
                benchmark_ratio: benchmark.benchmark_ratio,
                above_benchmark: productivity_ratio >= benchmark.benchmark_ratio,
            });
        }

        let mut issues = Vec::new();
        for department in departments
            .iter()
            .filter(|department| department.rating == EfficiencyRating::NeedsImprovement)
        {
            let headcount = by_department
                .get(&department.department)
                .map(Vec::len)
                .unwrap_or(0);
            issues.push(Issue::new(
                IssueKind::CostInefficiency,
                Severity::Medium,
                headcount,
                format!(
                    "{} consumes {:.1}% of payroll for {:.1}% of revenue (efficiency {:.2})",
                    department.department,
                    department.cost_percentage,
                    department.revenue_contribution,
                    department.efficiency
                ),
            ));
        }
        for comparison in productivity.iter().filter(|entry| !entry.above_benchmark) {
            issues.push(Issue::new(
                IssueKind::CostInefficiency,
                Severity::Low,
                comparison.headcount,
                format!(
                    "{} productivity ratio {:.2} below benchmark {:.2}",
                    comparison.category, comparison.productivity_ratio, comparison.benchmark_ratio
                ),
            ));
        }

        let score = if departments.is_empty() {
            if productivity.is_empty() {
                status.reduce("no cost-efficiency benchmarks configured");
            }
            UNCONFIGURED_SCORE
        } else {
            departments
                .iter()
                .map(|department| department.rating.score())
                .sum::<f64>()
                / departments.len() as f64
        };

        let findings = CostEfficiencyFindings {
            total_annual_cost,
            cost_structure,
            departments,
            productivity,
            issues,
        };

        Ok(ModuleResult::new(Self::MODULE, score, status, findings))
    }
}
