use super::super::domain::{
    Employee, Issue, IssueKind, ModuleKind, ModuleResult, ModuleStatus, Severity,
};
use super::super::normalizer::InvalidRecord;
use super::super::stats;
use super::{plural, ModuleError, RuleContext, RuleEvaluator};
use serde::Serialize;
use std::collections::BTreeMap;

const INTEGRITY_PENALTY: f64 = 5.0;
const ANOMALY_PENALTY: f64 = 5.0;
const ANOMALY_SCORE_FLOOR: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryAnomaly {
    pub id: String,
    pub name: String,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub deviation_percentage: f64,
    pub direction: Direction,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataIntegrityIssue {
    pub field: String,
    pub affected_count: usize,
    pub impact: String,
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyFindings {
    pub mean_salary: f64,
    pub deviation_threshold: f64,
    pub anomalies: Vec<SalaryAnomaly>,
    pub data_quality_score: f64,
    pub data_integrity_issues: Vec<DataIntegrityIssue>,
    pub issues: Vec<Issue>,
}

pub struct AnomalyEvaluator;

impl RuleEvaluator for AnomalyEvaluator {
    type Findings = AnomalyFindings;

    const MODULE: ModuleKind = ModuleKind::Anomalies;

    /// Never returns an error: an empty roster is simply anomaly-free.
    fn evaluate(
        &self,
        context: &RuleContext<'_>,
    ) -> Result<ModuleResult<AnomalyFindings>, ModuleError> {
        let policy = context.policy;
        let mut status = ModuleStatus::full();

        let mean_salary = stats::mean(&context.salaries());
        let anomalies: Vec<SalaryAnomaly> = context
            .employees
            .iter()
            .filter_map(|employee| detect(employee, mean_salary, policy.anomaly_deviation))
            .collect();

        let data_integrity_issues = integrity_issues(context);
        let data_quality_score = (policy.data_quality_baseline
            - INTEGRITY_PENALTY * data_integrity_issues.len() as f64)
            .clamp(0.0, 100.0);

        if context.employees.is_empty() {
            status.reduce("no valid employee records; outlier detection skipped");
        }

        let mut issues = Vec::new();
        if !anomalies.is_empty() {
            issues.push(Issue::new(
                IssueKind::SalaryOutlier,
                Severity::Medium,
                anomalies.len(),
                format!(
                    "{} salar{} deviate more than {:.0}% from the mean of {:.0}",
                    anomalies.len(),
                    if anomalies.len() == 1 { "y" } else { "ies" },
                    policy.anomaly_deviation * 100.0,
                    mean_salary
                ),
            ));
        }
        for integrity in &data_integrity_issues {
            issues.push(Issue::new(
                IssueKind::DataIntegrity,
                Severity::Low,
                integrity.affected_count,
                format!(
                    "{}: {} record{} affected",
                    integrity.field,
                    integrity.affected_count,
                    plural(integrity.affected_count)
                ),
            ));
        }

        let anomaly_score =
            (100.0 - ANOMALY_PENALTY * anomalies.len() as f64).max(ANOMALY_SCORE_FLOOR);
        let score = (anomaly_score + data_quality_score) / 2.0;

        let findings = AnomalyFindings {
            mean_salary,
            deviation_threshold: policy.anomaly_deviation,
            anomalies,
            data_quality_score,
            data_integrity_issues,
            issues,
        };

        Ok(ModuleResult::new(Self::MODULE, score, status, findings))
    }
}

fn detect(employee: &Employee, mean_salary: f64, threshold: f64) -> Option<SalaryAnomaly> {
    if mean_salary <= 0.0 {
        return None;
    }
    let deviation = employee.salary - mean_salary;
    let relative = deviation.abs() / mean_salary;
    if relative <= threshold {
        return None;
    }

    Some(SalaryAnomaly {
        id: employee.id.clone(),
        name: employee.name.clone(),
        department: employee.department.clone(),
        position: employee.position.clone(),
        salary: employee.salary,
        deviation_percentage: relative * 100.0,
        direction: if deviation > 0.0 {
            Direction::Above
        } else {
            Direction::Below
        },
        severity: if relative > 1.0 {
            Severity::High
        } else {
            Severity::Medium
        },
    })
}

fn integrity_issues(context: &RuleContext<'_>) -> Vec<DataIntegrityIssue> {
    let mut issues = Vec::new();

    let mut rejected: BTreeMap<&'static str, usize> = BTreeMap::new();
    for excluded in context.excluded {
        *rejected.entry(rejected_field(excluded.reason)).or_default() += 1;
    }
    for (field, affected_count) in rejected {
        issues.push(DataIntegrityIssue {
            field: field.to_string(),
            affected_count,
            impact: "records excluded from every statistic".to_string(),
            resolution: format!("supply a valid {field} and re-run the diagnosis"),
        });
    }

    let missing = |predicate: fn(&Employee) -> bool| {
        context
            .employees
            .iter()
            .filter(|employee| predicate(employee))
            .count()
    };
    let optional_fields: [(&str, usize, &str); 4] = [
        (
            "gender",
            missing(|employee| employee.gender.is_none()),
            "gender pay gap analysis covers fewer employees",
        ),
        (
            "company_tenure",
            missing(|employee| employee.company_tenure.is_none()),
            "tenure-based retention signals are incomplete",
        ),
        (
            "age",
            missing(|employee| employee.age.is_none()),
            "demographic breakdowns are incomplete",
        ),
        (
            "education",
            missing(|employee| employee.education.is_none()),
            "qualification-based pay comparisons are unavailable",
        ),
    ];
    for (field, affected_count, impact) in optional_fields {
        if affected_count > 0 {
            issues.push(DataIntegrityIssue {
                field: field.to_string(),
                affected_count,
                impact: impact.to_string(),
                resolution: format!("fill in {field} in the source roster"),
            });
        }
    }

    issues
}

fn rejected_field(reason: InvalidRecord) -> &'static str {
    match reason {
        InvalidRecord::NonPositiveSalary => "salary",
        InvalidRecord::MissingExperience | InvalidRecord::InvalidExperience => "experience",
        InvalidRecord::MissingPerformance | InvalidRecord::InvalidPerformance => "performance",
    }
}
