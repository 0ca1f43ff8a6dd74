use super::common::*;
use crate::diagnosis::{
    compose, Confidence, DiagnosticPolicy, InvalidRecord, IssueKind, ModuleKind, Severity,
};

#[test]
fn workforce_statistics_summarize_valid_records() {
    let policy = DiagnosticPolicy::default();
    let records = vec![
        record("E001", "Analyst", 10_000.0, 2.0),
        record("E002", "Analyst", 15_000.0, 3.0),
        in_department(record("E003", "Rep", 20_000.0, 4.0), "Sales"),
    ];
    let stats = compose(&records, &policy).statistics;

    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.analyzed_records, 3);
    assert_close(stats.average_salary, 15_000.0);
    assert_close(stats.median_salary, 15_000.0);
    assert_close(stats.min_salary, 10_000.0);
    assert_close(stats.max_salary, 20_000.0);
    assert_close(stats.total_annual_payroll, 45_000.0 * 12.0);
    assert_close(stats.performance_salary_correlation, 1.0);
    assert!(!stats.insufficient_data);
    assert!(!stats.correlation_insufficient_data);

    let departments: Vec<&str> = stats
        .departments
        .iter()
        .map(|group| group.group_key.as_str())
        .collect();
    assert_eq!(departments, ["Engineering", "Sales"]);
}

#[test]
fn invalid_records_are_excluded_and_reported() {
    let policy = DiagnosticPolicy::default();
    let mut missing_performance = record("E003", "Analyst", 12_000.0, 3.0);
    missing_performance.performance = None;
    let records = vec![
        record("E001", "Analyst", 12_000.0, 3.0),
        record("E002", "Analyst", 0.0, 3.0),
        missing_performance,
    ];

    let result = compose(&records, &policy);

    assert_eq!(result.statistics.total_records, 3);
    assert_eq!(result.statistics.analyzed_records, 1);
    let reasons: Vec<InvalidRecord> = result
        .statistics
        .excluded_records
        .iter()
        .map(|excluded| excluded.reason)
        .collect();
    assert_eq!(
        reasons,
        [InvalidRecord::NonPositiveSalary, InvalidRecord::MissingPerformance]
    );

    let anomalies = result.anomalies.findings.as_ref().expect("anomalies run");
    assert!(anomalies
        .issues
        .iter()
        .any(|issue| issue.kind == IssueKind::DataIntegrity));
}

#[test]
fn uniform_high_performers_are_clean() {
    let policy = DiagnosticPolicy::default();
    let result = compose(&uniform_team(5, 20_000.0, 4.0), &policy);

    assert_close(result.statistics.salary_coefficient_of_variation, 0.0);
    let fairness = result.fairness.findings.as_ref().expect("fairness runs");
    assert_eq!(fairness.adjustments().count(), 0);
    let anomalies = result.anomalies.findings.as_ref().expect("anomalies run");
    assert!(anomalies.anomalies.is_empty());
}

#[test]
fn empty_batch_still_produces_a_report() {
    let policy = DiagnosticPolicy::default();
    let result = compose(&[], &policy);

    assert_eq!(result.health_score.score, 85);
    assert_eq!(result.statistics.total_records, 0);
    assert!(result.statistics.insufficient_data);
    assert_eq!(result.compliance.overall_score, 0);
    assert_eq!(result.compliance.status.confidence, Confidence::Unavailable);
    assert!(result.compliance.findings.is_none());
    assert!(result.anomalies.is_available());
}

#[test]
fn module_scores_follow_presentation_order() {
    let policy = DiagnosticPolicy::default();
    let result = compose(&uniform_team(3, 15_000.0, 3.0), &policy);

    let scores = result.module_scores();
    let modules: Vec<ModuleKind> = scores.iter().map(|view| view.module).collect();
    assert_eq!(modules, ModuleKind::ordered());
    assert!(scores.iter().all(|view| view.score <= 100));
}

#[test]
fn issues_are_listed_most_severe_first() {
    let policy = DiagnosticPolicy::default();
    let mut records = uniform_team(4, 10_000.0, 3.0);
    records.push(record("E005", "Engineer", 1000.0, 5.0));

    let result = compose(&records, &policy);
    let issues = result.issues();

    assert!(!issues.is_empty());
    for pair in issues.windows(2) {
        assert!(pair[0].issue.severity >= pair[1].issue.severity);
    }
    assert!(result.has_severity(Severity::High));
}

#[test]
fn identical_input_yields_identical_report() {
    let policy = DiagnosticPolicy::default();
    let mut records = uniform_team(4, 10_000.0, 3.0);
    records.push(record("E005", "Engineer", 100_000.0, 4.5));

    let first = serde_json::to_value(compose(&records, &policy)).expect("serializes");
    let second = serde_json::to_value(compose(&records, &policy)).expect("serializes");
    assert_eq!(first, second);
}
