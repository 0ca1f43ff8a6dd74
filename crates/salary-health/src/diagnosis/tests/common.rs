use crate::diagnosis::normalizer::{NormalizedBatch, RecordNormalizer};
use crate::diagnosis::rules::{ModuleError, RuleContext, RuleEvaluator};
use crate::diagnosis::{DiagnosticPolicy, EmployeeRecord, Gender, ModuleResult};

pub(super) fn record(id: &str, position: &str, salary: f64, performance: f64) -> EmployeeRecord {
    EmployeeRecord {
        id: id.to_string(),
        name: format!("Employee {id}"),
        department: "Engineering".to_string(),
        position: position.to_string(),
        level: "P3".to_string(),
        salary,
        experience: Some(4.0),
        performance: Some(performance),
        ..EmployeeRecord::default()
    }
}

pub(super) fn in_department(mut record: EmployeeRecord, department: &str) -> EmployeeRecord {
    record.department = department.to_string();
    record
}

pub(super) fn with_gender(mut record: EmployeeRecord, gender: Gender) -> EmployeeRecord {
    record.gender = Some(gender);
    record
}

/// Fills the optional demographic fields so data-quality checks stay quiet.
pub(super) fn complete(mut record: EmployeeRecord) -> EmployeeRecord {
    record.gender.get_or_insert(Gender::Other);
    record.company_tenure = Some(2.0);
    record.age = Some(35);
    record.education = Some("Bachelor".to_string());
    record
}

pub(super) fn uniform_team(count: usize, salary: f64, performance: f64) -> Vec<EmployeeRecord> {
    (1..=count)
        .map(|index| record(&format!("E{index:03}"), "Engineer", salary, performance))
        .collect()
}

pub(super) fn normalize(records: &[EmployeeRecord]) -> NormalizedBatch {
    RecordNormalizer::normalize(records)
}

pub(super) fn evaluate<E: RuleEvaluator>(
    evaluator: E,
    records: &[EmployeeRecord],
    policy: &DiagnosticPolicy,
) -> Result<ModuleResult<E::Findings>, ModuleError> {
    let batch = normalize(records);
    let context = RuleContext::new(&batch.employees, &batch.excluded, policy);
    evaluator.evaluate(&context)
}

pub(super) fn findings<E: RuleEvaluator>(
    evaluator: E,
    records: &[EmployeeRecord],
    policy: &DiagnosticPolicy,
) -> (u8, E::Findings) {
    let result = evaluate(evaluator, records, policy).expect("module evaluates");
    let score = result.overall_score;
    (score, result.findings.expect("findings present"))
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
