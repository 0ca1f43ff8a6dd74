use super::common::*;
use crate::diagnosis::rules::TalentEvaluator;
use crate::diagnosis::{Confidence, DiagnosticPolicy, IssueKind, ResignationRisk, Severity};

fn key_engineer(id: &str, risk: Option<ResignationRisk>) -> crate::diagnosis::EmployeeRecord {
    let mut employee = record(id, "Engineer", 20_000.0, 4.5);
    employee.experience = Some(5.0);
    employee.resignation_risk = risk;
    employee
}

#[test]
fn recorded_resignation_risk_drives_talent_risk() {
    let policy = DiagnosticPolicy::default();
    let records = vec![
        key_engineer("E001", Some(ResignationRisk::High)),
        in_department(key_engineer("E002", Some(ResignationRisk::Medium)), "Sales"),
        key_engineer("E003", None),
    ];
    let (score, findings) = findings(TalentEvaluator, &records, &policy);

    let levels: Vec<Severity> = findings.key_talent.iter().map(|p| p.risk_level).collect();
    assert_eq!(levels, [Severity::High, Severity::Medium, Severity::Low]);
    assert_eq!(findings.key_talent_count, 3);

    let profile = &findings.key_talent[0];
    assert_close(profile.market_value, 25_000.0);
    assert_close(profile.gap, 5_000.0);
    assert_close(findings.retention_budget, 5_000.0 * 12.0);

    // 90 - 30 * 1/3
    assert_eq!(score, 80);
    assert!(findings
        .issues
        .iter()
        .any(|issue| issue.kind == IssueKind::KeyTalentRetention));
}

#[test]
fn key_talent_requires_strategic_department_and_tenure() {
    let policy = DiagnosticPolicy::default();
    let mut junior = key_engineer("E001", None);
    junior.experience = Some(1.0);
    let operations = in_department(key_engineer("E002", None), "Operations");
    let mut flagged = record("E003", "Engineer", 12_000.0, 3.0);
    flagged.is_key_talent = true;

    let result =
        evaluate(TalentEvaluator, &[junior, operations, flagged], &policy).expect("evaluates");

    assert_eq!(result.overall_score, 80);
    assert_eq!(result.status.confidence, Confidence::Reduced);
    let findings = result.findings.expect("findings present");
    assert_eq!(findings.key_talent_count, 0);
    assert_eq!(findings.flagged_key_talent, 1);
    assert_eq!(findings.retention_risk.total_at_risk, 0);
}

#[test]
fn strategic_departments_match_case_insensitively() {
    let policy = DiagnosticPolicy::default();
    let records = vec![in_department(key_engineer("E001", None), " engineering ")];
    let (score, findings) = findings(TalentEvaluator, &records, &policy);

    assert_eq!(findings.key_talent_count, 1);
    assert_eq!(score, 90);
}
