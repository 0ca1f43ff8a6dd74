use super::common::*;
use crate::diagnosis::rules::{
    CompetitivenessEvaluator, CostEfficiencyEvaluator, EfficiencyRating, IncentiveRating,
    MarketPosition, MixStatus, StructureEvaluator,
};
use crate::diagnosis::{
    Confidence, DiagnosticPolicy, IssueKind, MarketBenchmark, ProductivityBenchmark, Severity,
};

fn benchmarked_policy() -> DiagnosticPolicy {
    let mut policy = DiagnosticPolicy::default();
    policy.market_benchmarks.insert(
        "Engineer".to_string(),
        MarketBenchmark {
            p25: 12_000.0,
            p50: 15_000.0,
            p75: 18_000.0,
        },
    );
    policy.market_benchmarks.insert(
        "Designer".to_string(),
        MarketBenchmark {
            p25: 8_000.0,
            p50: 10_000.0,
            p75: 12_000.0,
        },
    );
    policy
}

#[test]
fn lagging_key_position_is_high_risk() {
    let mut policy = benchmarked_policy();
    policy.key_positions.push("engineer".to_string());

    let (score, findings) = findings(
        CompetitivenessEvaluator,
        &uniform_team(2, 11_000.0, 3.0),
        &policy,
    );

    let engineer = &findings.positions[0];
    assert_eq!(engineer.market_position, MarketPosition::Lagging);
    assert_close(engineer.gap, -4_000.0);
    assert_eq!(score, 40);

    let key = &findings.key_positions[0];
    assert_eq!(key.risk_level, Severity::High);
    assert_close(key.gap_to_p75, 7_000.0);
    assert_close(key.adjustment_cost, 7_000.0 * 2.0 * 12.0);
    assert!(findings
        .issues
        .iter()
        .any(|issue| issue.kind == IssueKind::KeyPositionGap));
}

#[test]
fn competitiveness_score_is_headcount_weighted() {
    let policy = benchmarked_policy();
    let records = vec![
        record("E001", "Engineer", 20_000.0, 3.0),
        record("E002", "Engineer", 20_000.0, 3.0),
        record("E003", "Designer", 10_000.0, 3.0),
        record("E004", "Designer", 10_000.0, 3.0),
    ];
    let result = evaluate(CompetitivenessEvaluator, &records, &policy).expect("evaluates");

    // (100 * 2 + 75 * 2) / 4
    assert_eq!(result.overall_score, 88);
    assert_eq!(result.status.confidence, Confidence::Full);
    let findings = result.findings.expect("findings present");
    assert!(findings.lagging().next().is_none());
}

#[test]
fn missing_benchmarks_degrade_instead_of_failing() {
    let policy = DiagnosticPolicy::default();
    let result = evaluate(
        CompetitivenessEvaluator,
        &uniform_team(3, 15_000.0, 3.0),
        &policy,
    )
    .expect("evaluates");

    assert_eq!(result.overall_score, 70);
    assert_eq!(result.status.confidence, Confidence::Reduced);
    let findings = result.findings.expect("findings present");
    assert_eq!(findings.unbenchmarked_positions, ["Engineer"]);
}

#[test]
fn all_fixed_pay_deviates_from_fallback_mix() {
    let policy = DiagnosticPolicy::default();
    let result = evaluate(StructureEvaluator, &uniform_team(3, 10_000.0, 3.0), &policy)
        .expect("evaluates");

    assert_eq!(result.overall_score, 90);
    assert_eq!(result.status.confidence, Confidence::Reduced);
    let findings = result.findings.expect("findings present");
    let category = &findings.categories[0];
    assert!(category.benchmark_is_fallback);
    assert_close(category.fixed_ratio, 1.0);
    assert_eq!(category.status, MixStatus::NeedsAdjustment);
    assert_eq!(findings.incentive.rating, IncentiveRating::InsufficientData);
}

#[test]
fn bonuses_tracking_performance_are_effective() {
    let mut policy = DiagnosticPolicy::default();
    policy.pay_mix_benchmarks.insert("Engineer".to_string(), 0.8);

    let records: Vec<_> = [(3.0, 20_000.0), (4.0, 30_000.0), (5.0, 40_000.0)]
        .iter()
        .enumerate()
        .map(|(i, (performance, bonus))| {
            let mut employee = record(&format!("E{i}"), "Engineer", 10_000.0, *performance);
            employee.performance_bonus = Some(*bonus);
            employee
        })
        .collect();

    let (score, findings) = findings(StructureEvaluator, &records, &policy);

    assert_eq!(findings.incentive.rating, IncentiveRating::Effective);
    assert_close(findings.incentive.correlation, 1.0);
    assert_eq!(findings.incentive.participants, 3);
    // 360k base over 450k total
    assert_close(findings.company_fixed_ratio, 0.8);
    assert_eq!(findings.categories[0].status, MixStatus::Optimal);
    assert_eq!(score, 100);
}

#[test]
fn identical_bonuses_leave_incentive_unassessed() {
    let mut policy = DiagnosticPolicy::default();
    policy.pay_mix_benchmarks.insert("Engineer".to_string(), 0.96);

    let records: Vec<_> = [2.0, 3.0, 4.0]
        .iter()
        .enumerate()
        .map(|(i, performance)| {
            let mut employee = record(&format!("E{i}"), "Engineer", 10_000.0, *performance);
            employee.performance_bonus = Some(5_000.0);
            employee
        })
        .collect();

    let result = evaluate(StructureEvaluator, &records, &policy).expect("evaluates");

    assert_eq!(result.overall_score, 100);
    assert_eq!(result.status.confidence, Confidence::Reduced);
    let findings = result.findings.expect("findings present");
    assert_eq!(findings.incentive.participants, 3);
    assert_eq!(findings.incentive.rating, IncentiveRating::InsufficientData);
    assert_close(findings.incentive.correlation, 0.0);
    assert!(!findings
        .issues
        .iter()
        .any(|issue| issue.kind == IssueKind::WeakIncentive));
}

#[test]
fn bonuses_against_performance_are_weak() {
    let mut policy = DiagnosticPolicy::default();
    policy.default_fixed_ratio = Some(0.8);

    let records: Vec<_> = [(3.0, 40_000.0), (4.0, 30_000.0), (5.0, 20_000.0)]
        .iter()
        .enumerate()
        .map(|(i, (performance, bonus))| {
            let mut employee = record(&format!("E{i}"), "Engineer", 10_000.0, *performance);
            employee.performance_bonus = Some(*bonus);
            employee
        })
        .collect();

    let result = evaluate(StructureEvaluator, &records, &policy).expect("evaluates");

    assert_eq!(result.overall_score, 85);
    assert_eq!(result.status.confidence, Confidence::Full);
    let findings = result.findings.expect("findings present");
    assert_eq!(findings.incentive.rating, IncentiveRating::Weak);
    assert!(findings
        .issues
        .iter()
        .any(|issue| issue.kind == IssueKind::WeakIncentive));
}

#[test]
fn department_efficiency_uses_revenue_share() {
    let mut policy = DiagnosticPolicy::default();
    policy
        .department_revenue_share
        .insert("Engineering".to_string(), 60.0);
    policy.department_revenue_share.insert("Sales".to_string(), 40.0);

    let records = vec![
        record("E001", "Engineer", 10_000.0, 3.0),
        in_department(record("E002", "Rep", 10_000.0, 3.0), "Sales"),
    ];
    let (score, findings) = findings(CostEfficiencyEvaluator, &records, &policy);

    assert_close(findings.total_annual_cost, 240_000.0);
    let ratings: Vec<_> = findings
        .departments
        .iter()
        .map(|department| (department.department.as_str(), department.rating))
        .collect();
    assert_eq!(
        ratings,
        [
            ("Engineering", EfficiencyRating::Acceptable),
            ("Sales", EfficiencyRating::NeedsImprovement),
        ]
    );
    // (75 + 45) / 2
    assert_eq!(score, 60);
    let inefficiency = findings
        .issues
        .iter()
        .find(|issue| issue.kind == IssueKind::CostInefficiency)
        .expect("sales flagged");
    assert_eq!(inefficiency.affected_count, 1);
    assert_close(findings.cost_structure[1].payroll_share, 50.0);
}

#[test]
fn productivity_ratio_prefers_recorded_output() {
    let mut policy = DiagnosticPolicy::default();
    policy.productivity_benchmarks.insert(
        "Engineer".to_string(),
        ProductivityBenchmark {
            average_output: Some(1.0),
            benchmark_ratio: 2.0,
        },
    );
    let mut producer = record("E001", "Engineer", 10_000.0, 3.0);
    producer.output = Some(300_000.0);

    let result = evaluate(CostEfficiencyEvaluator, &[producer], &policy).expect("evaluates");

    assert_eq!(result.overall_score, 70);
    let findings = result.findings.expect("findings present");
    let comparison = &findings.productivity[0];
    assert_close(comparison.productivity_ratio, 2.5);
    assert!(comparison.above_benchmark);
}

#[test]
fn unconfigured_cost_module_is_reduced() {
    let policy = DiagnosticPolicy::default();
    let result = evaluate(
        CostEfficiencyEvaluator,
        &uniform_team(2, 10_000.0, 3.0),
        &policy,
    )
    .expect("evaluates");

    assert_eq!(result.overall_score, 70);
    assert_eq!(result.status.confidence, Confidence::Reduced);
}
