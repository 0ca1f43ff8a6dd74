use super::domain::{IssueKind, ModuleKind, ModuleResult, ModuleStatus, Severity};
use super::rules::{
    AnomalyFindings, CompetitivenessFindings, ComplianceFindings, CostEfficiencyFindings,
    EfficiencyRating, FairnessFindings, IncentiveRating, MixStatus, StructureFindings,
    TalentFindings,
};
use serde::Serialize;

const URGENT_ACTION_PENALTY: f64 = 8.0;
const PLAN_SCORE_FLOOR: f64 = 20.0;
const DATA_QUALITY_ALERT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityQuadrant {
    UrgentImportant,
    UrgentNotImportant,
    ImportantNotUrgent,
    Neither,
}

impl PriorityQuadrant {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UrgentImportant => "Urgent & Important",
            Self::UrgentNotImportant => "Urgent, Not Important",
            Self::ImportantNotUrgent => "Important, Not Urgent",
            Self::Neither => "Neither Urgent nor Important",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedAction {
    pub title: String,
    pub source: ModuleKind,
    pub quadrant: PriorityQuadrant,
    pub responsible_department: &'static str,
    pub timeline: &'static str,
    pub estimated_cost: f64,
    pub expected_roi: String,
    pub kpis: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapPhase {
    pub phase: u8,
    pub name: &'static str,
    pub duration: &'static str,
    pub actions: Vec<String>,
    pub milestones: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Pdf,
    Xlsx,
}

/// Descriptor only; rendering happens outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDescriptor {
    pub name: &'static str,
    pub description: String,
    pub format: ReportFormat,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlan {
    pub key_findings: Vec<String>,
    pub prioritized_actions: Vec<PlannedAction>,
    pub implementation_roadmap: Vec<RoadmapPhase>,
    pub downloadable_reports: Vec<ReportDescriptor>,
}

impl ActionPlan {
    pub fn total_estimated_cost(&self) -> f64 {
        self.prioritized_actions
            .iter()
            .map(|action| action.estimated_cost)
            .sum()
    }

    pub fn actions_in(&self, quadrant: PriorityQuadrant) -> impl Iterator<Item = &PlannedAction> {
        self.prioritized_actions
            .iter()
            .filter(move |action| action.quadrant == quadrant)
    }
}

/// Module outputs the plan is derived from, all read-only.
#[derive(Debug, Clone, Copy)]
pub struct PlanInputs<'a> {
    pub employee_count: usize,
    pub compliance: &'a ModuleResult<ComplianceFindings>,
    pub fairness: &'a ModuleResult<FairnessFindings>,
    pub competitiveness: &'a ModuleResult<CompetitivenessFindings>,
    pub structure: &'a ModuleResult<StructureFindings>,
    pub cost_efficiency: &'a ModuleResult<CostEfficiencyFindings>,
    pub talent: &'a ModuleResult<TalentFindings>,
    pub anomalies: &'a ModuleResult<AnomalyFindings>,
}

impl PlanInputs<'_> {
    fn unavailable(&self) -> Vec<(ModuleKind, &str)> {
        let statuses: [(ModuleKind, bool, &ModuleStatus); 7] = [
            (ModuleKind::Compliance, self.compliance.is_available(), &self.compliance.status),
            (ModuleKind::Fairness, self.fairness.is_available(), &self.fairness.status),
            (
                ModuleKind::Competitiveness,
                self.competitiveness.is_available(),
                &self.competitiveness.status,
            ),
            (ModuleKind::Structure, self.structure.is_available(), &self.structure.status),
            (
                ModuleKind::CostEfficiency,
                self.cost_efficiency.is_available(),
                &self.cost_efficiency.status,
            ),
            (ModuleKind::Talent, self.talent.is_available(), &self.talent.status),
            (ModuleKind::Anomalies, self.anomalies.is_available(), &self.anomalies.status),
        ];

        statuses
            .into_iter()
            .filter(|(_, available, _)| !available)
            .map(|(module, _, status)| {
                (
                    module,
                    status.notes.first().map(String::as_str).unwrap_or("no data"),
                )
            })
            .collect()
    }
}

pub struct ActionPlanBuilder;

impl ActionPlanBuilder {
    pub fn build(inputs: &PlanInputs<'_>) -> ModuleResult<ActionPlan> {
        let mut key_findings = Vec::new();
        let mut actions = Vec::new();

        if let Some(compliance) = &inputs.compliance.findings {
            plan_compliance(compliance, &mut key_findings, &mut actions);
        }
        if let Some(fairness) = &inputs.fairness.findings {
            plan_fairness(fairness, &mut key_findings, &mut actions);
        }
        if let Some(competitiveness) = &inputs.competitiveness.findings {
            plan_competitiveness(competitiveness, &mut key_findings, &mut actions);
        }
        if let Some(structure) = &inputs.structure.findings {
            plan_structure(structure, &mut key_findings, &mut actions);
        }
        if let Some(cost) = &inputs.cost_efficiency.findings {
            plan_cost(cost, &mut key_findings, &mut actions);
        }
        if let Some(talent) = &inputs.talent.findings {
            plan_talent(talent, &mut key_findings, &mut actions);
        }
        if let Some(anomalies) = &inputs.anomalies.findings {
            plan_anomalies(anomalies, &mut key_findings, &mut actions);
        }

        let mut status = ModuleStatus::full();
        for (module, reason) in inputs.unavailable() {
            key_findings.push(format!("{} could not be assessed: {}", module.label(), reason));
            status.reduce(format!("{} unavailable", module.label()));
        }

        if key_findings.is_empty() {
            key_findings.push("No material compensation risks detected".to_string());
        }

        actions.sort_by(|a, b| {
            a.quadrant
                .cmp(&b.quadrant)
                .then_with(|| b.estimated_cost.total_cmp(&a.estimated_cost))
                .then_with(|| a.title.cmp(&b.title))
        });

        let urgent = actions
            .iter()
            .filter(|action| action.quadrant == PriorityQuadrant::UrgentImportant)
            .count();
        let score = (100.0 - URGENT_ACTION_PENALTY * urgent as f64).max(PLAN_SCORE_FLOOR);

        let plan = ActionPlan {
            key_findings,
            implementation_roadmap: roadmap(&actions),
            downloadable_reports: reports(inputs.employee_count, &actions),
            prioritized_actions: actions,
        };

        ModuleResult::new(ModuleKind::ActionPlan, score, status, plan)
    }
}

fn plan_compliance(
    compliance: &ComplianceFindings,
    findings: &mut Vec<String>,
    actions: &mut Vec<PlannedAction>,
) {
    let wage = &compliance.minimum_wage;
    if wage.count == 0 {
        return;
    }

    findings.push(format!(
        "{} employee(s) ({:.1}%) are paid below the minimum wage of {:.0}",
        wage.count, wage.percentage, wage.threshold
    ));
    actions.push(PlannedAction {
        title: "Bring all base salaries up to the statutory minimum".to_string(),
        source: ModuleKind::Compliance,
        quadrant: PriorityQuadrant::UrgentImportant,
        responsible_department: "HR & Legal",
        timeline: "Within 30 days",
        estimated_cost: compliance.annual_remediation_cost(),
        expected_roi: "Eliminates labor-law penalty and back-pay exposure".to_string(),
        kpis: vec![
            "Minimum wage violations: 0".to_string(),
            "Compliance score >= 95".to_string(),
        ],
    });
}

fn plan_fairness(
    fairness: &FairnessFindings,
    findings: &mut Vec<String>,
    actions: &mut Vec<PlannedAction>,
) {
    let adjustments: Vec<_> = fairness.adjustments().collect();
    if !adjustments.is_empty() {
        findings.push(format!(
            "{} high performer(s) sit in the bottom pay band of their position",
            adjustments.len()
        ));
        actions.push(PlannedAction {
            title: "Adjust underpaid high performers to 90% of their position average".to_string(),
            source: ModuleKind::Fairness,
            quadrant: PriorityQuadrant::ImportantNotUrgent,
            responsible_department: "HR",
            timeline: "Next pay review (1-3 months)",
            estimated_cost: adjustments
                .iter()
                .map(|employee| employee.shortfall() * 12.0)
                .sum(),
            expected_roi: "Lower regretted attrition among top performers".to_string(),
            kpis: vec![
                "Underpaid high performers: 0".to_string(),
                "Top-performer retention >= 90%".to_string(),
            ],
        });
    }

    if fairness.gender_pay_gap.is_warning() {
        findings.push(format!(
            "Gender pay gap of {:.1}% exceeds the tolerated threshold",
            fairness.gender_pay_gap.gap_percentage
        ));
        actions.push(PlannedAction {
            title: "Run an equal-pay audit and close unexplained gender gaps".to_string(),
            source: ModuleKind::Fairness,
            quadrant: PriorityQuadrant::UrgentImportant,
            responsible_department: "HR & Legal",
            timeline: "Within 60 days",
            estimated_cost: 0.0,
            expected_roi: "Reduces discrimination claims and reputational risk".to_string(),
            kpis: vec!["Gender pay gap below threshold".to_string()],
        });
    }

    let mismatch = fairness
        .issues
        .iter()
        .any(|issue| issue.kind == IssueKind::PerformancePayMismatch);
    if mismatch {
        findings.push(format!(
            "Pay is weakly tied to performance (correlation {:.2})",
            fairness.performance_correlation
        ));
        actions.push(PlannedAction {
            title: "Link salary reviews to performance ratings".to_string(),
            source: ModuleKind::Fairness,
            quadrant: PriorityQuadrant::ImportantNotUrgent,
            responsible_department: "HR & Business Leads",
            timeline: "Next review cycle (3-6 months)",
            estimated_cost: 0.0,
            expected_roi: "Higher motivation per payroll dollar".to_string(),
            kpis: vec!["Performance-salary correlation >= 0.3".to_string()],
        });
    }
}

fn plan_competitiveness(
    competitiveness: &CompetitivenessFindings,
    findings: &mut Vec<String>,
    actions: &mut Vec<PlannedAction>,
) {
    let lagging: Vec<&str> = competitiveness
        .lagging()
        .map(|position| position.position.as_str())
        .collect();
    if !lagging.is_empty() {
        findings.push(format!(
            "Pay lags the market 25th percentile for {}",
            lagging.join(", ")
        ));
        actions.push(PlannedAction {
            title: format!("Move lagging positions toward market median: {}", lagging.join(", ")),
            source: ModuleKind::Competitiveness,
            quadrant: PriorityQuadrant::ImportantNotUrgent,
            responsible_department: "Compensation & Benefits",
            timeline: "Next budget cycle (3-6 months)",
            estimated_cost: competitiveness
                .lagging()
                .map(|position| (-position.gap).max(0.0) * position.headcount as f64 * 12.0)
                .sum(),
            expected_roi: "Faster hiring and fewer counter-offer losses".to_string(),
            kpis: vec!["No position below market P25".to_string()],
        });
    }

    let exposed: Vec<_> = competitiveness
        .key_positions
        .iter()
        .filter(|risk| risk.risk_level == Severity::High)
        .collect();
    if !exposed.is_empty() {
        findings.push(format!(
            "{} key position(s) trail the market 75th percentile",
            exposed.len()
        ));
        actions.push(PlannedAction {
            title: "Lift key positions to the market 75th percentile".to_string(),
            source: ModuleKind::Competitiveness,
            quadrant: PriorityQuadrant::UrgentImportant,
            responsible_department: "Compensation & Benefits",
            timeline: "Within 90 days",
            estimated_cost: exposed.iter().map(|risk| risk.adjustment_cost).sum(),
            expected_roi: "Protects critical roles from competitor poaching".to_string(),
            kpis: vec!["Key positions at or above market P75".to_string()],
        });
    }
}

fn plan_structure(
    structure: &StructureFindings,
    findings: &mut Vec<String>,
    actions: &mut Vec<PlannedAction>,
) {
    let misaligned: Vec<&str> = structure
        .categories
        .iter()
        .filter(|category| category.status == MixStatus::NeedsAdjustment)
        .map(|category| category.category.as_str())
        .collect();
    if !misaligned.is_empty() {
        findings.push(format!(
            "Fixed/variable pay mix deviates from industry norms for {}",
            misaligned.join(", ")
        ));
        actions.push(PlannedAction {
            title: "Rebalance fixed and variable pay mix".to_string(),
            source: ModuleKind::Structure,
            quadrant: PriorityQuadrant::Neither,
            responsible_department: "Compensation & Benefits",
            timeline: "Annual plan redesign (6-12 months)",
            estimated_cost: 0.0,
            expected_roi: "Pay mix that rewards results without raising fixed cost".to_string(),
            kpis: vec!["All categories within pay-mix tolerance".to_string()],
        });
    }

    if structure.incentive.rating == IncentiveRating::Weak {
        findings.push(format!(
            "Variable pay barely tracks performance (correlation {:.2})",
            structure.incentive.correlation
        ));
        actions.push(PlannedAction {
            title: "Redesign bonus criteria around measurable performance".to_string(),
            source: ModuleKind::Structure,
            quadrant: PriorityQuadrant::ImportantNotUrgent,
            responsible_department: "HR & Finance",
            timeline: "Before next bonus cycle (3-6 months)",
            estimated_cost: 0.0,
            expected_roi: "Bonus spend concentrated on top contributors".to_string(),
            kpis: vec!["Bonus-performance correlation >= 0.5".to_string()],
        });
    }
}

fn plan_cost(
    cost: &CostEfficiencyFindings,
    findings: &mut Vec<String>,
    actions: &mut Vec<PlannedAction>,
) {
    let weak: Vec<&str> = cost
        .departments
        .iter()
        .filter(|department| department.rating == EfficiencyRating::NeedsImprovement)
        .map(|department| department.department.as_str())
        .collect();
    if weak.is_empty() {
        return;
    }

    findings.push(format!(
        "Labor cost outpaces revenue contribution in {}",
        weak.join(", ")
    ));
    actions.push(PlannedAction {
        title: format!("Review staffing and output targets in {}", weak.join(", ")),
        source: ModuleKind::CostEfficiency,
        quadrant: PriorityQuadrant::Neither,
        responsible_department: "Finance & Department Heads",
        timeline: "Quarterly business review",
        estimated_cost: 0.0,
        expected_roi: "Improved revenue per payroll dollar".to_string(),
        kpis: vec!["Department efficiency >= 1.0".to_string()],
    });
}

fn plan_talent(
    talent: &TalentFindings,
    findings: &mut Vec<String>,
    actions: &mut Vec<PlannedAction>,
) {
    let high_risk: Vec<_> = talent.high_risk().collect();
    if high_risk.is_empty() {
        return;
    }

    findings.push(format!(
        "{} of {} key employee(s) are at high flight risk",
        high_risk.len(),
        talent.key_talent_count
    ));
    actions.push(PlannedAction {
        title: "Launch retention packages for high-risk key talent".to_string(),
        source: ModuleKind::Talent,
        quadrant: PriorityQuadrant::UrgentImportant,
        responsible_department: "HR & Business Leads",
        timeline: "Within 30 days",
        estimated_cost: high_risk.iter().map(|profile| profile.gap * 12.0).sum(),
        expected_roi: "Avoids replacement cost of 1-2x annual salary per departure".to_string(),
        kpis: vec![
            "Key talent attrition < 5%".to_string(),
            "Retention conversations completed: 100%".to_string(),
        ],
    });
}

fn plan_anomalies(
    anomalies: &AnomalyFindings,
    findings: &mut Vec<String>,
    actions: &mut Vec<PlannedAction>,
) {
    if !anomalies.anomalies.is_empty() {
        findings.push(format!(
            "{} salary outlier(s) deviate more than {:.0}% from the mean",
            anomalies.anomalies.len(),
            anomalies.deviation_threshold * 100.0
        ));
        actions.push(PlannedAction {
            title: "Verify outlier salary records with payroll".to_string(),
            source: ModuleKind::Anomalies,
            quadrant: PriorityQuadrant::UrgentNotImportant,
            responsible_department: "Payroll",
            timeline: "Within 2 weeks",
            estimated_cost: 0.0,
            expected_roi: "Prevents payroll errors propagating into decisions".to_string(),
            kpis: vec!["Unexplained outliers: 0".to_string()],
        });
    }

    if anomalies.data_quality_score < DATA_QUALITY_ALERT {
        findings.push(format!(
            "Roster data quality score is {:.0}",
            anomalies.data_quality_score
        ));
        actions.push(PlannedAction {
            title: "Complete missing roster fields".to_string(),
            source: ModuleKind::Anomalies,
            quadrant: PriorityQuadrant::UrgentNotImportant,
            responsible_department: "HR Operations",
            timeline: "Within 2 weeks",
            estimated_cost: 0.0,
            expected_roi: "More reliable diagnostics on the next run".to_string(),
            kpis: vec![format!("Data quality score >= {:.0}", DATA_QUALITY_ALERT)],
        });
    }
}

fn roadmap(actions: &[PlannedAction]) -> Vec<RoadmapPhase> {
    let titles = |quadrants: &[PriorityQuadrant]| -> Vec<String> {
        actions
            .iter()
            .filter(|action| quadrants.contains(&action.quadrant))
            .map(|action| action.title.clone())
            .collect()
    };

    let mut phases = Vec::new();

    let immediate = titles(&[
        PriorityQuadrant::UrgentImportant,
        PriorityQuadrant::UrgentNotImportant,
    ]);
    if !immediate.is_empty() {
        phases.push(RoadmapPhase {
            phase: 0,
            name: "Immediate remediation",
            duration: "0-30 days",
            actions: immediate,
            milestones: vec![
                "Legal exposure closed".to_string(),
                "Payroll records verified".to_string(),
            ],
            resources: vec!["HR".to_string(), "Legal".to_string(), "Payroll".to_string()],
        });
    }

    let structural = titles(&[PriorityQuadrant::ImportantNotUrgent]);
    if !structural.is_empty() {
        phases.push(RoadmapPhase {
            phase: 0,
            name: "Structural alignment",
            duration: "1-3 months",
            actions: structural,
            milestones: vec![
                "Adjustment budget approved".to_string(),
                "Revised pay bands published".to_string(),
            ],
            resources: vec![
                "Compensation & Benefits".to_string(),
                "Finance".to_string(),
            ],
        });
    }

    let mut continuous = titles(&[PriorityQuadrant::Neither]);
    continuous.push("Re-run the salary health diagnosis each quarter".to_string());
    phases.push(RoadmapPhase {
        phase: 0,
        name: "Continuous optimization",
        duration: "3-6 months",
        actions: continuous,
        milestones: vec!["Health score trend reviewed by leadership".to_string()],
        resources: vec!["HR Analytics".to_string()],
    });

    for (index, phase) in phases.iter_mut().enumerate() {
        phase.phase = index as u8 + 1;
    }
    phases
}

fn reports(employee_count: usize, actions: &[PlannedAction]) -> Vec<ReportDescriptor> {
    vec![
        ReportDescriptor {
            name: "Salary health diagnostic report",
            description: "Composite score, module findings and action plan".to_string(),
            format: ReportFormat::Pdf,
            size: format!("{} KB", 180 + employee_count * 2),
        },
        ReportDescriptor {
            name: "Employee adjustment list",
            description: format!(
                "Per-employee findings for {} employees across {} actions",
                employee_count,
                actions.len()
            ),
            format: ReportFormat::Xlsx,
            size: format!("{} KB", 24 + employee_count / 2),
        },
    ]
}
