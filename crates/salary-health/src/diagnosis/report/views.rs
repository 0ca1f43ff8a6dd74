use super::super::action_plan::ActionPlan;
use super::super::aggregate::GroupStat;
use super::super::domain::{Confidence, Issue, ModuleKind, ModuleResult, Severity};
use super::super::normalizer::ExcludedRecord;
use super::super::rules::{
    AnomalyFindings, CompetitivenessFindings, ComplianceFindings, CostEfficiencyFindings,
    FairnessFindings, StructureFindings, TalentFindings,
};
use super::super::scoring::HealthScore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkforceStatistics {
    pub total_records: usize,
    pub analyzed_records: usize,
    pub excluded_records: Vec<ExcludedRecord>,
    pub average_salary: f64,
    pub median_salary: f64,
    pub min_salary: f64,
    pub max_salary: f64,
    pub salary_std_dev: f64,
    pub salary_coefficient_of_variation: f64,
    /// Set when the coefficient of variation could not be computed.
    pub insufficient_data: bool,
    pub total_annual_payroll: f64,
    pub performance_salary_correlation: f64,
    /// Set when the correlation above is undefined and reported as `0`.
    pub correlation_insufficient_data: bool,
    pub departments: Vec<GroupStat>,
    pub levels: Vec<GroupStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisResult {
    pub health_score: HealthScore,
    pub statistics: WorkforceStatistics,
    pub compliance: ModuleResult<ComplianceFindings>,
    pub fairness: ModuleResult<FairnessFindings>,
    pub competitiveness: ModuleResult<CompetitivenessFindings>,
    pub structure: ModuleResult<StructureFindings>,
    pub cost_efficiency: ModuleResult<CostEfficiencyFindings>,
    pub talent: ModuleResult<TalentFindings>,
    pub anomalies: ModuleResult<AnomalyFindings>,
    pub action_plan: ModuleResult<ActionPlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleScoreView {
    pub module: ModuleKind,
    pub label: &'static str,
    pub score: u8,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueView<'a> {
    pub module: ModuleKind,
    pub severity_label: &'static str,
    #[serde(flatten)]
    pub issue: &'a Issue,
}

impl DiagnosisResult {
    /// Module scores in presentation order.
    pub fn module_scores(&self) -> Vec<ModuleScoreView> {
        ModuleKind::ordered()
            .into_iter()
            .map(|module| {
                let (score, confidence) = self.module_status(module);
                ModuleScoreView {
                    module,
                    label: module.label(),
                    score,
                    confidence,
                }
            })
            .collect()
    }

    /// Every issue raised by any module, most severe first.
    pub fn issues(&self) -> Vec<IssueView<'_>> {
        let sources: [(ModuleKind, Option<&Vec<Issue>>); 7] = [
            (
                ModuleKind::Compliance,
                self.compliance.findings.as_ref().map(|f| &f.risks),
            ),
            (
                ModuleKind::Fairness,
                self.fairness.findings.as_ref().map(|f| &f.issues),
            ),
            (
                ModuleKind::Competitiveness,
                self.competitiveness.findings.as_ref().map(|f| &f.issues),
            ),
            (
                ModuleKind::Structure,
                self.structure.findings.as_ref().map(|f| &f.issues),
            ),
            (
                ModuleKind::CostEfficiency,
                self.cost_efficiency.findings.as_ref().map(|f| &f.issues),
            ),
            (
                ModuleKind::Talent,
                self.talent.findings.as_ref().map(|f| &f.issues),
            ),
            (
                ModuleKind::Anomalies,
                self.anomalies.findings.as_ref().map(|f| &f.issues),
            ),
        ];

        let mut views: Vec<IssueView<'_>> = sources
            .into_iter()
            .flat_map(|(module, issues)| {
                issues.into_iter().flatten().map(move |issue| IssueView {
                    module,
                    severity_label: issue.severity.label(),
                    issue,
                })
            })
            .collect();

        // stable sort keeps module order within a severity
        views.sort_by(|a, b| b.issue.severity.cmp(&a.issue.severity));
        views
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.issues()
            .iter()
            .any(|view| view.issue.severity == severity)
    }

    fn module_status(&self, module: ModuleKind) -> (u8, Confidence) {
        fn pair<T>(result: &ModuleResult<T>) -> (u8, Confidence) {
            (result.overall_score, result.status.confidence)
        }

        match module {
            ModuleKind::Compliance => pair(&self.compliance),
            ModuleKind::Fairness => pair(&self.fairness),
            ModuleKind::Competitiveness => pair(&self.competitiveness),
            ModuleKind::Structure => pair(&self.structure),
            ModuleKind::CostEfficiency => pair(&self.cost_efficiency),
            ModuleKind::Talent => pair(&self.talent),
            ModuleKind::Anomalies => pair(&self.anomalies),
            ModuleKind::ActionPlan => pair(&self.action_plan),
        }
    }
}
