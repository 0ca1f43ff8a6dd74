use super::super::action_plan::{ActionPlanBuilder, PlanInputs};
use super::super::aggregate::GroupAggregator;
use super::super::domain::{EmployeeRecord, ModuleResult};
use super::super::normalizer::{NormalizedBatch, RecordNormalizer};
use super::super::policy::DiagnosticPolicy;
use super::super::rules::{
    AnomalyEvaluator, CompetitivenessEvaluator, ComplianceEvaluator, CostEfficiencyEvaluator,
    FairnessEvaluator, RuleContext, RuleEvaluator, StructureEvaluator, TalentEvaluator,
};
use super::super::scoring::HealthScorer;
use super::super::stats::{self, Correlation};
use super::views::{DiagnosisResult, WorkforceStatistics};

/// Runs every diagnostic stage over one batch of records.
pub struct ReportComposer;

impl ReportComposer {
    pub fn compose(records: &[EmployeeRecord], policy: &DiagnosticPolicy) -> DiagnosisResult {
        let batch = RecordNormalizer::normalize(records);
        let context = RuleContext::new(&batch.employees, &batch.excluded, policy);

        let compliance = run(&ComplianceEvaluator, &context);
        let fairness = run(&FairnessEvaluator, &context);
        let competitiveness = run(&CompetitivenessEvaluator, &context);
        let structure = run(&StructureEvaluator, &context);
        let cost_efficiency = run(&CostEfficiencyEvaluator, &context);
        let talent = run(&TalentEvaluator, &context);
        let anomalies = run(&AnomalyEvaluator, &context);

        let action_plan = ActionPlanBuilder::build(&PlanInputs {
            employee_count: batch.employees.len(),
            compliance: &compliance,
            fairness: &fairness,
            competitiveness: &competitiveness,
            structure: &structure,
            cost_efficiency: &cost_efficiency,
            talent: &talent,
            anomalies: &anomalies,
        });

        let health_score = HealthScorer::score(&context);
        let statistics = workforce_statistics(&batch, &context);

        tracing::info!(
            analyzed = statistics.analyzed_records,
            excluded = statistics.excluded_records.len(),
            health_score = health_score.score,
            actions = action_plan
                .findings
                .as_ref()
                .map_or(0, |plan| plan.prioritized_actions.len()),
            "salary health diagnosis composed"
        );

        DiagnosisResult {
            health_score,
            statistics,
            compliance,
            fairness,
            competitiveness,
            structure,
            cost_efficiency,
            talent,
            anomalies,
            action_plan,
        }
    }
}

fn run<E: RuleEvaluator>(evaluator: &E, context: &RuleContext<'_>) -> ModuleResult<E::Findings> {
    match evaluator.evaluate(context) {
        Ok(result) => {
            tracing::debug!(
                module = E::MODULE.label(),
                score = result.overall_score,
                confidence = ?result.status.confidence,
                "module evaluated"
            );
            result
        }
        Err(error) => {
            tracing::warn!(module = E::MODULE.label(), %error, "module unavailable");
            ModuleResult::unavailable(E::MODULE, error.to_string())
        }
    }
}

fn workforce_statistics(batch: &NormalizedBatch, context: &RuleContext<'_>) -> WorkforceStatistics {
    let salaries = context.salaries();
    let (salary_coefficient_of_variation, insufficient_data) =
        match stats::coefficient_of_variation(&salaries) {
            Ok(cv) => (cv, false),
            Err(_) => (0.0, true),
        };
    let correlation = context
        .performance_salary_correlation()
        .unwrap_or(Correlation {
            coefficient: 0.0,
            insufficient_data: true,
        });
    let min_salary = salaries.iter().copied().fold(f64::INFINITY, f64::min);
    let max_salary = salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    WorkforceStatistics {
        total_records: batch.total(),
        analyzed_records: batch.employees.len(),
        excluded_records: batch.excluded.clone(),
        average_salary: stats::mean(&salaries),
        median_salary: stats::median(&salaries).unwrap_or(0.0),
        min_salary: if salaries.is_empty() { 0.0 } else { min_salary },
        max_salary: if salaries.is_empty() { 0.0 } else { max_salary },
        salary_std_dev: stats::std_dev(&salaries),
        salary_coefficient_of_variation,
        insufficient_data,
        total_annual_payroll: batch
            .employees
            .iter()
            .map(|employee| employee.annual_total_compensation)
            .sum(),
        performance_salary_correlation: correlation.coefficient,
        correlation_insufficient_data: correlation.insufficient_data,
        departments: GroupAggregator::by_department(&batch.employees),
        levels: GroupAggregator::by_level(&batch.employees),
    }
}
