use super::super::aggregate::{GroupAggregator, GroupStat};
use super::super::domain::{
    AffectedEmployee, Employee, Gender, Issue, IssueKind, ModuleKind, ModuleResult, ModuleStatus,
    Severity,
};
use super::super::stats;
use super::{plural, ModuleError, RuleContext, RuleEvaluator};
use serde::Serialize;

const BASELINE_SCORE: f64 = 90.0;
const GENDER_GAP_PENALTY: f64 = 10.0;
const DISPERSION_PENALTY: f64 = 5.0;
const DISPERSION_PENALTY_CAP: f64 = 20.0;
const MISMATCH_PENALTY: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBand {
    pub count: usize,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFairness {
    pub position: String,
    pub count: usize,
    pub average: f64,
    pub variation_coefficient: f64,
    pub insufficient_data: bool,
    pub low_group: SalaryBand,
    pub high_group: SalaryBand,
    /// `suggested` is the adjustment target for each underpaid high performer.
    pub adjustment_needed: Vec<AffectedEmployee>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapStatus {
    Normal,
    Warning,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderPayGap {
    pub male_count: usize,
    pub female_count: usize,
    pub male_average: Option<f64>,
    pub female_average: Option<f64>,
    /// Gap as a fraction of the higher average.
    pub gap: f64,
    pub gap_percentage: f64,
    pub status: GapStatus,
}

impl GenderPayGap {
    pub fn is_warning(&self) -> bool {
        self.status == GapStatus::Warning
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelRange {
    pub level: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    /// `max / min`; 1.0 means a flat band.
    pub spread_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenureSegment {
    pub segment: &'static str,
    pub count: usize,
    pub average_salary: f64,
    pub average_performance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessFindings {
    pub position_analysis: Vec<PositionFairness>,
    pub gender_pay_gap: GenderPayGap,
    pub level_analysis: Vec<LevelRange>,
    pub tenure_analysis: Vec<TenureSegment>,
    pub performance_correlation: f64,
    /// Set when salary or performance is flat, so the correlation is a stand-in `0`.
    pub correlation_insufficient_data: bool,
    pub issues: Vec<Issue>,
}

impl FairnessFindings {
    pub fn adjustments(&self) -> impl Iterator<Item = &AffectedEmployee> {
        self.position_analysis
            .iter()
            .flat_map(|position| position.adjustment_needed.iter())
    }
}

pub struct FairnessEvaluator;

impl RuleEvaluator for FairnessEvaluator {
    type Findings = FairnessFindings;

    const MODULE: ModuleKind = ModuleKind::Fairness;

    fn evaluate(
        &self,
        context: &RuleContext<'_>,
    ) -> Result<ModuleResult<FairnessFindings>, ModuleError> {
        let employees = context.require_employees()?;
        let policy = context.policy;
        let mut status = ModuleStatus::full();
        let mut issues = Vec::new();

        let position_analysis: Vec<PositionFairness> =
            GroupAggregator::group_by(employees, |employee| employee.position.clone())
                .into_iter()
                .map(|(position, members)| analyze_position(position, members, context))
                .collect();

        let dispersed: Vec<&PositionFairness> = position_analysis
            .iter()
            .filter(|position| {
                !position.insufficient_data && position.variation_coefficient > policy.max_position_cv
            })
            .collect();
        if !dispersed.is_empty() {
            let names: Vec<&str> = dispersed.iter().map(|p| p.position.as_str()).collect();
            issues.push(Issue::new(
                IssueKind::InternalPayDispersion,
                Severity::Medium,
                dispersed.iter().map(|p| p.count).sum(),
                format!(
                    "pay dispersion above {:.0}% within {}",
                    policy.max_position_cv * 100.0,
                    names.join(", ")
                ),
            ));
        }

        let adjustments: Vec<AffectedEmployee> = position_analysis
            .iter()
            .flat_map(|position| position.adjustment_needed.iter().cloned())
            .collect();
        if !adjustments.is_empty() {
            issues.push(
                Issue::new(
                    IssueKind::UnderpaidHighPerformer,
                    Severity::Medium,
                    adjustments.len(),
                    format!(
                        "{} high performer{} in the bottom pay band of their position",
                        adjustments.len(),
                        plural(adjustments.len())
                    ),
                )
                .with_employees(adjustments),
            );
        }

        let gender_pay_gap = gender_pay_gap(employees, policy.gender_gap_threshold);
        match gender_pay_gap.status {
            GapStatus::Warning => issues.push(Issue::new(
                IssueKind::GenderPayGap,
                Severity::High,
                gender_pay_gap.male_count + gender_pay_gap.female_count,
                format!(
                    "gender pay gap of {:.1}% exceeds the {:.0}% threshold",
                    gender_pay_gap.gap_percentage,
                    policy.gender_gap_threshold * 100.0
                ),
            )),
            GapStatus::InsufficientData => {
                status.reduce("gender pay gap needs both male and female employees")
            }
            GapStatus::Normal => {}
        }

        let correlation = context.performance_salary_correlation()?;
        let performance_correlation = correlation.coefficient;
        if correlation.insufficient_data {
            status.reduce("salary or performance does not vary; correlation reported as 0");
        }
        let mismatch = performance_correlation < policy.performance_correlation_floor;
        if mismatch {
            issues.push(Issue::new(
                IssueKind::PerformancePayMismatch,
                Severity::Critical,
                employees.len(),
                format!(
                    "performance and salary correlation {:.2} is below {:.2}",
                    performance_correlation, policy.performance_correlation_floor
                ),
            ));
        }

        let mut score = BASELINE_SCORE;
        if gender_pay_gap.is_warning() {
            score -= GENDER_GAP_PENALTY;
        }
        score -= (dispersed.len() as f64 * DISPERSION_PENALTY).min(DISPERSION_PENALTY_CAP);
        if mismatch {
            score -= MISMATCH_PENALTY;
        }

        let findings = FairnessFindings {
            position_analysis,
            gender_pay_gap,
            level_analysis: level_ranges(employees),
            tenure_analysis: tenure_segments(employees),
            performance_correlation,
            correlation_insufficient_data: correlation.insufficient_data,
            issues,
        };

        Ok(ModuleResult::new(Self::MODULE, score, status, findings))
    }
}

fn analyze_position(
    position: String,
    mut members: Vec<&Employee>,
    context: &RuleContext<'_>,
) -> PositionFairness {
    let policy = context.policy;
    let stat = GroupStat::from_members(position.as_str(), &members);

    members.sort_by(|a, b| a.salary.total_cmp(&b.salary).then_with(|| a.id.cmp(&b.id)));
    let band = band_size(members.len(), policy.fairness_group_share);
    let low = &members[..band];
    let high = &members[members.len() - band..];

    let suggested = stat.average * policy.fairness_adjustment_ratio;
    let adjustment_needed = low
        .iter()
        .filter(|employee| {
            employee.performance >= policy.high_performer_threshold && employee.salary < suggested
        })
        .map(|employee| AffectedEmployee::new(employee, employee.salary, suggested))
        .collect();

    PositionFairness {
        position,
        count: stat.count,
        average: stat.average,
        variation_coefficient: stat.coefficient_of_variation,
        insufficient_data: stat.insufficient_data,
        low_group: band_summary(low),
        high_group: band_summary(high),
        adjustment_needed,
    }
}

/// Size of the bottom/top band: the configured share, never fewer than one.
fn band_size(count: usize, share: f64) -> usize {
    ((count as f64 * share).floor() as usize).clamp(1, count.max(1))
}

fn band_summary(members: &[&Employee]) -> SalaryBand {
    let salaries: Vec<f64> = members.iter().map(|employee| employee.salary).collect();
    SalaryBand {
        count: salaries.len(),
        average: stats::mean(&salaries),
    }
}

pub(crate) fn gender_pay_gap(employees: &[Employee], threshold: f64) -> GenderPayGap {
    let salaries_for = |gender: Gender| -> Vec<f64> {
        employees
            .iter()
            .filter(|employee| employee.gender == Some(gender))
            .map(|employee| employee.salary)
            .collect()
    };
    let male = salaries_for(Gender::Male);
    let female = salaries_for(Gender::Female);

    let male_average = (!male.is_empty()).then(|| stats::mean(&male));
    let female_average = (!female.is_empty()).then(|| stats::mean(&female));

    let (gap, status) = match (male_average, female_average) {
        (Some(male_avg), Some(female_avg)) => {
            let higher = male_avg.max(female_avg);
            let gap = if higher > 0.0 {
                (male_avg - female_avg).abs() / higher
            } else {
                0.0
            };
            let status = if gap > threshold {
                GapStatus::Warning
            } else {
                GapStatus::Normal
            };
            (gap, status)
        }
        _ => (0.0, GapStatus::InsufficientData),
    };

    GenderPayGap {
        male_count: male.len(),
        female_count: female.len(),
        male_average,
        female_average,
        gap,
        gap_percentage: gap * 100.0,
        status,
    }
}

fn level_ranges(employees: &[Employee]) -> Vec<LevelRange> {
    GroupAggregator::by_level(employees)
        .into_iter()
        .map(|stat| LevelRange {
            spread_ratio: if stat.min > 0.0 { stat.max / stat.min } else { 0.0 },
            level: stat.group_key,
            count: stat.count,
            min: stat.min,
            max: stat.max,
            average: stat.average,
        })
        .collect()
}

pub(crate) fn tenure_segment(experience: f64) -> (usize, &'static str) {
    if experience < 3.0 {
        (0, "1-3y")
    } else if experience < 5.0 {
        (1, "3-5y")
    } else {
        (2, "5y+")
    }
}

fn tenure_segments(employees: &[Employee]) -> Vec<TenureSegment> {
    GroupAggregator::group_by(employees, |employee| tenure_segment(employee.experience))
        .into_iter()
        .map(|((_, segment), members)| {
            let salaries: Vec<f64> = members.iter().map(|employee| employee.salary).collect();
            let performance: Vec<f64> =
                members.iter().map(|employee| employee.performance).collect();
            TenureSegment {
                segment,
                count: members.len(),
                average_salary: stats::mean(&salaries),
                average_performance: stats::mean(&performance),
            }
        })
        .collect()
}
