use super::super::aggregate::GroupAggregator;
use super::super::domain::{Issue, IssueKind, ModuleKind, ModuleResult, ModuleStatus, Severity};
use super::super::policy::MarketBenchmark;
use super::{plural, ModuleError, RuleContext, RuleEvaluator};
use serde::Serialize;

const UNBENCHMARKED_SCORE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    Leading,
    Following,
    Lagging,
}

impl MarketPosition {
    pub fn classify(average: f64, benchmark: &MarketBenchmark) -> Self {
        if average >= benchmark.p75 {
            Self::Leading
        } else if average <= benchmark.p25 {
            Self::Lagging
        } else {
            Self::Following
        }
    }

    const fn score(self) -> f64 {
        match self {
            Self::Leading => 100.0,
            Self::Following => 75.0,
            Self::Lagging => 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionCompetitiveness {
    pub position: String,
    pub headcount: usize,
    pub company_average: f64,
    pub market: MarketBenchmark,
    /// Company average minus the market median.
    pub gap: f64,
    pub market_position: MarketPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyPositionRisk {
    pub position: String,
    pub headcount: usize,
    pub current_average: f64,
    pub market_p75: f64,
    pub gap_to_p75: f64,
    /// Annual cost of lifting every incumbent to the market 75th percentile.
    pub adjustment_cost: f64,
    pub risk_level: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitivenessFindings {
    pub positions: Vec<PositionCompetitiveness>,
    pub key_positions: Vec<KeyPositionRisk>,
    pub unbenchmarked_positions: Vec<String>,
    pub issues: Vec<Issue>,
}

impl CompetitivenessFindings {
    pub fn lagging(&self) -> impl Iterator<Item = &PositionCompetitiveness> {
        self.positions
            .iter()
            .filter(|position| position.market_position == MarketPosition::Lagging)
    }
}

pub struct CompetitivenessEvaluator;

impl RuleEvaluator for CompetitivenessEvaluator {
    type Findings = CompetitivenessFindings;

    const MODULE: ModuleKind = ModuleKind::Competitiveness;

    fn evaluate(
        &self,
        context: &RuleContext<'_>,
    ) -> Result<ModuleResult<CompetitivenessFindings>, ModuleError> {
        let employees = context.require_employees()?;
        let policy = context.policy;
        let mut status = ModuleStatus::full();

        let mut positions = Vec::new();
        let mut key_positions = Vec::new();
        let mut unbenchmarked_positions = Vec::new();

        for stat in GroupAggregator::by_position(employees) {
            let Some(market) = policy.market_benchmark(&stat.group_key).copied() else {
                unbenchmarked_positions.push(stat.group_key);
                continue;
            };

            if policy.is_key_position(&stat.group_key) {
                let gap_to_p75 = market.p75 - stat.average;
                let relative_gap = if market.p75 > 0.0 {
                    gap_to_p75 / market.p75
                } else {
                    0.0
                };
                let risk_level = if relative_gap > policy.key_position_gap_tolerance {
                    Severity::High
                } else if gap_to_p75 > 0.0 {
                    Severity::Medium
                } else {
                    Severity::Low
                };
                key_positions.push(KeyPositionRisk {
                    position: stat.group_key.clone(),
                    headcount: stat.count,
                    current_average: stat.average,
                    market_p75: market.p75,
                    gap_to_p75,
                    adjustment_cost: gap_to_p75.max(0.0) * stat.count as f64 * 12.0,
                    risk_level,
                });
            }

            positions.push(PositionCompetitiveness {
                market_position: MarketPosition::classify(stat.average, &market),
                gap: stat.average - market.p50,
                position: stat.group_key,
                headcount: stat.count,
                company_average: stat.average,
                market,
            });
        }

        let mut issues = Vec::new();
        let lagging: Vec<&PositionCompetitiveness> = positions
            .iter()
            .filter(|position| position.market_position == MarketPosition::Lagging)
            .collect();
        if !lagging.is_empty() {
            let names: Vec<&str> = lagging.iter().map(|p| p.position.as_str()).collect();
            issues.push(Issue::new(
                IssueKind::MarketLag,
                Severity::Medium,
                lagging.iter().map(|p| p.headcount).sum(),
                format!(
                    "{} position{} pay at or below the market 25th percentile: {}",
                    lagging.len(),
                    plural(lagging.len()),
                    names.join(", ")
                ),
            ));
        }

        for risk in key_positions
            .iter()
            .filter(|risk| risk.risk_level == Severity::High)
        {
            issues.push(Issue::new(
                IssueKind::KeyPositionGap,
                Severity::High,
                risk.headcount,
                format!(
                    "key position {} trails the market 75th percentile by {:.0}",
                    risk.position, risk.gap_to_p75
                ),
            ));
        }

        if !unbenchmarked_positions.is_empty() {
            status.reduce(format!(
                "no market benchmark configured for {}",
                unbenchmarked_positions.join(", ")
            ));
        }
        for position in &policy.key_positions {
            if policy.market_benchmark(position).is_none() {
                status.reduce(format!("key position {position} has no market benchmark"));
            }
        }

        let benchmarked_headcount: usize = positions.iter().map(|p| p.headcount).sum();
        let score = if benchmarked_headcount == 0 {
            UNBENCHMARKED_SCORE
        } else {
            positions
                .iter()
                .map(|p| p.market_position.score() * p.headcount as f64)
                .sum::<f64>()
                / benchmarked_headcount as f64
        };

        let findings = CompetitivenessFindings {
            positions,
            key_positions,
            unbenchmarked_positions,
            issues,
        };

        Ok(ModuleResult::new(Self::MODULE, score, status, findings))
    }
}
