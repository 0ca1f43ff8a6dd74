use super::super::domain::{
    Employee, Issue, IssueKind, ModuleKind, ModuleResult, ModuleStatus, ResignationRisk, Severity,
};
use super::{plural, ModuleError, RuleContext, RuleEvaluator};
use serde::Serialize;

const BASELINE_SCORE: f64 = 90.0;
const HIGH_RISK_WEIGHT: f64 = 30.0;
const EMPTY_POOL_SCORE: f64 = 80.0;

// Fixed shares of the key-talent pool; not derived per employee.
const HIGH_RISK_SHARE: f64 = 0.3;
const MEDIUM_RISK_SHARE: f64 = 0.4;
const LOW_RISK_SHARE: f64 = 0.3;
const AT_RISK_SHARE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyTalentProfile {
    pub id: String,
    pub name: String,
    pub department: String,
    pub position: String,
    pub performance: f64,
    pub experience: f64,
    pub salary: f64,
    pub market_value: f64,
    pub gap: f64,
    pub risk_level: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionRisk {
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
    pub total_at_risk: usize,
}

impl RetentionRisk {
    pub fn for_pool(count: usize) -> Self {
        let share = |fraction: f64| (count as f64 * fraction).round() as usize;
        Self {
            high_risk: share(HIGH_RISK_SHARE),
            medium_risk: share(MEDIUM_RISK_SHARE),
            low_risk: share(LOW_RISK_SHARE),
            total_at_risk: share(AT_RISK_SHARE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TalentFindings {
    pub key_talent_count: usize,
    /// Employees the roster itself marks as key talent, whatever the filter says.
    pub flagged_key_talent: usize,
    pub key_talent: Vec<KeyTalentProfile>,
    pub retention_risk: RetentionRisk,
    pub retention_budget: f64,
    pub issues: Vec<Issue>,
}

impl TalentFindings {
    pub fn high_risk(&self) -> impl Iterator<Item = &KeyTalentProfile> {
        self.key_talent
            .iter()
            .filter(|profile| profile.risk_level == Severity::High)
    }
}

pub struct TalentEvaluator;

impl TalentEvaluator {
    fn qualifies(employee: &Employee, context: &RuleContext<'_>) -> bool {
        let policy = context.policy;
        employee.performance >= policy.key_talent_min_performance
            && employee.experience >= policy.key_talent_min_experience
            && policy.is_strategic_department(&employee.department)
    }

    fn profile(employee: &Employee, context: &RuleContext<'_>) -> KeyTalentProfile {
        let policy = context.policy;
        let market_value = employee.salary * (1.0 + policy.talent_market_uplift);
        let gap = employee.salary * policy.talent_market_uplift;

        let trails_market = employee.salary < market_value * policy.talent_pay_fraction;
        let risk_level = match employee.resignation_risk {
            _ if trails_market => Severity::High,
            Some(ResignationRisk::High) => Severity::High,
            Some(ResignationRisk::Medium) => Severity::Medium,
            _ => Severity::Low,
        };

        KeyTalentProfile {
            id: employee.id.clone(),
            name: employee.name.clone(),
            department: employee.department.clone(),
            position: employee.position.clone(),
            performance: employee.performance,
            experience: employee.experience,
            salary: employee.salary,
            market_value,
            gap,
            risk_level,
        }
    }
}

impl RuleEvaluator for TalentEvaluator {
    type Findings = TalentFindings;

    const MODULE: ModuleKind = ModuleKind::Talent;

    fn evaluate(
        &self,
        context: &RuleContext<'_>,
    ) -> Result<ModuleResult<TalentFindings>, ModuleError> {
        let employees = context.require_employees()?;
        let mut status = ModuleStatus::full();

        let key_talent: Vec<KeyTalentProfile> = employees
            .iter()
            .filter(|employee| Self::qualifies(employee, context))
            .map(|employee| Self::profile(employee, context))
            .collect();

        let flagged_key_talent = employees
            .iter()
            .filter(|employee| employee.is_key_talent)
            .count();

        let high_risk: Vec<&KeyTalentProfile> = key_talent
            .iter()
            .filter(|profile| profile.risk_level == Severity::High)
            .collect();
        let retention_budget = high_risk.iter().map(|profile| profile.gap * 12.0).sum();

        let mut issues = Vec::new();
        if !high_risk.is_empty() {
            issues.push(Issue::new(
                IssueKind::KeyTalentRetention,
                Severity::High,
                high_risk.len(),
                format!(
                    "{} key employee{} at high flight risk",
                    high_risk.len(),
                    plural(high_risk.len())
                ),
            ));
        }

        let score = if key_talent.is_empty() {
            status.reduce("no employee meets the key-talent criteria");
            EMPTY_POOL_SCORE
        } else {
            BASELINE_SCORE - HIGH_RISK_WEIGHT * high_risk.len() as f64 / key_talent.len() as f64
        };

        let findings = TalentFindings {
            key_talent_count: key_talent.len(),
            flagged_key_talent,
            retention_risk: RetentionRisk::for_pool(key_talent.len()),
            key_talent,
            retention_budget,
            issues,
        };

        Ok(ModuleResult::new(Self::MODULE, score, status, findings))
    }
}
