use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Lenient parser for roster exports ("M", "male", "F", ...).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => None,
            "m" | "male" | "man" => Some(Self::Male),
            "f" | "female" | "woman" => Some(Self::Female),
            _ => Some(Self::Other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResignationRisk {
    Low,
    Medium,
    High,
}

impl ResignationRisk {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// A compensation record as handed over by the ingestion layer.
///
/// `experience` and `performance` are required by the engine but modelled as
/// optional so that a missing value can be reported instead of rejected at the
/// serialization boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub contract_type: Option<String>,
    /// Absent reads as `0`, which the normalizer excludes as non-positive.
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub performance_bonus: Option<f64>,
    #[serde(default)]
    pub allowances: Option<f64>,
    #[serde(default)]
    pub year_end_bonus: Option<f64>,
    #[serde(default)]
    pub total_annual_salary: Option<f64>,
    #[serde(default)]
    pub experience: Option<f64>,
    #[serde(default)]
    pub company_tenure: Option<f64>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub performance: Option<f64>,
    #[serde(default)]
    pub is_key_talent: bool,
    #[serde(default)]
    pub resignation_risk: Option<ResignationRisk>,
    #[serde(default)]
    pub skill_level: Option<String>,
    #[serde(default)]
    pub output: Option<f64>,
}

/// Validated record with every field the rule engine relies on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub department: String,
    pub position: String,
    pub level: String,
    pub contract_type: String,
    pub salary: f64,
    pub performance_bonus: Option<f64>,
    pub allowances: Option<f64>,
    pub year_end_bonus: Option<f64>,
    pub annual_total_compensation: f64,
    pub experience: f64,
    pub company_tenure: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub education: Option<String>,
    pub performance: f64,
    pub is_key_talent: bool,
    pub resignation_risk: Option<ResignationRisk>,
    pub skill_level: Option<String>,
    pub output: Option<f64>,
}

impl Employee {
    pub fn annual_base(&self) -> f64 {
        self.salary * 12.0
    }

    /// Bonus money that depends on results rather than on the contract.
    pub fn variable_pay(&self) -> f64 {
        self.performance_bonus.unwrap_or(0.0) + self.year_end_bonus.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MinimumWageViolation,
    MinimumWageBuffer,
    InternalPayDispersion,
    UnderpaidHighPerformer,
    GenderPayGap,
    PerformancePayMismatch,
    MarketLag,
    KeyPositionGap,
    PayMixDeviation,
    WeakIncentive,
    CostInefficiency,
    KeyTalentRetention,
    SalaryOutlier,
    DataIntegrity,
}

/// An employee singled out by a rule, with the value the rule would move them to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffectedEmployee {
    pub id: String,
    pub name: String,
    pub current: f64,
    pub suggested: f64,
}

impl AffectedEmployee {
    pub fn new(employee: &Employee, current: f64, suggested: f64) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.name.clone(),
            current,
            suggested,
        }
    }

    pub fn shortfall(&self) -> f64 {
        (self.suggested - self.current).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub affected_count: usize,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_employees: Vec<AffectedEmployee>,
}

impl Issue {
    pub fn new(
        kind: IssueKind,
        severity: Severity,
        affected_count: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            affected_count,
            description: description.into(),
            affected_employees: Vec::new(),
        }
    }

    pub fn with_employees(mut self, employees: Vec<AffectedEmployee>) -> Self {
        self.affected_employees = employees;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Compliance,
    Fairness,
    Competitiveness,
    Structure,
    CostEfficiency,
    Talent,
    Anomalies,
    ActionPlan,
}

impl ModuleKind {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Compliance,
            Self::Fairness,
            Self::Competitiveness,
            Self::Structure,
            Self::CostEfficiency,
            Self::Talent,
            Self::Anomalies,
            Self::ActionPlan,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliance => "Legal Compliance",
            Self::Fairness => "Internal Fairness",
            Self::Competitiveness => "External Competitiveness",
            Self::Structure => "Pay Structure",
            Self::CostEfficiency => "Cost Efficiency",
            Self::Talent => "Key Talent",
            Self::Anomalies => "Anomaly Detection",
            Self::ActionPlan => "Action Plan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Full,
    Reduced,
    Unavailable,
}

/// How much a module result can be trusted, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleStatus {
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ModuleStatus {
    pub fn full() -> Self {
        Self {
            confidence: Confidence::Full,
            notes: Vec::new(),
        }
    }

    pub fn reduce(&mut self, note: impl Into<String>) {
        if self.confidence == Confidence::Full {
            self.confidence = Confidence::Reduced;
        }
        self.notes.push(note.into());
    }
}

/// Score and status shared by every module, wrapping the module's own findings.
///
/// `findings` is `None` only when the module could not run at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleResult<T> {
    pub module: ModuleKind,
    pub overall_score: u8,
    pub status: ModuleStatus,
    pub findings: Option<T>,
}

impl<T> ModuleResult<T> {
    pub fn new(module: ModuleKind, overall_score: f64, status: ModuleStatus, findings: T) -> Self {
        Self {
            module,
            overall_score: clamp_score(overall_score),
            status,
            findings: Some(findings),
        }
    }

    pub fn unavailable(module: ModuleKind, reason: impl Into<String>) -> Self {
        Self {
            module,
            overall_score: 0,
            status: ModuleStatus {
                confidence: Confidence::Unavailable,
                notes: vec![reason.into()],
            },
            findings: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.findings.is_some()
    }
}

pub(crate) fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.clamp(0.0, 100.0).round() as u8
}
