use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Market salary percentiles (monthly) for one job category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketBenchmark {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Expected output per unit of annual salary for one job category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductivityBenchmark {
    /// Used when the records carry no per-employee output figures.
    #[serde(default)]
    pub average_output: Option<f64>,
    pub benchmark_ratio: f64,
}

/// Every threshold and benchmark the rule evaluators consult.
///
/// Deserializes from partial JSON; absent fields take the documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticPolicy {
    pub minimum_wage: f64,
    /// Fraction above the minimum wage still treated as at-risk.
    pub minimum_wage_buffer: f64,
    pub fairness_group_share: f64,
    pub fairness_adjustment_ratio: f64,
    pub high_performer_threshold: f64,
    pub max_position_cv: f64,
    pub gender_gap_threshold: f64,
    pub department_gap_threshold: f64,
    pub performance_correlation_floor: f64,
    pub market_average_salary: Option<f64>,
    pub market_salary_floor: f64,
    pub market_benchmarks: BTreeMap<String, MarketBenchmark>,
    pub key_positions: Vec<String>,
    pub key_position_gap_tolerance: f64,
    pub pay_mix_benchmarks: BTreeMap<String, f64>,
    pub default_fixed_ratio: Option<f64>,
    pub pay_mix_tolerance: f64,
    /// Percentage of company revenue attributed to each department.
    pub department_revenue_share: BTreeMap<String, f64>,
    pub productivity_benchmarks: BTreeMap<String, ProductivityBenchmark>,
    pub strategic_departments: Vec<String>,
    pub key_talent_min_performance: f64,
    pub key_talent_min_experience: f64,
    pub talent_market_uplift: f64,
    pub talent_pay_fraction: f64,
    pub anomaly_deviation: f64,
    pub data_quality_baseline: f64,
}

impl Default for DiagnosticPolicy {
    fn default() -> Self {
        Self {
            minimum_wage: 2590.0,
            minimum_wage_buffer: 0.10,
            fairness_group_share: 0.2,
            fairness_adjustment_ratio: 0.9,
            high_performer_threshold: 4.0,
            max_position_cv: 0.3,
            gender_gap_threshold: 0.10,
            department_gap_threshold: 0.40,
            performance_correlation_floor: 0.3,
            market_average_salary: None,
            market_salary_floor: 0.9,
            market_benchmarks: BTreeMap::new(),
            key_positions: Vec::new(),
            key_position_gap_tolerance: 0.15,
            pay_mix_benchmarks: BTreeMap::new(),
            default_fixed_ratio: None,
            pay_mix_tolerance: 0.10,
            department_revenue_share: BTreeMap::new(),
            productivity_benchmarks: BTreeMap::new(),
            strategic_departments: vec![
                "Engineering".to_string(),
                "Product".to_string(),
                "Sales".to_string(),
            ],
            key_talent_min_performance: 4.0,
            key_talent_min_experience: 3.0,
            talent_market_uplift: 0.25,
            talent_pay_fraction: 0.75,
            anomaly_deviation: 0.5,
            data_quality_baseline: 85.0,
        }
    }
}

impl DiagnosticPolicy {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_reader(reader)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.minimum_wage.is_finite() || self.minimum_wage < 0.0 {
            return Err(PolicyError::Invalid {
                field: "minimum_wage",
                reason: "must be a non-negative number",
            });
        }

        let fractions = [
            ("minimum_wage_buffer", self.minimum_wage_buffer),
            ("fairness_group_share", self.fairness_group_share),
            ("fairness_adjustment_ratio", self.fairness_adjustment_ratio),
            ("gender_gap_threshold", self.gender_gap_threshold),
            ("department_gap_threshold", self.department_gap_threshold),
            ("market_salary_floor", self.market_salary_floor),
            ("key_position_gap_tolerance", self.key_position_gap_tolerance),
            ("pay_mix_tolerance", self.pay_mix_tolerance),
            ("talent_pay_fraction", self.talent_pay_fraction),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(PolicyError::Invalid {
                    field,
                    reason: "must be a fraction between 0 and 1",
                });
            }
        }

        if !self.anomaly_deviation.is_finite() || self.anomaly_deviation <= 0.0 {
            return Err(PolicyError::Invalid {
                field: "anomaly_deviation",
                reason: "must be positive",
            });
        }

        let non_negative = [
            ("high_performer_threshold", self.high_performer_threshold),
            ("max_position_cv", self.max_position_cv),
            ("talent_market_uplift", self.talent_market_uplift),
            ("key_talent_min_performance", self.key_talent_min_performance),
            ("key_talent_min_experience", self.key_talent_min_experience),
            (
                "market_average_salary",
                self.market_average_salary.unwrap_or(0.0),
            ),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PolicyError::Invalid {
                    field,
                    reason: "must be a non-negative number",
                });
            }
        }

        if !(-1.0..=1.0).contains(&self.performance_correlation_floor) {
            return Err(PolicyError::Invalid {
                field: "performance_correlation_floor",
                reason: "must lie between -1 and 1",
            });
        }

        if !(0.0..=100.0).contains(&self.data_quality_baseline) {
            return Err(PolicyError::Invalid {
                field: "data_quality_baseline",
                reason: "must be a score between 0 and 100",
            });
        }

        for benchmark in self.market_benchmarks.values() {
            if !(benchmark.p25 <= benchmark.p50 && benchmark.p50 <= benchmark.p75) {
                return Err(PolicyError::Invalid {
                    field: "market_benchmarks",
                    reason: "percentiles must satisfy p25 <= p50 <= p75",
                });
            }
        }

        Ok(())
    }

    pub fn market_benchmark(&self, category: &str) -> Option<&MarketBenchmark> {
        lookup(&self.market_benchmarks, category)
    }

    pub fn pay_mix_benchmark(&self, category: &str) -> Option<f64> {
        lookup(&self.pay_mix_benchmarks, category).copied()
    }

    pub fn revenue_share(&self, department: &str) -> Option<f64> {
        lookup(&self.department_revenue_share, department).copied()
    }

    pub fn productivity_benchmark(&self, category: &str) -> Option<&ProductivityBenchmark> {
        lookup(&self.productivity_benchmarks, category)
    }

    pub fn is_strategic_department(&self, department: &str) -> bool {
        contains_label(&self.strategic_departments, department)
    }

    pub fn is_key_position(&self, position: &str) -> bool {
        contains_label(&self.key_positions, position)
    }
}

fn lookup<'a, V>(map: &'a BTreeMap<String, V>, key: &str) -> Option<&'a V> {
    let key = key.trim();
    map.get(key).or_else(|| {
        map.iter()
            .find(|(candidate, _)| candidate.trim().eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

fn contains_label(labels: &[String], value: &str) -> bool {
    let value = value.trim();
    labels
        .iter()
        .any(|label| label.trim().eq_ignore_ascii_case(value))
}

#[derive(Debug)]
pub enum PolicyError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::Io(err) => write!(f, "failed to read diagnostic policy: {}", err),
            PolicyError::Parse(err) => write!(f, "invalid diagnostic policy JSON: {}", err),
            PolicyError::Invalid { field, reason } => {
                write!(f, "diagnostic policy field '{}' {}", field, reason)
            }
        }
    }
}

impl std::error::Error for PolicyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PolicyError::Io(err) => Some(err),
            PolicyError::Parse(err) => Some(err),
            PolicyError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for PolicyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
