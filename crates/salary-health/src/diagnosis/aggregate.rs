use super::domain::Employee;
use super::stats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Salary statistics for one group of employees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub group_key: String,
    pub count: usize,
    pub average: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    /// Set when the coefficient of variation could not be computed.
    pub insufficient_data: bool,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p75: Option<f64>,
}

impl GroupStat {
    pub fn from_members(group_key: impl Into<String>, members: &[&Employee]) -> Self {
        let salaries: Vec<f64> = members.iter().map(|employee| employee.salary).collect();
        Self::from_values(group_key, &salaries)
    }

    pub fn from_values(group_key: impl Into<String>, values: &[f64]) -> Self {
        let (coefficient_of_variation, insufficient_data) =
            match stats::coefficient_of_variation(values) {
                Ok(cv) => (cv, false),
                Err(_) => (0.0, true),
            };

        Self {
            group_key: group_key.into(),
            count: values.len(),
            average: stats::mean(values),
            std_dev: stats::std_dev(values),
            coefficient_of_variation,
            insufficient_data,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            p25: stats::percentile(values, 0.25),
            p75: stats::percentile(values, 0.75),
        }
        .with_empty_bounds()
    }

    fn with_empty_bounds(mut self) -> Self {
        if self.count == 0 {
            self.min = 0.0;
            self.max = 0.0;
        }
        self
    }
}

pub struct GroupAggregator;

impl GroupAggregator {
    /// Partitions employees by `key_fn`. Every employee lands in exactly one group.
    pub fn group_by<'a, K, F>(employees: &'a [Employee], key_fn: F) -> BTreeMap<K, Vec<&'a Employee>>
    where
        K: Ord,
        F: Fn(&Employee) -> K,
    {
        let mut groups: BTreeMap<K, Vec<&Employee>> = BTreeMap::new();
        for employee in employees {
            groups.entry(key_fn(employee)).or_default().push(employee);
        }
        groups
    }

    pub fn salary_stats<'a, F>(employees: &'a [Employee], key_fn: F) -> Vec<GroupStat>
    where
        F: Fn(&Employee) -> String,
    {
        Self::group_by(employees, key_fn)
            .into_iter()
            .map(|(key, members)| GroupStat::from_members(key, &members))
            .collect()
    }

    pub fn by_department(employees: &[Employee]) -> Vec<GroupStat> {
        Self::salary_stats(employees, |employee| employee.department.clone())
    }

    pub fn by_position(employees: &[Employee]) -> Vec<GroupStat> {
        Self::salary_stats(employees, |employee| employee.position.clone())
    }

    pub fn by_level(employees: &[Employee]) -> Vec<GroupStat> {
        Self::salary_stats(employees, |employee| employee.level.clone())
    }
}
