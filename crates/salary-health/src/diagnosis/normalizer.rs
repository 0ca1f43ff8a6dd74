use super::domain::{Employee, EmployeeRecord};
use serde::Serialize;

pub const DEFAULT_DEPARTMENT: &str = "Unassigned";
pub const DEFAULT_LABEL: &str = "Unspecified";
pub const DEFAULT_CONTRACT_TYPE: &str = "full_time";

/// Reasons a record is kept out of every statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRecord {
    #[error("base salary must be a positive number")]
    NonPositiveSalary,
    #[error("years of experience missing")]
    MissingExperience,
    #[error("years of experience must be a non-negative number")]
    InvalidExperience,
    #[error("performance score missing")]
    MissingPerformance,
    #[error("performance score must be a finite number")]
    InvalidPerformance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedRecord {
    pub id: String,
    pub name: String,
    pub reason: InvalidRecord,
    pub detail: String,
}

/// Records that passed validation plus a trace of the ones that did not.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub employees: Vec<Employee>,
    pub excluded: Vec<ExcludedRecord>,
}

impl NormalizedBatch {
    pub fn total(&self) -> usize {
        self.employees.len() + self.excluded.len()
    }
}

pub struct RecordNormalizer;

impl RecordNormalizer {
    pub fn normalize(records: &[EmployeeRecord]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for record in records {
            match Self::normalize_record(record) {
                Ok(employee) => batch.employees.push(employee),
                Err(reason) => {
                    tracing::warn!(id = %record.id, %reason, "excluding employee record");
                    batch.excluded.push(ExcludedRecord {
                        id: record.id.clone(),
                        name: record.name.clone(),
                        reason,
                        detail: reason.to_string(),
                    });
                }
            }
        }

        batch
    }

    pub fn normalize_record(record: &EmployeeRecord) -> Result<Employee, InvalidRecord> {
        if !record.salary.is_finite() || record.salary <= 0.0 {
            return Err(InvalidRecord::NonPositiveSalary);
        }

        let experience = match record.experience {
            None => return Err(InvalidRecord::MissingExperience),
            Some(value) if !value.is_finite() || value < 0.0 => {
                return Err(InvalidRecord::InvalidExperience)
            }
            Some(value) => value,
        };

        let performance = match record.performance {
            None => return Err(InvalidRecord::MissingPerformance),
            Some(value) if !value.is_finite() => return Err(InvalidRecord::InvalidPerformance),
            Some(value) => value,
        };

        let performance_bonus = amount(record.performance_bonus);
        let allowances = amount(record.allowances);
        let year_end_bonus = amount(record.year_end_bonus);

        let annual_total_compensation = match amount(record.total_annual_salary) {
            Some(total) if total > 0.0 => total,
            _ => {
                record.salary * 12.0
                    + allowances.unwrap_or(0.0) * 12.0
                    + performance_bonus.unwrap_or(0.0)
                    + year_end_bonus.unwrap_or(0.0)
            }
        };

        Ok(Employee {
            id: record.id.trim().to_string(),
            name: record.name.trim().to_string(),
            department: label_or(&record.department, DEFAULT_DEPARTMENT),
            position: label_or(&record.position, DEFAULT_LABEL),
            level: label_or(&record.level, DEFAULT_LABEL),
            contract_type: record
                .contract_type
                .as_deref()
                .map(|value| label_or(value, DEFAULT_CONTRACT_TYPE))
                .unwrap_or_else(|| DEFAULT_CONTRACT_TYPE.to_string()),
            salary: record.salary,
            performance_bonus,
            allowances,
            year_end_bonus,
            annual_total_compensation,
            experience,
            company_tenure: amount(record.company_tenure),
            age: record.age.filter(|age| *age > 0),
            gender: record.gender,
            education: optional_label(record.education.as_deref()),
            performance,
            is_key_talent: record.is_key_talent,
            resignation_risk: record.resignation_risk,
            skill_level: optional_label(record.skill_level.as_deref()),
            output: amount(record.output),
        })
    }
}

fn amount(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && *value >= 0.0)
}

fn label_or(value: &str, fallback: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        fallback.to_string()
    } else {
        collapsed
    }
}

fn optional_label(value: Option<&str>) -> Option<String> {
    value
        .map(|value| value.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, salary: f64) -> EmployeeRecord {
        EmployeeRecord {
            id: id.to_string(),
            name: format!("Employee {id}"),
            department: "Engineering".to_string(),
            position: "Engineer".to_string(),
            level: "P5".to_string(),
            salary,
            experience: Some(4.0),
            performance: Some(3.5),
            ..EmployeeRecord::default()
        }
    }

    #[test]
    fn excludes_invalid_records_with_reasons() {
        let mut missing_performance = record("3", 9000.0);
        missing_performance.performance = None;
        let mut negative_experience = record("4", 9000.0);
        negative_experience.experience = Some(-1.0);

        let batch = RecordNormalizer::normalize(&[
            record("1", 9000.0),
            record("2", 0.0),
            missing_performance,
            negative_experience,
            record("5", f64::NAN),
        ]);

        assert_eq!(batch.employees.len(), 1);
        assert_eq!(batch.total(), 5);
        let reasons: Vec<InvalidRecord> = batch.excluded.iter().map(|entry| entry.reason).collect();
        assert_eq!(
            reasons,
            vec![
                InvalidRecord::NonPositiveSalary,
                InvalidRecord::MissingPerformance,
                InvalidRecord::InvalidExperience,
                InvalidRecord::NonPositiveSalary,
            ]
        );
    }

    #[test]
    fn fills_default_labels() {
        let mut raw = record("1", 9000.0);
        raw.department = "   ".to_string();
        raw.position = "  Senior   Engineer ".to_string();
        raw.level = String::new();
        raw.education = Some("  ".to_string());

        let employee = RecordNormalizer::normalize_record(&raw).expect("valid record");
        assert_eq!(employee.department, DEFAULT_DEPARTMENT);
        assert_eq!(employee.position, "Senior Engineer");
        assert_eq!(employee.level, DEFAULT_LABEL);
        assert_eq!(employee.contract_type, DEFAULT_CONTRACT_TYPE);
        assert!(employee.education.is_none());
    }

    #[test]
    fn derives_annual_compensation_when_total_missing() {
        let mut raw = record("1", 10000.0);
        raw.allowances = Some(500.0);
        raw.performance_bonus = Some(6000.0);
        raw.year_end_bonus = Some(10000.0);

        let employee = RecordNormalizer::normalize_record(&raw).expect("valid record");
        assert_eq!(employee.annual_total_compensation, 120000.0 + 6000.0 + 6000.0 + 10000.0);

        raw.total_annual_salary = Some(150000.0);
        let employee = RecordNormalizer::normalize_record(&raw).expect("valid record");
        assert_eq!(employee.annual_total_compensation, 150000.0);
    }

    #[test]
    fn drops_negative_optional_amounts() {
        let mut raw = record("1", 10000.0);
        raw.performance_bonus = Some(-50.0);
        raw.company_tenure = Some(f64::INFINITY);

        let employee = RecordNormalizer::normalize_record(&raw).expect("valid record");
        assert!(employee.performance_bonus.is_none());
        assert!(employee.company_tenure.is_none());
    }
}
