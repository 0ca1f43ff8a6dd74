use crate::diagnosis::{EmployeeRecord, Gender, ResignationRisk};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

const DAYS_PER_YEAR: f64 = 365.25;

/// A cell that could not be turned into the expected type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCell {
    pub line: u64,
    pub column: &'static str,
    pub value: String,
}

#[derive(Debug)]
pub(crate) enum ParseError {
    Csv(csv::Error),
    Cell(InvalidCell),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_records<R: Read>(
    reader: R,
    as_of: Option<NaiveDate>,
) -> Result<Vec<EmployeeRecord>, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for raw in csv_reader.records() {
        let raw = raw?;
        let line = raw.position().map_or(0, |position| position.line());
        let row: RosterRow = raw.deserialize(Some(&headers))?;
        if row.is_blank() {
            continue;
        }
        records.push(row.into_record(line, as_of).map_err(ParseError::Cell)?);
    }

    Ok(records)
}

#[derive(Debug, Default, Deserialize)]
struct RosterRow {
    #[serde(
        rename = "Employee ID",
        alias = "ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    id: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Department", default, deserialize_with = "empty_string_as_none")]
    department: Option<String>,
    #[serde(
        rename = "Position",
        alias = "Job Title",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    position: Option<String>,
    #[serde(rename = "Level", default, deserialize_with = "empty_string_as_none")]
    level: Option<String>,
    #[serde(rename = "Contract Type", default, deserialize_with = "empty_string_as_none")]
    contract_type: Option<String>,
    #[serde(
        rename = "Base Salary",
        alias = "Salary",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    salary: Option<String>,
    #[serde(rename = "Performance Bonus", default, deserialize_with = "empty_string_as_none")]
    performance_bonus: Option<String>,
    #[serde(rename = "Allowances", default, deserialize_with = "empty_string_as_none")]
    allowances: Option<String>,
    #[serde(rename = "Year-End Bonus", default, deserialize_with = "empty_string_as_none")]
    year_end_bonus: Option<String>,
    #[serde(rename = "Total Annual Salary", default, deserialize_with = "empty_string_as_none")]
    total_annual_salary: Option<String>,
    #[serde(rename = "Experience", default, deserialize_with = "empty_string_as_none")]
    experience: Option<String>,
    #[serde(rename = "Company Tenure", default, deserialize_with = "empty_string_as_none")]
    company_tenure: Option<String>,
    #[serde(rename = "Age", default, deserialize_with = "empty_string_as_none")]
    age: Option<String>,
    #[serde(rename = "Gender", default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(rename = "Education", default, deserialize_with = "empty_string_as_none")]
    education: Option<String>,
    #[serde(
        rename = "Performance",
        alias = "Performance Score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    performance: Option<String>,
    #[serde(rename = "Key Talent", default, deserialize_with = "empty_string_as_none")]
    key_talent: Option<String>,
    #[serde(rename = "Resignation Risk", default, deserialize_with = "empty_string_as_none")]
    resignation_risk: Option<String>,
    #[serde(rename = "Skill Level", default, deserialize_with = "empty_string_as_none")]
    skill_level: Option<String>,
    #[serde(rename = "Output", default, deserialize_with = "empty_string_as_none")]
    output: Option<String>,
    #[serde(rename = "Hire Date", default, deserialize_with = "empty_string_as_none")]
    hire_date: Option<String>,
}

impl RosterRow {
    fn is_blank(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.salary.is_none()
    }

    fn into_record(self, line: u64, as_of: Option<NaiveDate>) -> Result<EmployeeRecord, InvalidCell> {
        let cell = |column: &'static str| {
            move |value: &str| InvalidCell {
                line,
                column,
                value: value.to_string(),
            }
        };

        let id = self.id.ok_or_else(|| cell("Employee ID")(""))?;
        let hire_date = optional(self.hire_date.as_deref(), parse_date, cell("Hire Date"))?;
        let company_tenure = match optional(
            self.company_tenure.as_deref(),
            parse_amount,
            cell("Company Tenure"),
        )? {
            Some(tenure) => Some(tenure),
            None => hire_date.zip(as_of).map(|(hired, as_of)| tenure_years(hired, as_of)),
        };

        Ok(EmployeeRecord {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            department: self.department.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            level: self.level.unwrap_or_default(),
            contract_type: self.contract_type,
            salary: optional(self.salary.as_deref(), parse_amount, cell("Base Salary"))?
                .unwrap_or(0.0),
            performance_bonus: optional(
                self.performance_bonus.as_deref(),
                parse_amount,
                cell("Performance Bonus"),
            )?,
            allowances: optional(self.allowances.as_deref(), parse_amount, cell("Allowances"))?,
            year_end_bonus: optional(
                self.year_end_bonus.as_deref(),
                parse_amount,
                cell("Year-End Bonus"),
            )?,
            total_annual_salary: optional(
                self.total_annual_salary.as_deref(),
                parse_amount,
                cell("Total Annual Salary"),
            )?,
            experience: optional(self.experience.as_deref(), parse_amount, cell("Experience"))?,
            company_tenure,
            age: optional(self.age.as_deref(), |value| value.parse().ok(), cell("Age"))?,
            gender: self.gender.as_deref().and_then(Gender::parse),
            education: self.education,
            performance: optional(self.performance.as_deref(), parse_amount, cell("Performance"))?,
            is_key_talent: optional(self.key_talent.as_deref(), parse_flag, cell("Key Talent"))?
                .unwrap_or(false),
            resignation_risk: optional(
                self.resignation_risk.as_deref(),
                ResignationRisk::parse,
                cell("Resignation Risk"),
            )?,
            skill_level: self.skill_level,
            output: optional(self.output.as_deref(), parse_amount, cell("Output"))?,
        })
    }
}

/// Blank stays `None`; a non-blank value that does not parse is an error.
fn optional<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    invalid: impl Fn(&str) -> InvalidCell,
) -> Result<Option<T>, InvalidCell> {
    match value {
        None => Ok(None),
        Some(raw) => parse(raw).map(Some).ok_or_else(|| invalid(raw)),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Accepts thousands separators and a leading currency symbol.
pub(crate) fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_start_matches(['$', '€', '£', '¥'])
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "x" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Whole days between the dates over 365.25; a future hire date counts as zero.
pub(crate) fn tenure_years(hired: NaiveDate, as_of: NaiveDate) -> f64 {
    let days = (as_of - hired).num_days().max(0);
    days as f64 / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_tolerate_separators_and_currency() {
        assert_eq!(parse_amount("12,500"), Some(12_500.0));
        assert_eq!(parse_amount("$ 3,000.50"), Some(3_000.5));
        assert_eq!(parse_amount("¥8000"), Some(8_000.0));
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn dates_accept_common_export_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 15);
        assert_eq!(parse_date("2021-03-15"), expected);
        assert_eq!(parse_date("2021/03/15"), expected);
        assert_eq!(parse_date("03/15/2021"), expected);
        assert_eq!(parse_date("2021-03-15T09:30:00Z"), expected);
        assert_eq!(parse_date("15th March"), None);
    }

    #[test]
    fn tenure_is_days_over_average_year() {
        let hired = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date");
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let tenure = tenure_years(hired, as_of);
        assert!((tenure - 1461.0 / 365.25).abs() < 1e-9);
        assert!((tenure - 4.0).abs() < 1e-9);
        assert_eq!(tenure_years(as_of, hired), 0.0);
    }

    #[test]
    fn flags_reject_unknown_words() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
