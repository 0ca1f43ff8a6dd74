//! CSV roster ingestion.
//!
//! Maps an HR spreadsheet export onto [`EmployeeRecord`]s. Blank cells stay
//! missing; validation of required values is left to the diagnosis engine so
//! that bad rows are reported rather than silently dropped here.

mod parser;

use crate::diagnosis::EmployeeRecord;
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;

pub use parser::InvalidCell;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidCell(InvalidCell),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidCell(cell) if cell.value.is_empty() => write!(
                f,
                "line {}: column '{}' is required",
                cell.line, cell.column
            ),
            RosterImportError::InvalidCell(cell) => write!(
                f,
                "line {}: column '{}' has unreadable value '{}'",
                cell.line, cell.column, cell.value
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidCell(_) => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<parser::ParseError> for RosterImportError {
    fn from(err: parser::ParseError) -> Self {
        match err {
            parser::ParseError::Csv(err) => Self::Csv(err),
            parser::ParseError::Cell(cell) => Self::InvalidCell(cell),
        }
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<EmployeeRecord>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, as_of)
    }

    /// `as_of` enables deriving company tenure from the hire date.
    pub fn from_reader<R: Read>(
        reader: R,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<EmployeeRecord>, RosterImportError> {
        let records = parser::parse_records(reader, as_of)?;
        tracing::debug!(rows = records.len(), "roster imported");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::{Gender, ResignationRisk};
    use std::io::Cursor;

    const HEADER: &str = "Employee ID,Name,Department,Position,Level,Base Salary,Performance Bonus,Experience,Company Tenure,Gender,Performance,Key Talent,Resignation Risk,Hire Date\n";

    fn import(body: &str, as_of: Option<NaiveDate>) -> Result<Vec<EmployeeRecord>, RosterImportError> {
        RosterImporter::from_reader(Cursor::new(format!("{HEADER}{body}")), as_of)
    }

    #[test]
    fn maps_columns_onto_records() {
        let records = import(
            "E001,Ada,Engineering,Engineer,P5,\"18,000\",24000,6,4,F,4.5,yes,high,\n",
            None,
        )
        .expect("roster parses");

        assert_eq!(records.len(), 1);
        let ada = &records[0];
        assert_eq!(ada.id, "E001");
        assert_eq!(ada.department, "Engineering");
        assert_eq!(ada.salary, 18_000.0);
        assert_eq!(ada.performance_bonus, Some(24_000.0));
        assert_eq!(ada.experience, Some(6.0));
        assert_eq!(ada.company_tenure, Some(4.0));
        assert_eq!(ada.gender, Some(Gender::Female));
        assert_eq!(ada.performance, Some(4.5));
        assert!(ada.is_key_talent);
        assert_eq!(ada.resignation_risk, Some(ResignationRisk::High));
    }

    #[test]
    fn blank_cells_stay_missing() {
        let records = import("E002,Bo,,,,,,,,,,,,\n", None).expect("roster parses");
        let bo = &records[0];

        assert_eq!(bo.salary, 0.0);
        assert_eq!(bo.experience, None);
        assert_eq!(bo.performance, None);
        assert_eq!(bo.gender, None);
        assert!(bo.department.is_empty());
        assert!(!bo.is_key_talent);
    }

    #[test]
    fn derives_tenure_from_hire_date_when_as_of_given() {
        let body = "E003,Cy,Sales,Rep,P2,9000,,2,,M,3,no,low,2020-01-01\n";
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1);

        let derived = import(body, as_of).expect("roster parses");
        let tenure = derived[0].company_tenure.expect("tenure derived");
        assert!((tenure - 4.0).abs() < 1e-9);

        let undated = import(body, None).expect("roster parses");
        assert_eq!(undated[0].company_tenure, None);
    }

    #[test]
    fn explicit_tenure_wins_over_hire_date() {
        let body = "E004,Di,Sales,Rep,P2,9000,,2,1.5,M,3,no,low,2010-01-01\n";
        let records =
            import(body, NaiveDate::from_ymd_opt(2024, 1, 1)).expect("roster parses");
        assert_eq!(records[0].company_tenure, Some(1.5));
    }

    #[test]
    fn unreadable_number_reports_line_and_column() {
        let error = import("E005,Ed,Ops,Analyst,P3,lots,,2,,M,3,no,low,\n", None)
            .expect_err("salary is not a number");

        match error {
            RosterImportError::InvalidCell(cell) => {
                assert_eq!(cell.line, 2);
                assert_eq!(cell.column, "Base Salary");
                assert_eq!(cell.value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_employee_id_is_rejected() {
        let error = import(",Fay,Ops,Analyst,P3,9000,,2,,F,3,no,low,\n", None)
            .expect_err("id is required");
        assert!(error.to_string().contains("Employee ID"));
    }

    #[test]
    fn salary_alias_is_accepted() {
        let csv = "Employee ID,Name,Salary,Experience,Performance\nE006,Gus,7000,1,3\n";
        let records =
            RosterImporter::from_reader(Cursor::new(csv), None).expect("roster parses");
        assert_eq!(records[0].salary, 7_000.0);
        assert_eq!(records[0].name, "Gus");
    }

    #[test]
    fn missing_file_is_io_error() {
        let error = RosterImporter::from_path("/nonexistent/roster.csv", None)
            .expect_err("file does not exist");
        assert!(matches!(error, RosterImportError::Io(_)));
    }
}
