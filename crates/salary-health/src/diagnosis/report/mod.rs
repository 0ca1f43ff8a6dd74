mod composer;
pub mod views;

pub use composer::ReportComposer;
pub use views::{DiagnosisResult, IssueView, ModuleScoreView, WorkforceStatistics};
