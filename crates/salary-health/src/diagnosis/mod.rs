//! Salary health diagnostics.
//!
//! A pure pipeline from employee records to a [`DiagnosisResult`]: records are
//! normalized, grouped, run through one evaluator per module, then scored and
//! turned into an action plan. Nothing here performs I/O or keeps state
//! between calls.

pub mod action_plan;
pub mod aggregate;
pub mod domain;
pub mod normalizer;
pub mod policy;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod stats;

#[cfg(test)]
mod tests;

pub use action_plan::{
    ActionPlan, ActionPlanBuilder, PlannedAction, PriorityQuadrant, ReportDescriptor,
    ReportFormat, RoadmapPhase,
};
pub use aggregate::{GroupAggregator, GroupStat};
pub use domain::{
    AffectedEmployee, Confidence, Employee, EmployeeRecord, Gender, Issue, IssueKind, ModuleKind,
    ModuleResult, ModuleStatus, ResignationRisk, Severity,
};
pub use normalizer::{ExcludedRecord, InvalidRecord, NormalizedBatch, RecordNormalizer};
pub use policy::{DiagnosticPolicy, MarketBenchmark, PolicyError, ProductivityBenchmark};
pub use report::{DiagnosisResult, ModuleScoreView, ReportComposer, WorkforceStatistics};
pub use scoring::{HealthPenalty, HealthScore, HealthScorer, PenaltyKind};
pub use stats::{Correlation, StatsError};

/// Diagnoses one batch of records against `policy`.
pub fn compose(records: &[EmployeeRecord], policy: &DiagnosticPolicy) -> DiagnosisResult {
    ReportComposer::compose(records, policy)
}
