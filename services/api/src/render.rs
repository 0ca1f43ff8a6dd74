use salary_health::diagnosis::{Confidence, DiagnosisResult};

const TOP_ISSUES: usize = 10;

/// Plain-text summary for terminal output.
pub(crate) fn render_text(result: &DiagnosisResult, source: &str) -> String {
    let mut lines = Vec::new();
    let stats = &result.statistics;

    lines.push(format!("Salary health diagnosis ({source})"));
    lines.push(format!(
        "Health score: {}/100 (baseline {})",
        result.health_score.score, result.health_score.baseline
    ));
    for penalty in &result.health_score.penalties {
        lines.push(format!("  - {} points: {}", penalty.points, penalty.notes));
    }

    lines.push(String::new());
    lines.push(format!(
        "Workforce: {} records, {} analyzed, {} excluded",
        stats.total_records,
        stats.analyzed_records,
        stats.excluded_records.len()
    ));
    lines.push(format!(
        "Monthly salary: avg {:.0} | median {:.0} | range {:.0}-{:.0} | CV {:.2}",
        stats.average_salary,
        stats.median_salary,
        stats.min_salary,
        stats.max_salary,
        stats.salary_coefficient_of_variation
    ));
    let correlation = if stats.correlation_insufficient_data {
        "n/a".to_string()
    } else {
        format!("{:.2}", stats.performance_salary_correlation)
    };
    lines.push(format!(
        "Annual payroll {:.0} | performance/salary correlation {}",
        stats.total_annual_payroll, correlation
    ));
    for excluded in &stats.excluded_records {
        lines.push(format!(
            "  excluded {} ({}): {}",
            excluded.id, excluded.name, excluded.detail
        ));
    }

    lines.push(String::new());
    lines.push("Module scores:".to_string());
    for view in result.module_scores() {
        let marker = match view.confidence {
            Confidence::Full => "",
            Confidence::Reduced => " (reduced confidence)",
            Confidence::Unavailable => " (unavailable)",
        };
        lines.push(format!("  {:<26} {:>3}{}", view.label, view.score, marker));
    }

    let issues = result.issues();
    if !issues.is_empty() {
        lines.push(String::new());
        lines.push(format!("Issues ({} total):", issues.len()));
        for view in issues.iter().take(TOP_ISSUES) {
            lines.push(format!(
                "  [{}] {}: {}",
                view.severity_label,
                view.module.label(),
                view.issue.description
            ));
        }
    }

    if let Some(plan) = &result.action_plan.findings {
        lines.push(String::new());
        lines.push("Key findings:".to_string());
        for finding in &plan.key_findings {
            lines.push(format!("  - {finding}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Prioritized actions (estimated cost {:.0}):",
            plan.total_estimated_cost()
        ));
        for action in &plan.prioritized_actions {
            lines.push(format!(
                "  - [{}] {} | {} | {} | cost {:.0}",
                action.quadrant.label(),
                action.title,
                action.responsible_department,
                action.timeline,
                action.estimated_cost
            ));
        }

        lines.push(String::new());
        lines.push("Roadmap:".to_string());
        for phase in &plan.implementation_roadmap {
            lines.push(format!(
                "  Phase {}: {} ({})",
                phase.phase, phase.name, phase.duration
            ));
            for action in &phase.actions {
                lines.push(format!("    - {action}"));
            }
        }
    }

    lines.join("\n")
}
