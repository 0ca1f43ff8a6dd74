use proptest::prelude::*;
use salary_health::diagnosis::stats::{
    coefficient_of_variation, pearson_correlation, StatsError,
};
use salary_health::diagnosis::{compose, DiagnosticPolicy, EmployeeRecord, Gender};

const DEPARTMENTS: [&str; 4] = ["Engineering", "Sales", "Operations", "Support"];
const POSITIONS: [&str; 3] = ["Engineer", "Analyst", "Manager"];

fn roster() -> impl Strategy<Value = Vec<EmployeeRecord>> {
    prop::collection::vec(
        (
            -1_000.0..60_000.0f64,
            1.0..5.0f64,
            0usize..4,
            0usize..3,
            0.0..15.0f64,
            any::<bool>(),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(
                |(i, (salary, performance, department, position, experience, female))| {
                    EmployeeRecord {
                        id: format!("E{i:03}"),
                        name: format!("Employee {i}"),
                        department: DEPARTMENTS[department].to_string(),
                        position: POSITIONS[position].to_string(),
                        level: "P2".to_string(),
                        salary,
                        experience: Some(experience),
                        performance: Some(performance),
                        gender: Some(if female { Gender::Female } else { Gender::Male }),
                        performance_bonus: Some(salary.max(0.0) * performance),
                        ..EmployeeRecord::default()
                    }
                },
            )
            .collect()
    })
}

proptest! {
    #[test]
    fn correlation_stays_within_unit_interval(
        pairs in prop::collection::vec((-10_000.0..10_000.0f64, -10_000.0..10_000.0f64), 1..50)
    ) {
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        match pearson_correlation(&xs, &ys) {
            Ok(r) => prop_assert!((-1.0..=1.0).contains(&r)),
            Err(err) => prop_assert_eq!(err, StatsError::Degenerate),
        }
    }

    #[test]
    fn series_correlates_perfectly_with_itself(
        values in prop::collection::vec(0u32..100_000, 2..30)
    ) {
        prop_assume!(values.iter().any(|value| *value != values[0]));
        let xs: Vec<f64> = values.into_iter().map(f64::from).collect();
        let r = pearson_correlation(&xs, &xs).expect("equal, non-empty inputs");
        prop_assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn coefficient_of_variation_is_never_negative(
        values in prop::collection::vec(-50_000.0..50_000.0f64, 1..40)
    ) {
        if let Ok(cv) = coefficient_of_variation(&values) {
            prop_assert!(cv >= 0.0);
        }
    }

    #[test]
    fn every_score_is_bounded(records in roster()) {
        let result = compose(&records, &DiagnosticPolicy::default());

        prop_assert!(result.health_score.score <= 100);
        for view in result.module_scores() {
            prop_assert!(view.score <= 100, "{} scored {}", view.label, view.score);
        }
    }

    #[test]
    fn department_groups_partition_analyzed_records(records in roster()) {
        let result = compose(&records, &DiagnosticPolicy::default());
        let statistics = &result.statistics;

        let grouped: usize = statistics.departments.iter().map(|group| group.count).sum();
        prop_assert_eq!(grouped, statistics.analyzed_records);
        prop_assert_eq!(
            statistics.analyzed_records + statistics.excluded_records.len(),
            records.len()
        );
    }
}
