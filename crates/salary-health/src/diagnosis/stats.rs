//! Numeric primitives shared by every rule evaluator.
//!
//! Variances are population variances (divisor `n`). Empty inputs produce `0`
//! for the descriptive measures; ratios that would divide by zero return a
//! [`StatsError`] so callers decide how to surface the gap. [`correlation`]
//! is the lenient form the rule evaluators use: an undefined coefficient
//! becomes `0` with `insufficient_data` set.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("statistic requested over an empty series")]
    Empty,
    #[error("series mean is zero; ratio is undefined")]
    DivisionByZero,
    #[error("paired series differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("series is constant; correlation is undefined")]
    Degenerate,
}

/// Pearson coefficient, or `0` flagged as insufficient when it is undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub coefficient: f64,
    pub insufficient_data: bool,
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

pub fn variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let avg = mean(xs);
    xs.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / xs.len() as f64
}

pub fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

pub fn coefficient_of_variation(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.is_empty() {
        return Err(StatsError::Empty);
    }
    let avg = mean(xs);
    if avg == 0.0 {
        return Err(StatsError::DivisionByZero);
    }
    Ok(std_dev(xs) / avg.abs())
}

/// Pearson product-moment correlation over mean-centred values.
///
/// A constant series (including a single pair) has no defined correlation and
/// yields [`StatsError::Degenerate`].
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(StatsError::Empty);
    }
    if is_constant(xs) || is_constant(ys) {
        return Err(StatsError::Degenerate);
    }

    let (mean_x, mean_y) = (mean(xs), mean(ys));
    let (covariance, spread_x, spread_y) =
        xs.iter()
            .zip(ys)
            .fold((0.0, 0.0, 0.0), |(cov, sx, sy), (x, y)| {
                let (dx, dy) = (x - mean_x, y - mean_y);
                (cov + dx * dy, sx + dx * dx, sy + dy * dy)
            });

    let denominator = (spread_x * spread_y).sqrt();
    if denominator <= 0.0 || !denominator.is_finite() {
        return Err(StatsError::Degenerate);
    }

    Ok((covariance / denominator).clamp(-1.0, 1.0))
}

/// [`pearson_correlation`] with a degenerate series reported as `0`.
pub fn correlation(xs: &[f64], ys: &[f64]) -> Result<Correlation, StatsError> {
    match pearson_correlation(xs, ys) {
        Ok(coefficient) => Ok(Correlation {
            coefficient,
            insufficient_data: false,
        }),
        Err(StatsError::Degenerate) => Ok(Correlation {
            coefficient: 0.0,
            insufficient_data: true,
        }),
        Err(err) => Err(err),
    }
}

fn is_constant(xs: &[f64]) -> bool {
    xs.iter().all(|x| *x == xs[0])
}

/// Linear-interpolated percentile, `p` in `[0, 1]`.
pub fn percentile(xs: &[f64], p: f64) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

pub fn median(xs: &[f64]) -> Option<f64> {
    percentile(xs, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_uses_population_divisor() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&xs), 5.0);
        assert_eq!(variance(&xs), 4.0);
        assert_eq!(std_dev(&xs), 2.0);
    }

    #[test]
    fn empty_series_are_zero_or_errors() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(coefficient_of_variation(&[]), Err(StatsError::Empty));
        assert_eq!(pearson_correlation(&[], &[]), Err(StatsError::Empty));
        assert!(percentile(&[], 0.5).is_none());
    }

    #[test]
    fn coefficient_of_variation_rejects_zero_mean() {
        assert_eq!(
            coefficient_of_variation(&[-1.0, 1.0]),
            Err(StatsError::DivisionByZero)
        );
        let cv = coefficient_of_variation(&[20000.0; 5]).expect("defined");
        assert_eq!(cv, 0.0);
    }

    #[test]
    fn pearson_detects_perfect_relationships() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = [2.0, 4.0, 6.0, 8.0, 10.0];
        let down = [10.0, 8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&xs, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson_correlation(&xs, &down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_has_no_correlation() {
        let constant = [5000.0; 4];
        let varying = [3.0, 3.5, 4.0, 4.5];
        assert_eq!(
            pearson_correlation(&constant, &varying),
            Err(StatsError::Degenerate)
        );
        assert_eq!(
            correlation(&constant, &varying),
            Ok(Correlation {
                coefficient: 0.0,
                insufficient_data: true,
            })
        );
        assert_eq!(
            pearson_correlation(&[4.0], &[9000.0]),
            Err(StatsError::Degenerate)
        );
    }

    #[test]
    fn pearson_is_stable_at_large_magnitudes() {
        let xs = [1e8, 1e8 + 1.0, 1e8 + 2.0];
        let r = pearson_correlation(&xs, &xs).expect("non-constant series");
        assert!((r - 1.0).abs() < 1e-12);

        let small = [1.0, 3.0, 5.0, 2.0, 4.0];
        let ratings = [2.0, 1.0, 4.0, 3.0, 5.0];
        let shifted: Vec<f64> = small.iter().map(|x| x + 1e9).collect();
        let expected = pearson_correlation(&small, &ratings).expect("non-constant series");
        let actual = pearson_correlation(&shifted, &ratings).expect("non-constant series");
        assert!((actual - expected).abs() < 1e-9);
    }

    #[test]
    fn pearson_rejects_mismatched_lengths() {
        assert_eq!(
            pearson_correlation(&[1.0, 2.0], &[1.0]),
            Err(StatsError::LengthMismatch { left: 2, right: 1 })
        );
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let xs = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&xs, 0.0), Some(10.0));
        assert_eq!(percentile(&xs, 1.0), Some(40.0));
        assert_eq!(median(&xs), Some(25.0));
        assert_eq!(percentile(&xs, 0.25), Some(17.5));
    }
}
