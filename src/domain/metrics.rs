use serde::{Deserialize, Serialize};

/// Held-out accuracy summary from one training run. Immutable once
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub mae: f64,
    pub mse: f64,
    pub r_squared: f64,
}

impl Metrics {
    /// Scores `predicted` against `actual`. Both slices must be the same
    /// non-zero length; the trainer guarantees this.
    pub fn from_predictions(actual: &[f64], predicted: &[f64]) -> Self {
        Self {
            mae: mean_absolute_error(actual, predicted),
            mse: mean_squared_error(actual, predicted),
            r_squared: r_squared(actual, predicted),
        }
    }
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len();
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n as f64
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len();
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n as f64
}

/// Coefficient of determination. Zero when the actuals have no variance.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len();
    let mean = actual.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot > 0.0 {
        let ss_res: f64 = actual
            .iter()
            .zip(predicted.iter())
            .map(|(a, p)| (a - p).powi(2))
            .sum();
        1.0 - ss_res / ss_tot
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_error_values() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [1.0, 2.5, 2.5, 5.0];

        assert!((mean_absolute_error(&actual, &predicted) - 0.5).abs() < 1e-12);
        assert!((mean_squared_error(&actual, &predicted) - 0.375).abs() < 1e-12);
    }

    #[test]
    fn perfect_fit_has_unit_r_squared() {
        let actual = [1.0, 2.0, 3.0];
        let metrics = Metrics::from_predictions(&actual, &actual);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.r_squared, 1.0);
    }

    #[test]
    fn constant_actuals_yield_zero_r_squared() {
        let actual = [5.0, 5.0, 5.0];
        let predicted = [4.0, 5.0, 6.0];
        assert_eq!(r_squared(&actual, &predicted), 0.0);
    }

    #[test]
    fn mean_predictor_has_zero_r_squared() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        assert!(r_squared(&actual, &predicted).abs() < 1e-12);
    }
}
