use std::fmt;

use matrice_core::{Float, MatrixResult};
use serde::{Deserialize, Serialize};

use crate::regression::{explained_variance, mae, mse, r2_score};

/// Goodness-of-fit summary for one set of predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub r2: f64,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub explained_variance: f64,
    pub n_samples: usize,
}

impl RegressionReport {
    /// Score `predicted` against `actual` with every regression metric.
    pub fn evaluate<T: Float>(actual: &[T], predicted: &[T]) -> MatrixResult<Self> {
        let mse = mse(actual, predicted)?;
        Ok(RegressionReport {
            r2: r2_score(actual, predicted)?,
            mse,
            rmse: mse.sqrt(),
            mae: mae(actual, predicted)?,
            explained_variance: explained_variance(actual, predicted)?,
            n_samples: actual.len(),
        })
    }
}

impl fmt::Display for RegressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "R²: {:.4}", self.r2)?;
        writeln!(f, "MSE: {:.4}", self.mse)?;
        writeln!(f, "RMSE: {:.4}", self.rmse)?;
        writeln!(f, "MAE: {:.4}", self.mae)?;
        writeln!(f, "Explained variance: {:.4}", self.explained_variance)?;
        write!(f, "Samples: {}", self.n_samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use matrice_core::MatrixError;

    #[test]
    fn test_evaluate() {
        let actual = [2.0, 4.0, 6.0, 8.0];
        let predicted = [2.0, 5.0, 6.0, 7.0];
        let report = RegressionReport::evaluate(&actual, &predicted).unwrap();

        assert_eq!(report.n_samples, 4);
        assert_abs_diff_eq!(report.mse, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(report.rmse, 0.5f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(report.mae, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(report.r2, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_display_and_json() {
        let y = [1.0, 2.0, 3.0];
        let report = RegressionReport::evaluate(&y, &y).unwrap();
        let text = report.to_string();
        assert!(text.starts_with("R²: 1.0000\n"));
        assert!(text.ends_with("Samples: 3"));

        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["n_samples"], 3);
        assert_eq!(json["r2"], 1.0);
    }

    #[test]
    fn test_mismatch_propagates() {
        assert!(matches!(
            RegressionReport::evaluate(&[1.0, 2.0], &[1.0]),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }
}
