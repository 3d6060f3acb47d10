use matrice_core::{Float, MatrixError, MatrixResult};

/// Validate a metric's inputs and return their shared length.
fn check_pair<T: Float>(y_true: &[T], y_pred: &[T], op: &'static str) -> MatrixResult<usize> {
    if y_true.len() != y_pred.len() {
        return Err(MatrixError::ShapeMismatch {
            op,
            expected: (y_true.len(), 1),
            got: (y_pred.len(), 1),
        });
    }
    if y_true.is_empty() {
        return Err(MatrixError::EmptyMatrix(op));
    }
    Ok(y_true.len())
}

fn residuals<'a, T: Float>(y_true: &'a [T], y_pred: &'a [T]) -> impl Iterator<Item = f64> + 'a {
    y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| t.to_f64() - p.to_f64())
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    values.sum::<f64>() / n as f64
}

/// True when `ss`, a sum of squared deviations of `values`, is no larger
/// than the rounding noise of summing `values`. Relative to the data's own
/// magnitude, so a small-scale series keeps its spread.
fn negligible_spread(ss: f64, values: &[f64]) -> bool {
    let n = values.len() as f64;
    let magnitude: f64 = values.iter().map(|v| v * v).sum();
    ss <= (n * f64::EPSILON).powi(2) * magnitude
}

/// Population variance.
fn variance(values: &[f64]) -> f64 {
    let m = mean(values.iter().copied(), values.len());
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Mean Squared Error.
pub fn mse<T: Float>(y_true: &[T], y_pred: &[T]) -> MatrixResult<f64> {
    let n = check_pair(y_true, y_pred, "mse")?;
    Ok(mean(residuals(y_true, y_pred).map(|d| d * d), n))
}

/// Root Mean Squared Error.
pub fn rmse<T: Float>(y_true: &[T], y_pred: &[T]) -> MatrixResult<f64> {
    Ok(mse(y_true, y_pred)?.sqrt())
}

/// Mean Absolute Error.
pub fn mae<T: Float>(y_true: &[T], y_pred: &[T]) -> MatrixResult<f64> {
    let n = check_pair(y_true, y_pred, "mae")?;
    Ok(mean(residuals(y_true, y_pred).map(f64::abs), n))
}

/// R² (coefficient of determination).
///
/// `1 - SS_res / SS_tot`, defined as `0` for a constant target.
pub fn r2_score<T: Float>(y_true: &[T], y_pred: &[T]) -> MatrixResult<f64> {
    let n = check_pair(y_true, y_pred, "r2_score")?;
    let truth: Vec<f64> = y_true.iter().map(|v| v.to_f64()).collect();
    let mean_true = mean(truth.iter().copied(), n);

    let ss_res: f64 = residuals(y_true, y_pred).map(|d| d * d).sum();
    let ss_tot: f64 = truth.iter().map(|t| (t - mean_true) * (t - mean_true)).sum();

    if negligible_spread(ss_tot, &truth) {
        return Ok(0.0);
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Adjusted R²: R² penalized for the number of predictors.
///
/// adj_R² = 1 - (1 - R²) * (n - 1) / (n - p - 1)
///
/// Falls back to plain R² when `n - p - 1 <= 0`.
pub fn adjusted_r2<T: Float>(y_true: &[T], y_pred: &[T], n_features: usize) -> MatrixResult<f64> {
    let r2 = r2_score(y_true, y_pred)?;
    let n = y_true.len() as f64;
    let p = n_features as f64;
    if n - p - 1.0 <= 0.0 {
        return Ok(r2);
    }
    Ok(1.0 - (1.0 - r2) * (n - 1.0) / (n - p - 1.0))
}

/// Explained Variance Score.
///
/// EV = 1 - Var(y - ŷ) / Var(y), defined as `0` for a constant target.
pub fn explained_variance<T: Float>(y_true: &[T], y_pred: &[T]) -> MatrixResult<f64> {
    check_pair(y_true, y_pred, "explained_variance")?;
    let res: Vec<f64> = residuals(y_true, y_pred).collect();
    let truth: Vec<f64> = y_true.iter().map(|v| v.to_f64()).collect();

    let var_y = variance(&truth);
    if negligible_spread(var_y * truth.len() as f64, &truth) {
        return Ok(0.0);
    }
    Ok(1.0 - variance(&res) / var_y)
}

/// Maximum absolute error.
pub fn max_error<T: Float>(y_true: &[T], y_pred: &[T]) -> MatrixResult<f64> {
    check_pair(y_true, y_pred, "max_error")?;
    Ok(residuals(y_true, y_pred).map(f64::abs).fold(0.0_f64, f64::max))
}
