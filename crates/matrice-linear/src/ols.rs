use log::debug;
use matrice_core::{Float, Matrix, MatrixError, MatrixResult};
use matrice_linalg::{default_rcond, pinv_rcond};

use crate::config::OlsConfig;
use crate::model::{
    design_matrix, ensure_finite, predict_linear, render_summary, validate_training, Regressor,
};

/// Floor for the relative singular-value cutoff used when fitting.
pub const LSTSQ_RCOND: f64 = 1e-12;

/// Ordinary Least Squares linear regression.
///
/// Fits `y = Xβ` with the least-squares solution of the normal equation
/// `XᵀXβ = Xᵀy`, computed as `β = X⁺y`. The pseudo-inverse makes collinear
/// features and `samples < parameters` solvable: the result is then the
/// minimum-norm least-squares solution.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression<T: Float> {
    config: OlsConfig,
    coefficients: Option<Vec<T>>,
}

impl<T: Float> LinearRegression<T> {
    pub fn new(config: OlsConfig) -> Self {
        LinearRegression {
            config,
            coefficients: None,
        }
    }

    pub fn config(&self) -> &OlsConfig {
        &self.config
    }
}

/// Minimum-norm solution of the normal equations for `design`.
///
/// `X⁺y` equals `(XᵀX)⁺Xᵀy` but factors `X` itself, so the condition number
/// of the design is not squared.
pub(crate) fn solve_least_squares<T: Float>(design: &Matrix<T>, y: &[T]) -> MatrixResult<Vec<T>> {
    let rcond = default_rcond(design.shape()).max(LSTSQ_RCOND);
    let (design_pinv, rank) = pinv_rcond(design, rcond);
    if rank < design.cols() {
        debug!(
            "design rank-deficient ({} < {}); using minimum-norm solution",
            rank,
            design.cols()
        );
    }
    let beta = design_pinv.matvec(y)?;
    ensure_finite(&beta)?;
    Ok(beta)
}

impl<T: Float> Regressor<T> for LinearRegression<T> {
    fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> MatrixResult<()> {
        validate_training(x, y, "LinearRegression::fit")?;
        let design = design_matrix(x, self.config.fit_intercept);
        let beta = solve_least_squares(&design, y)?;
        debug!(
            "LinearRegression fitted {} parameters on {} rows",
            beta.len(),
            x.rows()
        );
        self.coefficients = Some(beta);
        Ok(())
    }

    fn predict(&self, x: &Matrix<T>) -> MatrixResult<Vec<T>> {
        let beta = self.coefficients()?;
        predict_linear(beta, x, self.config.fit_intercept, "LinearRegression::predict")
    }

    fn coefficients(&self) -> MatrixResult<&[T]> {
        self.coefficients
            .as_deref()
            .ok_or(MatrixError::NotFitted("coefficients"))
    }

    fn summary(&self) -> MatrixResult<String> {
        Ok(render_summary(
            "Linear Regression Coefficients:",
            self.coefficients()?,
        ))
    }

    fn fit_intercept(&self) -> bool {
        self.config.fit_intercept
    }
}
