use log::{debug, warn};
use matrice_core::{Float, Matrix, MatrixError, MatrixResult};
use matrice_linalg::solve;

use crate::config::RidgeConfig;
use crate::model::{
    design_matrix, ensure_finite, normal_equations, predict_linear, render_summary,
    validate_training, Regressor,
};
use crate::ols::solve_least_squares;

/// Ridge regression (L2-regularized).
///
/// Fits using: `β = (XᵀX + αD)⁻¹Xᵀy`, where `D` is the identity with the
/// intercept entry zeroed: the intercept is never shrunk.
#[derive(Debug, Clone, Default)]
pub struct Ridge<T: Float> {
    config: RidgeConfig,
    coefficients: Option<Vec<T>>,
}

impl<T: Float> Ridge<T> {
    pub fn new(config: RidgeConfig) -> MatrixResult<Self> {
        config.validate()?;
        Ok(Ridge {
            config,
            coefficients: None,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    pub fn config(&self) -> &RidgeConfig {
        &self.config
    }

    /// Least squares on `[X; √α·D]` against `[y; 0]`, the same minimizer
    /// without forming `XᵀX + αD`.
    fn solve_augmented(&self, design: &Matrix<T>, y: &[T]) -> MatrixResult<Vec<T>> {
        if self.config.alpha == 0.0 {
            return solve_least_squares(design, y);
        }
        let (n, p) = design.shape();
        let start = usize::from(self.config.fit_intercept);

        let penalty = T::from_f64(self.config.alpha.sqrt());
        let extra = p - start;
        let mut data = Vec::with_capacity((n + extra) * p);
        data.extend_from_slice(design.data());
        for j in start..p {
            for c in 0..p {
                data.push(if c == j { penalty } else { T::ZERO });
            }
        }
        let augmented = Matrix::new(data, n + extra, p)?;

        let mut target = y.to_vec();
        target.resize(n + extra, T::ZERO);
        solve_least_squares(&augmented, &target)
    }
}

impl<T: Float> Regressor<T> for Ridge<T> {
    fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> MatrixResult<()> {
        validate_training(x, y, "Ridge::fit")?;
        let design = design_matrix(x, self.config.fit_intercept);
        let (mut xtx, xty) = normal_equations(&design, y)?;

        let alpha = T::from_f64(self.config.alpha);
        let start = usize::from(self.config.fit_intercept);
        for j in start..xtx.cols() {
            xtx[(j, j)] += alpha;
        }

        let beta = match solve(&xtx, &Matrix::column_vector(&xty)) {
            Ok(sol) => sol.into_data(),
            Err(MatrixError::SingularMatrix) => {
                debug!(
                    "ridge system singular at alpha={}; falling back to pseudo-inverse",
                    self.config.alpha
                );
                self.solve_augmented(&design, y)?
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = ensure_finite(&beta) {
            warn!("ridge solve produced non-finite coefficients");
            return Err(e);
        }
        debug!(
            "Ridge fitted {} parameters on {} rows (alpha={})",
            beta.len(),
            x.rows(),
            self.config.alpha
        );
        self.coefficients = Some(beta);
        Ok(())
    }

    fn predict(&self, x: &Matrix<T>) -> MatrixResult<Vec<T>> {
        let beta = self.coefficients()?;
        predict_linear(beta, x, self.config.fit_intercept, "Ridge::predict")
    }

    fn coefficients(&self) -> MatrixResult<&[T]> {
        self.coefficients
            .as_deref()
            .ok_or(MatrixError::NotFitted("coefficients"))
    }

    fn summary(&self) -> MatrixResult<String> {
        let title = format!("Ridge Regression Coefficients (α={}):", self.config.alpha);
        Ok(render_summary(&title, self.coefficients()?))
    }

    fn fit_intercept(&self) -> bool {
        self.config.fit_intercept
    }
}
