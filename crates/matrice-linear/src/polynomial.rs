use log::debug;
use matrice_core::{Float, Matrix, MatrixError, MatrixResult};

use crate::config::{check_degree, OlsConfig, PolynomialConfig};
use crate::model::{validate_training, Regressor};
use crate::ols::LinearRegression;

/// Expand every feature into its powers `1..=degree`.
///
/// Columns are grouped per feature: `[x1, x1², …, x1^d, x2, x2², …]`.
/// No cross terms are generated.
pub fn expand_features<T: Float>(x: &Matrix<T>, degree: usize) -> MatrixResult<Matrix<T>> {
    check_degree(degree)?;
    let (n, p) = x.shape();
    let too_wide = || {
        MatrixError::InvalidConfiguration(format!(
            "expanding {} x {} features to degree {} overflows usize",
            n, p, degree
        ))
    };
    let cols = p.checked_mul(degree).ok_or_else(too_wide)?;
    let len = n.checked_mul(cols).ok_or_else(too_wide)?;
    let mut data = Vec::with_capacity(len);
    for row in x.iter_rows() {
        for &v in row {
            let mut power = v;
            for _ in 0..degree {
                data.push(power);
                power *= v;
            }
        }
    }
    Matrix::new(data, n, cols)
}

/// Linear regression on polynomially expanded features.
///
/// The expansion is recomputed from raw features on every `fit` and
/// `predict`; coefficients refer to the expanded columns.
#[derive(Debug, Clone)]
pub struct PolynomialRegression<T: Float> {
    config: PolynomialConfig,
    model: LinearRegression<T>,
}

impl<T: Float> PolynomialRegression<T> {
    pub fn new(config: PolynomialConfig) -> MatrixResult<Self> {
        config.validate()?;
        Ok(PolynomialRegression {
            config,
            model: LinearRegression::new(OlsConfig {
                fit_intercept: config.fit_intercept,
            }),
        })
    }

    pub fn degree(&self) -> usize {
        self.config.degree
    }

    pub fn config(&self) -> &PolynomialConfig {
        &self.config
    }
}

impl<T: Float> Default for PolynomialRegression<T> {
    fn default() -> Self {
        let config = PolynomialConfig::default();
        PolynomialRegression {
            config,
            model: LinearRegression::new(OlsConfig {
                fit_intercept: config.fit_intercept,
            }),
        }
    }
}

impl<T: Float> Regressor<T> for PolynomialRegression<T> {
    fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> MatrixResult<()> {
        validate_training(x, y, "PolynomialRegression::fit")?;
        let expanded = expand_features(x, self.config.degree)?;
        debug!(
            "expanded {} features to {} at degree {}",
            x.cols(),
            expanded.cols(),
            self.config.degree
        );
        self.model.fit(&expanded, y)
    }

    fn predict(&self, x: &Matrix<T>) -> MatrixResult<Vec<T>> {
        let expanded = expand_features(x, self.config.degree)?;
        self.model.predict(&expanded)
    }

    fn coefficients(&self) -> MatrixResult<&[T]> {
        self.model.coefficients()
    }

    fn summary(&self) -> MatrixResult<String> {
        let inner = self.model.summary()?;
        Ok(format!(
            "Polynomial Regression (degree={})\n{}",
            self.config.degree, inner
        ))
    }

    fn fit_intercept(&self) -> bool {
        self.config.fit_intercept
    }
}
