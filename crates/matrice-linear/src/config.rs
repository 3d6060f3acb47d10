use matrice_core::{MatrixError, MatrixResult};
use serde::{Deserialize, Serialize};

/// Configuration for [`LinearRegression`](crate::LinearRegression).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OlsConfig {
    pub fit_intercept: bool,
}

impl Default for OlsConfig {
    fn default() -> Self {
        OlsConfig { fit_intercept: true }
    }
}

/// Configuration for [`Ridge`](crate::Ridge).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RidgeConfig {
    /// Regularization strength, `alpha >= 0`.
    pub alpha: f64,
    pub fit_intercept: bool,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        RidgeConfig {
            alpha: 1.0,
            fit_intercept: true,
        }
    }
}

impl RidgeConfig {
    pub fn validate(&self) -> MatrixResult<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(MatrixError::InvalidConfiguration(format!(
                "ridge alpha must be a finite value >= 0, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Highest polynomial degree accepted. Powers beyond this overflow f64 for
/// any feature magnitude above 2^16.
pub const MAX_DEGREE: usize = 64;

/// Check `1 <= degree <= MAX_DEGREE`.
pub fn check_degree(degree: usize) -> MatrixResult<()> {
    if !(1..=MAX_DEGREE).contains(&degree) {
        return Err(MatrixError::InvalidConfiguration(format!(
            "polynomial degree must be between 1 and {}, got {}",
            MAX_DEGREE, degree
        )));
    }
    Ok(())
}

/// Configuration for [`PolynomialRegression`](crate::PolynomialRegression).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolynomialConfig {
    /// Highest power generated per feature, `1 <= degree <= MAX_DEGREE`.
    pub degree: usize,
    pub fit_intercept: bool,
}

impl Default for PolynomialConfig {
    fn default() -> Self {
        PolynomialConfig {
            degree: 2,
            fit_intercept: true,
        }
    }
}

impl PolynomialConfig {
    pub fn validate(&self) -> MatrixResult<()> {
        check_degree(self.degree)
    }
}
