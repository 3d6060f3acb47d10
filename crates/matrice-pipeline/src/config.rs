use std::fmt;
use std::str::FromStr;

use log::debug;
use matrice_core::{Float, MatrixError, MatrixResult};
use matrice_linear::{
    LinearRegression, OlsConfig, PolynomialConfig, PolynomialRegression, Regressor, Ridge,
    RidgeConfig,
};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::pipeline::Pipeline;

/// Which regression variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    #[serde(alias = "ols")]
    Linear,
    Ridge,
    Polynomial,
}

impl FromStr for ModelKind {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "ols" => Ok(ModelKind::Linear),
            "ridge" => Ok(ModelKind::Ridge),
            "polynomial" => Ok(ModelKind::Polynomial),
            other => Err(MatrixError::InvalidConfiguration(format!(
                "unknown model type '{}' (expected linear, ridge or polynomial)",
                other
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Linear => "linear",
            ModelKind::Ridge => "ridge",
            ModelKind::Polynomial => "polynomial",
        };
        f.write_str(name)
    }
}

/// Model selection and hyperparameters, as carried in a training request.
///
/// ```json
/// { "model_type": "ridge", "alpha": 0.5, "standardize": true }
/// ```
///
/// Every field is optional; `alpha` only applies to ridge and `degree` only
/// to polynomial models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub model_type: ModelKind,
    pub alpha: f64,
    pub degree: usize,
    pub fit_intercept: bool,
    pub standardize: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let ridge = RidgeConfig::default();
        let poly = PolynomialConfig::default();
        ModelConfig {
            model_type: ModelKind::Linear,
            alpha: ridge.alpha,
            degree: poly.degree,
            fit_intercept: true,
            standardize: false,
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelKind) -> Self {
        ModelConfig {
            model_type,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    ///
    /// Malformed JSON is a [`MatrixError::Serialization`]; well-formed JSON
    /// with an unknown model type, unknown field or out-of-range value is a
    /// [`MatrixError::InvalidConfiguration`].
    pub fn from_json(json: &str) -> MatrixResult<Self> {
        let config: ModelConfig = serde_json::from_str(json).map_err(|e| match e.classify() {
            Category::Data => MatrixError::InvalidConfiguration(e.to_string()),
            _ => MatrixError::Serialization(e.to_string()),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> MatrixResult<String> {
        serde_json::to_string(self).map_err(|e| MatrixError::Serialization(e.to_string()))
    }

    pub fn ridge_config(&self) -> RidgeConfig {
        RidgeConfig {
            alpha: self.alpha,
            fit_intercept: self.fit_intercept,
        }
    }

    pub fn polynomial_config(&self) -> PolynomialConfig {
        PolynomialConfig {
            degree: self.degree,
            fit_intercept: self.fit_intercept,
        }
    }

    /// Check the hyperparameters the selected model uses.
    pub fn validate(&self) -> MatrixResult<()> {
        match self.model_type {
            ModelKind::Linear => Ok(()),
            ModelKind::Ridge => self.ridge_config().validate(),
            ModelKind::Polynomial => self.polynomial_config().validate(),
        }
    }

    /// Build the unfitted model, wrapped in a standardizing [`Pipeline`]
    /// when `standardize` is set.
    pub fn build<T: Float>(&self) -> MatrixResult<Box<dyn Regressor<T>>> {
        let model: Box<dyn Regressor<T>> = match self.model_type {
            ModelKind::Linear => Box::new(LinearRegression::new(OlsConfig {
                fit_intercept: self.fit_intercept,
            })),
            ModelKind::Ridge => Box::new(Ridge::new(self.ridge_config())?),
            ModelKind::Polynomial => {
                Box::new(PolynomialRegression::new(self.polynomial_config())?)
            }
        };
        debug!(
            "built {} model (standardize={})",
            self.model_type, self.standardize
        );
        if self.standardize {
            Ok(Box::new(Pipeline::new(model, true)))
        } else {
            Ok(model)
        }
    }
}
