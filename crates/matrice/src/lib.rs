//! # Matrice
//!
//! A matrix-based regression engine written in pure Rust.
//!
//! ## Modules
//!
//! - **core**: `Matrix<T>` value type, `Float` scalars, `MatrixError`
//! - **linalg**: Arithmetic, transpose, LU, determinant, inverse, SVD, pseudo-inverse, exponentiation
//! - **preprocessing**: StandardScaler, seeded train/test split
//! - **linear**: Regression models: OLS, Ridge, Polynomial, behind the `Regressor` trait
//! - **metrics**: MSE, RMSE, MAE, R², explained variance, `RegressionReport`
//! - **pipeline**: Standardizing pipeline and JSON model configuration

/// Matrix type and errors.
pub use matrice_core as core;

/// Linear algebra operations.
pub use matrice_linalg as linalg;

/// Data preprocessing.
pub use matrice_preprocessing as preprocessing;

/// Linear models.
pub use matrice_linear as linear;

/// Evaluation metrics.
pub use matrice_metrics as metrics;

/// Pipeline and model configuration.
pub use matrice_pipeline as pipeline;

pub use matrice_core::{Matrix, MatrixError, MatrixResult};
pub use matrice_linear::Regressor;
