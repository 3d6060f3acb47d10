use matrice_core::{Float, Matrix, MatrixError, MatrixResult};
use serde::{Deserialize, Serialize};

/// Added to every standard deviation so zero-variance columns stay finite.
pub const STD_EPSILON: f64 = 1e-8;

/// Standardize features by removing the mean and scaling to unit variance.
///
/// Statistics are computed once by [`fit`](Self::fit) and reused by every
/// later [`transform`](Self::transform), so inference inputs are scaled with
/// training-time parameters. With `normalize` disabled the scaler is a
/// pass-through and never needs fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct StandardScaler<T: Float> {
    normalize: bool,
    mean: Option<Vec<T>>,
    std: Option<Vec<T>>,
}

impl<T: Float> Default for StandardScaler<T> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<T: Float> StandardScaler<T> {
    pub fn new(normalize: bool) -> Self {
        StandardScaler {
            normalize,
            mean: None,
            std: None,
        }
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Per-column means from the last fit.
    pub fn mean(&self) -> Option<&[T]> {
        self.mean.as_deref()
    }

    /// Per-column population standard deviations from the last fit.
    pub fn std(&self) -> Option<&[T]> {
        self.std.as_deref()
    }

    /// Compute mean and std from training data `[samples, features]`.
    pub fn fit(&mut self, x: &Matrix<T>) -> MatrixResult<()> {
        if !self.normalize {
            return Ok(());
        }
        let (n, p) = x.shape();
        if n == 0 {
            return Err(MatrixError::EmptyMatrix("StandardScaler::fit"));
        }
        let n_t = T::from_usize(n);

        let mut mean = vec![T::ZERO; p];
        for row in x.iter_rows() {
            for (m, &v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in mean.iter_mut() {
            *m /= n_t;
        }

        let mut var = vec![T::ZERO; p];
        for row in x.iter_rows() {
            for ((s, &v), &m) in var.iter_mut().zip(row).zip(&mean) {
                let d = v - m;
                *s += d * d;
            }
        }
        let std = var.into_iter().map(|s| (s / n_t).sqrt()).collect();

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    /// Apply `(x - mean) / (std + ε)` using the fitted statistics.
    pub fn transform(&self, x: &Matrix<T>) -> MatrixResult<Matrix<T>> {
        if !self.normalize {
            return Ok(x.clone());
        }
        let (mean, std) = match (&self.mean, &self.std) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(MatrixError::NotFitted("StandardScaler::transform")),
        };
        if x.cols() != mean.len() {
            return Err(MatrixError::ShapeMismatch {
                op: "StandardScaler::transform",
                expected: (x.rows(), mean.len()),
                got: x.shape(),
            });
        }

        let eps = T::from_f64(STD_EPSILON);
        let mut data = Vec::with_capacity(x.data().len());
        for row in x.iter_rows() {
            for ((&v, &m), &s) in row.iter().zip(mean).zip(std) {
                data.push((v - m) / (s + eps));
            }
        }
        Matrix::new(data, x.rows(), x.cols())
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, x: &Matrix<T>) -> MatrixResult<Matrix<T>> {
        self.fit(x)?;
        self.transform(x)
    }
}
