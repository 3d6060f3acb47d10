use std::borrow::Cow;

use matrice_core::{Float, Matrix, MatrixError, MatrixResult};
use matrice_metrics::r2_score;

/// Capability set shared by every regression model.
///
/// A model starts unfitted; [`fit`](Regressor::fit) moves it to the fitted
/// state, after which `predict`, `coefficients` and `summary` succeed.
/// Calling any of them before `fit` fails with [`MatrixError::NotFitted`].
pub trait Regressor<T: Float>: Send + Sync {
    /// Fit on `x` (`[samples, features]`) and `y` (one target per row).
    fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> MatrixResult<()>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: &Matrix<T>) -> MatrixResult<Vec<T>>;

    /// Fitted parameters, intercept first when one is fitted.
    fn coefficients(&self) -> MatrixResult<&[T]>;

    /// One line per parameter.
    fn summary(&self) -> MatrixResult<String>;

    fn fit_intercept(&self) -> bool;

    fn is_fitted(&self) -> bool {
        self.coefficients().is_ok()
    }

    fn n_params(&self) -> MatrixResult<usize> {
        Ok(self.coefficients()?.len())
    }

    /// R² of `predict(x)` against `y`.
    fn score(&self, x: &Matrix<T>, y: &[T]) -> MatrixResult<f64> {
        let pred = self.predict(x)?;
        r2_score(y, &pred)
    }

    /// Consuming form of [`fit`](Regressor::fit) for chaining:
    /// `LinearRegression::default().fitted(&x, &y)?.predict(&x_new)`.
    fn fitted(mut self, x: &Matrix<T>, y: &[T]) -> MatrixResult<Self>
    where
        Self: Sized,
    {
        self.fit(x, y)?;
        Ok(self)
    }
}

impl<T: Float> Regressor<T> for Box<dyn Regressor<T>> {
    fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> MatrixResult<()> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: &Matrix<T>) -> MatrixResult<Vec<T>> {
        (**self).predict(x)
    }

    fn coefficients(&self) -> MatrixResult<&[T]> {
        (**self).coefficients()
    }

    fn summary(&self) -> MatrixResult<String> {
        (**self).summary()
    }

    fn fit_intercept(&self) -> bool {
        (**self).fit_intercept()
    }
}

/// Check the training inputs every model shares.
pub(crate) fn validate_training<T: Float>(
    x: &Matrix<T>,
    y: &[T],
    op: &'static str,
) -> MatrixResult<()> {
    let (n, p) = x.shape();
    if p == 0 {
        return Err(MatrixError::ShapeMismatch {
            op,
            expected: (n, 1),
            got: (n, 0),
        });
    }
    if n != y.len() {
        return Err(MatrixError::ShapeMismatch {
            op,
            expected: (n, 1),
            got: (y.len(), 1),
        });
    }
    if n == 0 {
        return Err(MatrixError::EmptyMatrix(op));
    }
    Ok(())
}

/// `x` with a leading ones column when an intercept is fitted.
pub(crate) fn design_matrix<T: Float>(x: &Matrix<T>, fit_intercept: bool) -> Cow<'_, Matrix<T>> {
    if fit_intercept {
        Cow::Owned(x.with_intercept_column())
    } else {
        Cow::Borrowed(x)
    }
}

/// `(XᵀX, Xᵀy)` for a design matrix.
pub(crate) fn normal_equations<T: Float>(
    design: &Matrix<T>,
    y: &[T],
) -> MatrixResult<(Matrix<T>, Vec<T>)> {
    let xt = design.transpose();
    let xtx = xt.matmul(design)?;
    let xty = xt.matvec(y)?;
    Ok((xtx, xty))
}

/// `X_aug · β`, checking `x` has the feature count the coefficients imply.
pub(crate) fn predict_linear<T: Float>(
    coefficients: &[T],
    x: &Matrix<T>,
    fit_intercept: bool,
    op: &'static str,
) -> MatrixResult<Vec<T>> {
    let n_features = coefficients.len() - usize::from(fit_intercept);
    if x.cols() != n_features {
        return Err(MatrixError::ShapeMismatch {
            op,
            expected: (x.rows(), n_features),
            got: x.shape(),
        });
    }
    design_matrix(x, fit_intercept).matvec(coefficients)
}

/// A solve that produced NaN or infinite coefficients has no usable answer.
pub(crate) fn ensure_finite<T: Float>(beta: &[T]) -> MatrixResult<()> {
    if beta.iter().all(|b| b.is_finite()) {
        Ok(())
    } else {
        Err(MatrixError::SingularMatrix)
    }
}

pub(crate) fn render_summary<T: Float>(title: &str, coefficients: &[T]) -> String {
    let mut out = String::from(title);
    for (i, c) in coefficients.iter().enumerate() {
        out.push_str(&format!("\nβ{}: {:.4}", i, c));
    }
    out
}

/// Render a fitted linear model as `target = b0 + (b1 * f1) + ...`.
///
/// `features` names the columns the coefficients apply to, in order.
pub fn render_equation<T: Float>(
    target: &str,
    features: &[&str],
    coefficients: &[T],
    fit_intercept: bool,
) -> MatrixResult<String> {
    let offset = usize::from(fit_intercept);
    if coefficients.len() != features.len() + offset {
        return Err(MatrixError::ShapeMismatch {
            op: "render_equation",
            expected: (features.len() + offset, 1),
            got: (coefficients.len(), 1),
        });
    }

    let mut terms: Vec<String> = Vec::with_capacity(coefficients.len());
    if fit_intercept {
        terms.push(format!("{:.4}", coefficients[0]));
    }
    for (c, name) in coefficients[offset..].iter().zip(features) {
        terms.push(format!("({:.4} * {})", c, name));
    }
    if terms.is_empty() {
        terms.push("0".to_string());
    }
    Ok(format!("{} = {}", target, terms.join(" + ")))
}
