use matrice_core::{Float, Matrix, MatrixError, MatrixResult};

const TAYLOR_TERMS: usize = 30;

/// Which exponential [`exponential`] computes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Exponent<T> {
    /// Elementwise `e^x`.
    #[default]
    Elementwise,
    /// Elementwise `x^p`.
    Power(T),
    /// True matrix exponential `e^A` (square input only).
    Matrix,
}

/// Exponential of a matrix, elementwise by default.
pub fn exponential<T: Float>(a: &Matrix<T>, mode: Exponent<T>) -> MatrixResult<Matrix<T>> {
    match mode {
        Exponent::Elementwise => Ok(a.map(T::exp)),
        Exponent::Power(p) => Ok(a.map(|x| x.powf(p))),
        Exponent::Matrix => matrix_exp(a),
    }
}

/// Matrix exponential by scaling and squaring over a truncated Taylor series.
///
/// A is scaled by 2⁻ˢ until its infinity norm is at most 0.5, the series is
/// summed until terms vanish, then the result is squared `s` times.
///
/// The scale is found in two steps, first bringing the largest entry to at
/// most 1 and then the row sums, so `s` stays finite even when the norm of
/// the input itself overflows. Results that exceed the f64 range come back
/// as non-finite entries. An input holding an infinity yields all NaN.
pub fn matrix_exp<T: Float>(a: &Matrix<T>) -> MatrixResult<Matrix<T>> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(MatrixError::ShapeMismatch {
            op: "matrix_exp",
            expected: (rows, rows),
            got: (rows, cols),
        });
    }
    let n = rows;

    let work = Matrix::new(a.data().iter().map(|v| v.to_f64()).collect(), n, n)?;
    let max_abs = work.data().iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if max_abs.is_infinite() {
        return Ok(Matrix::filled(n, n, T::from_f64(f64::NAN)));
    }

    // max_abs < 2^1024, so both shifts are bounded
    let entry_shift = halvings(max_abs, 1.0);
    let unit = work.scale(0.5f64.powi(entry_shift));
    let norm_shift = halvings(inf_norm(&unit), 0.5);
    let scaled = unit.scale(0.5f64.powi(norm_shift));
    let squarings = entry_shift + norm_shift;

    let mut result = Matrix::<f64>::identity(n);
    let mut term = Matrix::<f64>::identity(n);
    for k in 1..=TAYLOR_TERMS {
        term = term.matmul(&scaled)?.scale(1.0 / k as f64);
        result = result.zip_with(&term, "matrix_exp", |x, y| x + y)?;
        if inf_norm(&term) <= f64::EPSILON * inf_norm(&result) {
            break;
        }
    }

    for _ in 0..squarings {
        result = result.matmul(&result)?;
    }

    Matrix::new(result.data().iter().map(|&v| T::from_f64(v)).collect(), n, n)
}

/// Smallest `s >= 0` with `value / 2^s <= limit`.
fn halvings(value: f64, limit: f64) -> i32 {
    if value > limit {
        (value / limit).log2().ceil() as i32
    } else {
        0
    }
}

/// Maximum absolute row sum.
fn inf_norm(a: &Matrix<f64>) -> f64 {
    a.iter_rows()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn m(rows: &[Vec<f64>]) -> Matrix<f64> {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_elementwise_default() {
        let a = m(&[vec![0.0, 1.0]]);
        let e = exponential(&a, Exponent::default()).unwrap();
        assert_eq!(e[(0, 0)], 1.0);
        assert_relative_eq!(e[(0, 1)], std::f64::consts::E);
    }

    #[test]
    fn test_power() {
        let a = m(&[vec![2.0, 3.0], vec![4.0, 0.5]]);
        let p = exponential(&a, Exponent::Power(2.0)).unwrap();
        assert_eq!(p.data(), &[4.0, 9.0, 16.0, 0.25]);
    }

    #[test]
    fn test_matrix_exp_diagonal() {
        let a = m(&[vec![1.0, 0.0], vec![0.0, 2.0]]);
        let e = exponential(&a, Exponent::Matrix).unwrap();
        assert_relative_eq!(e[(0, 0)], 1f64.exp(), max_relative = 1e-12);
        assert_relative_eq!(e[(1, 1)], 2f64.exp(), max_relative = 1e-12);
        assert_eq!(e[(0, 1)], 0.0);
    }

    #[test]
    fn test_matrix_exp_nilpotent() {
        // exp([[0, 1], [0, 0]]) = [[1, 1], [0, 1]]
        let a = m(&[vec![0.0, 1.0], vec![0.0, 0.0]]);
        let e = matrix_exp(&a).unwrap();
        assert_relative_eq!(e[(0, 0)], 1.0, max_relative = 1e-12);
        assert_relative_eq!(e[(0, 1)], 1.0, max_relative = 1e-12);
        assert_eq!(e[(1, 0)], 0.0);
    }

    #[test]
    fn test_matrix_exp_rotation() {
        // exp([[0, -θ], [θ, 0]]) is a rotation by θ
        let theta = 3.0f64;
        let a = m(&[vec![0.0, -theta], vec![theta, 0.0]]);
        let e = matrix_exp(&a).unwrap();
        assert_relative_eq!(e[(0, 0)], theta.cos(), epsilon = 1e-10);
        assert_relative_eq!(e[(1, 0)], theta.sin(), epsilon = 1e-10);
    }

    #[test]
    fn test_matrix_exp_overflowing_norm() {
        // Row sum of the first row is beyond f64::MAX
        let a = m(&[vec![1e308, 1e308], vec![0.0, 1.0]]);
        let e = matrix_exp(&a).unwrap();
        assert!(!e[(0, 0)].is_finite());
        assert_eq!(e.shape(), (2, 2));
    }

    #[test]
    fn test_matrix_exp_huge_negative_underflows() {
        let a = m(&[vec![-1e308]]);
        let e = matrix_exp(&a).unwrap();
        assert_eq!(e[(0, 0)], 0.0);
    }

    #[test]
    fn test_matrix_exp_infinite_entry() {
        let a = m(&[vec![f64::INFINITY, 0.0], vec![0.0, 1.0]]);
        let e = matrix_exp(&a).unwrap();
        assert!(e.data().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_matrix_exp_requires_square() {
        let a = m(&[vec![1.0, 2.0]]);
        assert!(matches!(
            exponential(&a, Exponent::Matrix),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }
}
