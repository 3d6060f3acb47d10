use matrice_core::{Float, Matrix, MatrixError, MatrixResult};

use crate::decomposition::inverse;

/// Elementwise sum. Shapes must be identical.
pub fn add<T: Float>(a: &Matrix<T>, b: &Matrix<T>) -> MatrixResult<Matrix<T>> {
    a.zip_with(b, "add", |x, y| x + y)
}

/// Elementwise difference `a - b`. Shapes must be identical.
pub fn subtract<T: Float>(a: &Matrix<T>, b: &Matrix<T>) -> MatrixResult<Matrix<T>> {
    a.zip_with(b, "subtract", |x, y| x - y)
}

/// Matrix product `a · b`. Requires `cols(a) == rows(b)`.
pub fn multiply<T: Float>(a: &Matrix<T>, b: &Matrix<T>) -> MatrixResult<Matrix<T>> {
    a.matmul(b)
}

/// Matrix division `a · b⁻¹`.
///
/// `b` must be square and invertible; both failures surface as
/// [`MatrixError::SingularMatrix`].
pub fn divide<T: Float>(a: &Matrix<T>, b: &Matrix<T>) -> MatrixResult<Matrix<T>> {
    if !b.is_square() {
        return Err(MatrixError::SingularMatrix);
    }
    let b_inv = inverse(b)?;
    a.matmul(&b_inv)
}

pub fn transpose<T: Float>(a: &Matrix<T>) -> Matrix<T> {
    a.transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[Vec<f64>]) -> Matrix<f64> {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_add_subtract() {
        let a = m(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = m(&[vec![10.0, 20.0], vec![30.0, 40.0]]);
        assert_eq!(add(&a, &b).unwrap().data(), &[11.0, 22.0, 33.0, 44.0]);
        assert_eq!(subtract(&b, &a).unwrap().data(), &[9.0, 18.0, 27.0, 36.0]);
    }

    #[test]
    fn test_add_shape_mismatch() {
        let a = m(&[vec![1.0, 2.0]]);
        let b = m(&[vec![1.0], vec![2.0]]);
        assert!(matches!(
            add(&a, &b),
            Err(MatrixError::ShapeMismatch { op: "add", .. })
        ));
        assert!(matches!(
            subtract(&a, &b),
            Err(MatrixError::ShapeMismatch { op: "subtract", .. })
        ));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let a = m(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let before = a.clone();
        let _ = add(&a, &a).unwrap();
        let _ = divide(&a, &a).unwrap();
        assert_eq!(a, before);
    }

    #[test]
    fn test_multiply() {
        let a = m(&[vec![1.0, 2.0, 3.0]]);
        let b = m(&[vec![1.0], vec![1.0], vec![1.0]]);
        assert_eq!(multiply(&a, &b).unwrap().data(), &[6.0]);
        assert!(matches!(
            multiply(&a, &a),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_divide() {
        let a = m(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let q = divide(&a, &a).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((q[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_divide_by_singular_or_non_square() {
        let a = m(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let singular = m(&[vec![1.0, 2.0], vec![2.0, 4.0]]);
        assert_eq!(divide(&a, &singular), Err(MatrixError::SingularMatrix));

        let non_square = m(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(divide(&a, &non_square), Err(MatrixError::SingularMatrix));
    }
}
