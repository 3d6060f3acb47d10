use matrice_core::{Float, Matrix, MatrixError, MatrixResult};

/// LU decomposition result: P * A = L * U
pub struct LuDecomposition<T: Float> {
    pub l: Matrix<T>,
    pub u: Matrix<T>,
    /// Row `i` of `P * A` is row `pivot[i]` of `A`.
    pub pivot: Vec<usize>,
    /// Number of row swaps performed, for the determinant sign.
    pub swaps: usize,
}

fn require_square<T: Float>(a: &Matrix<T>, op: &'static str) -> MatrixResult<usize> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(MatrixError::ShapeMismatch {
            op,
            expected: (rows, rows),
            got: (rows, cols),
        });
    }
    Ok(rows)
}

/// Pivot magnitude below which a matrix is treated as singular.
fn pivot_tolerance<T: Float>(a: &Matrix<T>) -> T {
    T::from_usize(a.rows().max(1)) * T::EPSILON * a.max_abs()
}

/// LU decomposition with partial pivoting.
///
/// Fails with [`MatrixError::SingularMatrix`] as soon as no usable pivot is
/// left in a column.
pub fn lu<T: Float>(a: &Matrix<T>) -> MatrixResult<LuDecomposition<T>> {
    let n = require_square(a, "lu")?;
    let tol = pivot_tolerance(a);

    let mut u = a.clone();
    let mut l = Matrix::zeros(n, n);
    let mut pivot: Vec<usize> = (0..n).collect();
    let mut swaps = 0usize;

    for k in 0..n {
        let mut max_val = u[(k, k)].abs();
        let mut max_row = k;
        for i in (k + 1)..n {
            let v = u[(i, k)].abs();
            if v > max_val {
                max_val = v;
                max_row = i;
            }
        }

        if max_val <= tol {
            return Err(MatrixError::SingularMatrix);
        }

        if max_row != k {
            pivot.swap(k, max_row);
            swaps += 1;
            for j in 0..n {
                let tmp = u[(k, j)];
                u[(k, j)] = u[(max_row, j)];
                u[(max_row, j)] = tmp;
            }
            for j in 0..k {
                let tmp = l[(k, j)];
                l[(k, j)] = l[(max_row, j)];
                l[(max_row, j)] = tmp;
            }
        }

        l[(k, k)] = T::ONE;

        for i in (k + 1)..n {
            let factor = u[(i, k)] / u[(k, k)];
            l[(i, k)] = factor;
            for j in k..n {
                let delta = factor * u[(k, j)];
                u[(i, j)] -= delta;
            }
        }
    }

    Ok(LuDecomposition { l, u, pivot, swaps })
}

impl<T: Float> LuDecomposition<T> {
    /// Solve `A x = b` for one right-hand side using the stored factors.
    fn solve_vec(&self, b: &[T]) -> Vec<T> {
        let n = self.pivot.len();

        // Forward substitution: L * y = P * b
        let mut y = vec![T::ZERO; n];
        for i in 0..n {
            let mut sum = T::ZERO;
            for j in 0..i {
                sum += self.l[(i, j)] * y[j];
            }
            y[i] = b[self.pivot[i]] - sum;
        }

        // Back substitution: U * x = y
        let mut x = vec![T::ZERO; n];
        for i in (0..n).rev() {
            let mut sum = T::ZERO;
            for j in (i + 1)..n {
                sum += self.u[(i, j)] * x[j];
            }
            x[i] = (y[i] - sum) / self.u[(i, i)];
        }
        x
    }
}

/// Solve the linear system `A X = B` (square, non-singular `A`).
pub fn solve<T: Float>(a: &Matrix<T>, b: &Matrix<T>) -> MatrixResult<Matrix<T>> {
    let n = require_square(a, "solve")?;
    if b.rows() != n {
        return Err(MatrixError::ShapeMismatch {
            op: "solve",
            expected: (n, b.cols()),
            got: b.shape(),
        });
    }

    let decomp = lu(a)?;
    let mut result = Matrix::zeros(n, b.cols());
    for col in 0..b.cols() {
        let x = decomp.solve_vec(&b.column(col));
        for (i, v) in x.into_iter().enumerate() {
            result[(i, col)] = v;
        }
    }
    Ok(result)
}

/// Determinant of a square matrix via LU decomposition.
///
/// A singular matrix has determinant zero; only a non-square input fails.
pub fn determinant<T: Float>(a: &Matrix<T>) -> MatrixResult<T> {
    let n = require_square(a, "determinant")?;
    let decomp = match lu(a) {
        Ok(d) => d,
        Err(MatrixError::SingularMatrix) => return Ok(T::ZERO),
        Err(e) => return Err(e),
    };

    let mut d = T::ONE;
    for i in 0..n {
        d *= decomp.u[(i, i)];
    }
    if decomp.swaps % 2 == 1 {
        d = -d;
    }
    Ok(d)
}

/// Strict matrix inverse. Fails on singular input rather than approximating;
/// see [`pinv`](crate::svd::pinv) for the minimum-norm alternative.
pub fn inverse<T: Float>(a: &Matrix<T>) -> MatrixResult<Matrix<T>> {
    let n = require_square(a, "inverse")?;
    solve(a, &Matrix::identity(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn m(rows: &[Vec<f64>]) -> Matrix<f64> {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_lu() {
        let a = m(&[
            vec![2.0, 1.0, 1.0],
            vec![4.0, 3.0, 3.0],
            vec![8.0, 7.0, 9.0],
        ]);
        let decomp = lu(&a).unwrap();
        // Verify L * U ≈ P * A
        let lu_product = decomp.l.matmul(&decomp.u).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let orig_row = decomp.pivot[i];
                assert_abs_diff_eq!(lu_product[(i, j)], a[(orig_row, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_solve() {
        // 2x + y = 5
        // x + 3y = 7
        // Solution: x=1.6, y=1.8
        let a = m(&[vec![2.0, 1.0], vec![1.0, 3.0]]);
        let b = Matrix::column_vector(&[5.0, 7.0]);
        let x = solve(&a, &b).unwrap();
        assert_abs_diff_eq!(x[(0, 0)], 1.6, epsilon = 1e-10);
        assert_abs_diff_eq!(x[(1, 0)], 1.8, epsilon = 1e-10);
    }

    #[test]
    fn test_determinant() {
        let a = m(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_abs_diff_eq!(determinant(&a).unwrap(), -2.0, epsilon = 1e-10);

        let b = m(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 5.0],
        ]);
        assert_abs_diff_eq!(determinant(&b).unwrap(), -5.0, epsilon = 1e-10);
    }

    #[test]
    fn test_determinant_singular_is_zero() {
        let a = m(&[vec![1.0, 2.0], vec![2.0, 4.0]]);
        assert_eq!(determinant(&a).unwrap(), 0.0);
    }

    #[test]
    fn test_determinant_non_square() {
        let a = m(&[vec![1.0, 2.0, 3.0]]);
        assert!(matches!(
            determinant(&a),
            Err(MatrixError::ShapeMismatch { op: "determinant", .. })
        ));
    }

    #[test]
    fn test_inverse() {
        let a = m(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let a_inv = inverse(&a).unwrap();
        let product = a.matmul(&a_inv).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_inverse_is_strict() {
        let singular = m(&[vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert_eq!(inverse(&singular).unwrap_err(), MatrixError::SingularMatrix);

        let non_square = m(&[vec![1.0, 2.0]]);
        assert!(matches!(
            inverse(&non_square),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }
}
