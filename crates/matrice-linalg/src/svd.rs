use log::trace;
use matrice_core::{Float, Matrix};

const MAX_SWEEPS: usize = 60;

/// SVD result: A = U * diag(s) * Vᵀ
///
/// With `k = min(m, n)`: `u` is `[m, k]`, `s` holds `k` singular values in
/// descending order, `v` is `[n, k]`.
pub struct SvdDecomposition<T: Float> {
    pub u: Matrix<T>,
    pub s: Vec<T>,
    pub v: Matrix<T>,
}

/// Singular Value Decomposition using one-sided (Hestenes) Jacobi rotations.
///
/// Rotates column pairs of A until they are mutually orthogonal; the column
/// norms are then the singular values. Works directly on A rather than AᵀA,
/// so the condition number is not squared.
pub fn svd<T: Float>(a: &Matrix<T>) -> SvdDecomposition<T> {
    let (m, n) = a.shape();
    if m < n {
        // A = U Σ Vᵀ  ⇔  Aᵀ = V Σ Uᵀ; rotating the m columns of Aᵀ avoids
        // n - m spurious near-zero columns
        let t = svd(&a.transpose());
        return SvdDecomposition {
            u: t.v,
            s: t.s,
            v: t.u,
        };
    }
    let k = n;

    // Work in f64, column-major, for numerical stability
    let mut w: Vec<Vec<f64>> = (0..n)
        .map(|j| a.column(j).into_iter().map(|x| x.to_f64()).collect())
        .collect();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|j| {
            let mut e = vec![0.0; n];
            e[j] = 1.0;
            e
        })
        .collect();

    for sweep in 0..MAX_SWEEPS {
        let mut rotated = false;
        for i in 0..n {
            for j in (i + 1)..n {
                let alpha: f64 = w[i].iter().map(|x| x * x).sum();
                let beta: f64 = w[j].iter().map(|x| x * x).sum();
                let gamma: f64 = w[i].iter().zip(&w[j]).map(|(x, y)| x * y).sum();

                if gamma == 0.0 || gamma.abs() <= f64::EPSILON * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;

                rotate(&mut w, i, j, c, s);
                rotate(&mut v, i, j, c, s);
            }
        }
        if !rotated {
            trace!("svd: {}x{} converged after {} sweeps", m, n, sweep + 1);
            break;
        }
    }

    let norms: Vec<f64> = w
        .iter()
        .map(|col| col.iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| norms[y].total_cmp(&norms[x]));
    order.truncate(k);

    let s: Vec<T> = order.iter().map(|&j| T::from_f64(norms[j])).collect();

    let mut u = Matrix::zeros(m, k);
    let mut v_out = Matrix::zeros(n, k);
    for (c, &j) in order.iter().enumerate() {
        let sigma = norms[j];
        if sigma > 0.0 {
            for r in 0..m {
                u[(r, c)] = T::from_f64(w[j][r] / sigma);
            }
        }
        for r in 0..n {
            v_out[(r, c)] = T::from_f64(v[j][r]);
        }
    }

    SvdDecomposition { u, s, v: v_out }
}

/// Apply a Jacobi rotation to columns `i` and `j`.
fn rotate(cols: &mut [Vec<f64>], i: usize, j: usize, c: f64, s: f64) {
    let (left, right) = cols.split_at_mut(j);
    let (ci, cj) = (&mut left[i], &mut right[0]);
    for (x, y) in ci.iter_mut().zip(cj.iter_mut()) {
        let xi = *x;
        let yj = *y;
        *x = c * xi - s * yj;
        *y = s * xi + c * yj;
    }
}

/// Default relative cutoff `max(m, n) * eps`: singular values at or below
/// `rcond * σ_max` count as zero.
pub fn default_rcond(shape: (usize, usize)) -> f64 {
    shape.0.max(shape.1) as f64 * f64::EPSILON
}

fn cutoff<T: Float>(s: &[T], rcond: f64) -> f64 {
    rcond * s.first().map_or(0.0, |v| v.to_f64())
}

/// Numerical rank: number of singular values above the default cutoff.
pub fn rank<T: Float>(a: &Matrix<T>) -> usize {
    let decomp = svd(a);
    let tol = cutoff(&decomp.s, default_rcond(a.shape()));
    decomp.s.iter().filter(|&&v| v.to_f64() > tol).count()
}

/// Condition number σ_max / σ_min (infinite when σ_min is zero).
pub fn condition_number<T: Float>(a: &Matrix<T>) -> f64 {
    let decomp = svd(a);
    let max = decomp.s.first().map_or(0.0, |v| v.to_f64());
    let min = decomp.s.last().map_or(0.0, |v| v.to_f64());
    if min == 0.0 {
        f64::INFINITY
    } else {
        max / min
    }
}

/// Moore-Penrose pseudo-inverse via SVD: A⁺ = V Σ⁺ Uᵀ
///
/// Defined for every matrix, singular or not. `A⁺ b` is the minimum-norm
/// least-squares solution of `A x = b`.
pub fn pinv<T: Float>(a: &Matrix<T>) -> Matrix<T> {
    pinv_with_rank(a).0
}

/// [`pinv`] together with the numerical rank found along the way.
pub fn pinv_with_rank<T: Float>(a: &Matrix<T>) -> (Matrix<T>, usize) {
    pinv_rcond(a, default_rcond(a.shape()))
}

/// Pseudo-inverse treating singular values at or below `rcond * σ_max` as zero.
pub fn pinv_rcond<T: Float>(a: &Matrix<T>, rcond: f64) -> (Matrix<T>, usize) {
    let (m, n) = a.shape();
    let SvdDecomposition { u, s, v } = svd(a);
    let tol = cutoff(&s, rcond);

    let mut result = Matrix::zeros(n, m);
    let mut rank = 0;
    for (c, sigma) in s.iter().enumerate() {
        let sigma = sigma.to_f64();
        if sigma <= tol {
            continue;
        }
        rank += 1;
        let inv = T::from_f64(1.0 / sigma);
        for i in 0..n {
            let vi = v[(i, c)] * inv;
            for j in 0..m {
                result[(i, j)] += vi * u[(j, c)];
            }
        }
    }
    (result, rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn m(rows: &[Vec<f64>]) -> Matrix<f64> {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_svd_basic() {
        let a = m(&[vec![3.0, 0.0], vec![0.0, 4.0]]);
        let decomp = svd(&a);
        assert_abs_diff_eq!(decomp.s[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(decomp.s[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_svd_reconstructs() {
        let a = m(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let SvdDecomposition { u, s, v } = svd(&a);
        for i in 0..3 {
            for j in 0..2 {
                let rebuilt: f64 = (0..2).map(|c| u[(i, c)] * s[c] * v[(j, c)]).sum();
                assert_abs_diff_eq!(rebuilt, a[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_svd_wide_matrix() {
        let a = m(&[vec![1.0, 0.0, 2.0], vec![0.0, 3.0, 0.0]]);
        let SvdDecomposition { u, s, v } = svd(&a);
        assert_eq!(u.shape(), (2, 2));
        assert_eq!(v.shape(), (3, 2));
        assert_abs_diff_eq!(s[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s[1], 5f64.sqrt(), epsilon = 1e-12);
        for i in 0..2 {
            for j in 0..3 {
                let rebuilt: f64 = (0..2).map(|c| u[(i, c)] * s[c] * v[(j, c)]).sum();
                assert_abs_diff_eq!(rebuilt, a[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_rank() {
        assert_eq!(rank(&m(&[vec![1.0, 2.0], vec![3.0, 4.0]])), 2);
        assert_eq!(rank(&m(&[vec![1.0, 2.0], vec![2.0, 4.0]])), 1);
        assert_eq!(rank(&Matrix::<f64>::zeros(3, 3)), 0);
        assert_eq!(rank(&m(&[vec![1.0, 2.0, 3.0]])), 1);
    }

    #[test]
    fn test_pinv_full_column_rank() {
        let a = m(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let a_pinv = pinv(&a);
        assert_eq!(a_pinv.shape(), (2, 3));

        // A⁺ A ≈ I for full column rank
        let prod = a_pinv.matmul(&a).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(prod[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_pinv_singular() {
        // pinv([[1,1],[1,1]]) = [[0.25,0.25],[0.25,0.25]]
        let a = m(&[vec![1.0, 1.0], vec![1.0, 1.0]]);
        let a_pinv = pinv(&a);
        for v in a_pinv.data() {
            assert_abs_diff_eq!(*v, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pinv_with_rank() {
        let (_, r) = pinv_with_rank(&m(&[vec![2.0, 4.0], vec![1.0, 2.0]]));
        assert_eq!(r, 1);
        let (p, r) = pinv_with_rank(&Matrix::<f64>::identity(3));
        assert_eq!(r, 3);
        assert_eq!(p, Matrix::identity(3));
    }

    #[test]
    fn test_condition_number() {
        let a = m(&[vec![2.0, 0.0], vec![0.0, 0.5]]);
        assert_abs_diff_eq!(condition_number(&a), 4.0, epsilon = 1e-12);
        assert!(condition_number(&m(&[vec![1.0, 1.0], vec![1.0, 1.0]])) > 1e12);
    }
}
