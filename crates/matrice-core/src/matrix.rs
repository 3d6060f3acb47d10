use crate::dtype::Float;
use crate::error::{MatrixError, MatrixResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Dense real matrix, the fundamental data structure of Matrice.
///
/// Stores data in a flat contiguous `Vec<T>` with row-major layout. A vector
/// is an `n x 1` matrix; most APIs also accept plain slices for vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float", try_from = "MatrixRepr<T>")]
pub struct Matrix<T: Float> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

/// Wire form checked on deserialization so the `rows * cols` invariant holds.
#[derive(Deserialize)]
#[serde(bound = "T: Float")]
struct MatrixRepr<T: Float> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Float> TryFrom<MatrixRepr<T>> for Matrix<T> {
    type Error = MatrixError;

    fn try_from(repr: MatrixRepr<T>) -> MatrixResult<Self> {
        Matrix::new(repr.data, repr.rows, repr.cols)
    }
}

// ─── Construction ───────────────────────────────────────────────────────────

impl<T: Float> Matrix<T> {
    /// Create a matrix from row-major data.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> MatrixResult<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MatrixError::ShapeMismatch {
                op: "new",
                expected: (rows, cols),
                got: (data.len(), 1),
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::ZERO)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::ONE)
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Matrix {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Identity matrix of size `n x n`.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::ONE;
        }
        m
    }

    /// Build from a slice of rows. All rows must have equal length.
    pub fn from_rows(rows: &[Vec<T>]) -> MatrixResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(MatrixError::ShapeMismatch {
                    op: "from_rows",
                    expected: (n_rows, n_cols),
                    got: (n_rows, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            data,
            rows: n_rows,
            cols: n_cols,
        })
    }

    /// Column vector (`n x 1`) from a flat sequence.
    pub fn column_vector(values: &[T]) -> Self {
        Matrix {
            data: values.to_vec(),
            rows: values.len(),
            cols: 1,
        }
    }
}

// ─── Accessors ──────────────────────────────────────────────────────────────

impl<T: Float> Matrix<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Borrow row `i`. Panics if out of bounds, like slice indexing.
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Copy column `j` into a new vector.
    pub fn column(&self, j: usize) -> Vec<T> {
        (0..self.rows).map(|i| self.data[i * self.cols + j]).collect()
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }
}

// ─── Elementwise ────────────────────────────────────────────────────────────

impl<T: Float> Matrix<T> {
    pub fn map<F: Fn(T) -> T>(&self, f: F) -> Matrix<T> {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Combine two same-shaped matrices element by element.
    pub fn zip_with<F: Fn(T, T) -> T>(
        &self,
        other: &Matrix<T>,
        op: &'static str,
        f: F,
    ) -> MatrixResult<Matrix<T>> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch {
                op,
                expected: self.shape(),
                got: other.shape(),
            });
        }
        Ok(Matrix {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            rows: self.rows,
            cols: self.cols,
        })
    }

    pub fn scale(&self, s: T) -> Matrix<T> {
        self.map(|x| x * s)
    }

    /// Largest absolute entry, `0` for an empty matrix.
    pub fn max_abs(&self) -> T {
        self.data.iter().fold(T::ZERO, |acc, &v| acc.max(v.abs()))
    }
}

// ─── Structure ──────────────────────────────────────────────────────────────

impl<T: Float> Matrix<T> {
    pub fn transpose(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Matrix {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Standard matrix product `self · other`.
    pub fn matmul(&self, other: &Matrix<T>) -> MatrixResult<Matrix<T>> {
        if self.cols != other.rows {
            return Err(MatrixError::ShapeMismatch {
                op: "matmul",
                expected: (self.cols, other.cols),
                got: other.shape(),
            });
        }
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut data = vec![T::ZERO; m * n];
        for i in 0..m {
            for p in 0..k {
                let a = self.data[i * k + p];
                for j in 0..n {
                    data[i * n + j] += a * other.data[p * n + j];
                }
            }
        }
        Ok(Matrix { data, rows: m, cols: n })
    }

    /// Matrix-vector product `self · v`.
    pub fn matvec(&self, v: &[T]) -> MatrixResult<Vec<T>> {
        if self.cols != v.len() {
            return Err(MatrixError::ShapeMismatch {
                op: "matvec",
                expected: (self.cols, 1),
                got: (v.len(), 1),
            });
        }
        Ok(self
            .iter_rows()
            .map(|row| row.iter().zip(v).map(|(&a, &b)| a * b).sum())
            .collect())
    }

    /// Concatenate matrices side by side. All parts must share a row count.
    pub fn hstack(parts: &[&Matrix<T>]) -> MatrixResult<Matrix<T>> {
        let rows = parts.first().map_or(0, |m| m.rows);
        if let Some(bad) = parts.iter().find(|m| m.rows != rows) {
            return Err(MatrixError::ShapeMismatch {
                op: "hstack",
                expected: (rows, bad.cols),
                got: bad.shape(),
            });
        }
        let cols: usize = parts.iter().map(|m| m.cols).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for part in parts {
                data.extend_from_slice(part.row(i));
            }
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Copy of this matrix with a leading column of ones.
    pub fn with_intercept_column(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.rows * (self.cols + 1));
        for i in 0..self.rows {
            data.push(T::ONE);
            data.extend_from_slice(self.row(i));
        }
        Matrix {
            data,
            rows: self.rows,
            cols: self.cols + 1,
        }
    }
}

impl<T: Float> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i * self.cols + j]
    }
}

impl<T: Float> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[i * self.cols + j]
    }
}

// ─── Display ────────────────────────────────────────────────────────────────

impl<T: Float> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "matrix([")?;
        for i in 0..self.rows.min(8) {
            write!(f, "  [")?;
            for j in 0..self.cols.min(8) {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:.4}", self.data[i * self.cols + j])?;
            }
            if self.cols > 8 {
                write!(f, ", ...")?;
            }
            writeln!(f, "],")?;
        }
        if self.rows > 8 {
            writeln!(f, "  ...")?;
        }
        write!(f, "], shape=({}, {}))", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation() {
        let m: Matrix<f64> = Matrix::zeros(3, 4);
        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.data().len(), 12);

        let id: Matrix<f64> = Matrix::identity(3);
        assert_eq!(id[(0, 0)], 1.0);
        assert_eq!(id[(0, 1)], 0.0);
        assert_eq!(id.data().iter().sum::<f64>(), 3.0);

        assert!(Matrix::<f64>::new(vec![1.0, 2.0, 3.0], 2, 2).is_err());
    }

    #[test]
    fn test_from_rows() {
        let m: Matrix<f64> = Matrix::from_rows(&[
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
        ])
        .unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(1, 2)], 6.0);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.column(1), vec![2.0, 5.0]);
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Matrix::<f64>::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::ShapeMismatch { op: "from_rows", .. }));
    }

    #[test]
    fn test_zero_column_rows_allowed() {
        let m = Matrix::<f64>::from_rows(&[vec![], vec![]]).unwrap();
        assert_eq!(m.shape(), (2, 0));
        assert_eq!(m.iter_rows().count(), 2);
        assert_eq!(m.matvec(&[]).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_new_rejects_overflowing_shape() {
        let result: MatrixResult<Matrix<f64>> = Matrix::new(vec![], usize::MAX, 2);
        assert!(matches!(
            result,
            Err(MatrixError::ShapeMismatch { op: "new", expected: (usize::MAX, 2), .. })
        ));
        // Wrapped product equals the data length
        let wrapped: MatrixResult<Matrix<f64>> = Matrix::new(vec![1.0; 2], usize::MAX / 2 + 2, 2);
        assert!(wrapped.is_err());
    }

    #[test]
    fn test_transpose() {
        let m: Matrix<f64> = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_matmul() {
        let a: Matrix<f64> = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b: Matrix<f64> = Matrix::new(vec![5.0, 6.0, 7.0, 8.0], 2, 2).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);

        let bad: Matrix<f64> = Matrix::zeros(3, 1);
        assert!(a.matmul(&bad).is_err());
    }

    #[test]
    fn test_matvec() {
        let a: Matrix<f64> = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        assert_eq!(a.matvec(&[1.0, 1.0]).unwrap(), vec![3.0, 7.0]);
        assert!(a.matvec(&[1.0]).is_err());
    }

    #[test]
    fn test_hstack_and_intercept() {
        let a: Matrix<f64> = Matrix::column_vector(&[1.0, 2.0]);
        let b: Matrix<f64> = Matrix::column_vector(&[3.0, 4.0]);
        let c = Matrix::hstack(&[&a, &b]).unwrap();
        assert_eq!(c.data(), &[1.0, 3.0, 2.0, 4.0]);

        let aug = a.with_intercept_column();
        assert_eq!(aug.shape(), (2, 2));
        assert_eq!(aug.data(), &[1.0, 1.0, 1.0, 2.0]);

        let short: Matrix<f64> = Matrix::zeros(3, 1);
        assert!(Matrix::hstack(&[&a, &short]).is_err());
    }

    #[test]
    fn test_zip_with_shape_check() {
        let a: Matrix<f64> = Matrix::ones(2, 2);
        let b: Matrix<f64> = Matrix::ones(2, 3);
        assert!(a.zip_with(&b, "add", |x, y| x + y).is_err());
        let c = a.zip_with(&a, "add", |x, y| x + y).unwrap();
        assert_eq!(c.data(), &[2.0; 4]);
    }

    #[test]
    fn test_serde_validates_shape() {
        let m: Matrix<f64> = Matrix::identity(2);
        let json = serde_json::to_string(&m).unwrap();
        let back: Matrix<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        let bad = r#"{"data":[1.0,2.0,3.0],"rows":2,"cols":2}"#;
        assert!(serde_json::from_str::<Matrix<f64>>(bad).is_err());
    }
}
