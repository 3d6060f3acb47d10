use thiserror::Error;

/// Error taxonomy shared by every Matrice crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    /// Operand dimensions are incompatible. Shapes are `(rows, cols)`.
    #[error("Shape mismatch in {op}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Singular matrix: cannot invert or decompose")]
    SingularMatrix,

    #[error("Model not fitted: call fit() before {0}")]
    NotFitted(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Empty input: {0}")]
    EmptyMatrix(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type MatrixResult<T> = Result<T, MatrixError>;
