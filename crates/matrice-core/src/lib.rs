pub mod matrix;
pub mod dtype;
pub mod error;

pub use matrix::Matrix;
pub use dtype::Float;
pub use error::{MatrixError, MatrixResult};
