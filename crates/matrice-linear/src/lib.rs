pub mod config;
pub mod model;
pub mod ols;
pub mod polynomial;
pub mod ridge;

pub use config::*;
pub use model::*;
pub use ols::*;
pub use polynomial::*;
pub use ridge::*;
