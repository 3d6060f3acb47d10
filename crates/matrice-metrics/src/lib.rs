pub mod regression;
pub mod report;

pub use regression::*;
pub use report::*;
