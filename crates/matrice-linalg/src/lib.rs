pub mod arithmetic;
pub mod decomposition;
pub mod exponential;
pub mod svd;

pub use arithmetic::*;
pub use decomposition::*;
pub use exponential::*;
pub use svd::*;
