pub mod engine;
pub mod error;
pub mod extrapolation;
pub mod growth;
pub mod metrics;
pub mod regression;

pub use engine::*;
pub use error::*;
pub use extrapolation::*;
pub use growth::*;
pub use regression::*;
