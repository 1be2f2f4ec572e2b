pub mod types;
pub mod dataset;
pub mod normalizer;
pub mod physics;
pub mod logging;

pub use types::*;
