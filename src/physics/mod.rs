pub mod ground_bearing;

pub use ground_bearing::*;
