pub mod baked;
pub mod bitmap;

pub use baked::*;
pub use bitmap::*;
