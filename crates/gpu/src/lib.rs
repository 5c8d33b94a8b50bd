pub mod geometry;
pub mod instances;
pub mod renderer;
pub mod shader;

pub use geometry::*;
pub use instances::*;
pub use renderer::*;
pub use shader::*;
