pub mod camera;
pub mod config;
pub mod dots;
pub mod interaction;
pub mod map;
pub mod orbit;
pub mod picking;
pub mod prefabs;

pub use camera::*;
pub use config::*;
pub use dots::*;
pub use interaction::*;
pub use map::*;
pub use orbit::*;
pub use picking::*;
pub use prefabs::*;
