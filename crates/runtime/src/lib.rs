pub mod event_bus;
pub mod frame;
pub mod frame_loop;
pub mod timer;
pub mod tween;

pub use event_bus::*;
pub use frame::*;
pub use frame_loop::*;
pub use timer::*;
pub use tween::*;
