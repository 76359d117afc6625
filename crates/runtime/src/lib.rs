pub mod frame;
pub mod timer;
pub mod tween;
pub mod visibility;

pub use frame::*;
pub use timer::*;
pub use tween::*;
pub use visibility::*;
