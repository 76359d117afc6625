pub mod easing;
pub mod math;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use easing::*;
pub use time::*;
