pub mod curve;
pub mod projection;
pub mod vec;

pub use curve::*;
pub use projection::*;
pub use vec::*;
