pub mod globe_points;

pub use globe_points::*;
