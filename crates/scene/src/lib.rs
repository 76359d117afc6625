pub mod camera;
pub mod config;
pub mod connectors;
pub mod cycle;
pub mod error;
pub mod globe;
pub mod globe_dots;
pub mod labels;
pub mod line_dots;

pub use config::GlobeConfig;
pub use error::SceneError;
pub use globe::*;
