use std::fmt;

use formats::GlobePointsError;
use scene::SceneError;

/// The single message shown to the user, whatever went wrong.
pub const FALLBACK_ALERT: &str = "WebGL not supported. Please use a browser that supports WebGL.";

/// Why the viewer could not start.
///
/// Every variant ends in the same alert; the variant only decides what gets
/// written to the console.
#[derive(Debug)]
pub enum ViewerError {
    WebGlUnsupported,
    MissingElement { selector: &'static str },
    Dom(String),
    Fetch { url: String, reason: String },
    Data(GlobePointsError),
    Config(SceneError),
    Gpu(String),
}

impl ViewerError {
    pub fn alert_message(&self) -> &'static str {
        FALLBACK_ALERT
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::WebGlUnsupported => write!(f, "WebGLRenderingContext is not available"),
            ViewerError::MissingElement { selector } => {
                write!(f, "required element `{selector}` not found")
            }
            ViewerError::Dom(reason) => write!(f, "dom update failed: {reason}"),
            ViewerError::Fetch { url, reason } => write!(f, "failed to fetch {url}: {reason}"),
            ViewerError::Data(e) => write!(f, "{e}"),
            ViewerError::Config(e) => write!(f, "{e}"),
            ViewerError::Gpu(reason) => write!(f, "wgpu init failed: {reason}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Data(e) => Some(e),
            ViewerError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GlobePointsError> for ViewerError {
    fn from(e: GlobePointsError) -> Self {
        ViewerError::Data(e)
    }
}

impl From<SceneError> for ViewerError {
    fn from(e: SceneError) -> Self {
        ViewerError::Config(e)
    }
}
