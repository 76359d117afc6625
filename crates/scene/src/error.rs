use std::fmt;

#[derive(Debug)]
pub enum SceneError {
    InvalidConfig { field: &'static str, reason: String },
    ConfigJson(serde_json::Error),
    UnknownLocation { key: String },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidConfig { field, reason } => {
                write!(f, "invalid globe config `{field}`: {reason}")
            }
            SceneError::ConfigJson(e) => write!(f, "invalid globe config json: {e}"),
            SceneError::UnknownLocation { key } => write!(f, "unknown location `{key}`"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::ConfigJson(e) => Some(e),
            SceneError::InvalidConfig { .. } | SceneError::UnknownLocation { .. } => None,
        }
    }
}
