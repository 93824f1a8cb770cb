/// Failure to turn a route document into a [`crate::Route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSourceError {
    InvalidJson(String),
    MissingGeometry,
    UnsupportedGeometry(String),
    InvalidPosition { index: usize },
}

impl std::fmt::Display for RouteSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteSourceError::InvalidJson(msg) => write!(f, "invalid route document: {msg}"),
            RouteSourceError::MissingGeometry => write!(f, "no LineString geometry found"),
            RouteSourceError::UnsupportedGeometry(kind) => {
                write!(f, "unsupported geometry type: {kind}")
            }
            RouteSourceError::InvalidPosition { index } => {
                write!(f, "position {index} is not [lng, lat] or [lng, lat, ele]")
            }
        }
    }
}

impl std::error::Error for RouteSourceError {}

/// Failure to load or validate a [`crate::CourseConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, message } => write!(f, "read {path}: {message}"),
            ConfigError::Parse(msg) => write!(f, "invalid config: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
