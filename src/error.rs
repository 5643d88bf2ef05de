use std::fmt;

#[derive(Debug)]
pub enum ClinicError {
    /// Credentials rejected, or an authenticated call refused (401/403).
    Authentication {
        status: Option<u16>,
        message: Option<String>,
    },
    /// Registration or request payload rejected (400/422).
    Validation {
        status: u16,
        message: Option<String>,
    },
    /// Duplicate data, e.g. an email that is already registered (409).
    Conflict { message: Option<String> },
    /// Any other non-success status from the backend.
    Api {
        status: u16,
        message: Option<String>,
    },
    NetworkError(reqwest::Error),
    StorageError(String),
    ConfigError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl ClinicError {
    /// Maps a non-success HTTP status and the backend's error message onto the taxonomy.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 | 403 => ClinicError::Authentication {
                status: Some(status),
                message,
            },
            400 | 422 => ClinicError::Validation { status, message },
            409 => ClinicError::Conflict { message },
            _ => ClinicError::Api { status, message },
        }
    }

    /// The human-readable message the backend put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClinicError::Authentication { message, .. }
            | ClinicError::Validation { message, .. }
            | ClinicError::Conflict { message }
            | ClinicError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ClinicError::Authentication { .. })
    }
}

impl fmt::Display for ClinicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClinicError::Authentication { message, .. } => write!(
                f,
                "Authentication failed: {}",
                message.as_deref().unwrap_or("invalid credentials")
            ),
            ClinicError::Validation { status, message } => write!(
                f,
                "Validation error (status {}): {}",
                status,
                message.as_deref().unwrap_or("request rejected")
            ),
            ClinicError::Conflict { message } => write!(
                f,
                "Conflict: {}",
                message.as_deref().unwrap_or("resource already exists")
            ),
            ClinicError::Api { status, message } => write!(
                f,
                "API error (status {}): {}",
                status,
                message.as_deref().unwrap_or("request failed")
            ),
            ClinicError::NetworkError(e) => write!(f, "Network error: {}", e),
            ClinicError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            ClinicError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ClinicError::IoError(e) => write!(f, "IO error: {}", e),
            ClinicError::JsonError(e) => write!(f, "JSON error: {}", e),
            ClinicError::YamlError(e) => write!(f, "YAML error: {}", e),
            ClinicError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ClinicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClinicError::NetworkError(e) => Some(e),
            ClinicError::IoError(e) => Some(e),
            ClinicError::JsonError(e) => Some(e),
            ClinicError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClinicError {
    fn from(err: reqwest::Error) -> Self {
        ClinicError::NetworkError(err)
    }
}

impl From<std::io::Error> for ClinicError {
    fn from(err: std::io::Error) -> Self {
        ClinicError::IoError(err)
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(err: serde_json::Error) -> Self {
        ClinicError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for ClinicError {
    fn from(err: serde_yaml::Error) -> Self {
        ClinicError::YamlError(err)
    }
}

impl From<String> for ClinicError {
    fn from(msg: String) -> Self {
        ClinicError::Other(msg)
    }
}

impl From<&str> for ClinicError {
    fn from(msg: &str) -> Self {
        ClinicError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;
