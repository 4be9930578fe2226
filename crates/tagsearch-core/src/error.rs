use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, TagSearchError>;

#[derive(Debug, Error)]
pub enum TagSearchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Adapter-level failure. In-memory registry state has already been
    /// updated when this is returned from a mutation.
    #[error("persistence {operation} failed: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: Box<TagSearchError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TagSearchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Persistence { .. } => "PERSISTENCE_FAILURE",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Toml(_) => "TOML_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Everything except configuration problems can be retried by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Toml(_))
    }

    pub(crate) fn persistence(operation: &'static str, source: Self) -> Self {
        Self::Persistence {
            operation,
            source: Box::new(source),
        }
    }

    pub(crate) fn mutex_poisoned(resource: &str) -> Self {
        Self::Internal(format!("{resource} mutex poisoned"))
    }

    pub fn to_payload(&self, operation: impl Into<String>, tag: Option<String>) -> ErrorPayload {
        let details = match self {
            Self::Persistence { operation, source } => Some(serde_json::json!({
                "adapter_operation": operation,
                "adapter_code": source.code(),
            })),
            _ => None,
        };
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            tag,
            details,
        }
    }
}
