//! Error types for the connector migration tool
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the migration tool
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("Missing credentials: {message}")]
    MissingCredentials { message: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // Control Plane Errors
    // ============================================================================
    #[error("Connector '{name}' not found")]
    NotFound { name: String },

    #[error("Connector name '{name}' is already in use")]
    Conflict { name: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected response from control plane: {message}")]
    UnexpectedResponse { message: String },

    // ============================================================================
    // Transformation Errors
    // ============================================================================
    #[error("Field '{field}' has no representation in the target connector: {message}")]
    UnsupportedField { field: String, message: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ============================================================================
    // Operator Interaction
    // ============================================================================
    #[error("Migration cancelled: {step}")]
    Cancelled { step: String },

    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    // ============================================================================
    // Configuration / I/O Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error annotated with the step that produced it
    #[error("{step}: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a missing credentials error
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::MissingCredentials {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a conflict error
    pub fn conflict(name: impl Into<String>) -> Self {
        Self::Conflict { name: name.into() }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an unexpected response error
    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// Create an unsupported field error
    pub fn unsupported_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a cancellation
    pub fn cancelled(step: impl Into<String>) -> Self {
        Self::Cancelled { step: step.into() }
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The underlying error with any step annotations removed
    pub fn root(&self) -> &Error {
        match self {
            Error::Step { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the operator chose to stop the run
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Error::Cancelled { .. })
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_cancelled() {
            2
        } else {
            1
        }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Self::prompt(err.to_string())
    }
}

/// Result type alias for the migration tool
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(message.into(), e.into()))
    }
}

// Cancellations are left bare; their message already names the step.
fn wrap(message: String, inner: Error) -> Error {
    match inner {
        Error::Cancelled { step } => Error::Cancelled { step },
        other => Error::Step {
            step: message,
            source: Box::new(other),
        },
    }
}
