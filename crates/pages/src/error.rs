// Error types for site-pages

use thiserror::Error;

use crate::pages::herokuapp::StatusCheck;

/// Result type alias for page object operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving the page objects
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reported by the browser automation layer
    ///
    /// Element-not-found, actionability timeouts and navigation errors all
    /// arrive here unmodified.
    #[error("Driver error: {0}")]
    Driver(#[from] playwright_rs::Error),

    /// No navigation link or direct path matched the requested example
    #[error("Example '{0}' not found")]
    ExampleNotFound(String),

    /// No table header carried the requested column name
    #[error("Column '{0}' not found in table headers")]
    ColumnNotFound(String),

    /// The status code page could not be reached
    #[error("Status code {code} page not reached: {check}")]
    StatusCheck { code: u16, check: StatusCheck },

    /// Timeout waiting for a page condition
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Element not found by selector
    #[error("Element not found: selector '{0}'")]
    ElementNotFound(String),

    /// Invalid argument provided to a page object method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid environment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }
}
