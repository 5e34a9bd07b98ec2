//! Error types for the forum client

use thiserror::Error;

/// Errors that can occur when talking to the forum
#[derive(Error, Debug)]
pub enum EpvpError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid HTTP status code received
    #[error("Invalid HTTP status: {status}")]
    InvalidStatus {
        /// The status code that was received
        status: reqwest::StatusCode,
    },

    /// Failed to decode response as text
    #[error("Failed to decode response as UTF-8")]
    Encoding,

    /// An expected node was missing from the page
    #[error("Failed to parse HTML response: missing {0}")]
    HtmlParse(&'static str),

    /// Failed to decode a JSON API response
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The operation needs a logged-in session
    #[error("Not logged in")]
    NotLoggedIn,

    /// Login was rejected
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The forum answered with an error page or a form error
    #[error("Forum error: {0}")]
    Forum(String),

    /// Caller supplied an argument the forum would reject
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}

/// Result alias used throughout the crate
pub type Result<T, E = EpvpError> = std::result::Result<T, E>;
