//! Error types for Nestegg

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing, invalid or expired token. The session must be cleared.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport failure talking to the finance API
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status from the API
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Validation(e.to_string())
        } else {
            Error::Network(e)
        }
    }
}

impl Error {
    /// True when the session token should be discarded
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Short user-facing notice for this error.
    ///
    /// Network failures get a generic message; the underlying cause is only
    /// logged. Server-provided messages are passed through.
    pub fn notice(&self) -> String {
        match self {
            Error::Auth(_) => "Your session has expired. Please log in again.".to_string(),
            Error::Network(_) => {
                "Could not reach the server. Check your connection and that the server is running."
                    .to_string()
            }
            Error::Validation(_) => "The server returned data in an unexpected format.".to_string(),
            Error::NotFound(what) => format!("{} no longer exists.", what),
            Error::Server { message, .. } => message.clone(),
            Error::Config(msg) => format!("Configuration problem: {}", msg),
            Error::Io(e) => format!("Local storage error: {}", e),
            Error::Json(e) => format!("Local data is corrupted: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_detection() {
        assert!(Error::Auth("expired".into()).is_auth());
        assert!(!Error::NotFound("savings 1".into()).is_auth());
    }

    #[test]
    fn test_notice_passes_server_message() {
        let err = Error::Server {
            status: 400,
            message: "Amount is required".into(),
        };
        assert_eq!(err.notice(), "Amount is required");
    }

    #[test]
    fn test_notice_not_found() {
        let err = Error::NotFound("Transaction abc".into());
        assert_eq!(err.notice(), "Transaction abc no longer exists.");
    }
}
