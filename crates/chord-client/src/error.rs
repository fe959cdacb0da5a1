//! Error types for the Chord console client
//!
//! Every failure is classified into one of three kinds so that callers can
//! tell "the ring rejected the request" apart from "the host could not be
//! reached" and from "the request never left the console".

/// Errors produced by cluster requests and by the console components built on them
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A local precondition failed before any network call was made
    #[error("{0}")]
    Validation(String),

    /// The console requires a login before this component may be used
    #[error("Not logged in")]
    NotLoggedIn,

    /// The remote surface answered with a truthy `error` field
    #[error("{0}")]
    Application(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Coarse classification of a [`ConsoleError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Application,
    Transport,
}

/// How a failure should be presented to the operator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

impl ConsoleError {
    pub fn validation(message: impl Into<String>) -> Self {
        ConsoleError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConsoleError::Validation(_) | ConsoleError::NotLoggedIn => ErrorKind::Validation,
            ConsoleError::Application(_) | ConsoleError::AuthFailed(_) => ErrorKind::Application,
            ConsoleError::Http(_)
            | ConsoleError::Status { .. }
            | ConsoleError::Decode(_) => ErrorKind::Transport,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.kind() {
            ErrorKind::Validation => Severity::Warning,
            ErrorKind::Application | ErrorKind::Transport => Severity::Error,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConsoleError::validation("No physical node selected");
        assert_eq!(err.to_string(), "No physical node selected");

        let err = ConsoleError::Application("no such key".to_string());
        assert_eq!(err.to_string(), "no such key");

        let err = ConsoleError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed with status 502: bad gateway"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            ConsoleError::validation("x").kind(),
            ErrorKind::Validation
        );
        assert_eq!(ConsoleError::NotLoggedIn.kind(), ErrorKind::Validation);
        assert_eq!(
            ConsoleError::Application("x".to_string()).kind(),
            ErrorKind::Application
        );
        let err = ConsoleError::Status {
            status: 500,
            body: String::new(),
        };
        assert!(err.is_transport());

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ConsoleError::from(decode).kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(ConsoleError::validation("x").severity(), Severity::Warning);
        assert_eq!(
            ConsoleError::Application("x".to_string()).severity(),
            Severity::Error
        );
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
