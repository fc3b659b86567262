use stellarsis_protocol::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong talking to the server.
///
/// Nothing here is ever converted into placeholder data: each failure is
/// handed back to the caller to render or retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// DNS, connect, TLS or timeout failure
    #[error("Cannot reach server at {0}")]
    Unreachable(String),

    /// Credentials were rejected
    #[error("Invalid username or password")]
    Unauthorized,

    /// No session, or the server expired it
    #[error("Not logged in")]
    NotAuthenticated,

    /// Logged in, but not allowed to do this
    #[error("Permission denied")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    /// Input violated a precondition; no request was sent
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// The server answered 2xx but refused the action
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// The server did not supply something the operation needs
    #[error("Unsupported by server: {0}")]
    Unsupported(String),

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    DecodeError(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether retrying the same call later might succeed.
    ///
    /// Only transport failures qualify. Retrying a write after a timeout can
    /// still duplicate it, since the server may have applied the first one.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

impl From<ParseError> for ClientError {
    fn from(err: ParseError) -> Self {
        Self::DecodeError(err.to_string())
    }
}
