use thiserror::Error;

/// Misuse of the form controller by the hosting UI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field is read-only: {0}")]
    ReadOnly(String),
}

/// Failure reported by the external create/update operation.
///
/// The submission coordinator turns this into the single top-level message
/// shown to the user (see `FailureMessages::describe`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The backend answered with an error, or the request never got an answer.
    /// `message` is the `message` field of the error payload, when there was one.
    #[error("request failed (status {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The call went through but did not report the expected success status.
    #[error("unexpected response status {0}")]
    UnexpectedStatus(u16),

    /// Anything not recognized as a structured transport error.
    #[error("{0}")]
    Unknown(String),
}
