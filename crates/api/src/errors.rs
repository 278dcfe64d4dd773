use forms::SubmitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer. `message` is the `message` field of the JSON error body, if any.
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
}

impl From<ApiError> for SubmitError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } => SubmitError::Server {
                status: Some(status),
                message,
            },
            // Connection refused, timeout, ...: the request never got an answer.
            ApiError::Transport(ref e) if !e.is_decode() && !e.is_builder() => {
                SubmitError::Server {
                    status: None,
                    message: None,
                }
            }
            other => SubmitError::Unknown(other.to_string()),
        }
    }
}
