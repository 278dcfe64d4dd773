//! REST client for the task backend.
//!
//! `ApiClient` implements `forms::UserService`, so a `RegisterForm` can talk to
//! the backend directly. Task saves go through `ApiClient::save_task`.

mod client;
mod errors;

pub use client::{ApiClient, DEFAULT_TIMEOUT, error_message};
pub use errors::ApiError;
