use std::time::Duration;

use forms::{NewUser, SubmitError, TaskDraft, TaskId, UserService};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ApiError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client over the task backend's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut url = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: url,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    /// `POST /users`
    pub async fn register_user(&self, user: &NewUser) -> Result<StatusCode, ApiError> {
        let url = self.endpoint("users")?;
        debug!("POST {url} ({})", user.email);
        let response = self.http.post(url).json(user).send().await?;
        check(response).await
    }

    /// `PUT /tasks/{id}`
    pub async fn update_task(&self, id: TaskId, draft: &TaskDraft) -> Result<StatusCode, ApiError> {
        let url = self.endpoint(&format!("tasks/{id}"))?;
        debug!("PUT {url}");
        let response = self.http.put(url).json(draft).send().await?;
        check(response).await
    }

    /// `POST /tasks`
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<StatusCode, ApiError> {
        let url = self.endpoint("tasks")?;
        debug!("POST {url}");
        let response = self.http.post(url).json(draft).send().await?;
        check(response).await
    }

    /// Update the task the draft was seeded from, or create it for a blank form.
    pub async fn save_task(&self, draft: &TaskDraft) -> Result<StatusCode, ApiError> {
        match draft.id {
            Some(id) => self.update_task(id, draft).await,
            None => self.create_task(draft).await,
        }
    }
}

impl UserService for ApiClient {
    async fn create_user(&self, user: &NewUser) -> Result<u16, SubmitError> {
        let status = self.register_user(user).await?;
        Ok(status.as_u16())
    }
}

async fn check(response: reqwest::Response) -> Result<StatusCode, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(status);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!("backend answered {status}: {message:?}");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// `message` field of a JSON error payload. Anything else yields `None`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_message_is_read_defensively() {
        assert_eq!(
            error_message(r#"{"message":"Email already exists"}"#),
            Some("Email already exists".to_string())
        );
        assert_eq!(error_message(r#"{"error":"nope"}"#), None);
        assert_eq!(error_message(r#"{"message":42}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(""), None);
    }

    #[test]
    fn base_url_keeps_its_path() {
        let client = ApiClient::new("http://localhost:3000/api", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint("users").unwrap().as_str(),
            "http://localhost:3000/api/users"
        );
        let client = ApiClient::new("http://localhost:3000", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint("tasks/7").unwrap().as_str(),
            "http://localhost:3000/tasks/7"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::new("not a url", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn status_errors_keep_the_server_message() {
        let err = SubmitError::from(ApiError::Status {
            status: 409,
            message: Some("Email already exists".into()),
        });
        assert_eq!(
            err,
            SubmitError::Server {
                status: Some(409),
                message: Some("Email already exists".into())
            }
        );
    }
}
