use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub type TaskId = u64;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

/// A task as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Payload produced by the task-edit form: the edited fields merged with the
/// identifier of the task the form was seeded from (`None` for a blank form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

/// Registration payload. Both values are trimmed before they reach this type.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.trim().to_string(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
