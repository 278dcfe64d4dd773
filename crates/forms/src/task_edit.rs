//! Task-edit flow: modal form seeded from an existing task.
//!
//! The flow never talks to the network itself; the host's `on_edit` performs
//! the update and reports how it went.

use std::future::Future;

use crate::errors::{FormError, SubmitError};
use crate::field::{FieldKind, FormField};
use crate::model::{Task, TaskDraft, TaskStatus};
use crate::schema::FormSchema;
use crate::state::{FormState, FormValues};
use crate::submit::{Collaborator, FailureMessages, SubmitOutcome, Submission};
use crate::validation;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const STATUS: &str = "status";

const MESSAGES: FailureMessages = FailureMessages {
    fallback: "Failed to update task.",
    unexpected_status: "Failed to update task.",
    unknown: "An unknown error occurred.",
};

/// Hosting UI of the task-edit modal.
///
/// `on_submit_success` closes the modal, `on_cancel` closes it without saving.
pub trait TaskEditHost: Collaborator<TaskDraft> {
    fn on_edit(&mut self, draft: &TaskDraft) -> impl Future<Output = Result<(), SubmitError>>;
}

pub fn task_schema() -> FormSchema {
    FormSchema::new(
        "Edit Task",
        vec![
            FormField::new(TITLE, "Title", FieldKind::Text).rules(validation::title_rules()),
            FormField::new(DESCRIPTION, "Description", FieldKind::Multiline),
            FormField::new(STATUS, "Status", FieldKind::ReadOnly),
        ],
    )
}

fn initial_values(task: Option<&Task>) -> FormValues {
    let (title, description, status) = match task {
        Some(task) => (task.title.clone(), task.description.clone(), task.status),
        None => (String::new(), String::new(), TaskStatus::default()),
    };
    FormValues::from([
        (TITLE.to_string(), title),
        (DESCRIPTION.to_string(), description),
        (STATUS.to_string(), status.to_string()),
    ])
}

pub struct TaskEditForm<H> {
    original: Option<Task>,
    form: FormState,
    submission: Submission,
    host: H,
}

impl<H: TaskEditHost> TaskEditForm<H> {
    pub fn new(task: Option<Task>, host: H) -> Self {
        let form = FormState::new(task_schema(), &initial_values(task.as_ref()));
        Self {
            original: task,
            form,
            submission: Submission::new(MESSAGES),
            host,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn original(&self) -> Option<&Task> {
        self.original.as_ref()
    }

    /// Edit a field. The status field is display-only.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        match self.form.schema().field_by_key(field) {
            Some(f) if !f.is_editable() => Err(FormError::ReadOnly(field.to_string())),
            _ => self.form.set_value(field, value),
        }
    }

    pub fn blur(&mut self, field: &str) -> Result<(), FormError> {
        self.form.set_touched(field)
    }

    pub fn loading(&self) -> bool {
        self.submission.loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.submission.error()
    }

    /// Save is enabled only for a valid form with actual changes.
    pub fn can_submit(&self) -> bool {
        !self.loading() && self.form.is_valid() && self.form.is_dirty()
    }

    fn draft(&self) -> Result<TaskDraft, SubmitError> {
        let status = self.form.value(STATUS).unwrap_or_default();
        let status = status
            .parse::<TaskStatus>()
            .map_err(|_| SubmitError::Unknown(format!("unknown task status {status:?}")))?;
        Ok(TaskDraft {
            id: self.original.as_ref().map(|t| t.id),
            title: self.form.value(TITLE).unwrap_or_default().to_string(),
            description: self.form.value(DESCRIPTION).unwrap_or_default().to_string(),
            status,
        })
    }

    /// Validate, enter Submitting and build the draft for the host.
    ///
    /// `Err` carries the final outcome of an attempt that ended before any
    /// call: rejected, or failed while building the draft. Until `settle`
    /// `loading()` is true and another `start` is rejected as `InFlight`.
    pub fn start(&mut self) -> Result<TaskDraft, SubmitOutcome<TaskDraft>> {
        self.submission
            .begin(&mut self.form)
            .map_err(SubmitOutcome::Rejected)?;
        self.draft().map_err(|err| {
            self.submission
                .finish(&mut self.form, Err(err), &mut self.host)
        })
    }

    pub fn settle(
        &mut self,
        draft: TaskDraft,
        result: Result<(), SubmitError>,
    ) -> SubmitOutcome<TaskDraft> {
        self.submission
            .finish(&mut self.form, result.map(|()| draft), &mut self.host)
    }

    pub async fn submit(&mut self) -> SubmitOutcome<TaskDraft> {
        let draft = match self.start() {
            Ok(draft) => draft,
            Err(outcome) => return outcome,
        };
        let result = self.host.on_edit(&draft).await;
        self.settle(draft, result)
    }

    pub fn cancel(&mut self) {
        self.form.reset();
        self.host.on_cancel();
    }
}
