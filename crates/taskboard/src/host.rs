//! Collaborators the command line hands to the form flows.

use api::ApiClient;
use forms::{Collaborator, NewUser, SubmitError, TaskDraft, TaskEditHost};
use tracing::{debug, info};

pub const LOGIN_ROUTE: &str = "/login";

/// Register flow collaborator: both success and cancel lead to the login page.
#[derive(Debug, Default)]
pub struct LoginRedirect {
    pub redirected_to: Option<&'static str>,
}

impl Collaborator<NewUser> for LoginRedirect {
    fn on_submit_success(&mut self, user: &NewUser) {
        info!("registered {}", user.email);
        self.redirected_to = Some(LOGIN_ROUTE);
    }

    fn on_cancel(&mut self) {
        self.redirected_to = Some(LOGIN_ROUTE);
    }
}

#[derive(Debug)]
enum Sink {
    Api(ApiClient),
    DryRun,
}

/// Task-edit host that saves through the backend, or only records the draft.
#[derive(Debug)]
pub struct ApiTaskHost {
    sink: Sink,
    saved: Option<TaskDraft>,
    closed: bool,
}

impl ApiTaskHost {
    pub fn new(client: ApiClient) -> Self {
        Self::with_sink(Sink::Api(client))
    }

    pub fn dry_run() -> Self {
        Self::with_sink(Sink::DryRun)
    }

    fn with_sink(sink: Sink) -> Self {
        Self {
            sink,
            saved: None,
            closed: false,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self.sink, Sink::DryRun)
    }

    /// Draft accepted by the last successful save.
    pub fn saved(&self) -> Option<&TaskDraft> {
        self.saved.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Collaborator<TaskDraft> for ApiTaskHost {
    fn on_submit_success(&mut self, draft: &TaskDraft) {
        self.saved = Some(draft.clone());
        self.closed = true;
    }

    fn on_cancel(&mut self) {
        self.closed = true;
    }
}

impl TaskEditHost for ApiTaskHost {
    async fn on_edit(&mut self, draft: &TaskDraft) -> Result<(), SubmitError> {
        match &self.sink {
            Sink::Api(client) => {
                let status = client.save_task(draft).await?;
                debug!("task saved ({status})");
            }
            Sink::DryRun => debug!("dry run, not sending {draft:?}"),
        }
        Ok(())
    }
}
