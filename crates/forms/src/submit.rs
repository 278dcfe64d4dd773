//! Submission coordinator.
//!
//! State machine for one form instance:
//!
//! ```text
//!   Idle ──begin──▶ Submitting ──finish(Ok)──▶ Succeeded
//!     ▲                 │
//!     │                 └────finish(Err)──▶ Failed
//!     └── (Failed / Succeeded re-enter through `begin` like Idle)
//! ```
//!
//! `begin` and `finish` are split so the hosting UI can observe `loading()`
//! while the external call is awaited. There is no queue and no cancellation:
//! a second `begin` while Submitting is rejected, and an in-flight attempt
//! always runs to `finish`.

use tracing::{debug, info, warn};

use crate::errors::SubmitError;
use crate::state::FormState;

/// Hooks injected by the hosting UI.
pub trait Collaborator<P> {
    /// Called once per successful submission, after the form has been reset.
    fn on_submit_success(&mut self, payload: &P);

    /// Called when the user dismisses the form.
    fn on_cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Why a submit attempt did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// At least one field fails validation; all fields are now touched.
    Invalid,
    /// A previous attempt is still in flight.
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<P> {
    Succeeded(P),
    Failed(String),
    Rejected(Rejected),
}

impl<P> SubmitOutcome<P> {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

/// Top-level messages a flow shows for failed submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureMessages {
    /// Backend error (or no response) without a usable `message`.
    pub fallback: &'static str,
    /// The call returned, but not with the expected success status.
    pub unexpected_status: &'static str,
    /// Anything that is not a structured transport error.
    pub unknown: &'static str,
}

impl FailureMessages {
    /// Server-supplied message first, then the flow's fallbacks.
    pub fn describe(&self, err: &SubmitError) -> String {
        match err {
            SubmitError::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            SubmitError::Server { .. } => self.fallback.to_string(),
            SubmitError::UnexpectedStatus(_) => self.unexpected_status.to_string(),
            SubmitError::Unknown(_) => self.unknown.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    status: SubmitStatus,
    error: Option<String>,
    messages: FailureMessages,
}

impl Submission {
    pub fn new(messages: FailureMessages) -> Self {
        Self {
            status: SubmitStatus::Idle,
            error: None,
            messages,
        }
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// True while the external call is in flight; the submit affordance must be disabled.
    pub fn loading(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    /// The single top-level error of the form, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start an attempt: touch every field, then enter Submitting if the form is valid.
    pub fn begin(&mut self, form: &mut FormState) -> Result<(), Rejected> {
        if self.loading() {
            debug!("Submit ignored: attempt already in flight");
            return Err(Rejected::InFlight);
        }
        form.touch_all();
        if !form.is_valid() {
            debug!("Submit blocked: form has validation errors");
            return Err(Rejected::Invalid);
        }
        self.error = None;
        self.status = SubmitStatus::Submitting;
        debug!("Submitting {}", form.schema().title);
        Ok(())
    }

    /// Complete the in-flight attempt with the result of the external call.
    ///
    /// Success resets the form and notifies the collaborator with the payload.
    /// Failure stores one message and leaves the form untouched.
    pub fn finish<P, C>(
        &mut self,
        form: &mut FormState,
        result: Result<P, SubmitError>,
        collaborator: &mut C,
    ) -> SubmitOutcome<P>
    where
        C: Collaborator<P> + ?Sized,
    {
        match result {
            Ok(payload) => {
                info!("{} submitted", form.schema().title);
                self.status = SubmitStatus::Succeeded;
                self.error = None;
                form.reset();
                collaborator.on_submit_success(&payload);
                SubmitOutcome::Succeeded(payload)
            }
            Err(err) => {
                warn!("{} submission failed: {err}", form.schema().title);
                let message = self.messages.describe(&err);
                self.status = SubmitStatus::Failed;
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}
