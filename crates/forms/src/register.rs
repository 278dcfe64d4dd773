//! Registration flow: email + password form backed by a `UserService`.
//!
//! Submit enablement only depends on `loading()`; an invalid form is caught by
//! `Submission::begin`, which also reveals every field error.

use std::future::Future;

use crate::errors::{FormError, SubmitError};
use crate::field::{FieldKind, FormField};
use crate::model::NewUser;
use crate::schema::FormSchema;
use crate::state::{FormState, FormValues};
use crate::submit::{Collaborator, FailureMessages, Rejected, SubmitOutcome, Submission};
use crate::validation;

/// HTTP status the backend reports for a created user.
pub const CREATED: u16 = 201;

pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";

const MESSAGES: FailureMessages = FailureMessages {
    fallback: "Registration failed.",
    unexpected_status: "Registration failed. Please try again.",
    unknown: "An unknown error occurred.",
};

/// Backend operation used by the registration flow.
pub trait UserService {
    /// Create the user; resolves to the HTTP status of a successful response.
    fn create_user(&self, user: &NewUser) -> impl Future<Output = Result<u16, SubmitError>>;
}

pub fn register_schema() -> FormSchema {
    FormSchema::new(
        "Register",
        vec![
            FormField::new(EMAIL, "Email", FieldKind::Text).rules(validation::email_rules()),
            FormField::new(PASSWORD, "Password", FieldKind::Secret)
                .rules(validation::password_rules()),
        ],
    )
}

pub struct RegisterForm<S, C> {
    form: FormState,
    submission: Submission,
    service: S,
    collaborator: C,
}

impl<S, C> RegisterForm<S, C>
where
    S: UserService,
    C: Collaborator<NewUser>,
{
    pub fn new(service: S, collaborator: C) -> Self {
        Self {
            form: FormState::new(register_schema(), &FormValues::new()),
            submission: Submission::new(MESSAGES),
            service,
            collaborator,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    pub fn set_value(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.form.set_value(field, value)
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

    pub fn can_submit(&self) -> bool {
        !self.loading()
    }

    /// Validate and enter Submitting. Returns the trimmed credentials to send.
    ///
    /// Until `settle` is called `loading()` is true and another `start` is
    /// rejected as `InFlight`.
    pub fn start(&mut self) -> Result<NewUser, Rejected> {
        self.submission.begin(&mut self.form)?;
        Ok(NewUser::new(
            self.form.value(EMAIL).unwrap_or_default(),
            self.form.value(PASSWORD).unwrap_or_default(),
        ))
    }

    /// Finish the attempt begun by `start` with the backend's answer.
    pub fn settle(
        &mut self,
        user: NewUser,
        response: Result<u16, SubmitError>,
    ) -> SubmitOutcome<NewUser> {
        let result = match response {
            Ok(CREATED) => Ok(user),
            Ok(status) => Err(SubmitError::UnexpectedStatus(status)),
            Err(err) => Err(err),
        };
        self.submission
            .finish(&mut self.form, result, &mut self.collaborator)
    }

    /// `start`, call the service, `settle`.
    pub async fn submit(&mut self) -> SubmitOutcome<NewUser> {
        let user = match self.start() {
            Ok(user) => user,
            Err(rejected) => return SubmitOutcome::Rejected(rejected),
        };
        let response = self.service.create_user(&user).await;
        self.settle(user, response)
    }

    /// "Already have an account?": drop the input and hand control back.
    pub fn cancel(&mut self) {
        self.form.reset();
        self.collaborator.on_cancel();
    }
}
