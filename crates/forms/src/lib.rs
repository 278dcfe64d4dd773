//! Form core shared by the registration and task-edit flows.
//!
//! - `validation`: rule engine (`Rule`, `RuleSet`) and the credential / task rule sets
//! - `field` / `schema`: declarative form description
//! - `state`: `FormState`, the controller tracking values, touched flags and errors
//! - `submit`: `Submission`, the Idle → Submitting → Succeeded | Failed state machine
//! - `register` / `task_edit`: the two concrete flows wired on top of the above

mod errors;
mod field;
mod model;
pub mod register;
mod schema;
mod state;
mod submit;
pub mod task_edit;
pub mod validation;

pub use errors::{FormError, SubmitError};
pub use field::{FieldKind, FormField};
pub use model::{NewUser, Task, TaskDraft, TaskId, TaskStatus};
pub use register::{CREATED, RegisterForm, UserService, register_schema};
pub use schema::FormSchema;
pub use state::{FieldState, FormState, FormValues};
pub use submit::{Collaborator, FailureMessages, Rejected, SubmitOutcome, SubmitStatus, Submission};
pub use task_edit::{TaskEditForm, TaskEditHost, task_schema};
