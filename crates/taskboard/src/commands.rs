use std::process::ExitCode;

use api::ApiClient;
use color_eyre::{Result, eyre::WrapErr};
use forms::{
    FormState, FormValues, RegisterForm, SubmitOutcome, Task, TaskEditForm, UserService, register,
    task_edit, validation,
};
use tracing::debug;

use crate::cli::{Cli, Cmd};
use crate::config::Config;
use crate::host::{ApiTaskHost, LoginRedirect};

/// What a command has to tell the user.
#[derive(Debug, PartialEq, Eq)]
pub enum Report {
    Done(String),
    Problems(Vec<String>),
}

impl Report {
    fn print(&self) -> ExitCode {
        match self {
            Report::Done(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Report::Problems(lines) => {
                for line in lines {
                    eprintln!("{line}");
                }
                ExitCode::FAILURE
            }
        }
    }
}

pub async fn run(cli: Cli, config: &Config) -> Result<ExitCode> {
    let base_url = cli.api_url.as_deref().unwrap_or(&config.api.base_url);
    let report = match cli.cmd {
        Cmd::Register { email, password } => {
            let client = ApiClient::new(base_url, config.timeout())?;
            register_user(client, &email, &password).await?
        }
        Cmd::EditTask {
            task,
            title,
            description,
            dry_run,
        } => {
            let task = task
                .map(|json| serde_json::from_str::<Task>(&json))
                .transpose()
                .wrap_err("--task is not a valid task")?;
            let host = if dry_run {
                ApiTaskHost::dry_run()
            } else {
                ApiTaskHost::new(ApiClient::new(base_url, config.timeout())?)
            };
            edit_task(host, task, title, description).await?
        }
        Cmd::CheckPassword { password } => check(validation::password_rules(), &password),
        Cmd::CheckEmail { email } => check(validation::email_rules(), &email),
    };
    Ok(report.print())
}

pub async fn register_user<S: UserService>(service: S, email: &str, password: &str) -> Result<Report> {
    let mut form = RegisterForm::new(service, LoginRedirect::default());
    form.set_value(register::EMAIL, email)?;
    form.set_value(register::PASSWORD, password)?;

    let report = match form.submit().await {
        SubmitOutcome::Succeeded(user) => Report::Done(format!(
            "Registered {}. Continue at {}",
            user.email,
            form.collaborator().redirected_to.unwrap_or_default()
        )),
        SubmitOutcome::Failed(message) => Report::Problems(vec![message]),
        SubmitOutcome::Rejected(reason) => {
            debug!("registration rejected: {reason:?}");
            Report::Problems(field_errors(form.form()))
        }
    };
    Ok(report)
}

pub async fn edit_task(
    host: ApiTaskHost,
    task: Option<Task>,
    title: Option<String>,
    description: Option<String>,
) -> Result<Report> {
    let mut form = TaskEditForm::new(task, host);
    if let Some(title) = title {
        form.set_value(task_edit::TITLE, title)?;
    }
    if let Some(description) = description {
        form.set_value(task_edit::DESCRIPTION, description)?;
    }
    if form.form().is_valid() && !form.can_submit() {
        return Ok(Report::Done("Nothing to save.".into()));
    }

    let report = match form.submit().await {
        SubmitOutcome::Succeeded(draft) if form.host().is_dry_run() => {
            Report::Done(serde_json::to_string_pretty(&draft)?)
        }
        SubmitOutcome::Succeeded(draft) => Report::Done(match draft.id {
            Some(id) => format!("Task {id} saved."),
            None => "Task created.".to_string(),
        }),
        SubmitOutcome::Failed(message) => Report::Problems(vec![message]),
        SubmitOutcome::Rejected(_) => Report::Problems(field_errors(form.form())),
    };
    Ok(report)
}

fn check(rules: validation::RuleSet, value: &str) -> Report {
    match rules.evaluate(value, &FormValues::new()) {
        Some(message) => Report::Problems(vec![message]),
        None => Report::Done("ok".into()),
    }
}

fn field_errors(form: &FormState) -> Vec<String> {
    form.visible_errors()
        .into_iter()
        .map(|(field, message)| format!("{}: {message}", field.label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn check_reports_first_violation() {
        assert_eq!(
            check(validation::password_rules(), "abcdefgh"),
            Report::Problems(vec![
                "Password must include at least one uppercase letter".into()
            ])
        );
        assert_eq!(
            check(validation::email_rules(), " user@site.com "),
            Report::Done("ok".into())
        );
    }
}
