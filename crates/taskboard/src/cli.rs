use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    version,
    about = "Register users and edit tasks against the task backend"
)]
pub struct Cli {
    /// Backend base URL, overrides `api.base_url` from the configuration
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Cmd {
    /// Create an account (POST /users)
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Edit a task and save it (PUT /tasks/{id}, or POST /tasks without --task)
    EditTask {
        /// Task to edit as JSON, e.g. '{"id":1,"title":"Buy milk"}'
        #[arg(long, value_name = "JSON")]
        task: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Check a password against the password rules
    CheckPassword { password: String },
    /// Check an email address against the email rules
    CheckEmail { email: String },
}
