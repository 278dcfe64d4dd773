//! Command line frontend: configuration, logging, and the commands driving the
//! registration and task-edit flows against the backend.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod host;
pub mod logging;
