use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
    pub api: ApiSettings,
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    #[serde(default)]
    pub log_level: Option<String>,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(&get_config_dir(), &get_data_dir())
    }

    /// Defaults, then `config.json5` / `config.toml` from `config_dir`, then
    /// `TASKBOARD_*` variables (`TASKBOARD_API__BASE_URL=...`).
    pub fn load(config_dir: &Path, data_dir: &Path) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            found_config |= path.exists();
            builder = builder.add_source(config::File::from(path).format(*format).required(false));
        }
        if !found_config {
            debug!("no configuration file in {}", config_dir.display());
        }

        builder
            .add_source(
                config::Environment::with_prefix(&PROJECT_NAME)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "taskboard", env!("CARGO_PKG_NAME"))
}

pub fn ensure_data_and_config_dirs_exist(config: &Config) -> std::io::Result<()> {
    fs::create_dir_all(&config.data_dir)?;
    fs::create_dir_all(&config.config_dir)?;
    Ok(())
}
