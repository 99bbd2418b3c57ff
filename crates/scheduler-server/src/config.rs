use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::ServeCommand;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "scheduler.toml";

/// File name of the database when `dbfile` is not configured.
pub const DEFAULT_DB_FILE: &str = "scheduler.db";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Database file; defaults to [`DEFAULT_DB_FILE`] next to the executable.
    pub dbfile: Option<PathBuf>,
    /// Directory with the web front end.
    pub web_dir: PathBuf,
    /// Maximum number of tasks returned by one list request.
    pub search_limit: i64,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7540,
            dbfile: None,
            web_dir: PathBuf::from("./web"),
            search_limit: 50,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads defaults, then the TOML file, then `TODO_*` environment variables.
    pub fn new(config_file: Option<&Path>) -> Result<Self, figment::Error> {
        let file = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(file))
                .merge(Env::prefixed("TODO_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    /// Command-line flags win over every other source.
    pub fn apply_overrides(&mut self, command: &ServeCommand) {
        if let Some(host) = &command.host {
            self.host = host.clone();
        }
        if let Some(port) = command.port {
            self.port = port;
        }
        if let Some(dbfile) = &command.dbfile {
            self.dbfile = Some(dbfile.clone());
        }
        if let Some(web_dir) = &command.web_dir {
            self.web_dir = web_dir.clone();
        }
    }

    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.dbfile {
            return path.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DB_FILE)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
