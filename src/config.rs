//! Command-line and environment configuration.

use camino::Utf8PathBuf;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::logging::LogFormat;

/// Directory created under the platform data directory.
pub const APP_DIR: &str = "taskqueue";

/// File name of the default project store.
pub const STORE_FILE: &str = "projects.json";

/// Command-line arguments of the `taskqueue` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskqueue",
    version,
    about = "Serve project and task workflow tool calls as line-delimited JSON"
)]
pub struct Cli {
    /// Path of the JSON project store.
    #[arg(long, env = "TASKQUEUE_STORE_PATH", value_name = "PATH")]
    pub store_path: Option<Utf8PathBuf>,

    /// Log output format.
    #[arg(
        long,
        env = "TASKQUEUE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No store path was given and the platform has no data directory.
    #[error("no store path given and no local data directory is available")]
    NoDataDirectory,
    /// The default store path is not valid UTF-8.
    #[error("default store path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path of the JSON project store.
    pub store_path: Utf8PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Cli {
    /// Resolves the arguments, defaulting the store path to
    /// `<data_local_dir>/taskqueue/projects.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no store path is given and the default
    /// cannot be derived.
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        self.resolve_with(dirs::data_local_dir())
    }

    /// Resolves the arguments against an explicit data directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoDataDirectory`] when both the store path
    /// and `data_dir` are absent, and [`ConfigError::NonUtf8Path`] when the
    /// derived path is not UTF-8.
    pub fn resolve_with(self, data_dir: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
        let store_path = match self.store_path {
            Some(path) => path,
            None => default_store_path(data_dir)?,
        };
        Ok(AppConfig {
            store_path,
            log_format: self.log_format,
        })
    }
}

fn default_store_path(data_dir: Option<PathBuf>) -> Result<Utf8PathBuf, ConfigError> {
    let base = data_dir.ok_or(ConfigError::NoDataDirectory)?;
    let path = base.join(APP_DIR).join(STORE_FILE);
    Utf8PathBuf::from_path_buf(path).map_err(ConfigError::NonUtf8Path)
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, Cli, ConfigError};
    use crate::logging::LogFormat;
    use camino::Utf8PathBuf;
    use clap::Parser;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    fn explicit_store_path_wins() -> eyre::Result<()> {
        let cli = Cli::try_parse_from([
            "taskqueue",
            "--store-path",
            "/tmp/tq/store.json",
            "--log-format",
            "json",
        ])?;
        let config = cli.resolve_with(None)?;
        eyre::ensure!(
            config
                == AppConfig {
                    store_path: Utf8PathBuf::from("/tmp/tq/store.json"),
                    log_format: LogFormat::Json,
                },
            "unexpected config: {config:?}"
        );
        Ok(())
    }

    #[rstest]
    fn store_path_defaults_under_data_dir() -> eyre::Result<()> {
        let cli = Cli {
            store_path: None,
            log_format: LogFormat::Pretty,
        };
        let config = cli.resolve_with(Some(PathBuf::from("/data")))?;
        eyre::ensure!(
            config.store_path == Utf8PathBuf::from("/data/taskqueue/projects.json"),
            "unexpected store path: {}",
            config.store_path
        );
        Ok(())
    }

    #[rstest]
    fn missing_data_dir_is_reported() {
        let cli = Cli {
            store_path: None,
            log_format: LogFormat::Pretty,
        };
        assert_eq!(cli.resolve_with(None), Err(ConfigError::NoDataDirectory));
    }
}
