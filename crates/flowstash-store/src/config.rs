// ABOUTME: Store configuration loaded from environment variables.
// ABOUTME: Built once at startup and handed to the store; nothing here is global.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FLOWSTASH_HOME is set but empty")]
    EmptyHome,

    #[error("flow file path has no file name: {0}")]
    InvalidFlowFile(String),

    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
}

/// Configuration for a local store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for credentials, settings, sessions and the library.
    pub user_dir: PathBuf,
    /// Configured flow file. Relative paths are resolved by `StorePaths`.
    pub flow_file: Option<PathBuf>,
    /// Host name used to build the default flow file name.
    pub hostname: String,
    /// Indent credentials and library flows when saving them.
    pub flow_file_pretty: bool,
    /// Turn every save into a no-op.
    pub read_only: bool,
}

impl StoreConfig {
    /// A writable configuration rooted at `user_dir` with default settings.
    pub fn new(user_dir: PathBuf) -> Self {
        Self {
            user_dir,
            flow_file: None,
            hostname: "localhost".to_string(),
            flow_file_pretty: false,
            read_only: false,
        }
    }

    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - FLOWSTASH_HOME: user directory (default: ~/.flowstash)
    /// - FLOWSTASH_FLOW_FILE: flow file path (default: flows_<hostname>.yaml)
    /// - FLOWSTASH_PRETTY: indent saved credentials and library flows (default: false)
    /// - FLOWSTASH_READ_ONLY: ignore all saves (default: false)
    /// - HOSTNAME: used for the default flow file name (default: localhost)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let user_dir = match lookup("FLOWSTASH_HOME") {
            Some(home) if home.is_empty() => return Err(ConfigError::EmptyHome),
            Some(home) => PathBuf::from(home),
            None => lookup("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".flowstash"),
        };

        let flow_file = lookup("FLOWSTASH_FLOW_FILE")
            .filter(|f| !f.is_empty())
            .map(PathBuf::from);

        let hostname = lookup("HOSTNAME")
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "localhost".to_string());

        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "true" || v == "1" || v == "yes")
                .unwrap_or(false)
        };

        Ok(Self {
            user_dir,
            flow_file,
            hostname,
            flow_file_pretty: flag("FLOWSTASH_PRETTY"),
            read_only: flag("FLOWSTASH_READ_ONLY"),
        })
    }
}
