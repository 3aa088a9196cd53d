// ABOUTME: Derives the on-disk layout of every artifact from a StoreConfig.
// ABOUTME: Resolves the flow file and places backups, credentials, settings, sessions and the library.

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, StoreConfig};

/// Concrete file locations for one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub flows: PathBuf,
    pub flows_backup: PathBuf,
    pub credentials: PathBuf,
    pub credentials_backup: PathBuf,
    pub settings: PathBuf,
    pub sessions: PathBuf,
    pub library: PathBuf,
}

impl StorePaths {
    /// Resolve paths relative to the process's current directory.
    pub fn resolve(config: &StoreConfig) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()?;
        Self::resolve_in(config, &cwd)
    }

    /// Resolve paths relative to `cwd`.
    ///
    /// A configured flow file is used as is when absolute, joined to `cwd`
    /// when it starts with `./`, taken from `cwd` when it exists there, and
    /// otherwise placed in the user directory.
    pub fn resolve_in(config: &StoreConfig, cwd: &Path) -> Result<Self, ConfigError> {
        let user_dir = &config.user_dir;

        let flows = match &config.flow_file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) if file.starts_with(".") => cwd.join(file),
            Some(file) if cwd.join(file).exists() => cwd.join(file),
            Some(file) => user_dir.join(file),
            None => user_dir.join(format!("flows_{}.yaml", config.hostname)),
        };

        let name = flows
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ConfigError::InvalidFlowFile(flows.display().to_string()))?;
        let base = flows
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let ext = flows
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let flows_dir = flows.parent().unwrap_or(user_dir.as_path());

        Ok(Self {
            flows_backup: flows_dir.join(format!(".{name}.backup")),
            credentials: user_dir.join(format!("{base}_cred{ext}")),
            credentials_backup: user_dir.join(format!(".{base}_cred{ext}.backup")),
            settings: user_dir.join(".config.json"),
            sessions: user_dir.join(".sessions.json"),
            library: user_dir.join("lib"),
            flows,
        })
    }

    /// Root directory of one library kind, e.g. `lib/flows`.
    pub fn library_root(&self, kind: &str) -> PathBuf {
        self.library.join(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_with(user_dir: &Path, flow_file: Option<&str>) -> StoreConfig {
        let mut config = StoreConfig::new(user_dir.to_path_buf());
        config.flow_file = flow_file.map(PathBuf::from);
        config.hostname = "box".to_string();
        config
    }

    #[test]
    fn default_layout_lives_in_user_dir() {
        let user = PathBuf::from("/data/user");
        let paths = StorePaths::resolve_in(&config_with(&user, None), Path::new("/work")).unwrap();

        assert_eq!(paths.flows, user.join("flows_box.yaml"));
        assert_eq!(paths.flows_backup, user.join(".flows_box.yaml.backup"));
        assert_eq!(paths.credentials, user.join("flows_box_cred.yaml"));
        assert_eq!(paths.credentials_backup, user.join(".flows_box_cred.yaml.backup"));
        assert_eq!(paths.settings, user.join(".config.json"));
        assert_eq!(paths.sessions, user.join(".sessions.json"));
        assert_eq!(paths.library_root("flows"), user.join("lib").join("flows"));
    }

    #[test]
    fn absolute_flow_file_keeps_backup_beside_it_and_credentials_in_user_dir() {
        let user = PathBuf::from("/data/user");
        let config = config_with(&user, Some("/etc/site/main.json"));
        let paths = StorePaths::resolve_in(&config, Path::new("/work")).unwrap();

        assert_eq!(paths.flows, PathBuf::from("/etc/site/main.json"));
        assert_eq!(paths.flows_backup, PathBuf::from("/etc/site/.main.json.backup"));
        assert_eq!(paths.credentials, user.join("main_cred.json"));
        assert_eq!(paths.credentials_backup, user.join(".main_cred.json.backup"));
    }

    #[test]
    fn dot_relative_flow_file_resolves_against_cwd() {
        let user = PathBuf::from("/data/user");
        let config = config_with(&user, Some("./local.yaml"));
        let paths = StorePaths::resolve_in(&config, Path::new("/work")).unwrap();

        assert_eq!(paths.flows, PathBuf::from("/work/local.yaml"));
    }

    #[test]
    fn bare_flow_file_prefers_cwd_when_present() {
        let cwd = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        fs::write(cwd.path().join("here.yaml"), "[]").unwrap();

        let found = StorePaths::resolve_in(&config_with(user.path(), Some("here.yaml")), cwd.path())
            .unwrap();
        assert_eq!(found.flows, cwd.path().join("here.yaml"));

        let fallback =
            StorePaths::resolve_in(&config_with(user.path(), Some("elsewhere.yaml")), cwd.path())
                .unwrap();
        assert_eq!(fallback.flows, user.path().join("elsewhere.yaml"));
    }

    #[test]
    fn flow_file_without_extension() {
        let user = PathBuf::from("/data/user");
        let paths =
            StorePaths::resolve_in(&config_with(&user, Some("/opt/flows")), Path::new("/")).unwrap();

        assert_eq!(paths.credentials, user.join("flows_cred"));
        assert_eq!(paths.flows_backup, PathBuf::from("/opt/.flows.backup"));
    }

    #[test]
    fn flow_file_without_name_is_rejected() {
        let user = PathBuf::from("/data/user");
        let err = StorePaths::resolve_in(&config_with(&user, Some("/")), Path::new("/")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlowFile(_)));
    }
}
