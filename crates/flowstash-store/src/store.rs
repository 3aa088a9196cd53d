// ABOUTME: LocalStore, the async facade over every persisted artifact and the library.
// ABOUTME: Routes flows and credentials through the backup protocol and library reads through the header codec.

use std::path::Path;

use flowstash_core::{ArtifactKind, HeaderBlock, LibraryEntry};
use serde_json::Value;

use crate::backup::{self, LoadOutcome};
use crate::config::StoreConfig;
use crate::durable;
use crate::error::StoreError;
use crate::library::{self, FLOWS_KIND};
use crate::paths::StorePaths;

/// A file-backed store rooted at a user directory.
///
/// Every read goes to disk; nothing is cached. Saves on a read-only store
/// succeed without touching the filesystem.
pub struct LocalStore {
    config: StoreConfig,
    paths: StorePaths,
}

impl LocalStore {
    /// Resolve the store layout and, unless read-only, create the library
    /// directory for flows.
    pub async fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let paths = StorePaths::resolve(&config)?;
        Self::open_with_paths(config, paths).await
    }

    /// Open a store over an already resolved layout.
    pub async fn open_with_paths(config: StoreConfig, paths: StorePaths) -> Result<Self, StoreError> {
        if !config.read_only {
            tokio::fs::create_dir_all(paths.library_root(FLOWS_KIND)).await?;
        }
        tracing::info!("opened store with flow file {}", paths.flows.display());
        Ok(Self { config, paths })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Load an artifact and report how the load resolved.
    pub async fn load(&self, kind: ArtifactKind) -> LoadOutcome {
        let path = self.primary_path(kind);
        match self.backup_path(kind) {
            Some(backup_path) => backup::load(path, backup_path, kind).await,
            None => load_plain(path, kind).await,
        }
    }

    /// Encode and persist an artifact. Kinds with a backup slot rotate the
    /// previous primary into it first.
    pub async fn save(&self, kind: ArtifactKind, doc: &Value) -> Result<(), StoreError> {
        if self.config.read_only {
            tracing::debug!("read-only store, skipping {} save", kind);
            return Ok(());
        }

        let content = kind.format().encode(doc, self.indent_for(kind))?;
        let path = self.primary_path(kind);
        match self.backup_path(kind) {
            Some(backup_path) => backup::save(path, backup_path, &content).await,
            None => durable::write(path, &content).await,
        }
    }

    pub async fn load_flows(&self) -> Value {
        self.load(ArtifactKind::Flows)
            .await
            .into_document(ArtifactKind::Flows)
    }

    pub async fn save_flows(&self, flows: &Value) -> Result<(), StoreError> {
        self.save(ArtifactKind::Flows, flows).await
    }

    pub async fn load_credentials(&self) -> Value {
        self.load(ArtifactKind::Credentials)
            .await
            .into_document(ArtifactKind::Credentials)
    }

    pub async fn save_credentials(&self, credentials: &Value) -> Result<(), StoreError> {
        self.save(ArtifactKind::Credentials, credentials).await
    }

    pub async fn load_settings(&self) -> Value {
        self.load(ArtifactKind::Settings)
            .await
            .into_document(ArtifactKind::Settings)
    }

    pub async fn save_settings(&self, settings: &Value) -> Result<(), StoreError> {
        self.save(ArtifactKind::Settings, settings).await
    }

    pub async fn load_sessions(&self) -> Value {
        self.load(ArtifactKind::Sessions)
            .await
            .into_document(ArtifactKind::Sessions)
    }

    pub async fn save_sessions(&self, sessions: &Value) -> Result<(), StoreError> {
        self.save(ArtifactKind::Sessions, sessions).await
    }

    /// Read a library file body or directory listing.
    pub async fn get_library_entry(&self, kind: &str, path: &str) -> Result<LibraryEntry, StoreError> {
        let library = self.paths.library.clone();
        let kind = kind.to_string();
        let path = path.to_string();
        tokio::task::spawn_blocking(move || library::get_entry(&library, &kind, &path)).await?
    }

    /// Write a library entry with its header block.
    pub async fn save_library_entry(
        &self,
        kind: &str,
        path: &str,
        meta: &HeaderBlock,
        body: &str,
    ) -> Result<(), StoreError> {
        if self.config.read_only {
            tracing::debug!("read-only store, skipping library save of {}/{}", kind, path);
            return Ok(());
        }
        library::save_entry(
            &self.paths.library,
            kind,
            path,
            meta,
            body,
            self.config.flow_file_pretty,
        )
        .await
    }

    fn primary_path(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Flows => self.paths.flows.as_path(),
            ArtifactKind::Credentials => self.paths.credentials.as_path(),
            ArtifactKind::Settings => self.paths.settings.as_path(),
            ArtifactKind::Sessions => self.paths.sessions.as_path(),
        }
    }

    fn backup_path(&self, kind: ArtifactKind) -> Option<&Path> {
        match kind {
            ArtifactKind::Flows => Some(self.paths.flows_backup.as_path()),
            ArtifactKind::Credentials => Some(self.paths.credentials_backup.as_path()),
            ArtifactKind::Settings | ArtifactKind::Sessions => None,
        }
    }

    // Flow YAML has a single layout; the pretty flag only affects JSON output.
    fn indent_for(&self, kind: ArtifactKind) -> Option<usize> {
        match kind {
            ArtifactKind::Flows | ArtifactKind::Sessions => None,
            ArtifactKind::Credentials => self.config.flow_file_pretty.then_some(4),
            ArtifactKind::Settings => Some(1),
        }
    }
}

/// Single-shot read for artifacts without a backup slot.
async fn load_plain(path: &Path, kind: ArtifactKind) -> LoadOutcome {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(_) => return LoadOutcome::Missing,
    };
    match kind.format().decode(&text) {
        Ok(doc) => LoadOutcome::Loaded(doc),
        Err(e) => {
            tracing::warn!("corrupted {} file {}, resetting: {}", kind, path.display(), e);
            LoadOutcome::Corrupt
        }
    }
}
