// ABOUTME: Single-generation backup protocol for whole-file artifacts.
// ABOUTME: Saves rotate the primary into the backup slot; loads restore from it when the primary is empty.

use std::path::Path;

use flowstash_core::ArtifactKind;
use serde_json::Value;
use tokio::fs;

use crate::durable;
use crate::error::StoreError;

/// How a load resolved. Only `Loaded` and `Restored` carry a document; every
/// other outcome degrades to the kind's empty default.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The primary parsed cleanly.
    Loaded(Value),
    /// The primary was empty, was restored from the backup, and then parsed.
    Restored(Value),
    /// The primary does not exist (or could not be opened).
    Missing,
    /// The primary is empty and there is no usable backup.
    Empty,
    /// The primary has content that does not decode. It is left in place.
    Corrupt,
    /// The primary was empty and copying the backup over it failed.
    RestoreFailed,
}

impl LoadOutcome {
    /// The document to hand back to a caller.
    pub fn into_document(self, kind: ArtifactKind) -> Value {
        match self {
            LoadOutcome::Loaded(doc) | LoadOutcome::Restored(doc) => doc,
            LoadOutcome::Missing
            | LoadOutcome::Empty
            | LoadOutcome::Corrupt
            | LoadOutcome::RestoreFailed => kind.empty_default(),
        }
    }
}

enum LoadState {
    ReadPrimary,
    InspectBackup,
    Restore,
    Retry,
}

/// Load an artifact, restoring its primary from the backup slot at most once
/// when the primary exists but is empty.
///
/// A primary that fails to decode is reported as `Corrupt` and is never
/// replaced from the backup: only an empty primary triggers a restore.
pub async fn load(path: &Path, backup_path: &Path, kind: ArtifactKind) -> LoadOutcome {
    let mut state = LoadState::ReadPrimary;
    let mut restored = false;

    loop {
        state = match state {
            LoadState::ReadPrimary => {
                let data = match fs::read(path).await {
                    Ok(data) => data,
                    Err(e) => {
                        if kind == ArtifactKind::Flows {
                            tracing::info!("creating new {} file at {}", kind, path.display());
                        } else {
                            tracing::debug!("no {} file at {}: {}", kind, path.display(), e);
                        }
                        return LoadOutcome::Missing;
                    }
                };

                if !data.is_empty() {
                    return decode(kind, path, data, restored);
                }

                tracing::warn!("{} file {} is empty", kind, path.display());
                if restored {
                    return LoadOutcome::Empty;
                }
                LoadState::InspectBackup
            }
            LoadState::InspectBackup => match fs::metadata(backup_path).await {
                Ok(meta) if meta.len() > 0 => LoadState::Restore,
                _ => return LoadOutcome::Empty,
            },
            LoadState::Restore => {
                tracing::warn!(
                    "restoring {} file from backup {}",
                    kind,
                    backup_path.display()
                );
                match fs::copy(backup_path, path).await {
                    Ok(_) => LoadState::Retry,
                    Err(e) => {
                        tracing::warn!("failed to restore {} backup: {}", kind, e);
                        return LoadOutcome::RestoreFailed;
                    }
                }
            }
            LoadState::Retry => {
                restored = true;
                LoadState::ReadPrimary
            }
        };
    }
}

fn decode(kind: ArtifactKind, path: &Path, data: Vec<u8>, restored: bool) -> LoadOutcome {
    let parsed = String::from_utf8(data)
        .map_err(|e| e.to_string())
        .and_then(|text| kind.format().decode(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(doc) if restored => LoadOutcome::Restored(doc),
        Ok(doc) => LoadOutcome::Loaded(doc),
        Err(e) => {
            tracing::warn!("invalid {} file {}: {}", kind, path.display(), e);
            LoadOutcome::Corrupt
        }
    }
}

/// Save an artifact: rotate the current primary into the backup slot, then
/// durably write the new content.
///
/// Rotation is best-effort. A missing primary (the first save) is the common
/// case, so rename errors are logged and ignored. Write errors propagate and
/// leave the backup as the latest good copy.
pub async fn save(path: &Path, backup_path: &Path, content: &str) -> Result<(), StoreError> {
    if let Err(e) = fs::rename(path, backup_path).await {
        tracing::debug!("did not rotate {} into backup: {}", path.display(), e);
    }
    durable::write(path, content).await
}
