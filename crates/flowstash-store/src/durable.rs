// ABOUTME: Durable file writes: the destination is fsynced before success is reported.
// ABOUTME: A failed write may leave the destination truncated; no cleanup is attempted.

use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::StoreError;

/// Write `content` to `path` as UTF-8, replacing any existing file, and
/// flush it to stable storage before returning.
pub async fn write(path: &Path, content: &str) -> Result<(), StoreError> {
    let wrap = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).await.map_err(wrap)?;
    file.write_all(content.as_bytes()).await.map_err(wrap)?;
    file.sync_all().await.map_err(wrap)?;
    Ok(())
}
