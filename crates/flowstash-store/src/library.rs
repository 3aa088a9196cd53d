// ABOUTME: Library of named entries stored as files under one directory tree per kind.
// ABOUTME: Files resolve to their body; directories resolve to a listing of subdirectories and file headers.

use std::fs;
use std::io;
use std::path::{Component, Path};

use flowstash_core::{DocumentFormat, HeaderBlock, LibraryEntry, LibraryFile, ListingItem};

use crate::error::StoreError;
use crate::header;

/// The library kind whose entries are JSON flow exports.
pub const FLOWS_KIND: &str = "flows";

const JSON_SUFFIX: &str = ".json";

/// Look up `path` within the `kind` subtree of `library`.
///
/// An empty path or one ending in `/` is a directory request and resolves to
/// an empty listing when the directory does not exist. A missing `flows`
/// entry is retried with a `.json` suffix; if that also fails, the original
/// error is returned.
pub fn get_entry(library: &Path, kind: &str, path: &str) -> Result<LibraryEntry, StoreError> {
    check_kind(kind)?;
    check_relative(path)?;
    let root = library.join(kind);

    match read_entry(&root, path) {
        Ok(entry) => Ok(entry),
        Err(_) if is_directory_request(path) => Ok(LibraryEntry::empty_listing()),
        Err(err) if kind == FLOWS_KIND && !path.ends_with(JSON_SUFFIX) => {
            read_entry(&root, &format!("{path}{JSON_SUFFIX}")).map_err(|_| err.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Save an entry as its header block followed by its body.
///
/// `flows` entries always get a `.json` suffix and, when `pretty` is set,
/// have their body re-encoded as indented JSON. The parent directory is
/// created if needed.
pub async fn save_entry(
    library: &Path,
    kind: &str,
    path: &str,
    meta: &HeaderBlock,
    body: &str,
    pretty: bool,
) -> Result<(), StoreError> {
    check_kind(kind)?;
    check_relative(path)?;
    if is_directory_request(path) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }

    let mut path = path.to_string();
    let mut body = body.to_string();
    if kind == FLOWS_KIND {
        if !path.ends_with(JSON_SUFFIX) {
            path.push_str(JSON_SUFFIX);
        }
        if pretty {
            let doc = DocumentFormat::Json.decode(&body)?;
            body = DocumentFormat::Json.encode(&doc, Some(4))?;
        }
    }

    let file = library.join(kind).join(&path);
    if let Some(parent) = file.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    header::write_entry(&file, meta, &body).await
}

fn is_directory_request(path: &str) -> bool {
    path.is_empty() || path.ends_with('/')
}

fn read_entry(root: &Path, path: &str) -> io::Result<LibraryEntry> {
    let full = root.join(path);
    let meta = fs::symlink_metadata(&full)?;
    if meta.is_file() && !is_directory_request(path) {
        return Ok(LibraryEntry::Body(header::read_body(&full)?));
    }
    Ok(LibraryEntry::Listing(list_dir(&full)?))
}

/// Subdirectories first, then files with their headers; each group sorted
/// by name, dotfiles skipped.
fn list_dir(dir: &Path) -> io::Result<Vec<ListingItem>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<io::Result<Vec<_>>>()?;
    names.sort();

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for name in names {
        if name.starts_with('.') {
            continue;
        }
        let full = dir.join(&name);
        if fs::symlink_metadata(&full)?.is_dir() {
            dirs.push(ListingItem::Directory(name));
        } else {
            let meta = header::read_header(&full)?;
            files.push(ListingItem::File(LibraryFile::new(name, meta)));
        }
    }

    dirs.extend(files);
    Ok(dirs)
}

fn check_kind(kind: &str) -> Result<(), StoreError> {
    let mut components = Path::new(kind).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StoreError::InvalidPath(kind.to_string())),
    }
}

/// Entry paths must stay inside their kind's directory.
fn check_relative(path: &str) -> Result<(), StoreError> {
    let contained = Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if contained {
        Ok(())
    } else {
        Err(StoreError::InvalidPath(path.to_string()))
    }
}
