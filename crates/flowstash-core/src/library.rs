// ABOUTME: Result types for library reads: a file body or a directory listing.
// ABOUTME: Listings serialize as bare directory names followed by header maps tagged with `fn`.

use serde::Serialize;

use crate::header::HeaderBlock;

/// A file within a library listing: its header block plus its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryFile {
    #[serde(rename = "fn")]
    pub name: String,
    #[serde(flatten)]
    pub meta: HeaderBlock,
}

impl LibraryFile {
    /// Build a listing file entry. A header key named `fn` is dropped in
    /// favour of the real file name.
    pub fn new(name: String, mut meta: HeaderBlock) -> Self {
        meta.remove("fn");
        Self { name, meta }
    }
}

/// One element of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ListingItem {
    Directory(String),
    File(LibraryFile),
}

/// What a library read resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LibraryEntry {
    Body(String),
    Listing(Vec<ListingItem>),
}

impl LibraryEntry {
    /// An empty directory listing.
    pub fn empty_listing() -> Self {
        LibraryEntry::Listing(Vec::new())
    }
}
