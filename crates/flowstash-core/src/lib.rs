// ABOUTME: Core domain types for flowstash, shared by the store and the CLI.
// ABOUTME: Re-exports artifact kinds, document formats, header rules, and library entry types.

pub mod format;
pub mod header;
pub mod kind;
pub mod library;

pub use format::{CodecError, DocumentFormat};
pub use header::{HeaderBlock, is_header_line, parse_header_line, render_header};
pub use kind::ArtifactKind;
pub use library::{LibraryEntry, LibraryFile, ListingItem};
