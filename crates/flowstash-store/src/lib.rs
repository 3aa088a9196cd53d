// ABOUTME: Persistence layer for flowstash: durable artifact files with backup recovery.
// ABOUTME: Provides the chunked header scanner, header codec, durable writer, backup protocol, and library.

pub mod backup;
pub mod config;
pub mod durable;
pub mod error;
pub mod header;
pub mod library;
pub mod paths;
pub mod scanner;
pub mod store;

pub use backup::LoadOutcome;
pub use config::{ConfigError, StoreConfig};
pub use error::StoreError;
pub use header::{read_body, read_header, render_entry, write_entry};
pub use paths::StorePaths;
pub use scanner::LineScanner;
pub use store::LocalStore;
