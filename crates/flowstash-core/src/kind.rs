// ABOUTME: Identifies the kinds of artifacts persisted by the store.
// ABOUTME: Each kind knows its log name, document format, and empty default.

use std::fmt;

use serde_json::Value;

use crate::format::DocumentFormat;

/// The kinds of whole-file artifacts the store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Flows,
    Credentials,
    Settings,
    Sessions,
}

impl ArtifactKind {
    /// Short name used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::Flows => "flow",
            ArtifactKind::Credentials => "credentials",
            ArtifactKind::Settings => "settings",
            ArtifactKind::Sessions => "sessions",
        }
    }

    /// The on-disk format used to encode and decode this kind.
    pub fn format(self) -> DocumentFormat {
        match self {
            ArtifactKind::Flows => DocumentFormat::Yaml,
            ArtifactKind::Credentials | ArtifactKind::Settings | ArtifactKind::Sessions => {
                DocumentFormat::Json
            }
        }
    }

    /// The value handed back when the artifact is absent, empty, or unreadable.
    /// Flows are a list; every other kind is a map.
    pub fn empty_default(self) -> Value {
        match self {
            ArtifactKind::Flows => Value::Array(Vec::new()),
            _ => Value::Object(serde_json::Map::new()),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
