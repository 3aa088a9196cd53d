// ABOUTME: Encodes and decodes artifact documents as YAML or JSON text.
// ABOUTME: Documents are held as serde_json::Value regardless of their on-disk format.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while encoding or decoding a document.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The text formats an artifact can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Encode a document. `indent` selects indented JSON with that many spaces
    /// per level; `None` produces compact JSON. YAML output ignores `indent`.
    pub fn encode(self, doc: &Value, indent: Option<usize>) -> Result<String, CodecError> {
        match self {
            DocumentFormat::Yaml => Ok(serde_yaml::to_string(doc)?),
            DocumentFormat::Json => match indent {
                Some(width) => encode_json_indented(doc, width),
                None => Ok(serde_json::to_string(doc)?),
            },
        }
    }

    /// Decode text into a document. A leading byte order mark is ignored.
    pub fn decode(self, text: &str) -> Result<Value, CodecError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        match self {
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
            DocumentFormat::Json => Ok(serde_json::from_str(text)?),
        }
    }
}

fn encode_json_indented(doc: &Value, width: usize) -> Result<String, CodecError> {
    let indent = " ".repeat(width);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    doc.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
