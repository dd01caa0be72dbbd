use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::document::Document;

pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

/// Current snapshot envelope version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot decode failed: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion { found: u32 },
}

/// Opaque serialized form of a [`Document`], as handed to the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_raw(raw: String) -> Self {
        Self(raw)
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    document: Document,
}

/// Serializes a document into its persisted snapshot form. Every property
/// that affects rendering or future edits survives a round trip.
pub fn serialize(document: &Document) -> SnapshotResult<Snapshot> {
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        document: document.clone(),
    };
    let raw = serde_json::to_string(&envelope).map_err(SnapshotError::Encode)?;
    Ok(Snapshot(raw))
}

pub fn deserialize(snapshot: &Snapshot) -> SnapshotResult<Document> {
    let envelope: Envelope =
        serde_json::from_str(snapshot.as_str()).map_err(SnapshotError::Decode)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    Ok(envelope.document)
}
