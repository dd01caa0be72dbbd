//! Owned scene model: document, objects, and persisted snapshot codec.

pub mod document;
pub mod object;
pub mod snapshot;

pub use document::{Document, LayerPlacement, SceneError, SceneResult};
pub use object::{CropRegion, ObjectId, ObjectKind, ObjectProps, Origin, SceneObject, ShapeKind};
pub use snapshot::{deserialize, serialize, Snapshot, SnapshotError, SnapshotResult};
