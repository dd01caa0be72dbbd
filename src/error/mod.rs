use thiserror::Error;

use crate::crop::CropError;
use crate::loader::LoadError;
use crate::scene::{SceneError, SnapshotError};
use crate::store::StoreError;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation arrived before a document was opened. Recoverable by
    /// retrying after initialization; callers log it, never surface it.
    #[error("engine is not ready: no document is open")]
    NotReady,
    #[error("no crop session is active")]
    NoCropSession,
    #[error("a crop session is already active")]
    CropSessionActive,
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Crop(#[from] CropError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
