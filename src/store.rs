//! Document store seam: durable persistence of serialized snapshots, keyed by
//! project id. Implementations are external; the engine treats the store as
//! overwrite-only per key (last save wins).

use std::collections::HashMap;

use thiserror::Error;

use crate::scene::Snapshot;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no snapshot stored for project {0}")]
    NotFound(String),
    #[error("store backend failure: {0}")]
    Backend(String),
}

pub trait DocumentStore {
    fn save(&mut self, project_id: &str, snapshot: &Snapshot) -> StoreResult<()>;
    fn load(&self, project_id: &str) -> StoreResult<Snapshot>;
}

/// In-memory reference implementation, also used as the test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: HashMap<String, Snapshot>,
    save_count: usize,
    fail_next_save: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// Makes the next `save` fail, for exercising the no-retry path.
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }
}

impl DocumentStore for MemoryStore {
    fn save(&mut self, project_id: &str, snapshot: &Snapshot) -> StoreResult<()> {
        if std::mem::take(&mut self.fail_next_save) {
            return Err(StoreError::Backend("simulated save failure".to_string()));
        }
        self.save_count += 1;
        self.snapshots
            .insert(project_id.to_string(), snapshot.clone());
        Ok(())
    }

    fn load(&self, project_id: &str) -> StoreResult<Snapshot> {
        self.snapshots
            .get(project_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(project_id.to_string()))
    }
}
