//! Image resource loading seam, with generation tokens for stale-load
//! suppression: a newer load for the same object slot supersedes an older one
//! without cancelling the underlying fetch.

use std::collections::HashMap;

use thiserror::Error;

use crate::geometry::Size;
use crate::scene::ObjectId;

pub type LoadResult<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("failed to decode image {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Handle to a decoded image resource: the source url plus intrinsic pixel
/// dimensions. Pixel data stays with the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn intrinsic_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

pub trait ImageResourceLoader {
    fn load(&self, url: &str, cross_origin: bool) -> LoadResult<DecodedImage>;
}

/// In-memory loader backed by the `image` crate: resources are registered as
/// encoded bytes and decoded on demand.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    resources: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.resources.insert(url.into(), bytes);
    }
}

impl ImageResourceLoader for MemoryLoader {
    fn load(&self, url: &str, _cross_origin: bool) -> LoadResult<DecodedImage> {
        let bytes = self
            .resources
            .get(url)
            .ok_or_else(|| LoadError::NotFound(url.to_string()))?;
        let decoded = image::load_from_memory(bytes).map_err(|err| LoadError::Decode {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(DecodedImage {
            url: url.to_string(),
            width: decoded.width(),
            height: decoded.height(),
        })
    }
}

/// Per-slot load generation, issued when a load starts and checked when it
/// completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    pub slot: ObjectId,
    generation: u64,
}

/// Tracks the newest load generation per object slot so a superseded load's
/// completion can be ignored.
#[derive(Debug, Default)]
pub struct LoadTracker {
    generations: HashMap<ObjectId, u64>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load for `slot`, invalidating any older in-flight load.
    pub fn begin(&mut self, slot: ObjectId) -> LoadToken {
        let generation = self
            .generations
            .get(&slot)
            .copied()
            .unwrap_or(0)
            .wrapping_add(1);
        self.generations.insert(slot, generation);
        LoadToken { slot, generation }
    }

    /// True if `token` still represents the newest load for its slot.
    pub fn is_current(&self, token: LoadToken) -> bool {
        self.generations.get(&token.slot).copied() == Some(token.generation)
    }
}
