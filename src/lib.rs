//! Canvas scene, viewport and persistence engine for a browser-hosted image
//! editor. The crate is rendering-framework agnostic: a host owns the event
//! loop and the drawing surface, and drives a [`CanvasEngine`] through
//! commands while reading back [`ViewportState`] and scene objects to paint.
//!
//! The main pieces:
//! - [`scene`]: the document model and its JSON snapshot format.
//! - [`viewport`]: logical-size to display-size mapping.
//! - [`reconcile`]: canvas resize reconciliation (object shifting/clamping).
//! - [`autosave`]: debounced save scheduling.
//! - [`crop`]: the modal crop sub-editor.
//! - [`engine`]: the facade tying them together over a [`DocumentStore`].

pub mod autosave;
pub mod config;
pub mod crop;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod logging;
pub mod notify;
pub mod reconcile;
pub mod scene;
pub mod store;
pub mod transform;
pub mod viewport;

pub use config::EngineConfig;
pub use engine::CanvasEngine;
pub use error::{EngineError, EngineResult};
pub use notify::NotificationSink;
pub use store::DocumentStore;
pub use viewport::ViewportState;
