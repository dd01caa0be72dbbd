//! Engine facade: owns the document, viewport, autosave coordinator and crop
//! session, and exposes the command/query surface a rendering layer consumes.
//!
//! Every mutation goes through a command here, so ordering is auditable:
//! geometry changes complete synchronously before the corresponding save is
//! scheduled, and a save never observes a half-updated scene.

use std::time::Instant;

use crate::autosave::{AutosaveCoordinator, MutationClass, SaveDirective};
use crate::config::EngineConfig;
use crate::crop::CropSession;
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Color, LogicalSize, Point, Rect, Size, Vector};
use crate::loader::{DecodedImage, LoadError, LoadToken, LoadTracker};
use crate::notify::{NotificationSink, Severity};
use crate::reconcile::{self, Axis, RatioOutcome, ResizeOutcome};
use crate::scene::{self, Document, LayerPlacement, ObjectId, ObjectKind, SceneObject, Snapshot};
use crate::store::{DocumentStore, StoreError};
use crate::viewport::{compute_viewport, FitMode, ViewportState};

const DEFAULT_PROJECT_SIZE: LogicalSize = LogicalSize::new(800, 600);

pub struct CanvasEngine<S: DocumentStore, N: NotificationSink> {
    project_id: String,
    config: EngineConfig,
    store: S,
    sink: N,
    document: Option<Document>,
    container: Size,
    device_pixel_ratio: f64,
    viewport: Option<ViewportState>,
    autosave: AutosaveCoordinator,
    crop: Option<CropSession>,
    loads: LoadTracker,
}

impl<S: DocumentStore, N: NotificationSink> CanvasEngine<S, N> {
    pub fn new(project_id: impl Into<String>, config: EngineConfig, store: S, sink: N) -> Self {
        let autosave = AutosaveCoordinator::new(config.debounce);
        Self {
            project_id: project_id.into(),
            config,
            store,
            sink,
            document: None,
            container: Size::ZERO,
            device_pixel_ratio: 1.0,
            viewport: None,
            autosave,
            crop: None,
            loads: LoadTracker::new(),
        }
    }

    /// Loads the project snapshot from the store, or starts a fresh document
    /// when none exists. Returns whether an existing snapshot was restored.
    pub fn open_project(&mut self) -> EngineResult<bool> {
        let restored = match self.store.load(&self.project_id) {
            Ok(snapshot) => {
                self.document = Some(scene::deserialize(&snapshot)?);
                true
            }
            Err(StoreError::NotFound(_)) => {
                let size = LogicalSize::new(
                    self.config.bounds.clamp_width(DEFAULT_PROJECT_SIZE.width),
                    self.config.bounds.clamp_height(DEFAULT_PROJECT_SIZE.height),
                );
                self.document = Some(Document::new(size));
                false
            }
            Err(err) => return Err(err.into()),
        };
        self.refresh_viewport();
        tracing::info!(project = %self.project_id, restored, "project opened");
        Ok(restored)
    }

    fn document_ref(&self) -> EngineResult<&Document> {
        self.document.as_ref().ok_or_else(|| {
            tracing::debug!("operation before document open; reporting not ready");
            EngineError::NotReady
        })
    }

    fn document_mut(&mut self) -> EngineResult<&mut Document> {
        self.document.as_mut().ok_or_else(|| {
            tracing::debug!("operation before document open; reporting not ready");
            EngineError::NotReady
        })
    }

    fn refresh_viewport(&mut self) {
        let Some(document) = self.document.as_ref() else {
            return;
        };
        self.viewport = Some(compute_viewport(
            document.logical_size(),
            self.container,
            self.device_pixel_ratio,
            self.config.viewport,
            self.viewport.as_ref(),
            self.config.min_container_extent,
        ));
    }

    // --- rendering-surface inputs ---------------------------------------

    /// Records the available display area and recomputes the viewport. The
    /// container is remembered even before the document opens, so the first
    /// viewport is correct.
    pub fn on_container_resize(
        &mut self,
        container: Size,
        device_pixel_ratio: f64,
    ) -> EngineResult<ViewportState> {
        self.container = container;
        self.device_pixel_ratio = device_pixel_ratio;
        self.document_ref()?;
        self.refresh_viewport();
        self.viewport.ok_or(EngineError::NotReady)
    }

    /// Switches the viewport fit mode. `Exact` shows the logical size
    /// uncompressed, for after an explicit resize transformation; `Contain`
    /// returns to container-relative scaling. Not a document mutation.
    pub fn set_fit_mode(&mut self, fit: FitMode) -> EngineResult<ViewportState> {
        self.config.viewport = match fit {
            FitMode::Contain => self.config.contain_policy(),
            FitMode::Exact => self.config.exact_policy(),
        };
        self.document_ref()?;
        self.refresh_viewport();
        self.viewport.ok_or(EngineError::NotReady)
    }

    // --- rendering-surface queries --------------------------------------

    pub fn serialized_state(&self) -> EngineResult<Snapshot> {
        Ok(scene::serialize(self.document_ref()?)?)
    }

    pub fn objects(&self) -> EngineResult<&[SceneObject]> {
        Ok(self.document_ref()?.objects())
    }

    pub fn logical_size(&self) -> EngineResult<LogicalSize> {
        Ok(self.document_ref()?.logical_size())
    }

    pub fn viewport(&self) -> Option<ViewportState> {
        self.viewport
    }

    pub fn crop_session(&self) -> Option<&CropSession> {
        self.crop.as_ref()
    }

    // --- document mutation commands -------------------------------------

    pub fn add_object(
        &mut self,
        kind: ObjectKind,
        position: Point,
        intrinsic_size: Size,
        now: Instant,
    ) -> EngineResult<ObjectId> {
        let id = self.document_mut()?.add(kind, position, intrinsic_size);
        self.autosave.note_mutation(MutationClass::Content, now);
        Ok(id)
    }

    pub fn remove_object(&mut self, id: ObjectId, now: Instant) -> EngineResult<SceneObject> {
        let removed = self.document_mut()?.remove(id)?;
        self.autosave.note_mutation(MutationClass::Content, now);
        Ok(removed)
    }

    pub fn replace_object(
        &mut self,
        old_id: ObjectId,
        replacement: SceneObject,
        placement: LayerPlacement,
        now: Instant,
    ) -> EngineResult<ObjectId> {
        let id = self.document_mut()?.replace(old_id, replacement, placement)?;
        self.autosave.note_mutation(MutationClass::Content, now);
        Ok(id)
    }

    pub fn duplicate_object(&mut self, id: ObjectId, now: Instant) -> EngineResult<ObjectId> {
        let copy = self.document_mut()?.duplicate(id)?;
        self.autosave.note_mutation(MutationClass::Content, now);
        Ok(copy)
    }

    /// Moves an object by a drag delta, keeping its identity. Returns the new
    /// position.
    pub fn move_object(
        &mut self,
        id: ObjectId,
        dx: f64,
        dy: f64,
        now: Instant,
    ) -> EngineResult<Point> {
        let object = self.existing_object_mut(id)?;
        object.position.x += dx;
        object.position.y += dy;
        let position = object.position;
        self.autosave.note_mutation(MutationClass::Geometry, now);
        Ok(position)
    }

    pub fn set_object_scale(
        &mut self,
        id: ObjectId,
        scale: Vector,
        now: Instant,
    ) -> EngineResult<()> {
        self.existing_object_mut(id)?.scale = scale;
        self.autosave.note_mutation(MutationClass::Geometry, now);
        Ok(())
    }

    pub fn set_object_rotation(
        &mut self,
        id: ObjectId,
        degrees: f64,
        now: Instant,
    ) -> EngineResult<()> {
        self.existing_object_mut(id)?.rotation_degrees = degrees;
        self.autosave.note_mutation(MutationClass::Geometry, now);
        Ok(())
    }

    pub fn reorder_object(&mut self, id: ObjectId, index: usize, now: Instant) -> EngineResult<()> {
        self.document_mut()?.reorder(id, index)?;
        self.autosave.note_mutation(MutationClass::Content, now);
        Ok(())
    }

    pub fn set_background_color(&mut self, color: Color, now: Instant) -> EngineResult<()> {
        self.document_mut()?.set_background_color(color);
        self.autosave.note_mutation(MutationClass::Content, now);
        Ok(())
    }

    fn existing_object_mut(&mut self, id: ObjectId) -> EngineResult<&mut SceneObject> {
        self.document_mut()?
            .object_mut(id)
            .ok_or(EngineError::Scene(scene::SceneError::ObjectNotFound(id)))
    }

    // --- geometry commands ----------------------------------------------

    /// Grows or shrinks the canvas along one axis, repositioning objects and
    /// recomputing the viewport, then schedules a geometry save.
    pub fn resize_canvas(
        &mut self,
        axis: Axis,
        delta: i64,
        now: Instant,
    ) -> EngineResult<ResizeOutcome> {
        let bounds = self.config.bounds;
        let outcome = reconcile::resize_axis(self.document_mut()?, axis, delta, &bounds);
        self.refresh_viewport();
        self.autosave.note_mutation(MutationClass::Geometry, now);
        Ok(outcome)
    }

    /// Sets the logical size directly (clamped), without moving objects.
    pub fn set_canvas_size(
        &mut self,
        width: u32,
        height: u32,
        now: Instant,
    ) -> EngineResult<LogicalSize> {
        let bounds = self.config.bounds;
        let applied = self.document_mut()?.set_logical_size(width, height, &bounds);
        self.refresh_viewport();
        self.autosave.note_mutation(MutationClass::Geometry, now);
        Ok(applied)
    }

    /// Applies an aspect-ratio preset, preserving canvas area. The outcome
    /// reports when bounds clamping could not honor the requested ratio.
    pub fn apply_aspect_preset(&mut self, ratio: f64, now: Instant) -> EngineResult<RatioOutcome> {
        let bounds = self.config.bounds;
        let tolerance = self.config.ratio_tolerance;
        let outcome =
            reconcile::apply_aspect_preset(self.document_mut()?, ratio, &bounds, tolerance);
        self.refresh_viewport();
        self.autosave.note_mutation(MutationClass::Geometry, now);
        Ok(outcome)
    }

    /// Recentres every object, discarding relative layout.
    pub fn reset_layout(&mut self, now: Instant) -> EngineResult<()> {
        reconcile::recenter_all(self.document_mut()?);
        self.refresh_viewport();
        self.autosave.note_mutation(MutationClass::Geometry, now);
        Ok(())
    }

    // --- crop session commands ------------------------------------------

    pub fn begin_crop(&mut self, target: ObjectId) -> EngineResult<Rect> {
        if self.crop.is_some() {
            return Err(EngineError::CropSessionActive);
        }
        let document = self.document.as_mut().ok_or(EngineError::NotReady)?;
        let session = CropSession::begin(document, target)?;
        let rectangle = session.rectangle();
        self.crop = Some(session);
        Ok(rectangle)
    }

    pub fn move_crop_rect(&mut self, dx: f64, dy: f64) -> EngineResult<Rect> {
        let document = self.document.as_ref().ok_or(EngineError::NotReady)?;
        let session = self.crop.as_mut().ok_or(EngineError::NoCropSession)?;
        Ok(session.move_by(document, dx, dy)?)
    }

    pub fn resize_crop_rect(&mut self, requested: Rect) -> EngineResult<Rect> {
        let document = self.document.as_ref().ok_or(EngineError::NotReady)?;
        let session = self.crop.as_mut().ok_or(EngineError::NoCropSession)?;
        Ok(session.resize_to(document, requested)?)
    }

    pub fn set_crop_ratio(&mut self, ratio: Option<f64>) -> EngineResult<Rect> {
        let document = self.document.as_ref().ok_or(EngineError::NotReady)?;
        let session = self.crop.as_mut().ok_or(EngineError::NoCropSession)?;
        Ok(session.set_locked_ratio(document, ratio)?)
    }

    /// Commits the active crop session and schedules a content save.
    pub fn commit_crop(&mut self, now: Instant) -> EngineResult<ObjectId> {
        let session = self.crop.take().ok_or(EngineError::NoCropSession)?;
        let document = self.document.as_mut().ok_or(EngineError::NotReady)?;
        let new_id = session.commit(document)?;
        self.autosave.note_mutation(MutationClass::Content, now);
        Ok(new_id)
    }

    /// Cancels the active crop session. The document is restored verbatim and
    /// no save is scheduled.
    pub fn cancel_crop(&mut self) -> EngineResult<()> {
        let session = self.crop.take().ok_or(EngineError::NoCropSession)?;
        let document = self.document.as_mut().ok_or(EngineError::NotReady)?;
        Ok(session.cancel(document)?)
    }

    // --- image loading --------------------------------------------------

    /// Creates a placeholder image object and issues a load token for it.
    /// The object becomes interactive once the load completes; a failed load
    /// removes it again so no broken placeholder survives.
    pub fn create_image(
        &mut self,
        source_url: impl Into<String>,
        position: Point,
    ) -> EngineResult<(ObjectId, LoadToken)> {
        let document = self.document.as_mut().ok_or(EngineError::NotReady)?;
        let id = document.add(
            ObjectKind::Image {
                source_url: source_url.into(),
                crop: None,
            },
            position,
            Size::ZERO,
        );
        if let Some(object) = document.object_mut(id) {
            object.selectable = false;
            object.interactive = false;
        }
        Ok((id, self.loads.begin(id)))
    }

    /// Issues a new load token for an existing image slot, superseding any
    /// in-flight load for it.
    pub fn reload_image(&mut self, slot: ObjectId, source_url: impl Into<String>) -> EngineResult<LoadToken> {
        let document = self.document.as_mut().ok_or(EngineError::NotReady)?;
        let object = document
            .object_mut(slot)
            .ok_or(EngineError::Scene(scene::SceneError::ObjectNotFound(slot)))?;
        if let ObjectKind::Image { source_url: url, crop } = &mut object.kind {
            *url = source_url.into();
            *crop = None;
        } else {
            return Err(EngineError::Crop(crate::crop::CropError::TargetNotAnImage(slot)));
        }
        Ok(self.loads.begin(slot))
    }

    /// Delivers a load completion. Stale completions (superseded by a newer
    /// token for the same slot) are ignored. Failures remove the slot's
    /// object and notify the user; other objects are unaffected.
    pub fn complete_image_load(
        &mut self,
        token: LoadToken,
        result: Result<DecodedImage, LoadError>,
        now: Instant,
    ) -> EngineResult<()> {
        if !self.loads.is_current(token) {
            tracing::debug!(slot = ?token.slot, "ignoring stale image load completion");
            return Ok(());
        }
        let document = self.document.as_mut().ok_or(EngineError::NotReady)?;
        match result {
            Ok(decoded) => {
                let object = document.object_mut(token.slot).ok_or(EngineError::Scene(
                    scene::SceneError::ObjectNotFound(token.slot),
                ))?;
                object.intrinsic_size = decoded.intrinsic_size();
                object.selectable = true;
                object.interactive = true;
                self.autosave.note_mutation(MutationClass::Content, now);
            }
            Err(err) => {
                let _ = document.remove(token.slot);
                self.sink
                    .notify(Severity::Error, &format!("image failed to load: {err}"));
            }
        }
        Ok(())
    }

    // --- persistence ----------------------------------------------------

    /// Next instant at which [`tick`](Self::tick) may start a save.
    pub fn next_save_deadline(&self) -> Option<Instant> {
        self.autosave.next_deadline()
    }

    pub fn has_unsaved_work(&self) -> bool {
        self.autosave.has_pending_work()
    }

    /// Drives the autosave timer; performs a save when the debounce interval
    /// has elapsed. Returns whether a save was attempted.
    pub fn tick(&mut self, now: Instant) -> EngineResult<bool> {
        match self.autosave.poll(now) {
            SaveDirective::Wait => Ok(false),
            SaveDirective::BeginSave => {
                self.perform_save(now);
                Ok(true)
            }
        }
    }

    /// Saves immediately, cancelling any pending debounce timer.
    pub fn save_now(&mut self, now: Instant) -> EngineResult<()> {
        self.document_ref()?;
        if self.autosave.save_now() {
            self.perform_save(now);
        }
        Ok(())
    }

    /// Runs one save attempt. Failures go to the notification sink and leave
    /// the in-memory document untouched; the next mutation retries.
    fn perform_save(&mut self, now: Instant) {
        let serialized = match self.document.as_ref() {
            Some(document) => scene::serialize(document),
            None => {
                self.autosave.finish_save(false, now);
                return;
            }
        };
        let outcome = serialized
            .map_err(EngineError::from)
            .and_then(|snapshot| Ok(self.store.save(&self.project_id, &snapshot)?));

        match outcome {
            Ok(()) => {
                tracing::debug!(project = %self.project_id, "autosave completed");
                self.autosave.finish_save(true, now);
            }
            Err(err) => {
                self.sink
                    .notify(Severity::Error, &format!("saving project failed: {err}"));
                self.autosave.finish_save(false, now);
            }
        }
    }
}
