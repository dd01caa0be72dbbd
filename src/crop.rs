//! Interactive crop session: a rectangle constrained to an image's bounds
//! that, on commit, replaces the image with a cropped version in the same
//! z-order slot. Cancelling restores the target exactly as it was.

use thiserror::Error;

use crate::geometry::{Rect, Size};
use crate::scene::{
    CropRegion, Document, LayerPlacement, ObjectId, ObjectKind, ObjectProps, SceneObject,
};

pub type CropResult<T> = std::result::Result<T, CropError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CropError {
    #[error("crop target {0:?} not found")]
    TargetNotFound(ObjectId),
    #[error("crop target {0:?} is not an image")]
    TargetNotAnImage(ObjectId),
}

/// Initial rectangle inset from the target's bounding box.
pub const INITIAL_INSET_FRACTION: f64 = 0.1;

/// Relative crop coordinates never collapse below this extent, so a committed
/// crop region is always non-empty.
pub const MIN_RELATIVE_EXTENT: f64 = 1e-3;

/// A live crop session over one image object. Exists only between
/// [`CropSession::begin`] and commit/cancel; the target's interactivity is
/// suspended for the session's lifetime.
#[derive(Debug, Clone)]
pub struct CropSession {
    target: ObjectId,
    rectangle: Rect,
    locked_ratio: Option<f64>,
    saved: ObjectProps,
}

impl CropSession {
    /// Starts a session: snapshots the target's restorable properties,
    /// freezes its interactivity, and places the rectangle with a 10% inset.
    pub fn begin(document: &mut Document, target: ObjectId) -> CropResult<Self> {
        let object = document
            .object_mut(target)
            .ok_or(CropError::TargetNotFound(target))?;
        if !object.is_image() {
            return Err(CropError::TargetNotAnImage(target));
        }

        let saved = ObjectProps::capture(object);
        object.selectable = false;
        object.interactive = false;
        let rectangle = object.bounding_box().inset_by_fraction(INITIAL_INSET_FRACTION);

        tracing::debug!(?target, ?rectangle, "crop session started");
        Ok(Self {
            target,
            rectangle,
            locked_ratio: None,
            saved,
        })
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn rectangle(&self) -> Rect {
        self.rectangle
    }

    pub fn locked_ratio(&self) -> Option<f64> {
        self.locked_ratio
    }

    fn target_bounds(&self, document: &Document) -> CropResult<Rect> {
        Ok(document
            .object(self.target)
            .ok_or(CropError::TargetNotFound(self.target))?
            .bounding_box())
    }

    /// Drags the rectangle; its bounding box never leaves the target's.
    pub fn move_by(&mut self, document: &Document, dx: f64, dy: f64) -> CropResult<Rect> {
        let bounds = self.target_bounds(document)?;
        let moved = Rect::new(
            self.rectangle.x + dx,
            self.rectangle.y + dy,
            self.rectangle.width,
            self.rectangle.height,
        );
        self.rectangle = moved.clamped_within(bounds);
        Ok(self.rectangle)
    }

    /// Resizes the rectangle toward `requested`, clamped to the target's
    /// bounds. With a locked ratio, height is recomputed from width and the
    /// rectangle's center stays fixed.
    pub fn resize_to(&mut self, document: &Document, requested: Rect) -> CropResult<Rect> {
        let bounds = self.target_bounds(document)?;
        let mut rect = requested.fitted_within(bounds);

        if let Some(ratio) = self.locked_ratio {
            let ratio = ratio.max(f64::EPSILON);
            let center = rect.center();
            let mut width = rect.width;
            let mut height = width / ratio;
            if height > bounds.height {
                height = bounds.height;
                width = height * ratio;
            }
            rect = Rect::from_center(center, Size::new(width, height)).clamped_within(bounds);
        }

        self.rectangle = rect;
        Ok(self.rectangle)
    }

    /// Locks (or unlocks) the aspect ratio, re-snapping the current rectangle.
    pub fn set_locked_ratio(
        &mut self,
        document: &Document,
        ratio: Option<f64>,
    ) -> CropResult<Rect> {
        self.locked_ratio = ratio;
        let current = self.rectangle;
        self.resize_to(document, current)
    }

    /// Commits the crop: computes the region in the target's intrinsic pixel
    /// space and replaces the target with a cropped image object occupying the
    /// rectangle's on-canvas footprint, in the same z-order slot.
    pub fn commit(self, document: &mut Document) -> CropResult<ObjectId> {
        let target = document
            .object(self.target)
            .ok_or(CropError::TargetNotFound(self.target))?;
        let ObjectKind::Image { source_url, .. } = &target.kind else {
            return Err(CropError::TargetNotAnImage(self.target));
        };
        let source_url = source_url.clone();

        let bounds = target.bounding_box();
        let relative = relative_crop_region(self.rectangle, bounds);
        let intrinsic = target.intrinsic_size;
        let crop = CropRegion {
            x: relative.x * intrinsic.width,
            y: relative.y * intrinsic.height,
            width: relative.width * intrinsic.width,
            height: relative.height * intrinsic.height,
        };

        let mut replacement = SceneObject::new(
            ObjectId(0),
            ObjectKind::Image {
                source_url,
                crop: Some(crop),
            },
            self.rectangle.center(),
            Size::new(crop.width, crop.height),
        );
        replacement.set_display_size(self.rectangle.size());
        replacement.selectable = self.saved.selectable;
        replacement.interactive = self.saved.interactive;

        let new_id = document
            .replace(self.target, replacement, LayerPlacement::Preserve)
            .map_err(|_| CropError::TargetNotFound(self.target))?;
        tracing::debug!(old = ?self.target, new = ?new_id, ?crop, "crop committed");
        Ok(new_id)
    }

    /// Discards the session, restoring the target's snapshot verbatim. The
    /// document ends up exactly as it was before `begin`.
    pub fn cancel(self, document: &mut Document) -> CropResult<()> {
        let object = document
            .object_mut(self.target)
            .ok_or(CropError::TargetNotFound(self.target))?;
        self.saved.restore(object);
        tracing::debug!(target = ?self.target, "crop session cancelled");
        Ok(())
    }
}

/// Maps a canvas-space rectangle into the target's relative `[0,1]²` space,
/// clamped so the result is always a non-empty region.
pub fn relative_crop_region(rect: Rect, target: Rect) -> Rect {
    let width = target.width.max(f64::EPSILON);
    let height = target.height.max(f64::EPSILON);

    let left = ((rect.x - target.x) / width).clamp(0.0, 1.0);
    let top = ((rect.y - target.y) / height).clamp(0.0, 1.0);
    let right = ((rect.right() - target.x) / width).clamp(0.0, 1.0);
    let bottom = ((rect.bottom() - target.y) / height).clamp(0.0, 1.0);

    let mut rel_width = right - left;
    let mut rel_x = left;
    if rel_width < MIN_RELATIVE_EXTENT {
        rel_width = MIN_RELATIVE_EXTENT;
        rel_x = rel_x.min(1.0 - MIN_RELATIVE_EXTENT);
    }
    let mut rel_height = bottom - top;
    let mut rel_y = top;
    if rel_height < MIN_RELATIVE_EXTENT {
        rel_height = MIN_RELATIVE_EXTENT;
        rel_y = rel_y.min(1.0 - MIN_RELATIVE_EXTENT);
    }

    Rect::new(rel_x, rel_y, rel_width, rel_height)
}
