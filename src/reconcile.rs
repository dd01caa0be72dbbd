//! Repositions scene objects when the logical canvas size changes.
//!
//! Incremental resizes grow or shrink the canvas symmetrically from its
//! center: every object shifts by half the delta on the changed axis. The
//! coarser reset operation recentres everything, discarding relative layout.

use crate::config::SizeBounds;
use crate::geometry::{LogicalSize, Rect};
use crate::scene::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Result of an incremental resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOutcome {
    pub applied: LogicalSize,
    /// Delta actually realized after bounds clamping, in pixels.
    pub applied_delta: i64,
    /// True when the request hit the configured size bounds.
    pub clamped: bool,
}

/// Result of an aspect-ratio preset application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioOutcome {
    pub applied: LogicalSize,
    /// False when bounds clamping pushed the realized ratio more than the
    /// tolerance away from the request; the caller should tell the user.
    pub ratio_honored: bool,
}

/// Grows or shrinks the canvas along one axis by an integer pixel `delta`,
/// shifting every object by `delta / 2` so the composition stays centered.
/// Shrinking clamps object bounding boxes into the new canvas; growth never
/// needs clamping.
pub fn resize_axis(
    document: &mut Document,
    axis: Axis,
    delta: i64,
    bounds: &SizeBounds,
) -> ResizeOutcome {
    let old = document.logical_size();
    let (requested_width, requested_height) = match axis {
        Axis::Horizontal => (saturating_add(old.width, delta), old.height),
        Axis::Vertical => (old.width, saturating_add(old.height, delta)),
    };

    let applied = document.set_logical_size(requested_width, requested_height, bounds);
    let applied_delta = match axis {
        Axis::Horizontal => i64::from(applied.width) - i64::from(old.width),
        Axis::Vertical => i64::from(applied.height) - i64::from(old.height),
    };

    if applied_delta != 0 {
        let shift = applied_delta as f64 / 2.0;
        for object in document.objects_mut() {
            match axis {
                Axis::Horizontal => object.position.x += shift,
                Axis::Vertical => object.position.y += shift,
            }
        }
        if applied_delta < 0 {
            clamp_objects_into_canvas(document);
        }
    }

    ResizeOutcome {
        applied,
        applied_delta,
        clamped: applied_delta != delta,
    }
}

/// Applies an aspect-ratio preset, preserving the current canvas area:
/// `height = sqrt(area / ratio)`, `width = height * ratio`, rounded and then
/// clamped to bounds. Reports whether clamping kept the realized ratio within
/// `tolerance` of the request.
pub fn apply_aspect_preset(
    document: &mut Document,
    ratio: f64,
    bounds: &SizeBounds,
    tolerance: f64,
) -> RatioOutcome {
    let old = document.logical_size();
    let area = old.area();
    let ratio = ratio.max(f64::EPSILON);

    let height = (area / ratio).sqrt().round().max(1.0) as u32;
    let width = (f64::from(height) * ratio).round().max(1.0) as u32;
    let applied = document.set_logical_size(width, height, bounds);

    reconcile_both_axes(document, old, applied);

    let realized = applied.aspect_ratio();
    let ratio_honored = (realized - ratio).abs() <= tolerance * ratio.max(1.0);
    if !ratio_honored {
        tracing::debug!(requested = ratio, realized, "aspect preset clamped away from request");
    }
    RatioOutcome {
        applied,
        ratio_honored,
    }
}

/// Explicit reset: recentre every object at the new canvas center, discarding
/// prior relative layout.
pub fn recenter_all(document: &mut Document) {
    let center = document.logical_size().center();
    for object in document.objects_mut() {
        object.position = center;
    }
}

fn reconcile_both_axes(document: &mut Document, old: LogicalSize, new: LogicalSize) {
    let dx = (i64::from(new.width) - i64::from(old.width)) as f64 / 2.0;
    let dy = (i64::from(new.height) - i64::from(old.height)) as f64 / 2.0;
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    for object in document.objects_mut() {
        object.position.x += dx;
        object.position.y += dy;
    }
    if new.width < old.width || new.height < old.height {
        clamp_objects_into_canvas(document);
    }
}

fn clamp_objects_into_canvas(document: &mut Document) {
    let size = document.logical_size();
    let canvas = Rect::new(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    for object in document.objects_mut() {
        let bounding = object.bounding_box();
        let clamped = bounding.clamped_within(canvas);
        object.position.x += clamped.x - bounding.x;
        object.position.y += clamped.y - bounding.y;
    }
}

fn saturating_add(base: u32, delta: i64) -> u32 {
    u32::try_from((i64::from(base) + delta).max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Size};
    use crate::scene::{ObjectId, ObjectKind};

    fn doc_with_image(position: Point) -> (Document, ObjectId) {
        let mut doc = Document::new(LogicalSize::new(800, 600));
        let id = doc.add(
            ObjectKind::Image {
                source_url: "img".to_string(),
                crop: None,
            },
            position,
            Size::new(100.0, 100.0),
        );
        (doc, id)
    }

    fn position(doc: &Document, id: ObjectId) -> Point {
        doc.object(id).expect("object should exist").position
    }

    #[test]
    fn increment_width_shifts_objects_by_half_delta() {
        let (mut doc, id) = doc_with_image(Point::new(400.0, 300.0));
        let outcome = resize_axis(&mut doc, Axis::Horizontal, 50, &SizeBounds::default());

        assert_eq!(outcome.applied, LogicalSize::new(850, 600));
        assert!(!outcome.clamped);
        assert_eq!(position(&doc, id), Point::new(425.0, 300.0));
    }

    #[test]
    fn increment_then_decrement_restores_positions() {
        let (mut doc, id) = doc_with_image(Point::new(400.0, 300.0));
        resize_axis(&mut doc, Axis::Horizontal, 50, &SizeBounds::default());
        resize_axis(&mut doc, Axis::Horizontal, -50, &SizeBounds::default());

        assert_eq!(doc.logical_size(), LogicalSize::new(800, 600));
        let restored = position(&doc, id);
        assert!((restored.x - 400.0).abs() <= 1.0);
        assert!((restored.y - 300.0).abs() <= 1.0);
    }

    #[test]
    fn bounds_hold_under_any_resize_sequence() {
        let (mut doc, _) = doc_with_image(Point::new(400.0, 300.0));
        let bounds = SizeBounds::default();
        let deltas: [i64; 8] = [500, 500, -2_000, 90, -90, 10_000, -7, 3];

        for (step, delta) in deltas.into_iter().enumerate() {
            let axis = if step % 2 == 0 {
                Axis::Horizontal
            } else {
                Axis::Vertical
            };
            resize_axis(&mut doc, axis, delta, &bounds);
            let size = doc.logical_size();
            assert!(size.width >= bounds.min_width && size.width <= bounds.max_width);
            assert!(size.height >= bounds.min_height && size.height <= bounds.max_height);
        }
    }

    #[test]
    fn clamped_resize_reports_partial_delta() {
        let (mut doc, _) = doc_with_image(Point::new(400.0, 300.0));
        let outcome = resize_axis(&mut doc, Axis::Horizontal, 10_000, &SizeBounds::default());
        assert_eq!(outcome.applied.width, 1_200);
        assert_eq!(outcome.applied_delta, 400);
        assert!(outcome.clamped);
    }

    #[test]
    fn shrink_clamps_objects_inside_new_canvas() {
        let (mut doc, id) = doc_with_image(Point::new(780.0, 300.0));
        resize_axis(&mut doc, Axis::Horizontal, -600, &SizeBounds::default());

        let size = doc.logical_size();
        assert_eq!(size.width, 200);
        let bounding = doc.object(id).expect("object should exist").bounding_box();
        assert!(bounding.left() >= 0.0);
        assert!(bounding.right() <= f64::from(size.width));
    }

    #[test]
    fn growth_never_clamps_object_positions() {
        let (mut doc, id) = doc_with_image(Point::new(790.0, 300.0));
        resize_axis(&mut doc, Axis::Horizontal, 400, &SizeBounds::default());
        // Shift only; the object may legitimately hang past the old edge.
        assert_eq!(position(&doc, id), Point::new(990.0, 300.0));
    }

    #[test]
    fn aspect_preset_preserves_area_within_rounding() {
        let mut doc = Document::new(LogicalSize::new(800, 600));
        let outcome = apply_aspect_preset(&mut doc, 16.0 / 9.0, &SizeBounds::default(), 0.01);

        assert!(outcome.ratio_honored);
        let applied = outcome.applied;
        let area = applied.area();
        assert!((area - 480_000.0).abs() / 480_000.0 < 0.01);
        assert!((applied.aspect_ratio() - 16.0 / 9.0).abs() < 0.01 * (16.0 / 9.0));
    }

    #[test]
    fn aspect_preset_reports_when_clamping_breaks_ratio() {
        // 9:16 portrait wants height ~1193 for an 800x600 area, far above the
        // 550 max, so the realized ratio cannot be honored.
        let mut doc = Document::new(LogicalSize::new(800, 600));
        let outcome = apply_aspect_preset(&mut doc, 9.0 / 16.0, &SizeBounds::default(), 0.01);
        assert!(!outcome.ratio_honored);
        assert_eq!(outcome.applied.height, 550);
    }

    #[test]
    fn recenter_all_moves_every_object_to_canvas_center() {
        let (mut doc, id) = doc_with_image(Point::new(100.0, 100.0));
        let other = doc.add(
            ObjectKind::Text {
                content: "t".to_string(),
            },
            Point::new(700.0, 500.0),
            Size::new(50.0, 20.0),
        );
        recenter_all(&mut doc);
        assert_eq!(position(&doc, id), Point::new(400.0, 300.0));
        assert_eq!(position(&doc, other), Point::new(400.0, 300.0));
    }
}
