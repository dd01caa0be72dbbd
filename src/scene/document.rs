use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::object::{ObjectId, ObjectKind, SceneObject};
use crate::config::SizeBounds;
use crate::geometry::{Color, LogicalSize, Point, Size};

pub type SceneResult<T> = std::result::Result<T, SceneError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("object {0:?} not found in document")]
    ObjectNotFound(ObjectId),
    #[error("reorder index {index} out of range for {len} objects")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Z-order slot for the replacement object in [`Document::replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerPlacement {
    /// Keep the removed object's z-order index.
    #[default]
    Preserve,
    BringToFront,
    SendToBack,
}

/// The authoritative in-memory document: a logical canvas size and an ordered
/// object list (index order = z-order, back to front).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    logical_size: LogicalSize,
    background_color: Color,
    objects: Vec<SceneObject>,
    next_id: u64,
}

impl Document {
    pub fn new(logical_size: LogicalSize) -> Self {
        Self {
            logical_size,
            background_color: Color::default(),
            objects: Vec::new(),
            next_id: 1,
        }
    }

    pub fn logical_size(&self) -> LogicalSize {
        self.logical_size
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id == id)
    }

    /// Appends an object at the top of the z-order and returns its id.
    pub fn add(&mut self, kind: ObjectKind, position: Point, intrinsic_size: Size) -> ObjectId {
        let id = self.allocate_id();
        self.objects
            .push(SceneObject::new(id, kind, position, intrinsic_size));
        self.enforce_text_above_images();
        id
    }

    /// Inserts a fully-built object, reassigning its id to stay unique.
    pub fn insert(&mut self, mut object: SceneObject) -> ObjectId {
        let id = self.allocate_id();
        object.id = id;
        self.objects.push(object);
        self.enforce_text_above_images();
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> SceneResult<SceneObject> {
        let index = self.index_of(id).ok_or(SceneError::ObjectNotFound(id))?;
        Ok(self.objects.remove(index))
    }

    /// Replaces `old_id` with `replacement`, keeping the z-order slot unless a
    /// different placement is requested. The text-above-images rule is
    /// re-established afterwards regardless of placement.
    pub fn replace(
        &mut self,
        old_id: ObjectId,
        mut replacement: SceneObject,
        placement: LayerPlacement,
    ) -> SceneResult<ObjectId> {
        let index = self
            .index_of(old_id)
            .ok_or(SceneError::ObjectNotFound(old_id))?;
        let id = self.allocate_id();
        replacement.id = id;

        self.objects.remove(index);
        let slot = match placement {
            LayerPlacement::Preserve => index.min(self.objects.len()),
            LayerPlacement::BringToFront => self.objects.len(),
            LayerPlacement::SendToBack => 0,
        };
        self.objects.insert(slot, replacement);
        self.enforce_text_above_images();
        Ok(id)
    }

    /// Moves an object to the given z-order index.
    pub fn reorder(&mut self, id: ObjectId, index: usize) -> SceneResult<()> {
        let len = self.objects.len();
        if index >= len {
            return Err(SceneError::IndexOutOfRange { index, len });
        }
        let current = self.index_of(id).ok_or(SceneError::ObjectNotFound(id))?;
        let object = self.objects.remove(current);
        self.objects.insert(index, object);
        Ok(())
    }

    /// Deep-copies an object with a fresh id, offset slightly so the copy is
    /// visible. Extension point for undo/redo-style flows.
    pub fn duplicate(&mut self, id: ObjectId) -> SceneResult<ObjectId> {
        let original = self
            .object(id)
            .ok_or(SceneError::ObjectNotFound(id))?
            .clone();
        let mut copy = original;
        copy.position = copy.position.translated(16.0, 16.0);
        Ok(self.insert(copy))
    }

    /// Clamps the requested size to `bounds` and applies it, returning the
    /// size actually stored. Object positions are untouched; geometry
    /// reconciliation is a separate, auditable step.
    pub fn set_logical_size(&mut self, width: u32, height: u32, bounds: &SizeBounds) -> LogicalSize {
        let applied = LogicalSize::new(bounds.clamp_width(width), bounds.clamp_height(height));
        if applied != self.logical_size {
            tracing::debug!(
                from = ?self.logical_size,
                to = ?applied,
                "logical size changed"
            );
        }
        self.logical_size = applied;
        applied
    }

    /// Stable-partitions the object list so every Text object renders above
    /// every Image object. Relative order inside each group is preserved;
    /// Shape objects keep their slots relative to images.
    fn enforce_text_above_images(&mut self) {
        let Some(highest_image) = self.objects.iter().rposition(SceneObject::is_image) else {
            return;
        };
        let misplaced: Vec<usize> = self.objects[..highest_image]
            .iter()
            .enumerate()
            .filter(|(_, object)| object.is_text())
            .map(|(index, _)| index)
            .collect();
        for index in misplaced.into_iter().rev() {
            let text = self.objects.remove(index);
            self.objects.push(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector;

    fn doc() -> Document {
        Document::new(LogicalSize::new(800, 600))
    }

    fn image_kind(url: &str) -> ObjectKind {
        ObjectKind::Image {
            source_url: url.to_string(),
            crop: None,
        }
    }

    fn text_kind(content: &str) -> ObjectKind {
        ObjectKind::Text {
            content: content.to_string(),
        }
    }

    fn kinds(doc: &Document) -> Vec<&'static str> {
        doc.objects()
            .iter()
            .map(|object| match object.kind {
                ObjectKind::Image { .. } => "image",
                ObjectKind::Text { .. } => "text",
                ObjectKind::Shape { .. } => "shape",
            })
            .collect()
    }

    #[test]
    fn add_assigns_increasing_ids_and_appends() {
        let mut doc = doc();
        let first = doc.add(
            image_kind("a"),
            Point::new(100.0, 100.0),
            Size::new(10.0, 10.0),
        );
        let second = doc.add(
            image_kind("b"),
            Point::new(200.0, 100.0),
            Size::new(10.0, 10.0),
        );
        assert!(second > first);
        assert_eq!(doc.objects().len(), 2);
        assert_eq!(doc.objects()[1].id, second);
    }

    #[test]
    fn set_logical_size_clamps_and_reports_applied_values() {
        let mut doc = doc();
        let bounds = SizeBounds::default();
        let applied = doc.set_logical_size(5_000, 10, &bounds);
        assert_eq!(applied, LogicalSize::new(1_200, 100));
        assert_eq!(doc.logical_size(), applied);
    }

    #[test]
    fn set_logical_size_does_not_move_objects() {
        let mut doc = doc();
        let id = doc.add(
            image_kind("a"),
            Point::new(400.0, 300.0),
            Size::new(10.0, 10.0),
        );
        doc.set_logical_size(1_000, 500, &SizeBounds::default());
        assert_eq!(
            doc.object(id).expect("object should exist").position,
            Point::new(400.0, 300.0)
        );
    }

    #[test]
    fn replace_preserves_z_order_slot_by_default() {
        let mut doc = doc();
        let bottom = doc.add(
            image_kind("bottom"),
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
        );
        let middle = doc.add(
            image_kind("middle"),
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
        );
        let top = doc.add(
            image_kind("top"),
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
        );

        let replacement = SceneObject::new(
            ObjectId(0),
            image_kind("cropped"),
            Point::new(0.0, 0.0),
            Size::new(5.0, 5.0),
        );
        let new_id = doc
            .replace(middle, replacement, LayerPlacement::Preserve)
            .expect("replace should succeed");

        assert_eq!(doc.objects()[0].id, bottom);
        assert_eq!(doc.objects()[1].id, new_id);
        assert_eq!(doc.objects()[2].id, top);
    }

    #[test]
    fn replace_respects_bring_to_front_and_send_to_back() {
        let mut doc = doc();
        let a = doc.add(image_kind("a"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));
        let _b = doc.add(image_kind("b"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));

        let replacement = SceneObject::new(
            ObjectId(0),
            image_kind("front"),
            Point::new(0.0, 0.0),
            Size::new(1.0, 1.0),
        );
        let front = doc
            .replace(a, replacement.clone(), LayerPlacement::BringToFront)
            .expect("replace should succeed");
        assert_eq!(doc.objects().last().expect("objects not empty").id, front);

        let back = doc
            .replace(front, replacement, LayerPlacement::SendToBack)
            .expect("replace should succeed");
        assert_eq!(doc.objects()[0].id, back);
    }

    #[test]
    fn text_stays_above_images_after_image_replace() {
        let mut doc = doc();
        let image = doc.add(image_kind("a"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));
        doc.add(text_kind("caption"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));

        // A front-placed image replacement must not end up above the text.
        let replacement = SceneObject::new(
            ObjectId(0),
            image_kind("cropped"),
            Point::new(0.0, 0.0),
            Size::new(1.0, 1.0),
        );
        doc.replace(image, replacement, LayerPlacement::BringToFront)
            .expect("replace should succeed");

        assert_eq!(kinds(&doc), vec!["image", "text"]);
    }

    #[test]
    fn text_added_before_images_is_lifted_above_them() {
        let mut doc = doc();
        doc.add(text_kind("early"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));
        doc.add(image_kind("a"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));
        doc.add(text_kind("late"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));

        assert_eq!(kinds(&doc), vec!["image", "text", "text"]);
        let contents: Vec<&str> = doc
            .objects()
            .iter()
            .filter_map(|object| match &object.kind {
                ObjectKind::Text { content } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        // Relative order among text objects is preserved.
        assert_eq!(contents, vec!["early", "late"]);
    }

    #[test]
    fn reorder_moves_object_and_validates_index() {
        let mut doc = doc();
        let a = doc.add(image_kind("a"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));
        let _b = doc.add(image_kind("b"), Point::new(0.0, 0.0), Size::new(1.0, 1.0));

        doc.reorder(a, 1).expect("reorder should succeed");
        assert_eq!(doc.objects()[1].id, a);

        let err = doc.reorder(a, 5).expect_err("out-of-range index should fail");
        assert_eq!(err, SceneError::IndexOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn remove_missing_object_reports_not_found() {
        let mut doc = doc();
        let err = doc
            .remove(ObjectId(99))
            .expect_err("missing object should fail");
        assert_eq!(err, SceneError::ObjectNotFound(ObjectId(99)));
    }

    #[test]
    fn duplicate_creates_offset_copy_with_fresh_id() {
        let mut doc = doc();
        let id = doc.add(
            image_kind("a"),
            Point::new(100.0, 100.0),
            Size::new(10.0, 10.0),
        );
        doc.object_mut(id).expect("object should exist").scale = Vector::uniform(2.0);

        let copy_id = doc.duplicate(id).expect("duplicate should succeed");
        assert_ne!(copy_id, id);
        let copy = doc.object(copy_id).expect("copy should exist");
        assert_eq!(copy.position, Point::new(116.0, 116.0));
        assert_eq!(copy.scale, Vector::uniform(2.0));
    }
}
