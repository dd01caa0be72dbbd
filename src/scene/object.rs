use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size, Vector};

/// Stable identifier for a scene object within its document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObjectId(pub u64);

/// Interpretation of an object's `position` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    #[default]
    Center,
    TopLeft,
}

/// Crop offsets into an image's intrinsic pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ObjectKind {
    Image {
        source_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        crop: Option<CropRegion>,
    },
    Text {
        content: String,
    },
    Shape {
        shape: ShapeKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
}

/// A positioned, scaled visual element owned by a [`Document`](super::Document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    #[serde(flatten)]
    pub kind: ObjectKind,
    pub position: Point,
    pub origin: Origin,
    pub scale: Vector,
    pub rotation_degrees: f64,
    pub intrinsic_size: Size,
    pub selectable: bool,
    pub interactive: bool,
}

impl SceneObject {
    pub fn new(id: ObjectId, kind: ObjectKind, position: Point, intrinsic_size: Size) -> Self {
        Self {
            id,
            kind,
            position,
            origin: Origin::Center,
            scale: Vector::uniform(1.0),
            rotation_degrees: 0.0,
            intrinsic_size,
            selectable: true,
            interactive: true,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ObjectKind::Text { .. })
    }

    /// On-canvas display size after scaling.
    pub fn display_size(&self) -> Size {
        Size::new(
            self.intrinsic_size.width * self.scale.x,
            self.intrinsic_size.height * self.scale.y,
        )
    }

    /// Axis-aligned bounding box in canvas coordinates. Rotation is ignored;
    /// interactive flows that need bounds (crop, clamping) operate on
    /// unrotated targets.
    pub fn bounding_box(&self) -> Rect {
        let size = self.display_size();
        match self.origin {
            Origin::Center => Rect::from_center(self.position, size),
            Origin::TopLeft => Rect::new(self.position.x, self.position.y, size.width, size.height),
        }
    }

    /// Recomputes scale so the object renders at `target`, anchored to the
    /// intrinsic size rather than compounding the current scale.
    pub fn set_display_size(&mut self, target: Size) {
        let width = self.intrinsic_size.width.max(f64::EPSILON);
        let height = self.intrinsic_size.height.max(f64::EPSILON);
        self.scale = Vector::new(target.width / width, target.height / height);
    }
}

/// Restorable subset of object properties, captured before a crop session
/// mutates the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectProps {
    pub position: Point,
    pub origin: Origin,
    pub scale: Vector,
    pub rotation_degrees: f64,
    pub selectable: bool,
    pub interactive: bool,
}

impl ObjectProps {
    pub fn capture(object: &SceneObject) -> Self {
        Self {
            position: object.position,
            origin: object.origin,
            scale: object.scale,
            rotation_degrees: object.rotation_degrees,
            selectable: object.selectable,
            interactive: object.interactive,
        }
    }

    pub fn restore(self, object: &mut SceneObject) {
        object.position = self.position;
        object.origin = self.origin;
        object.scale = self.scale;
        object.rotation_degrees = self.rotation_degrees;
        object.selectable = self.selectable;
        object.interactive = self.interactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_object(id: u64) -> SceneObject {
        SceneObject::new(
            ObjectId(id),
            ObjectKind::Image {
                source_url: "https://cdn.example/pic.png".to_string(),
                crop: None,
            },
            Point::new(200.0, 150.0),
            Size::new(400.0, 300.0),
        )
    }

    #[test]
    fn bounding_box_centers_on_position_for_center_origin() {
        let object = image_object(1);
        assert_eq!(object.bounding_box(), Rect::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn bounding_box_uses_position_as_corner_for_top_left_origin() {
        let mut object = image_object(1);
        object.origin = Origin::TopLeft;
        assert_eq!(
            object.bounding_box(),
            Rect::new(200.0, 150.0, 400.0, 300.0)
        );
    }

    #[test]
    fn set_display_size_recomputes_scale_from_intrinsic_size() {
        let mut object = image_object(1);
        object.scale = Vector::new(1.7, 0.3);
        object.set_display_size(Size::new(200.0, 150.0));
        assert_eq!(object.scale, Vector::new(0.5, 0.5));
        assert_eq!(object.display_size(), Size::new(200.0, 150.0));
    }

    #[test]
    fn props_capture_and_restore_round_trip() {
        let mut object = image_object(1);
        let saved = ObjectProps::capture(&object);

        object.position = Point::new(0.0, 0.0);
        object.scale = Vector::uniform(3.0);
        object.interactive = false;
        saved.restore(&mut object);

        assert_eq!(object.position, Point::new(200.0, 150.0));
        assert_eq!(object.scale, Vector::uniform(1.0));
        assert!(object.interactive);
    }
}
