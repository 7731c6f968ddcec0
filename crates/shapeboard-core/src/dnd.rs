//! Palette drops: turning a dragged palette entry into a shape on the canvas.

use crate::canvas::CanvasDocument;
use crate::error::{CanvasResult, Rejection};
use crate::shapes::{Shape, ShapeId, ShapeKind, ShapePatch};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A palette entry released over the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropRequest {
    pub kind: ShapeKind,
    /// Drop location in world coordinates.
    pub point: Point,
    /// Image source carried by image drops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl DropRequest {
    pub fn new(kind: ShapeKind, point: Point) -> Self {
        Self { kind, point, src: None }
    }

    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }
}

/// Anchor that centers a default-sized `kind` on `point`.
pub fn drop_anchor(kind: ShapeKind, point: Point) -> Point {
    if Shape::is_center_anchored(kind) {
        point
    } else {
        let size = Shape::default_size(kind);
        point - Vec2::new(size.width / 2.0, size.height / 2.0)
    }
}

/// Create the default shape for `request`, centered on the drop point.
///
/// Dropping onto an existing shape is rejected and leaves the document as it was.
pub fn intake_drop(doc: &mut CanvasDocument, request: &DropRequest) -> CanvasResult<ShapeId> {
    if let Some(existing) = doc.hit_test(request.point) {
        let rejection = Rejection::DropOverlap {
            kind: request.kind,
            existing,
        };
        log::warn!("{}", rejection);
        return Err(rejection);
    }

    let id = doc.allocate_id(request.kind);
    let mut shape = Shape::new_default(request.kind, id.clone(), drop_anchor(request.kind, request.point));
    if let Some(src) = &request.src {
        shape.apply_patch(&ShapePatch {
            src: Some(src.clone()),
            ..ShapePatch::default()
        });
    }
    doc.add_shape(shape);
    log::info!(
        "Dropped {} at ({:.1}, {:.1})",
        id,
        request.point.x,
        request.point.y
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_rectangle_centered() {
        let mut doc = CanvasDocument::new();
        let id = intake_drop(&mut doc, &DropRequest::new(ShapeKind::Rectangle, Point::new(100.0, 100.0))).unwrap();
        assert_eq!(id, "rectangle_1");

        match doc.get_shape(&id).unwrap() {
            Shape::Rectangle(r) => {
                assert!((r.placement.position.x - 50.0).abs() < f64::EPSILON);
                assert!((r.placement.position.y - 50.0).abs() < f64::EPSILON);
                assert!((r.width - 100.0).abs() < f64::EPSILON);
                assert!((r.height - 100.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected {:?}", other.kind()),
        }
    }

    #[test]
    fn test_drop_circle_and_star_anchor_at_point() {
        let mut doc = CanvasDocument::new();
        let circle = intake_drop(&mut doc, &DropRequest::new(ShapeKind::Circle, Point::new(300.0, 300.0))).unwrap();
        let star = intake_drop(&mut doc, &DropRequest::new(ShapeKind::Star, Point::new(600.0, 300.0))).unwrap();
        assert_eq!(circle, "circle_1");
        assert_eq!(star, "star_2");
        assert_eq!(doc.get_shape(&circle).unwrap().position(), Point::new(300.0, 300.0));
        assert_eq!(doc.get_shape(&star).unwrap().position(), Point::new(600.0, 300.0));
    }

    #[test]
    fn test_drop_text_uses_text_box() {
        let mut doc = CanvasDocument::new();
        let id = intake_drop(&mut doc, &DropRequest::new(ShapeKind::Text, Point::new(100.0, 100.0))).unwrap();
        assert_eq!(doc.get_shape(&id).unwrap().position(), Point::new(50.0, 75.0));
    }

    #[test]
    fn test_drop_image_carries_src() {
        let mut doc = CanvasDocument::new();
        let request = DropRequest::new(ShapeKind::Image, Point::new(500.0, 500.0)).with_src("cat.png");
        let id = intake_drop(&mut doc, &request).unwrap();
        let image = doc.get_shape(&id).and_then(Shape::as_image).unwrap();
        assert_eq!(image.src, "cat.png");
    }

    #[test]
    fn test_drop_onto_shape_rejected() {
        let mut doc = CanvasDocument::new();
        intake_drop(&mut doc, &DropRequest::new(ShapeKind::Circle, Point::new(100.0, 100.0))).unwrap();

        let result = intake_drop(&mut doc, &DropRequest::new(ShapeKind::Rectangle, Point::new(120.0, 110.0)));
        assert_eq!(
            result,
            Err(Rejection::DropOverlap {
                kind: ShapeKind::Rectangle,
                existing: "circle_1".to_string(),
            })
        );
        assert_eq!(doc.len(), 1);

        // Id counter is untouched by the rejected drop.
        let next = intake_drop(&mut doc, &DropRequest::new(ShapeKind::Rectangle, Point::new(400.0, 400.0))).unwrap();
        assert_eq!(next, "rectangle_2");
    }

    #[test]
    fn test_drop_next_to_shape_accepted() {
        let mut doc = CanvasDocument::new();
        intake_drop(&mut doc, &DropRequest::new(ShapeKind::Rectangle, Point::new(100.0, 100.0))).unwrap();
        // Footprint overlaps but the drop point is outside.
        assert!(intake_drop(&mut doc, &DropRequest::new(ShapeKind::Rectangle, Point::new(160.0, 100.0))).is_ok());
        assert_eq!(doc.len(), 2);
    }
}
