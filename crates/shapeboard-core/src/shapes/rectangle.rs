//! Rectangle shape.

use super::{
    GroupId, MIN_SHAPE_SIZE, Placement, SerializableColor, ShapeId, ShapeKind, ShapeMeta,
    ShapePatch, ShapeStyle, ShapeTrait,
};
use crate::geometry;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A rectangle anchored at its top-left corner (before rotation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    pub placement: Placement,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ShapeMeta>,
}

impl Rectangle {
    /// Width and height of a rectangle dropped from the palette.
    pub const DEFAULT_SIZE: f64 = 100.0;

    /// Create a palette-default rectangle (100×100, blue).
    pub fn new(id: ShapeId, position: Point) -> Self {
        Self::with_size(id, position, Self::DEFAULT_SIZE, Self::DEFAULT_SIZE)
    }

    /// Create a rectangle with an explicit size.
    pub fn with_size(id: ShapeId, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            placement: Placement::at(position),
            width,
            height,
            style: ShapeStyle::new(SerializableColor::new(0, 0, 255, 255)),
            group_id: None,
            meta: None,
        }
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn group_id(&self) -> Option<&GroupId> {
        self.group_id.as_ref()
    }

    fn set_group_id(&mut self, group_id: Option<GroupId>) {
        self.group_id = group_id;
    }

    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn hit_test(&self, point: Point) -> bool {
        geometry::point_in_rotated_rect(
            point,
            self.placement.position,
            self.width * self.placement.scale_x,
            self.height * self.placement.scale_y,
            self.placement.rotation,
        )
    }

    fn normalize_transform(&mut self, scale_x: f64, scale_y: f64, min_size: f64) {
        self.width = (self.width * scale_x).abs().max(min_size);
        self.height = (self.height * scale_y).abs().max(min_size);
        self.placement.reset_scale(scale_x, scale_y);
    }

    fn apply_patch(&mut self, patch: &ShapePatch) {
        patch.apply_common(&mut self.placement, &mut self.style, &mut self.group_id, &mut self.meta);
        if let Some(width) = patch.width {
            self.width = width.max(MIN_SHAPE_SIZE);
        }
        if let Some(height) = patch.height {
            self.height = height.max(MIN_SHAPE_SIZE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new("rectangle_1".into(), Point::new(10.0, 20.0));
        assert!((rect.placement.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.placement.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 100.0).abs() < f64::EPSILON);
        assert!((rect.placement.scale_x - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let rect = Rectangle::with_size("r".into(), Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(rect.hit_test(Point::new(50.0, 50.0)));
        assert!(rect.hit_test(Point::new(100.0, 100.0)));
        assert!(!rect.hit_test(Point::new(150.0, 50.0)));
    }

    #[test]
    fn test_hit_test_rotated() {
        let mut rect = Rectangle::with_size("r".into(), Point::new(0.0, 0.0), 100.0, 10.0);
        rect.placement.rotation = 90.0;
        // Now extends downward from the anchor.
        assert!(rect.hit_test(Point::new(-5.0, 80.0)));
        assert!(!rect.hit_test(Point::new(80.0, 5.0)));
    }

    #[test]
    fn test_bounds() {
        let rect = Rectangle::with_size("r".into(), Point::new(10.0, 20.0), 100.0, 50.0);
        let bounds = rect.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_transform() {
        let mut rect = Rectangle::with_size("r".into(), Point::ZERO, 100.0, 50.0);
        rect.normalize_transform(1.5, 0.02, MIN_SHAPE_SIZE);
        assert!((rect.width - 150.0).abs() < 1e-9);
        assert!((rect.height - MIN_SHAPE_SIZE).abs() < f64::EPSILON);
        assert!((rect.placement.scale_x - 1.0).abs() < f64::EPSILON);
        assert!((rect.placement.scale_y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_keeps_mirror() {
        let mut rect = Rectangle::with_size("r".into(), Point::ZERO, 100.0, 50.0);
        rect.normalize_transform(-2.0, 1.0, MIN_SHAPE_SIZE);
        assert!((rect.width - 200.0).abs() < f64::EPSILON);
        assert!((rect.placement.scale_x + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_floors_size() {
        let mut rect = Rectangle::new("r".into(), Point::ZERO);
        rect.apply_patch(&ShapePatch::default().with_size(1.0, 40.0));
        assert!((rect.width - MIN_SHAPE_SIZE).abs() < f64::EPSILON);
        assert!((rect.height - 40.0).abs() < f64::EPSILON);
    }
}
