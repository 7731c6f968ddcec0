//! Circle shape.

use super::{
    GroupId, MIN_SHAPE_SIZE, Placement, SerializableColor, ShapeId, ShapeKind, ShapeMeta,
    ShapePatch, ShapeStyle, ShapeTrait,
};
use crate::geometry;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A circle anchored at its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    pub placement: Placement,
    pub radius: f64,
    pub style: ShapeStyle,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ShapeMeta>,
}

impl Circle {
    pub const DEFAULT_RADIUS: f64 = 50.0;

    /// Create a palette-default circle (radius 50, red).
    pub fn new(id: ShapeId, center: Point) -> Self {
        Self::with_radius(id, center, Self::DEFAULT_RADIUS)
    }

    pub fn with_radius(id: ShapeId, center: Point, radius: f64) -> Self {
        Self {
            id,
            placement: Placement::at(center),
            radius,
            style: ShapeStyle::new(SerializableColor::new(255, 0, 0, 255)),
            group_id: None,
            meta: None,
        }
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
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
        Rect::new(-self.radius, -self.radius, self.radius, self.radius)
    }

    fn hit_test(&self, point: Point) -> bool {
        let scale = geometry::average_scale(self.placement.scale_x, self.placement.scale_y);
        geometry::point_in_circle(point, self.placement.position, self.radius * scale)
    }

    fn normalize_transform(&mut self, scale_x: f64, scale_y: f64, min_size: f64) {
        let scale = geometry::average_scale(scale_x, scale_y);
        self.radius = (self.radius * scale).abs().max(min_size);
        self.placement.reset_scale(scale_x, scale_y);
    }

    fn apply_patch(&mut self, patch: &ShapePatch) {
        patch.apply_common(&mut self.placement, &mut self.style, &mut self.group_id, &mut self.meta);
        if let Some(radius) = patch.radius {
            self.radius = radius.max(MIN_SHAPE_SIZE);
        }
    }
}
