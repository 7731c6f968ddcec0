//! Star shape.

use super::{
    GroupId, MIN_SHAPE_SIZE, Placement, SerializableColor, ShapeId, ShapeKind, ShapeMeta,
    ShapePatch, ShapeStyle, ShapeTrait,
};
use crate::geometry;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A star anchored at its center.
///
/// Hit-testing uses the square around the outer radius rather than the star
/// polygon, so the gaps between points still count as hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub(crate) id: ShapeId,
    pub placement: Placement,
    pub num_points: u32,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub style: ShapeStyle,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ShapeMeta>,
}

impl Star {
    pub const DEFAULT_POINTS: u32 = 5;
    pub const DEFAULT_INNER_RADIUS: f64 = 20.0;
    pub const DEFAULT_OUTER_RADIUS: f64 = 40.0;

    /// Create a palette-default star (5 points, radii 20/40, green).
    pub fn new(id: ShapeId, center: Point) -> Self {
        Self::with_radii(
            id,
            center,
            Self::DEFAULT_POINTS,
            Self::DEFAULT_INNER_RADIUS,
            Self::DEFAULT_OUTER_RADIUS,
        )
    }

    pub fn with_radii(
        id: ShapeId,
        center: Point,
        num_points: u32,
        inner_radius: f64,
        outer_radius: f64,
    ) -> Self {
        Self {
            id,
            placement: Placement::at(center),
            num_points,
            inner_radius,
            outer_radius,
            style: ShapeStyle::new(SerializableColor::new(0, 128, 0, 255)),
            group_id: None,
            meta: None,
        }
    }

    /// Vertices of the star polygon in world coordinates, alternating outer
    /// and inner, starting at the top.
    pub fn vertices(&self) -> Vec<Point> {
        let count = self.num_points.max(2) as usize * 2;
        let transform = self.placement.transform();
        (0..count)
            .map(|i| {
                let radius = if i % 2 == 0 { self.outer_radius } else { self.inner_radius };
                let angle = std::f64::consts::PI * i as f64 / self.num_points.max(2) as f64;
                transform * Point::new(radius * angle.sin(), -radius * angle.cos())
            })
            .collect()
    }
}

impl ShapeTrait for Star {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Star
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
        let r = self.outer_radius;
        Rect::new(-r, -r, r, r)
    }

    fn hit_test(&self, point: Point) -> bool {
        let scale = geometry::average_scale(self.placement.scale_x, self.placement.scale_y);
        geometry::point_in_star_bounds(point, self.placement.position, self.outer_radius * scale)
    }

    fn normalize_transform(&mut self, scale_x: f64, scale_y: f64, min_size: f64) {
        let scale = geometry::average_scale(scale_x, scale_y);
        self.outer_radius = (self.outer_radius * scale).abs().max(min_size);
        self.inner_radius = (self.inner_radius * scale).abs().min(self.outer_radius);
        self.placement.reset_scale(scale_x, scale_y);
    }

    fn apply_patch(&mut self, patch: &ShapePatch) {
        patch.apply_common(&mut self.placement, &mut self.style, &mut self.group_id, &mut self.meta);
        if let Some(num_points) = patch.num_points {
            self.num_points = num_points.max(2);
        }
        if let Some(outer) = patch.outer_radius.or(patch.radius) {
            self.outer_radius = outer.max(MIN_SHAPE_SIZE);
        }
        if let Some(inner) = patch.inner_radius {
            self.inner_radius = inner.max(0.0);
        }
    }
}
