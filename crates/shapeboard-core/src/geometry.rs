//! Geometry helpers shared by hit-testing, snapping and alignment.
//!
//! Rotations are in degrees (clockwise on screen, since y points down).

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// The x axis (left to right).
    Horizontal,
    /// The y axis (top to bottom).
    Vertical,
}

impl Axis {
    /// Pick the component of a point along this axis.
    pub fn of_point(self, point: Point) -> f64 {
        match self {
            Axis::Horizontal => point.x,
            Axis::Vertical => point.y,
        }
    }

    /// Start and end of a rect along this axis.
    pub fn span(self, rect: Rect) -> (f64, f64) {
        match self {
            Axis::Horizontal => (rect.x0, rect.x1),
            Axis::Vertical => (rect.y0, rect.y1),
        }
    }

    /// A vector of length `amount` along this axis.
    pub fn vector(self, amount: f64) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(amount, 0.0),
            Axis::Vertical => Vec2::new(0.0, amount),
        }
    }
}

/// Rotate a vector by `-rotation_deg` into a shape's local frame.
fn to_local(delta: Vec2, rotation_deg: f64) -> Vec2 {
    let (sin, cos) = (-rotation_deg.to_radians()).sin_cos();
    Vec2::new(delta.x * cos - delta.y * sin, delta.x * sin + delta.y * cos)
}

/// Check whether `point` lies in a rectangle anchored (top-left, pre-rotation) at
/// `origin` and rotated by `rotation_deg` around that anchor.
///
/// Negative width/height (a mirrored shape) extend to the left/up of the anchor.
pub fn point_in_rotated_rect(
    point: Point,
    origin: Point,
    width: f64,
    height: f64,
    rotation_deg: f64,
) -> bool {
    let local = to_local(point - origin, rotation_deg);
    let (x0, x1) = (width.min(0.0), width.max(0.0));
    let (y0, y1) = (height.min(0.0), height.max(0.0));
    local.x >= x0 && local.x <= x1 && local.y >= y0 && local.y <= y1
}

/// Check whether `point` lies within `radius` of `center`.
pub fn point_in_circle(point: Point, center: Point, radius: f64) -> bool {
    point.distance(center) <= radius.abs()
}

/// Star containment, approximated by the unrotated square around the outer radius.
pub fn point_in_star_bounds(point: Point, center: Point, outer_radius: f64) -> bool {
    let r = outer_radius.abs();
    point.x >= center.x - r
        && point.x <= center.x + r
        && point.y >= center.y - r
        && point.y <= center.y + r
}

/// Union of all rectangles, or `None` when there are none.
pub fn bounding_box_of<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects
        .into_iter()
        .map(|r| r.abs())
        .reduce(|acc, r| acc.union(r))
}

/// Build a rectangle with non-negative size from two drag corners.
pub fn normalize_rect(p0: Point, p1: Point) -> Rect {
    Rect::new(p0.x.min(p1.x), p0.y.min(p1.y), p0.x.max(p1.x), p0.y.max(p1.y))
}

/// Closed-interval intersection test. Rectangles sharing an edge overlap.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    !(b.x0 > a.x1 || b.x1 < a.x0 || b.y0 > a.y1 || b.y1 < a.y0)
}

/// Shift that brings `rect` inside `[0, area]` on both axes. A rect larger
/// than the area is pinned to the origin.
pub fn keep_inside(rect: Rect, area: Size) -> Vec2 {
    fn along(start: f64, end: f64, limit: f64) -> f64 {
        if start < 0.0 || end - start > limit {
            -start
        } else if end > limit {
            limit - end
        } else {
            0.0
        }
    }
    let rect = rect.abs();
    Vec2::new(along(rect.x0, rect.x1, area.width), along(rect.y0, rect.y1, area.height))
}

/// Affine map from a shape's local frame to world coordinates.
///
/// Order is translate, then rotate, then scale, so the anchor stays fixed while
/// the shape rotates and mirrors around it.
pub fn placement_transform(position: Point, rotation_deg: f64, scale_x: f64, scale_y: f64) -> Affine {
    Affine::translate(position.to_vec2())
        * Affine::rotate(rotation_deg.to_radians())
        * Affine::scale_non_uniform(scale_x, scale_y)
}

/// Axis-aligned bounds of a local rect mapped through a placement.
pub fn client_rect(local: Rect, transform: Affine) -> Rect {
    transform.transform_rect_bbox(local)
}

/// Mean of the absolute scale factors.
pub fn average_scale(scale_x: f64, scale_y: f64) -> f64 {
    (scale_x.abs() + scale_y.abs()) / 2.0
}
