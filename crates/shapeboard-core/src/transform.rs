//! Commits for move/resize gestures and the multi-shape commands (align,
//! distribute, flip, delete, group, cut and paste).
//!
//! Everything here works on a document plus the current selection and leaves
//! undo bookkeeping to [`Canvas`](crate::canvas::Canvas).

use crate::canvas::CanvasDocument;
use crate::error::{CanvasResult, Rejection};
use crate::geometry::{self, Axis};
use crate::selection::Selection;
use crate::shapes::{GroupId, Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Node attributes reported at the end of a resize/rotate gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformSample {
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Edge that `align` lines shapes up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Store the final anchor of a dragged shape.
pub fn commit_move(doc: &mut CanvasDocument, id: &str, position: Point) -> bool {
    match doc.get_shape_mut(id) {
        Some(shape) => {
            shape.set_position(position);
            true
        }
        None => {
            log::debug!("commit_move: no shape with id {}", id);
            false
        }
    }
}

/// Bake a resize/rotate gesture into the shape: sizes absorb the scale
/// (floored at `min_size`), rotation is stored verbatim and the scale drops
/// back to ±1.
pub fn commit_transform(
    doc: &mut CanvasDocument,
    id: &str,
    sample: &TransformSample,
    min_size: f64,
) -> bool {
    let Some(shape) = doc.get_shape_mut(id) else {
        log::debug!("commit_transform: no shape with id {}", id);
        return false;
    };
    let placement = shape.placement_mut();
    placement.position = sample.position;
    placement.rotation = sample.rotation;
    shape.normalize_transform(sample.scale_x, sample.scale_y, min_size);
    log::debug!(
        "Transformed {} (scale {:.3} x {:.3}, rotation {:.1})",
        id,
        sample.scale_x,
        sample.scale_y,
        sample.rotation
    );
    true
}

/// Union of the client rects of `ids`.
pub fn bounding_box<'a>(doc: &CanvasDocument, ids: impl IntoIterator<Item = &'a ShapeId>) -> Option<Rect> {
    geometry::bounding_box_of(
        ids.into_iter()
            .filter_map(|id| doc.get_shape(id))
            .map(Shape::bounds),
    )
}

/// The selection plus every member of any group it touches, back to front.
pub fn expand_groups(doc: &CanvasDocument, selection: &Selection) -> Vec<ShapeId> {
    let groups: HashSet<&GroupId> = selection
        .iter()
        .filter_map(|id| doc.get_shape(id).and_then(Shape::group_id))
        .collect();
    doc.shapes_ordered()
        .filter(|shape| {
            selection.contains(shape.id())
                || shape.group_id().is_some_and(|group| groups.contains(group))
        })
        .map(|shape| shape.id().clone())
        .collect()
}

/// Translate the selection, and the groups it belongs to, by `delta`.
/// Returns the number of shapes moved.
pub fn move_selection(doc: &mut CanvasDocument, selection: &Selection, delta: Vec2) -> usize {
    let ids = expand_groups(doc, selection);
    for id in &ids {
        if let Some(shape) = doc.get_shape_mut(id) {
            shape.translate(delta);
        }
    }
    ids.len()
}

/// Move the selection so its bounding box starts at `origin`.
pub fn set_selection_origin(doc: &mut CanvasDocument, selection: &Selection, origin: Point) -> bool {
    let ids = expand_groups(doc, selection);
    let Some(bounds) = bounding_box(doc, &ids) else {
        log::debug!("set_selection_origin: nothing selected");
        return false;
    };
    let delta = origin - bounds.origin();
    if delta == Vec2::ZERO {
        return false;
    }
    move_selection(doc, selection, delta) > 0
}

/// Line selected shapes up on the outermost edge of the group.
///
/// Empty selections are a no-op. Returns whether anything moved.
pub fn align(doc: &mut CanvasDocument, selection: &Selection, edge: AlignEdge) -> bool {
    let Some(bounds) = bounding_box(doc, selection.iter()) else {
        log::debug!("align: nothing selected");
        return false;
    };
    let mut moved = false;
    for id in selection.iter() {
        let Some(shape) = doc.get_shape_mut(id) else {
            continue;
        };
        let own = shape.bounds();
        let delta = match edge {
            AlignEdge::Left => Vec2::new(bounds.x0 - own.x0, 0.0),
            AlignEdge::Right => Vec2::new(bounds.x1 - own.x1, 0.0),
            AlignEdge::Top => Vec2::new(0.0, bounds.y0 - own.y0),
            AlignEdge::Bottom => Vec2::new(0.0, bounds.y1 - own.y1),
        };
        if delta != Vec2::ZERO {
            shape.translate(delta);
            moved = true;
        }
    }
    log::debug!("Aligned {} shape(s) {:?}", selection.len(), edge);
    moved
}

/// Space selected shapes evenly along `axis`, keeping the outermost extents.
///
/// The first shape (by client-rect start) stays put; the others are laid out
/// with equal gaps so the span from the smallest start to the largest end is
/// preserved.
pub fn distribute(doc: &mut CanvasDocument, selection: &Selection, axis: Axis) -> CanvasResult<()> {
    let mut items: Vec<(ShapeId, Rect)> = selection
        .iter()
        .filter_map(|id| doc.get_shape(id).map(|s| (id.clone(), s.bounds())))
        .collect();
    if items.len() < 2 {
        let rejection = Rejection::TooFewToDistribute { selected: items.len() };
        log::warn!("{}", rejection);
        return Err(rejection);
    }
    if items.len() == 2 {
        // Both shapes already sit at the ends of the span.
        return Ok(());
    }

    items.sort_by(|(_, a), (_, b)| axis.span(*a).0.total_cmp(&axis.span(*b).0));
    let start = items.iter().map(|(_, r)| axis.span(*r).0).fold(f64::INFINITY, f64::min);
    let end = items.iter().map(|(_, r)| axis.span(*r).1).fold(f64::NEG_INFINITY, f64::max);
    let total: f64 = items
        .iter()
        .map(|(_, r)| {
            let (s, e) = axis.span(*r);
            e - s
        })
        .sum();
    let gap = (end - start - total) / (items.len() - 1) as f64;

    let mut cursor = start;
    for (id, rect) in &items {
        let (s, e) = axis.span(*rect);
        if let Some(shape) = doc.get_shape_mut(id) {
            shape.translate(axis.vector(cursor - s));
        }
        cursor += (e - s) + gap;
    }
    log::debug!("Distributed {} shapes along {:?} with gap {:.2}", items.len(), axis, gap);
    Ok(())
}

/// Mirror selected shapes in place by negating their scale on `axis`.
pub fn flip(doc: &mut CanvasDocument, selection: &Selection, axis: Axis) -> bool {
    let mut flipped = false;
    for id in selection.iter() {
        if let Some(shape) = doc.get_shape_mut(id) {
            let placement = shape.placement_mut();
            match axis {
                Axis::Horizontal => placement.scale_x = -placement.scale_x,
                Axis::Vertical => placement.scale_y = -placement.scale_y,
            }
            flipped = true;
        }
    }
    if !flipped {
        log::debug!("flip: nothing selected");
    }
    flipped
}

/// Clear the group id of shapes whose group has no other member.
fn dissolve_singleton_groups(doc: &mut CanvasDocument) {
    let mut counts: HashMap<GroupId, usize> = HashMap::new();
    for shape in doc.shapes.values() {
        if let Some(group) = shape.group_id() {
            *counts.entry(group.clone()).or_default() += 1;
        }
    }
    for shape in doc.shapes.values_mut() {
        if shape.group_id().is_some_and(|g| counts.get(g) == Some(&1)) {
            shape.set_group_id(None);
        }
    }
}

/// Remove every selected shape and clear the selection.
/// Returns the ids that were removed.
pub fn delete(doc: &mut CanvasDocument, selection: &mut Selection) -> Vec<ShapeId> {
    let removed: Vec<ShapeId> = selection
        .iter()
        .filter(|id| doc.remove_shape(id).is_some())
        .cloned()
        .collect();
    selection.clear();
    dissolve_singleton_groups(doc);
    removed
}

/// Put the selected shapes into a new group and clear the selection.
pub fn group(doc: &mut CanvasDocument, selection: &mut Selection) -> CanvasResult<GroupId> {
    let ids: Vec<ShapeId> = selection.iter().filter(|id| doc.contains(id)).cloned().collect();
    if ids.len() < 2 {
        let rejection = Rejection::NothingToGroup { selected: ids.len() };
        log::warn!("{}", rejection);
        return Err(rejection);
    }
    let group_id = format!("group-{}", Uuid::new_v4());
    for id in &ids {
        if let Some(shape) = doc.get_shape_mut(id) {
            shape.set_group_id(Some(group_id.clone()));
        }
    }
    selection.clear();
    // Shapes may have been pulled out of older groups.
    dissolve_singleton_groups(doc);
    Ok(group_id)
}

/// Dissolve every group the selection touches and clear the selection.
/// Returns the ids released from their groups.
pub fn ungroup(doc: &mut CanvasDocument, selection: &mut Selection) -> Vec<ShapeId> {
    let groups: HashSet<GroupId> = selection
        .iter()
        .filter_map(|id| doc.get_shape(id).and_then(Shape::group_id).cloned())
        .collect();
    let mut released = Vec::new();
    for group in &groups {
        for id in doc.group_members(group) {
            if let Some(shape) = doc.get_shape_mut(&id) {
                shape.set_group_id(None);
                released.push(id);
            }
        }
    }
    selection.clear();
    if released.is_empty() {
        log::debug!("ungroup: selection holds no groups");
    }
    released
}

/// Remove the selection, and the groups it touches, to hand it to a clipboard.
/// Shapes come back in z-order; the selection is cleared.
pub fn cut(doc: &mut CanvasDocument, selection: &mut Selection) -> Vec<Shape> {
    let ids = expand_groups(doc, selection);
    let shapes: Vec<Shape> = ids.iter().filter_map(|id| doc.remove_shape(id)).collect();
    selection.clear();
    dissolve_singleton_groups(doc);
    shapes
}

/// Insert copies of `clipboard` with fresh ids so their bounding box starts at
/// `at`. Groups inside the clipboard get fresh group ids. The pasted shapes
/// become the selection.
pub fn paste(
    doc: &mut CanvasDocument,
    selection: &mut Selection,
    clipboard: &[Shape],
    at: Point,
) -> Vec<ShapeId> {
    let Some(bounds) = geometry::bounding_box_of(clipboard.iter().map(Shape::bounds)) else {
        log::debug!("paste: clipboard is empty");
        return Vec::new();
    };
    let delta = at - bounds.origin();
    let mut groups: HashMap<GroupId, GroupId> = HashMap::new();
    let mut pasted = Vec::with_capacity(clipboard.len());
    for original in clipboard {
        let mut shape = original.clone();
        let id = doc.allocate_id(shape.kind());
        shape.set_id(id.clone());
        shape.translate(delta);
        let group = original
            .group_id()
            .map(|g| groups.entry(g.clone()).or_insert_with(|| format!("group-{}", Uuid::new_v4())).clone());
        shape.set_group_id(group);
        doc.add_shape(shape);
        pasted.push(id);
    }
    selection.set(pasted.clone());
    pasted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, MIN_SHAPE_SIZE, Rectangle, ShapeKind, Star};

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rectangle(Rectangle::with_size(id.into(), Point::new(x, y), w, h))
    }

    fn setup(shapes: Vec<Shape>) -> (CanvasDocument, Selection) {
        let mut doc = CanvasDocument::new();
        let mut selection = Selection::new();
        for shape in shapes {
            selection.add(shape.id().clone());
            doc.add_shape(shape);
        }
        (doc, selection)
    }

    fn x0(doc: &CanvasDocument, id: &str) -> f64 {
        doc.get_shape(id).unwrap().bounds().x0
    }

    #[test]
    fn test_commit_move() {
        let (mut doc, _) = setup(vec![rect("a", 0.0, 0.0, 10.0, 10.0)]);
        assert!(commit_move(&mut doc, "a", Point::new(30.0, 40.0)));
        assert_eq!(doc.get_shape("a").unwrap().position(), Point::new(30.0, 40.0));
        assert!(!commit_move(&mut doc, "missing", Point::ZERO));
    }

    #[test]
    fn test_commit_transform_normalizes_scale() {
        let (mut doc, _) = setup(vec![
            rect("r", 0.0, 0.0, 100.0, 50.0),
            Shape::Circle(Circle::new("c".into(), Point::new(300.0, 300.0))),
            Shape::Star(Star::new("s".into(), Point::new(600.0, 600.0))),
        ]);
        let sample = TransformSample {
            position: Point::new(5.0, 6.0),
            rotation: 30.0,
            scale_x: 2.0,
            scale_y: 0.01,
        };
        for id in ["r", "c", "s"] {
            assert!(commit_transform(&mut doc, id, &sample, MIN_SHAPE_SIZE));
            let shape = doc.get_shape(id).unwrap();
            let placement = shape.placement();
            assert!((placement.scale_x.abs() - 1.0).abs() < f64::EPSILON);
            assert!((placement.scale_y.abs() - 1.0).abs() < f64::EPSILON);
            assert!((placement.rotation - 30.0).abs() < f64::EPSILON);
            assert_eq!(placement.position, Point::new(5.0, 6.0));
        }

        match doc.get_shape("r").unwrap() {
            Shape::Rectangle(r) => {
                assert!((r.width - 200.0).abs() < f64::EPSILON);
                assert!((r.height - MIN_SHAPE_SIZE).abs() < f64::EPSILON);
            }
            other => panic!("unexpected {:?}", other.kind()),
        }
        match doc.get_shape("c").unwrap() {
            Shape::Circle(c) => assert!((c.radius - 50.0 * 1.005).abs() < 1e-9),
            other => panic!("unexpected {:?}", other.kind()),
        }
    }

    #[test]
    fn test_commit_transform_tiny_scale_floors() {
        let (mut doc, _) = setup(vec![rect("r", 0.0, 0.0, 100.0, 100.0)]);
        let sample = TransformSample {
            position: Point::ZERO,
            rotation: 0.0,
            scale_x: 0.001,
            scale_y: 0.001,
        };
        commit_transform(&mut doc, "r", &sample, MIN_SHAPE_SIZE);
        let bounds = doc.get_shape("r").unwrap().bounds();
        assert!((bounds.width() - MIN_SHAPE_SIZE).abs() < f64::EPSILON);
        assert!((bounds.height() - MIN_SHAPE_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_move_selection_takes_group_along() {
        let (mut doc, _) = setup(vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 50.0, 0.0, 10.0, 10.0),
            rect("c", 100.0, 0.0, 10.0, 10.0),
        ]);
        let mut both = Selection::new();
        both.set(vec!["a".into(), "b".into()]);
        group(&mut doc, &mut both).unwrap();

        let mut selection = Selection::new();
        selection.add("a".into());
        assert_eq!(move_selection(&mut doc, &selection, Vec2::new(5.0, 0.0)), 2);
        assert!((x0(&doc, "a") - 5.0).abs() < f64::EPSILON);
        assert!((x0(&doc, "b") - 55.0).abs() < f64::EPSILON);
        assert!((x0(&doc, "c") - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_selection_origin() {
        let (mut doc, selection) = setup(vec![
            rect("a", 10.0, 20.0, 10.0, 10.0),
            Shape::Circle(Circle::new("c".into(), Point::new(100.0, 100.0))),
        ]);
        assert!(set_selection_origin(&mut doc, &selection, Point::new(0.0, 0.0)));
        let bounds = bounding_box(&doc, selection.iter()).unwrap();
        assert!(bounds.x0.abs() < f64::EPSILON);
        assert!(bounds.y0.abs() < f64::EPSILON);
        assert!((x0(&doc, "c") - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_align_left_idempotent() {
        let (mut doc, selection) = setup(vec![
            rect("a", 30.0, 0.0, 10.0, 10.0),
            Shape::Circle(Circle::new("c".into(), Point::new(100.0, 100.0))),
            rect("b", 10.0, 50.0, 40.0, 10.0),
        ]);
        assert!(align(&mut doc, &selection, AlignEdge::Left));
        for id in ["a", "b", "c"] {
            assert!((x0(&doc, id) - 10.0).abs() < f64::EPSILON);
        }
        // Circle anchor is its center.
        assert!((doc.get_shape("c").unwrap().position().x - 60.0).abs() < f64::EPSILON);

        assert!(!align(&mut doc, &selection, AlignEdge::Left));
        for id in ["a", "b", "c"] {
            assert!((x0(&doc, id) - 10.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_align_right_uses_right_edges() {
        let (mut doc, selection) = setup(vec![
            rect("a", 0.0, 0.0, 100.0, 10.0),
            rect("b", 50.0, 20.0, 10.0, 10.0),
        ]);
        align(&mut doc, &selection, AlignEdge::Right);
        let b = doc.get_shape("b").unwrap().bounds();
        assert!((b.x1 - 100.0).abs() < f64::EPSILON);
        assert!((x0(&doc, "a") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_align_bottom() {
        let (mut doc, selection) = setup(vec![
            rect("a", 0.0, 0.0, 10.0, 100.0),
            rect("b", 20.0, 10.0, 10.0, 10.0),
        ]);
        align(&mut doc, &selection, AlignEdge::Bottom);
        let b = doc.get_shape("b").unwrap().bounds();
        assert!((b.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_align_empty_selection() {
        let (mut doc, _) = setup(vec![rect("a", 30.0, 0.0, 10.0, 10.0)]);
        assert!(!align(&mut doc, &Selection::new(), AlignEdge::Top));
        assert!((x0(&doc, "a") - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distribute_requires_two() {
        let (mut doc, selection) = setup(vec![rect("a", 0.0, 0.0, 10.0, 10.0)]);
        let result = distribute(&mut doc, &selection, Axis::Horizontal);
        assert_eq!(result, Err(Rejection::TooFewToDistribute { selected: 1 }));
        assert!(x0(&doc, "a").abs() < f64::EPSILON);
    }

    #[test]
    fn test_distribute_two_unchanged() {
        let (mut doc, selection) = setup(vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 70.0, 0.0, 20.0, 10.0),
        ]);
        distribute(&mut doc, &selection, Axis::Horizontal).unwrap();
        assert!(x0(&doc, "a").abs() < f64::EPSILON);
        assert!((x0(&doc, "b") - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distribute_equal_gaps() {
        let (mut doc, selection) = setup(vec![
            rect("c", 200.0, 0.0, 20.0, 10.0),
            rect("a", 0.0, 0.0, 20.0, 10.0),
            rect("b", 30.0, 0.0, 20.0, 10.0),
            rect("d", 80.0, 0.0, 20.0, 10.0),
        ]);
        distribute(&mut doc, &selection, Axis::Horizontal).unwrap();
        // Span 0..220, extents 80, three gaps of 140/3.
        let gap = 140.0 / 3.0;
        let mut starts: Vec<f64> = ["a", "b", "d", "c"].iter().map(|id| x0(&doc, id)).collect();
        starts.sort_by(f64::total_cmp);
        for pair in starts.windows(2) {
            assert!((pair[1] - pair[0] - (20.0 + gap)).abs() < 1e-9);
        }
        assert!(starts[0].abs() < 1e-9);
        assert!((starts[3] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_distribute_vertical_center_anchored() {
        let (mut doc, selection) = setup(vec![
            Shape::Circle(Circle::with_radius("a".into(), Point::new(0.0, 10.0), 10.0)),
            Shape::Circle(Circle::with_radius("b".into(), Point::new(0.0, 30.0), 10.0)),
            Shape::Circle(Circle::with_radius("c".into(), Point::new(0.0, 110.0), 10.0)),
        ]);
        distribute(&mut doc, &selection, Axis::Vertical).unwrap();
        assert!((doc.get_shape("b").unwrap().position().y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_flip_horizontal() {
        let (mut doc, selection) = setup(vec![
            rect("a", 10.0, 20.0, 10.0, 10.0),
            rect("b", 50.0, 60.0, 10.0, 10.0),
        ]);
        assert!(flip(&mut doc, &selection, Axis::Horizontal));
        for (id, pos) in [("a", Point::new(10.0, 20.0)), ("b", Point::new(50.0, 60.0))] {
            let shape = doc.get_shape(id).unwrap();
            assert!((shape.placement().scale_x + 1.0).abs() < f64::EPSILON);
            assert!((shape.placement().scale_y - 1.0).abs() < f64::EPSILON);
            assert_eq!(shape.position(), pos);
        }
        assert!(!flip(&mut doc, &Selection::new(), Axis::Vertical));
    }

    #[test]
    fn test_delete_dissolves_singleton_group() {
        let (mut doc, mut selection) = setup(vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 20.0, 0.0, 10.0, 10.0),
        ]);
        group(&mut doc, &mut selection).unwrap();

        selection.add("a".into());
        let removed = delete(&mut doc, &mut selection);
        assert_eq!(removed, vec!["a"]);
        assert!(selection.is_empty());
        assert!(doc.get_shape("b").unwrap().group_id().is_none());
        assert!(doc.groups_are_consistent());
    }

    #[test]
    fn test_group_and_ungroup() {
        let (mut doc, mut selection) = setup(vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 20.0, 0.0, 10.0, 10.0),
        ]);
        let group_id = group(&mut doc, &mut selection).unwrap();
        assert!(group_id.starts_with("group-"));
        assert!(selection.is_empty());
        assert_eq!(doc.group_members(&group_id), vec!["a", "b"]);

        selection.add("b".into());
        let released = ungroup(&mut doc, &mut selection);
        assert_eq!(released.len(), 2);
        assert!(selection.is_empty());
        assert!(doc.shapes.values().all(|s| s.group_id().is_none()));
    }

    #[test]
    fn test_group_needs_two() {
        let (mut doc, mut selection) = setup(vec![rect("a", 0.0, 0.0, 10.0, 10.0)]);
        let result = group(&mut doc, &mut selection);
        assert_eq!(result, Err(Rejection::NothingToGroup { selected: 1 }));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_regroup_dissolves_old_group() {
        let (mut doc, mut selection) = setup(vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 20.0, 0.0, 10.0, 10.0),
            rect("c", 40.0, 0.0, 10.0, 10.0),
        ]);
        selection.set(vec!["a".into(), "b".into()]);
        group(&mut doc, &mut selection).unwrap();
        selection.set(vec!["b".into(), "c".into()]);
        group(&mut doc, &mut selection).unwrap();
        assert!(doc.get_shape("a").unwrap().group_id().is_none());
        assert!(doc.groups_are_consistent());
    }

    #[test]
    fn test_cut_takes_whole_group() {
        let (mut doc, mut selection) = setup(vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 20.0, 0.0, 10.0, 10.0),
            rect("c", 40.0, 0.0, 10.0, 10.0),
        ]);
        selection.set(vec!["a".into(), "b".into()]);
        group(&mut doc, &mut selection).unwrap();
        selection.set(vec!["a".into()]);

        let clipboard = cut(&mut doc, &mut selection);
        let ids: Vec<&str> = clipboard.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(selection.is_empty());
        assert_eq!(doc.len(), 1);
        assert!(doc.contains("c"));
    }

    #[test]
    fn test_paste_uses_fresh_ids() {
        let (mut doc, mut selection) = setup(vec![
            rect("rectangle_1", 0.0, 0.0, 10.0, 10.0),
            rect("rectangle_2", 20.0, 0.0, 10.0, 10.0),
        ]);
        doc.allocate_id(ShapeKind::Rectangle);
        doc.allocate_id(ShapeKind::Rectangle);
        group(&mut doc, &mut selection).unwrap();
        selection.set(vec!["rectangle_1".into()]);
        let clipboard = cut(&mut doc, &mut selection);
        let old_group = clipboard[0].group_id().cloned();

        let pasted = paste(&mut doc, &mut selection, &clipboard, Point::new(500.0, 300.0));
        assert_eq!(pasted, ["rectangle_3", "rectangle_4"]);
        assert_eq!(selection.ids(), ["rectangle_3", "rectangle_4"]);
        assert_eq!(doc.get_shape("rectangle_3").unwrap().position(), Point::new(500.0, 300.0));
        assert_eq!(doc.get_shape("rectangle_4").unwrap().position(), Point::new(520.0, 300.0));

        let group = doc.get_shape("rectangle_3").unwrap().group_id().cloned();
        assert!(group.is_some());
        assert_ne!(group, old_group);
        assert_eq!(doc.get_shape("rectangle_4").unwrap().group_id().cloned(), group);

        let again = paste(&mut doc, &mut selection, &clipboard, Point::new(800.0, 300.0));
        assert_eq!(again, ["rectangle_5", "rectangle_6"]);
        assert!(doc.groups_are_consistent());
    }

    #[test]
    fn test_paste_empty_clipboard() {
        let (mut doc, mut selection) = setup(vec![rect("a", 0.0, 0.0, 10.0, 10.0)]);
        assert!(paste(&mut doc, &mut selection, &[], Point::ZERO).is_empty());
        assert_eq!(doc.len(), 1);
        assert_eq!(selection.ids(), ["a"]);
    }
}
