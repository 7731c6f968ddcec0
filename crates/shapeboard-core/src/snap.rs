//! Snap functionality for aligning a dragged shape to guide lines.
//!
//! Guide stops come from the canvas (edges and center) and from every other
//! shape's client rect. While dragging, each of the moving shape's edges and its
//! center is compared with the stops; the closest match per axis within
//! [`GUIDELINE_OFFSET`] wins and becomes a visible guide.

use crate::canvas::CanvasDocument;
use crate::geometry::Axis;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Distance (world units) within which an edge snaps to a stop.
pub const GUIDELINE_OFFSET: f64 = 5.0;

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideOrientation {
    /// A vertical line at some x.
    Vertical,
    /// A horizontal line at some y.
    Horizontal,
}

impl GuideOrientation {
    /// The coordinate axis this guide constrains.
    pub fn axis(self) -> Axis {
        match self {
            GuideOrientation::Vertical => Axis::Horizontal,
            GuideOrientation::Horizontal => Axis::Vertical,
        }
    }
}

/// Which part of the dragged shape lines up with the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapEdge {
    Start,
    Center,
    End,
}

/// Candidate guide positions, per orientation, in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGuideStops {
    pub vertical: Vec<f64>,
    pub horizontal: Vec<f64>,
}

/// One snappable edge of the dragged shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappingEdge {
    /// Edge coordinate.
    pub guide: f64,
    /// Anchor coordinate minus edge coordinate.
    pub offset: f64,
    pub snap: SnapEdge,
}

/// Snappable edges of the dragged shape, per orientation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnappingEdges {
    pub vertical: Vec<SnappingEdge>,
    pub horizontal: Vec<SnappingEdge>,
}

/// A guide line to display and snap to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub orientation: GuideOrientation,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    /// Anchor offset of the matched edge.
    pub offset: f64,
    pub snap: SnapEdge,
}

fn rect_stops(start: f64, end: f64) -> [f64; 3] {
    [start, (start + end) / 2.0, end]
}

/// Collect guide stops: canvas edges and center first, then each shape in
/// `shapes` not listed in `skip`.
pub fn line_guide_stops<'a>(
    canvas: Size,
    shapes: impl IntoIterator<Item = &'a Shape>,
    skip: &[ShapeId],
) -> LineGuideStops {
    let mut stops = LineGuideStops {
        vertical: rect_stops(0.0, canvas.width).to_vec(),
        horizontal: rect_stops(0.0, canvas.height).to_vec(),
    };
    for shape in shapes {
        if skip.contains(shape.id()) {
            continue;
        }
        let bounds = shape.bounds();
        stops.vertical.extend(rect_stops(bounds.x0, bounds.x1));
        stops.horizontal.extend(rect_stops(bounds.y0, bounds.y1));
    }
    stops
}

/// Edges of `shape` that can snap, with the offset back to its anchor.
pub fn snapping_edges(shape: &Shape) -> SnappingEdges {
    let bounds = shape.bounds();
    let anchor = shape.position();
    let edges = |axis: Axis| {
        let (start, end) = axis.span(bounds);
        let anchor = axis.of_point(anchor);
        [SnapEdge::Start, SnapEdge::Center, SnapEdge::End]
            .into_iter()
            .zip(rect_stops(start, end))
            .map(|(snap, guide)| SnappingEdge {
                guide,
                offset: anchor - guide,
                snap,
            })
            .collect()
    };
    SnappingEdges {
        vertical: edges(Axis::Horizontal),
        horizontal: edges(Axis::Vertical),
    }
}

fn closest_match(
    orientation: GuideOrientation,
    stops: &[f64],
    edges: &[SnappingEdge],
    threshold: f64,
) -> Option<Guide> {
    let mut best: Option<(f64, Guide)> = None;
    for &stop in stops {
        for edge in edges {
            let diff = (stop - edge.guide).abs();
            // Strict comparisons keep the first candidate on ties.
            if diff < threshold && best.is_none_or(|(best_diff, _)| diff < best_diff) {
                best = Some((
                    diff,
                    Guide {
                        orientation,
                        position: stop,
                        offset: edge.offset,
                        snap: edge.snap,
                    },
                ));
            }
        }
    }
    best.map(|(_, guide)| guide)
}

/// Pick at most one guide per orientation: the closest stop/edge pair within
/// `threshold`.
pub fn find_guides(stops: &LineGuideStops, edges: &SnappingEdges, threshold: f64) -> Vec<Guide> {
    [
        closest_match(GuideOrientation::Vertical, &stops.vertical, &edges.vertical, threshold),
        closest_match(GuideOrientation::Horizontal, &stops.horizontal, &edges.horizontal, threshold),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Move `anchor` so the matched edges sit on their guides.
pub fn apply_guides(anchor: Point, guides: &[Guide]) -> Point {
    let mut snapped = anchor;
    for guide in guides {
        match guide.orientation {
            GuideOrientation::Vertical => snapped.x = guide.position + guide.offset,
            GuideOrientation::Horizontal => snapped.y = guide.position + guide.offset,
        }
    }
    snapped
}

/// Result of a snap operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// The (possibly) snapped anchor position.
    pub position: Point,
    /// Guides that matched.
    pub guides: Vec<Guide>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(position: Point) -> Self {
        Self {
            position,
            guides: Vec::new(),
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }
}

/// Snapping switch plus the guides currently on display.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapper {
    enabled: bool,
    threshold: f64,
    guides: Vec<Guide>,
}

impl Default for Snapper {
    fn default() -> Self {
        Self::new(true, GUIDELINE_OFFSET)
    }
}

impl Snapper {
    pub fn new(enabled: bool, threshold: f64) -> Self {
        Self {
            enabled,
            threshold,
            guides: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable snapping. Disabling hides the guides at once.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.guides.clear();
        }
        log::debug!("Snapping {}", if enabled { "on" } else { "off" });
    }

    /// Flip snapping on/off. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Guides currently shown.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Hide all guides (end of drag).
    pub fn clear(&mut self) {
        self.guides.clear();
    }

    /// Snap `moving` (already placed at its raw drag position) against the
    /// canvas and every shape in `document` except those in `skip`.
    ///
    /// When snapping is off the raw position passes through untouched and no
    /// stops are collected.
    pub fn snap_drag(
        &mut self,
        document: &CanvasDocument,
        moving: &Shape,
        skip: &[ShapeId],
        canvas: Size,
    ) -> SnapResult {
        if !self.enabled {
            self.guides.clear();
            return SnapResult::none(moving.position());
        }
        let stops = line_guide_stops(canvas, document.shapes_ordered(), skip);
        let edges = snapping_edges(moving);
        let guides = find_guides(&stops, &edges, self.threshold);
        let position = apply_guides(moving.position(), &guides);
        self.guides = guides.clone();
        SnapResult { position, guides }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Rectangle};

    const CANVAS: Size = Size::new(4000.0, 4000.0);

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rectangle(Rectangle::with_size(id.into(), Point::new(x, y), w, h))
    }

    fn two_touching() -> CanvasDocument {
        let mut doc = CanvasDocument::new();
        doc.add_shape(rect("a", 0.0, 0.0, 100.0, 100.0));
        doc.add_shape(rect("b", 100.0, 0.0, 100.0, 100.0));
        doc
    }

    #[test]
    fn test_canvas_stops_come_first() {
        let doc = two_touching();
        let stops = line_guide_stops(CANVAS, doc.shapes_ordered(), &[]);
        assert_eq!(&stops.vertical[..3], &[0.0, 2000.0, 4000.0]);
        assert_eq!(&stops.vertical[3..6], &[0.0, 50.0, 100.0]);
        assert_eq!(stops.vertical.len(), 9);
    }

    #[test]
    fn test_skip_excludes_shapes() {
        let doc = two_touching();
        let stops = line_guide_stops(CANVAS, doc.shapes_ordered(), &["a".to_string()]);
        assert_eq!(stops.vertical.len(), 6);
        assert!((stops.vertical[3] - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapping_edges_offsets() {
        let circle = Shape::Circle(Circle::new("c".into(), Point::new(100.0, 100.0)));
        let edges = snapping_edges(&circle);
        assert!((edges.vertical[0].guide - 50.0).abs() < f64::EPSILON);
        assert!((edges.vertical[0].offset - 50.0).abs() < f64::EPSILON);
        assert!(edges.vertical[1].offset.abs() < f64::EPSILON);
        assert!((edges.vertical[2].offset + 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_left_edge_snaps_to_neighbour() {
        let doc = two_touching();
        let dragged = rect("c", 99.0, 500.0, 60.0, 60.0);
        let mut snapper = Snapper::default();

        let result = snapper.snap_drag(&doc, &dragged, &["c".to_string()], CANVAS);
        assert!((result.position.x - 100.0).abs() < f64::EPSILON);
        assert!((result.position.y - 500.0).abs() < f64::EPSILON);
        assert_eq!(result.guides.len(), 1);
        assert_eq!(result.guides[0].orientation, GuideOrientation::Vertical);
        assert_eq!(result.guides[0].snap, SnapEdge::Start);
        assert_eq!(snapper.guides().len(), 1);
    }

    #[test]
    fn test_no_match_outside_threshold() {
        let doc = two_touching();
        let dragged = rect("c", 106.0, 500.0, 60.0, 60.0);
        let mut snapper = Snapper::default();
        let result = snapper.snap_drag(&doc, &dragged, &["c".to_string()], CANVAS);
        assert!(!result.is_snapped());
        assert_eq!(result.position, Point::new(106.0, 500.0));
    }

    #[test]
    fn test_one_guide_per_axis_closest_wins() {
        let stops = LineGuideStops {
            vertical: vec![10.0, 12.0],
            horizontal: vec![],
        };
        let edges = SnappingEdges {
            vertical: vec![SnappingEdge {
                guide: 11.5,
                offset: 0.0,
                snap: SnapEdge::Start,
            }],
            horizontal: vec![],
        };
        let guides = find_guides(&stops, &edges, GUIDELINE_OFFSET);
        assert_eq!(guides.len(), 1);
        assert!((guides[0].position - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tie_keeps_first_stop() {
        let stops = LineGuideStops {
            vertical: vec![10.0, 14.0],
            horizontal: vec![],
        };
        let edges = SnappingEdges {
            vertical: vec![SnappingEdge {
                guide: 12.0,
                offset: 0.0,
                snap: SnapEdge::Center,
            }],
            horizontal: vec![],
        };
        let guides = find_guides(&stops, &edges, GUIDELINE_OFFSET);
        assert!((guides[0].position - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_guides_uses_offset() {
        let guides = [Guide {
            orientation: GuideOrientation::Horizontal,
            position: 300.0,
            offset: -25.0,
            snap: SnapEdge::End,
        }];
        assert_eq!(apply_guides(Point::new(1.0, 2.0), &guides), Point::new(1.0, 275.0));
    }

    #[test]
    fn test_disabled_passes_through() {
        let doc = two_touching();
        let dragged = rect("c", 99.0, 500.0, 60.0, 60.0);
        let mut snapper = Snapper::new(false, GUIDELINE_OFFSET);
        let result = snapper.snap_drag(&doc, &dragged, &[], CANVAS);
        assert_eq!(result.position, Point::new(99.0, 500.0));
        assert!(snapper.guides().is_empty());
    }

    #[test]
    fn test_toggle_off_clears_guides() {
        let doc = two_touching();
        let dragged = rect("c", 99.0, 500.0, 60.0, 60.0);
        let mut snapper = Snapper::default();
        snapper.snap_drag(&doc, &dragged, &["c".to_string()], CANVAS);
        assert!(!snapper.guides().is_empty());

        assert!(!snapper.toggle());
        assert!(snapper.guides().is_empty());
        assert!(snapper.toggle());
    }
}
