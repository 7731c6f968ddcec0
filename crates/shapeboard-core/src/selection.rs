//! Hit-testing, marquee selection and the selection set.

use crate::canvas::CanvasDocument;
use crate::geometry;
use crate::input::Modifiers;
use crate::shapes::{GroupId, Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

impl CanvasDocument {
    /// Find shapes at a point (in world coordinates), front to back.
    pub fn shapes_at_point(&self, point: Point) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter(|id| self.shapes.get(*id).is_some_and(|s| s.hit_test(point)))
            .cloned()
            .collect()
    }

    /// Topmost shape containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .find(|id| self.shapes.get(*id).is_some_and(|s| s.hit_test(point)))
            .cloned()
    }

    /// Shapes whose client rect overlaps `rect`, back to front.
    ///
    /// A grouped shape is tested with its group's bounding box, so a group is
    /// either selected whole or not at all.
    pub fn marquee_select(&self, rect: Rect) -> Vec<ShapeId> {
        let rect = geometry::normalize_rect(rect.origin(), Point::new(rect.x1, rect.y1));
        let group_bounds = self.group_bounds();
        self.shapes_ordered()
            .filter(|shape| {
                let bounds = shape
                    .group_id()
                    .and_then(|group| group_bounds.get(group).copied())
                    .unwrap_or_else(|| shape.bounds());
                geometry::rects_overlap(rect, bounds)
            })
            .map(|shape| shape.id().clone())
            .collect()
    }

    /// Bounding box of every group.
    pub fn group_bounds(&self) -> HashMap<&GroupId, Rect> {
        let mut bounds: HashMap<&GroupId, Rect> = HashMap::new();
        for shape in self.shapes.values() {
            if let Some(group) = shape.group_id() {
                let rect = shape.bounds();
                bounds
                    .entry(group)
                    .and_modify(|acc| *acc = acc.union(rect))
                    .or_insert(rect);
            }
        }
        bounds
    }
}

/// The ordered set of selected shape ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeId> {
        self.ids.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection, dropping duplicates.
    pub fn set(&mut self, ids: Vec<ShapeId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Select exactly one shape.
    pub fn select_only(&mut self, id: ShapeId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add to selection.
    pub fn add(&mut self, id: ShapeId) {
        if !self.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|s| s != id);
    }

    /// Flip membership of `id`.
    pub fn toggle(&mut self, id: &str) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.ids.push(id.to_string());
        }
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&ShapeId) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    /// Apply a left click on shape `id`.
    ///
    /// Shift/Ctrl/Meta toggle membership. A plain click selects only `id`,
    /// unless it is already selected, in which case the selection is kept so
    /// the whole set can be dragged. Returns whether the selection changed.
    pub fn click(&mut self, id: &str, modifiers: Modifiers) -> bool {
        if modifiers.toggles_selection() {
            self.toggle(id);
            return true;
        }
        if self.contains(id) {
            return false;
        }
        self.select_only(id.to_string());
        true
    }

    /// Apply a right click. `target` is the shape under the pointer, if any.
    ///
    /// Returns the menu to open, anchored at `position`. A click on empty
    /// canvas opens nothing and leaves the selection alone.
    pub fn context_click(&mut self, target: Option<&ShapeId>, position: Point) -> Option<ContextMenu> {
        let target = target?;
        if !self.contains(target) {
            self.select_only(target.clone());
        }
        Some(ContextMenu {
            position,
            target: target.clone(),
        })
    }

    /// Whether every selected shape belongs to one and the same group.
    pub fn is_single_group(&self, document: &CanvasDocument) -> bool {
        let mut groups = self
            .ids
            .iter()
            .map(|id| document.get_shape(id).and_then(Shape::group_id));
        match groups.next() {
            Some(Some(first)) => groups.all(|g| g == Some(first)),
            _ => false,
        }
    }
}

/// Entries of the right-click menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextAction {
    AlignLeft,
    AlignRight,
    AlignTop,
    AlignBottom,
    DistributeHorizontal,
    DistributeVertical,
    FlipHorizontal,
    FlipVertical,
    Group,
    Ungroup,
    Cut,
    Paste,
    ToggleCrosshair,
    ToggleGridLines,
    ToggleSnapping,
    Delete,
}

/// An open context menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMenu {
    /// Screen position of the pointer when the menu was opened.
    pub position: Point,
    /// Shape that was right-clicked.
    pub target: ShapeId,
}

impl ContextMenu {
    /// Actions that make sense for the current selection. Paste is offered
    /// only while something has been cut.
    pub fn actions(&self, selection: &Selection, document: &CanvasDocument, can_paste: bool) -> Vec<ContextAction> {
        let mut actions = vec![
            ContextAction::AlignLeft,
            ContextAction::AlignRight,
            ContextAction::AlignTop,
            ContextAction::AlignBottom,
        ];
        if selection.len() >= 2 {
            actions.push(ContextAction::DistributeHorizontal);
            actions.push(ContextAction::DistributeVertical);
        }
        actions.push(ContextAction::FlipHorizontal);
        actions.push(ContextAction::FlipVertical);
        if selection.is_single_group(document) {
            actions.push(ContextAction::Ungroup);
        } else if selection.len() >= 2 {
            actions.push(ContextAction::Group);
        }
        actions.push(ContextAction::Cut);
        if can_paste {
            actions.push(ContextAction::Paste);
        }
        actions.push(ContextAction::ToggleCrosshair);
        actions.push(ContextAction::ToggleGridLines);
        actions.push(ContextAction::ToggleSnapping);
        actions.push(ContextAction::Delete);
        actions
    }
}

/// Rubber-band selection in progress (world coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarqueeState {
    /// Where the drag started.
    pub anchor: Point,
    /// Current pointer position.
    pub current: Point,
    /// Add the marquee hits to the existing selection instead of replacing it.
    pub additive: bool,
}

impl MarqueeState {
    pub fn begin(point: Point) -> Self {
        Self {
            anchor: point,
            current: point,
            additive: false,
        }
    }

    /// A marquee started with a selection modifier held.
    pub fn begin_additive(point: Point) -> Self {
        Self {
            additive: true,
            ..Self::begin(point)
        }
    }

    pub fn update(&mut self, point: Point) {
        self.current = point;
    }

    /// The normalized selection rectangle.
    pub fn rect(&self) -> Rect {
        geometry::normalize_rect(self.anchor, self.current)
    }

    /// A marquee that never moved is a plain click.
    pub fn is_click(&self) -> bool {
        self.anchor == self.current
    }
}

/// State for moving the selection by dragging.
#[derive(Debug, Clone)]
pub struct MultiMoveState {
    /// Shape under the pointer when the drag started; it drives snapping.
    pub primary: ShapeId,
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Original shapes state for preview/cancel (shape_id -> original shape).
    pub original_shapes: HashMap<ShapeId, Shape>,
}

impl MultiMoveState {
    /// Create a new multi-move state.
    pub fn new(primary: ShapeId, start_point: Point, original_shapes: HashMap<ShapeId, Shape>) -> Self {
        Self {
            primary,
            start_point,
            current_point: start_point,
            original_shapes,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Get the shape IDs being moved.
    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.original_shapes.keys().cloned().collect()
    }
}
