//! Canvas document and state management.

use crate::camera::Camera;
use crate::config::CanvasConfig;
use crate::dnd::{self, DropRequest};
use crate::error::CanvasResult;
use crate::geometry::{self, Axis};
use crate::gesture::Gesture;
use crate::selection::{ContextAction, ContextMenu, Selection};
use crate::shapes::{GroupId, Shape, ShapeId, ShapeKind, ShapePatch};
use crate::snap::Snapper;
use crate::transform::{self, AlignEdge, TransformSample};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Default number of undo states to keep.
const DEFAULT_UNDO_LIMIT: usize = 50;

fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}

fn first_shape_number() -> u64 {
    1
}

/// A snapshot of document state for undo/redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// All shapes in the snapshot.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes.
    z_order: Vec<ShapeId>,
}

/// A canvas document containing all shapes and state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All shapes in the document, keyed by ID.
    pub shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    pub z_order: Vec<ShapeId>,
    /// Number used for the next allocated shape id. Never rolled back by undo.
    #[serde(default = "first_shape_number")]
    next_shape_number: u64,
    /// Undo history stack.
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    /// Redo history stack.
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
    #[serde(skip, default = "default_undo_limit")]
    undo_limit: usize,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            shapes: HashMap::new(),
            z_order: Vec::new(),
            next_shape_number: first_shape_number(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }

    /// Set how many undo states are kept.
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self
    }

    /// Take a snapshot of the current document state.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            shapes: self.shapes.clone(),
            z_order: self.z_order.clone(),
        }
    }

    /// Push a previously taken snapshot onto the undo stack.
    pub fn push_snapshot(&mut self, snapshot: DocumentSnapshot) {
        self.undo_stack.push(snapshot);

        // Clear redo stack when new changes are made
        self.redo_stack.clear();

        if self.undo_stack.len() > self.undo_limit {
            let excess = self.undo_stack.len() - self.undo_limit;
            self.undo_stack.drain(..excess);
        }
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.push_snapshot(snapshot);
    }

    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.shapes = snapshot.shapes;
        self.z_order = snapshot.z_order;
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.undo_stack.pop() {
            let current = self.snapshot();
            self.redo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.redo_stack.pop() {
            let current = self.snapshot();
            self.undo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Allocate the next shape id for `kind`, e.g. `rectangle_1`.
    ///
    /// One counter is shared by all kinds, so ids are never reused.
    pub fn allocate_id(&mut self, kind: ShapeKind) -> ShapeId {
        let id = format!("{}_{}", kind.name(), self.next_shape_number);
        self.next_shape_number += 1;
        id
    }

    /// Bump the id counter past every numeric suffix already in use.
    pub(crate) fn reconcile_id_counter(&mut self) {
        let highest = self
            .shapes
            .keys()
            .filter_map(|id| id.rsplit_once('_'))
            .filter_map(|(_, n)| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.next_shape_number = self.next_shape_number.max(highest + 1);
    }

    /// Add a shape to the document (on top of the z-order).
    pub fn add_shape(&mut self, shape: Shape) {
        let id = shape.id().clone();
        debug_assert!(!self.shapes.contains_key(&id), "duplicate shape id {id}");
        self.z_order.retain(|existing| existing != &id);
        self.z_order.push(id.clone());
        self.shapes.insert(id, shape);
    }

    /// Remove a shape from the document.
    pub fn remove_shape(&mut self, id: &str) -> Option<Shape> {
        self.z_order.retain(|shape_id| shape_id != id);
        self.shapes.remove(id)
    }

    /// Clear all shapes from the document.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shapes.contains_key(id)
    }

    /// Apply a partial update to a shape.
    ///
    /// Returns false (and changes nothing) when `id` is unknown.
    pub fn update_shape(&mut self, id: &str, patch: &ShapePatch) -> bool {
        match self.shapes.get_mut(id) {
            Some(shape) => {
                shape.apply_patch(patch);
                true
            }
            None => {
                log::debug!("update_shape: no shape with id {}", id);
                false
            }
        }
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Ids of every shape in `group_id`, back to front.
    pub fn group_members(&self, group_id: &GroupId) -> Vec<ShapeId> {
        self.shapes_ordered()
            .filter(|s| s.group_id() == Some(group_id))
            .map(|s| s.id().clone())
            .collect()
    }

    /// Bring a shape to the front (topmost).
    pub fn bring_to_front(&mut self, id: &str) {
        if let Some(pos) = self.z_order.iter().position(|shape_id| shape_id == id) {
            let id = self.z_order.remove(pos);
            self.z_order.push(id);
        }
    }

    /// Send a shape to the back (bottommost).
    pub fn send_to_back(&mut self, id: &str) {
        if let Some(pos) = self.z_order.iter().position(|shape_id| shape_id == id) {
            let id = self.z_order.remove(pos);
            self.z_order.insert(0, id);
        }
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        crate::geometry::bounding_box_of(self.shapes.values().map(Shape::bounds))
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.reconcile_id_counter();
        Ok(doc)
    }

    /// Check the group rule: every group has at least two members.
    pub(crate) fn groups_are_consistent(&self) -> bool {
        let mut counts: HashMap<&GroupId, usize> = HashMap::new();
        for shape in self.shapes.values() {
            if let Some(group) = shape.group_id() {
                *counts.entry(group).or_default() += 1;
            }
        }
        counts.values().all(|&n| n >= 2)
    }
}

/// Runtime canvas state (not persisted).
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Camera for view transform.
    pub camera: Camera,
    /// Currently selected shape IDs.
    pub selection: Selection,
    /// Guide snapping state.
    pub snapper: Snapper,
    /// Pointer gesture in progress.
    pub gesture: Gesture,
    /// Open context menu, if any.
    pub context_menu: Option<ContextMenu>,
    /// Shapes removed by the last cut, waiting to be pasted.
    pub clipboard: Vec<Shape>,
    /// Draw crosshair lines through the pointer.
    pub crosshair: bool,
    /// Draw the background grid.
    pub grid_lines: bool,
    /// Last pointer position in world coordinates.
    pub pointer: Option<Point>,
    /// Viewport size.
    pub viewport_size: Size,
    pub config: CanvasConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    /// Create a new canvas with an empty document and the given limits.
    pub fn with_config(config: CanvasConfig) -> Self {
        Self::with_document(CanvasDocument::new(), config)
    }

    /// Create a canvas with an existing document.
    pub fn with_document(document: CanvasDocument, config: CanvasConfig) -> Self {
        Self {
            document: document.with_undo_limit(config.undo_limit),
            camera: Camera::from_config(&config),
            selection: Selection::new(),
            snapper: Snapper::new(config.snapping, config.guideline_offset),
            gesture: Gesture::Idle,
            context_menu: None,
            clipboard: Vec::new(),
            crosshair: false,
            grid_lines: false,
            pointer: None,
            viewport_size: config.viewport_size(),
            config,
        }
    }

    /// Set the viewport size and re-clamp the pan.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
        self.camera.clamp_pan(self.viewport_size, self.canvas_size());
    }

    /// Size of the bounded drawing area.
    pub fn canvas_size(&self) -> Size {
        self.config.canvas_size()
    }

    /// Run a document edit, recording an undo step only when it reports a change.
    pub(crate) fn record<T>(
        &mut self,
        op: impl FnOnce(&mut CanvasDocument, &mut Selection) -> T,
        changed: impl FnOnce(&T) -> bool,
    ) -> T {
        let before = self.document.snapshot();
        let result = op(&mut self.document, &mut self.selection);
        if changed(&result) {
            self.document.push_snapshot(before);
        }
        debug_assert!(self.document.groups_are_consistent(), "group left with a single member");
        result
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.camera.screen_to_world(screen_point)
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.camera.world_to_screen(world_point)
    }

    /// Pan by a screen-space delta, clamped to the canvas.
    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta, self.viewport_size, self.canvas_size());
    }

    /// Zoom to `zoom`, keeping the world point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, zoom: f64) -> CanvasResult<()> {
        self.camera.set_zoom_at(screen_point, zoom)
    }

    /// Drop a palette shape at a world point.
    pub fn drop_shape(&mut self, request: &DropRequest) -> CanvasResult<ShapeId> {
        self.record(|doc, _| dnd::intake_drop(doc, request), Result::is_ok)
    }

    /// Drop a palette shape at a screen point.
    pub fn drop_at_screen(&mut self, kind: ShapeKind, screen_point: Point) -> CanvasResult<ShapeId> {
        let request = DropRequest::new(kind, self.screen_to_world(screen_point));
        self.drop_shape(&request)
    }

    /// Apply a partial update to one shape. Unknown ids are ignored.
    pub fn update_shape(&mut self, id: &str, patch: &ShapePatch) -> bool {
        if !self.document.contains(id) {
            log::debug!("update_shape: no shape with id {}", id);
            return false;
        }
        self.record(|doc, _| doc.update_shape(id, patch), |changed| *changed)
    }

    /// Topmost shape under a world point.
    pub fn hit_test(&self, world_point: Point) -> Option<ShapeId> {
        self.document.hit_test(world_point)
    }

    /// Replace the selection with every shape the marquee touches.
    pub fn marquee_select(&mut self, rect: Rect) -> &Selection {
        let ids = self.document.marquee_select(rect);
        log::debug!("Marquee selected {} shape(s)", ids.len());
        self.selection.set(ids);
        &self.selection
    }

    /// Add every shape the marquee touches to the current selection.
    pub fn marquee_extend(&mut self, rect: Rect) -> &Selection {
        let ids = self.document.marquee_select(rect);
        log::debug!("Marquee added {} shape(s)", ids.len());
        for id in ids {
            self.selection.add(id);
        }
        &self.selection
    }

    /// Select exactly one shape.
    pub fn select(&mut self, id: &str) {
        if self.document.contains(id) {
            self.selection.select_only(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select all shapes.
    pub fn select_all(&mut self) {
        self.selection.set(self.document.z_order.clone());
    }

    /// Delete selected shapes.
    pub fn delete_selected(&mut self) -> Vec<ShapeId> {
        if self.selection.is_empty() {
            log::debug!("Nothing selected to delete");
            return Vec::new();
        }
        let removed = self.record(transform::delete, |removed| !removed.is_empty());
        log::info!("Deleted {} shape(s)", removed.len());
        removed
    }

    /// Store the final position of a dragged shape.
    pub fn commit_move(&mut self, id: &str, position: Point) -> bool {
        self.record(|doc, _| transform::commit_move(doc, id, position), |moved| *moved)
    }

    /// Store the result of a resize/rotate gesture on one shape.
    pub fn commit_transform(&mut self, id: &str, sample: &TransformSample) -> bool {
        let min_size = self.config.min_shape_size;
        self.record(
            |doc, _| transform::commit_transform(doc, id, sample, min_size),
            |changed| *changed,
        )
    }

    /// Move the selection (and the groups it touches) so its bounding box
    /// starts at `origin`.
    pub fn set_selection_origin(&mut self, origin: Point) -> bool {
        self.record(
            |doc, selection| transform::set_selection_origin(doc, selection, origin),
            |moved| *moved,
        )
    }

    pub fn align_selected(&mut self, edge: AlignEdge) -> bool {
        self.record(|doc, selection| transform::align(doc, selection, edge), |changed| *changed)
    }

    pub fn distribute_selected(&mut self, axis: Axis) -> CanvasResult<()> {
        self.record(
            |doc, selection| transform::distribute(doc, selection, axis),
            Result::is_ok,
        )
    }

    pub fn flip_selected(&mut self, axis: Axis) -> bool {
        self.record(|doc, selection| transform::flip(doc, selection, axis), |changed| *changed)
    }

    /// Group the currently selected shapes.
    pub fn group_selected(&mut self) -> CanvasResult<GroupId> {
        let group = self.record(transform::group, Result::is_ok)?;
        log::info!("Created group {}", group);
        Ok(group)
    }

    /// Ungroup the groups the selection belongs to. Returns the released shapes.
    pub fn ungroup_selected(&mut self) -> Vec<ShapeId> {
        let released = self.record(transform::ungroup, |released| !released.is_empty());
        if !released.is_empty() {
            log::info!("Ungrouped {} shape(s)", released.len());
        }
        released
    }

    /// Remove the selection (with its groups) into the clipboard.
    /// Returns the ids that were cut.
    pub fn cut_selected(&mut self) -> Vec<ShapeId> {
        if self.selection.is_empty() {
            log::debug!("Nothing selected to cut");
            return Vec::new();
        }
        let shapes = self.record(transform::cut, |shapes| !shapes.is_empty());
        if shapes.is_empty() {
            return Vec::new();
        }
        log::info!("Cut {} shape(s)", shapes.len());
        let ids = shapes.iter().map(|s| s.id().clone()).collect();
        self.clipboard = shapes;
        ids
    }

    /// Paste the clipboard so its bounding box starts at `world_point`.
    /// The clipboard is kept, so pasting again makes another copy.
    pub fn paste_at(&mut self, world_point: Point) -> Vec<ShapeId> {
        if self.clipboard.is_empty() {
            log::debug!("Clipboard is empty");
            return Vec::new();
        }
        let clipboard = self.clipboard.clone();
        let pasted = self.record(
            |doc, selection| transform::paste(doc, selection, &clipboard, world_point),
            |pasted| !pasted.is_empty(),
        );
        log::info!("Pasted {} shape(s)", pasted.len());
        pasted
    }

    /// Paste at the last pointer position, or where the shapes were cut from.
    pub fn paste(&mut self) -> Vec<ShapeId> {
        let origin = self
            .pointer
            .or_else(|| geometry::bounding_box_of(self.clipboard.iter().map(Shape::bounds)).map(|b| b.origin()));
        match origin {
            Some(origin) => self.paste_at(origin),
            None => Vec::new(),
        }
    }

    /// Toggle guide snapping. Returns the new state.
    pub fn toggle_snapping(&mut self) -> bool {
        self.snapper.toggle()
    }

    pub fn toggle_crosshair(&mut self) -> bool {
        self.crosshair = !self.crosshair;
        self.crosshair
    }

    pub fn toggle_grid_lines(&mut self) -> bool {
        self.grid_lines = !self.grid_lines;
        self.grid_lines
    }

    /// Open the context menu for a right-click on `target` (a shape id, or
    /// `None` for empty canvas). A click that hits no shape leaves the menu
    /// and the selection as they were.
    pub fn context_click(&mut self, target: Option<&ShapeId>, screen_point: Point) -> Option<&ContextMenu> {
        let target = target.filter(|id| self.document.contains(id));
        if let Some(menu) = self.selection.context_click(target, screen_point) {
            self.context_menu = Some(menu);
        }
        self.context_menu.as_ref()
    }

    /// Actions currently offered by the open context menu.
    pub fn context_actions(&self) -> Vec<ContextAction> {
        self.context_menu
            .as_ref()
            .map(|menu| menu.actions(&self.selection, &self.document, !self.clipboard.is_empty()))
            .unwrap_or_default()
    }

    /// Run a context-menu action on the selection and close the menu.
    pub fn apply_context_action(&mut self, action: ContextAction) -> CanvasResult<()> {
        let menu = self.context_menu.take();
        match action {
            ContextAction::AlignLeft => {
                self.align_selected(AlignEdge::Left);
            }
            ContextAction::AlignRight => {
                self.align_selected(AlignEdge::Right);
            }
            ContextAction::AlignTop => {
                self.align_selected(AlignEdge::Top);
            }
            ContextAction::AlignBottom => {
                self.align_selected(AlignEdge::Bottom);
            }
            ContextAction::DistributeHorizontal => self.distribute_selected(Axis::Horizontal)?,
            ContextAction::DistributeVertical => self.distribute_selected(Axis::Vertical)?,
            ContextAction::FlipHorizontal => {
                self.flip_selected(Axis::Horizontal);
            }
            ContextAction::FlipVertical => {
                self.flip_selected(Axis::Vertical);
            }
            ContextAction::Group => {
                self.group_selected()?;
            }
            ContextAction::Ungroup => {
                self.ungroup_selected();
            }
            ContextAction::Cut => {
                self.cut_selected();
            }
            ContextAction::Paste => {
                match menu {
                    Some(menu) => self.paste_at(self.screen_to_world(menu.position)),
                    None => self.paste(),
                };
            }
            ContextAction::ToggleCrosshair => {
                self.toggle_crosshair();
            }
            ContextAction::ToggleGridLines => {
                self.toggle_grid_lines();
            }
            ContextAction::ToggleSnapping => {
                self.toggle_snapping();
            }
            ContextAction::Delete => {
                self.delete_selected();
            }
        }
        Ok(())
    }

    fn prune_selection(&mut self) {
        let doc = &self.document;
        self.selection.retain(|id| doc.contains(id));
    }

    /// Undo the last change.
    pub fn undo(&mut self) -> bool {
        let undone = self.document.undo();
        self.prune_selection();
        undone
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        let redone = self.document.redo();
        self.prune_selection();
        redone
    }
}
