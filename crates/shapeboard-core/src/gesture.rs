//! Pointer gesture state machine: click selection, marquee, dragging with
//! snapping, resize/rotate sessions and wheel zoom.

use crate::canvas::{Canvas, DocumentSnapshot};
use crate::error::CanvasResult;
use crate::geometry;
use crate::input::{KeyCommand, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::{MarqueeState, MultiMoveState};
use crate::shapes::{Shape, ShapeId};
use crate::transform::{self, TransformSample};
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Rubber-band selection.
    Marquee(MarqueeState),
    /// Moving the selection. `before` is the document as it was at pointer-down.
    Dragging {
        state: MultiMoveState,
        before: DocumentSnapshot,
    },
    /// Resize/rotate through the host's transform handles.
    Transforming { original: Shape },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

fn sample_of(shape: &Shape) -> TransformSample {
    let placement = shape.placement();
    TransformSample {
        position: placement.position,
        rotation: placement.rotation,
        scale_x: placement.scale_x,
        scale_y: placement.scale_y,
    }
}

impl Canvas {
    /// Feed one pointer event (screen coordinates).
    pub fn handle_pointer_event(&mut self, event: PointerEvent, modifiers: Modifiers) {
        self.pointer = Some(self.screen_to_world(event.position()));
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => {
                let world = self.screen_to_world(position);
                if let Gesture::Marquee(marquee) = &mut self.gesture {
                    marquee.update(world);
                } else {
                    self.update_drag(world);
                }
            }
            PointerEvent::Up { position, .. } => {
                let world = self.screen_to_world(position);
                self.pointer_up(world);
            }
            PointerEvent::Scroll { position, delta } => self.camera.wheel_zoom(position, delta.y),
        }
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        if !self.gesture.is_idle() {
            // A lost pointer-up; close the stale gesture first.
            let world = self.screen_to_world(position);
            self.pointer_up(world);
        }
        let world = self.screen_to_world(position);
        match button {
            MouseButton::Left => {
                self.context_menu = None;
                match self.hit_test(world) {
                    Some(id) => {
                        self.selection.click(&id, modifiers);
                        if self.selection.contains(&id) {
                            self.begin_drag(&id, world);
                        }
                    }
                    None if modifiers.toggles_selection() => {
                        self.gesture = Gesture::Marquee(MarqueeState::begin_additive(world));
                    }
                    None => {
                        self.selection.clear();
                        self.gesture = Gesture::Marquee(MarqueeState::begin(world));
                    }
                }
            }
            MouseButton::Right => {
                let target = self.hit_test(world);
                self.context_click(target.as_ref(), position);
            }
            MouseButton::Middle => {}
        }
    }

    fn pointer_up(&mut self, world: Point) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Marquee(mut marquee) => {
                marquee.update(world);
                if !marquee.is_click() {
                    let rect = marquee.rect();
                    if marquee.additive {
                        self.marquee_extend(rect);
                    } else {
                        self.marquee_select(rect);
                    }
                }
            }
            dragging @ Gesture::Dragging { .. } => {
                self.gesture = dragging;
                self.update_drag(world);
                self.end_drag();
            }
            Gesture::Transforming { original } => {
                // Pointer-up commits whatever the last preview showed.
                let preview = self.document.get_shape(original.id()).map(sample_of);
                if let Some(sample) = preview {
                    self.gesture = Gesture::Transforming { original };
                    self.end_transform(&sample);
                }
            }
        }
    }

    /// Start moving the selection, with `primary` under the pointer at `world`.
    ///
    /// Members of any group the selection touches move along.
    pub fn begin_drag(&mut self, primary: &str, world: Point) -> bool {
        if !self.document.contains(primary) {
            log::debug!("begin_drag: no shape with id {}", primary);
            return false;
        }
        if !self.selection.contains(primary) {
            self.selection.select_only(primary.to_string());
        }
        let originals: HashMap<ShapeId, Shape> = transform::expand_groups(&self.document, &self.selection)
            .into_iter()
            .filter_map(|id| self.document.get_shape(&id).cloned().map(|s| (id, s)))
            .collect();
        log::debug!("Drag started on {} ({} shape(s))", primary, originals.len());
        self.gesture = Gesture::Dragging {
            state: MultiMoveState::new(primary.to_string(), world, originals),
            before: self.document.snapshot(),
        };
        true
    }

    /// Move the dragged shapes to follow the pointer, snapping the primary shape.
    /// With `keep_in_bounds` set, the moved shapes stay inside the canvas.
    pub fn update_drag(&mut self, world: Point) {
        let canvas = self.canvas_size();
        let keep_in_bounds = self.config.keep_in_bounds;
        let Gesture::Dragging { state, .. } = &mut self.gesture else {
            return;
        };
        state.current_point = world;
        let delta = state.delta();
        let ids = state.shape_ids();
        for (id, original) in &state.original_shapes {
            let mut moved = original.clone();
            moved.translate(delta);
            if let Some(shape) = self.document.get_shape_mut(id) {
                *shape = moved;
            }
        }

        let Some(primary) = self.document.get_shape(&state.primary) else {
            return;
        };
        let snap = self.snapper.snap_drag(&self.document, primary, &ids, canvas);
        let mut correction = snap.position - primary.position();
        if keep_in_bounds {
            if let Some(bounds) = transform::bounding_box(&self.document, &ids) {
                correction += geometry::keep_inside(bounds + correction, canvas);
            }
        }
        if correction != Vec2::ZERO {
            for id in &ids {
                if let Some(shape) = self.document.get_shape_mut(id) {
                    shape.translate(correction);
                }
            }
        }
    }

    /// Finish the drag. Records one undo step if anything moved.
    pub fn end_drag(&mut self) -> bool {
        self.snapper.clear();
        if !matches!(self.gesture, Gesture::Dragging { .. }) {
            return false;
        }
        let Gesture::Dragging { state, before } = std::mem::take(&mut self.gesture) else {
            return false;
        };
        let moved = state
            .original_shapes
            .iter()
            .any(|(id, original)| self.document.get_shape(id).is_some_and(|s| s.position() != original.position()));
        if moved {
            self.document.push_snapshot(before);
            log::info!("Moved {} shape(s)", state.original_shapes.len());
        }
        moved
    }

    /// Open a resize/rotate session on `id`.
    pub fn begin_transform(&mut self, id: &str) -> bool {
        let Some(original) = self.document.get_shape(id).cloned() else {
            log::debug!("begin_transform: no shape with id {}", id);
            return false;
        };
        self.gesture = Gesture::Transforming { original };
        true
    }

    /// Live preview of a transform: the raw sample is shown without normalizing.
    pub fn update_transform(&mut self, sample: &TransformSample) {
        let Gesture::Transforming { original } = &self.gesture else {
            return;
        };
        if let Some(shape) = self.document.get_shape_mut(original.id()) {
            let placement = shape.placement_mut();
            placement.position = sample.position;
            placement.rotation = sample.rotation;
            placement.scale_x = sample.scale_x;
            placement.scale_y = sample.scale_y;
        }
    }

    /// Commit the transform session with its final sample.
    pub fn end_transform(&mut self, sample: &TransformSample) -> bool {
        if !matches!(self.gesture, Gesture::Transforming { .. }) {
            return false;
        }
        let Gesture::Transforming { original } = std::mem::take(&mut self.gesture) else {
            return false;
        };
        let id = original.id().clone();
        if let Some(shape) = self.document.get_shape_mut(&id) {
            *shape = original;
        }
        self.commit_transform(&id, sample)
    }

    /// Abort the current gesture (Escape). Dragged or transformed shapes go
    /// back to where they were at pointer-down.
    pub fn cancel_gesture(&mut self) {
        self.snapper.clear();
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Marquee(_) => {}
            Gesture::Dragging { state, .. } => {
                for (id, original) in state.original_shapes {
                    if let Some(shape) = self.document.get_shape_mut(&id) {
                        *shape = original;
                    }
                }
                log::debug!("Drag cancelled");
            }
            Gesture::Transforming { original } => {
                let id = original.id().clone();
                if let Some(shape) = self.document.get_shape_mut(&id) {
                    *shape = original;
                }
                log::debug!("Transform of {} cancelled", id);
            }
        }
    }

    /// Marquee rectangle currently being dragged, in world coordinates.
    pub fn marquee_rect(&self) -> Option<kurbo::Rect> {
        match &self.gesture {
            Gesture::Marquee(marquee) if !marquee.is_click() => Some(marquee.rect()),
            _ => None,
        }
    }

    /// Feed one key event. Returns the command that ran, if any, or the
    /// rejection it produced.
    pub fn handle_key_event(&mut self, event: &KeyEvent, modifiers: Modifiers) -> CanvasResult<Option<KeyCommand>> {
        let Some(command) = KeyCommand::from_event(event, modifiers) else {
            return Ok(None);
        };
        match command {
            KeyCommand::Cancel => {
                self.cancel_gesture();
                self.context_menu = None;
            }
            KeyCommand::Delete => {
                self.delete_selected();
            }
            KeyCommand::Undo => {
                self.undo();
            }
            KeyCommand::Redo => {
                self.redo();
            }
            KeyCommand::SelectAll => self.select_all(),
            KeyCommand::Group => {
                self.group_selected()?;
            }
            KeyCommand::Ungroup => {
                self.ungroup_selected();
            }
            KeyCommand::Cut => {
                self.cut_selected();
            }
            KeyCommand::Paste => {
                self.paste();
            }
        }
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasDocument;
    use crate::config::CanvasConfig;
    use crate::error::Rejection;
    use crate::shapes::{Rectangle, ShapeKind};

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rectangle(Rectangle::with_size(id.into(), Point::new(x, y), w, h))
    }

    fn canvas_with(shapes: Vec<Shape>) -> Canvas {
        let mut doc = CanvasDocument::new();
        for shape in shapes {
            doc.add_shape(shape);
        }
        Canvas::with_document(doc, CanvasConfig::default())
    }

    fn down(canvas: &mut Canvas, x: f64, y: f64) {
        canvas.handle_pointer_event(
            PointerEvent::Down {
                position: Point::new(x, y),
                button: MouseButton::Left,
            },
            Modifiers::NONE,
        );
    }

    fn move_to(canvas: &mut Canvas, x: f64, y: f64) {
        canvas.handle_pointer_event(PointerEvent::Move { position: Point::new(x, y) }, Modifiers::NONE);
    }

    fn up(canvas: &mut Canvas, x: f64, y: f64) {
        canvas.handle_pointer_event(
            PointerEvent::Up {
                position: Point::new(x, y),
                button: MouseButton::Left,
            },
            Modifiers::NONE,
        );
    }

    fn x0(canvas: &Canvas, id: &str) -> f64 {
        canvas.document.get_shape(id).unwrap().bounds().x0
    }

    #[test]
    fn test_drag_snaps_to_neighbour_edge() {
        let mut canvas = canvas_with(vec![
            rect("a", 0.0, 0.0, 100.0, 100.0),
            rect("b", 100.0, 0.0, 100.0, 100.0),
            rect("c", 300.0, 500.0, 60.0, 60.0),
        ]);
        down(&mut canvas, 310.0, 510.0);
        assert_eq!(canvas.selection.ids(), ["c"]);

        move_to(&mut canvas, 109.0, 510.0);
        assert!((x0(&canvas, "c") - 100.0).abs() < f64::EPSILON);
        assert!(!canvas.snapper.guides().is_empty());

        up(&mut canvas, 109.0, 510.0);
        assert!(canvas.gesture.is_idle());
        assert!(canvas.snapper.guides().is_empty());
        assert!((x0(&canvas, "c") - 100.0).abs() < f64::EPSILON);

        assert!(canvas.undo());
        assert!((x0(&canvas, "c") - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_without_snapping() {
        let mut canvas = canvas_with(vec![
            rect("a", 0.0, 0.0, 100.0, 100.0),
            rect("b", 100.0, 0.0, 100.0, 100.0),
            rect("c", 300.0, 500.0, 60.0, 60.0),
        ]);
        canvas.toggle_snapping();
        down(&mut canvas, 310.0, 510.0);
        up(&mut canvas, 109.0, 510.0);
        assert!((x0(&canvas, "c") - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_moves_whole_group() {
        let mut canvas = canvas_with(vec![
            rect("a", 0.0, 0.0, 50.0, 50.0),
            rect("b", 100.0, 0.0, 50.0, 50.0),
            rect("c", 1000.0, 1000.0, 60.0, 60.0),
        ]);
        canvas.selection.set(vec!["a".into(), "b".into()]);
        canvas.group_selected().unwrap();

        down(&mut canvas, 10.0, 10.0);
        move_to(&mut canvas, 17.0, 310.0);
        up(&mut canvas, 17.0, 310.0);

        assert_eq!(canvas.document.get_shape("a").unwrap().position(), Point::new(7.0, 300.0));
        assert_eq!(canvas.document.get_shape("b").unwrap().position(), Point::new(107.0, 300.0));
        assert_eq!(canvas.document.get_shape("c").unwrap().position(), Point::new(1000.0, 1000.0));
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 50.0, 50.0)]);
        down(&mut canvas, 10.0, 10.0);
        up(&mut canvas, 10.0, 10.0);
        assert_eq!(canvas.selection.ids(), ["a"]);
        assert!(!canvas.document.can_undo());
    }

    #[test]
    fn test_marquee_by_pointer() {
        let mut canvas = canvas_with(vec![
            rect("a", 100.0, 100.0, 50.0, 50.0),
            rect("b", 300.0, 300.0, 50.0, 50.0),
            rect("c", 900.0, 900.0, 50.0, 50.0),
        ]);
        down(&mut canvas, 50.0, 50.0);
        move_to(&mut canvas, 320.0, 320.0);
        assert!(canvas.marquee_rect().is_some());
        up(&mut canvas, 320.0, 320.0);
        assert_eq!(canvas.selection.ids(), ["a", "b"]);
        assert!(canvas.gesture.is_idle());
    }

    #[test]
    fn test_click_empty_clears_selection() {
        let mut canvas = canvas_with(vec![rect("a", 100.0, 100.0, 50.0, 50.0)]);
        canvas.select("a");
        down(&mut canvas, 500.0, 500.0);
        up(&mut canvas, 500.0, 500.0);
        assert!(canvas.selection.is_empty());
    }

    #[test]
    fn test_shift_click_toggles() {
        let mut canvas = canvas_with(vec![
            rect("a", 0.0, 0.0, 50.0, 50.0),
            rect("b", 100.0, 0.0, 50.0, 50.0),
        ]);
        down(&mut canvas, 10.0, 10.0);
        up(&mut canvas, 10.0, 10.0);
        let shift_down = PointerEvent::Down {
            position: Point::new(110.0, 10.0),
            button: MouseButton::Left,
        };
        canvas.handle_pointer_event(shift_down, Modifiers::shift());
        up(&mut canvas, 110.0, 10.0);
        assert_eq!(canvas.selection.ids(), ["a", "b"]);

        let shift_down = PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        };
        canvas.handle_pointer_event(shift_down, Modifiers::shift());
        up(&mut canvas, 10.0, 10.0);
        assert_eq!(canvas.selection.ids(), ["b"]);
    }

    #[test]
    fn test_right_click_opens_menu() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 50.0, 50.0)]);
        canvas.handle_pointer_event(
            PointerEvent::Down {
                position: Point::new(10.0, 10.0),
                button: MouseButton::Right,
            },
            Modifiers::NONE,
        );
        assert_eq!(canvas.selection.ids(), ["a"]);
        assert!(canvas.context_menu.is_some());

        down(&mut canvas, 500.0, 500.0);
        assert!(canvas.context_menu.is_none());
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 50.0, 50.0)]);
        down(&mut canvas, 10.0, 10.0);
        move_to(&mut canvas, 210.0, 310.0);
        assert!((x0(&canvas, "a") - 200.0).abs() < f64::EPSILON);

        let command = canvas.handle_key_event(&KeyEvent::Pressed("Escape".into()), Modifiers::NONE);
        assert_eq!(command, Ok(Some(KeyCommand::Cancel)));
        assert!(canvas.gesture.is_idle());
        assert!(x0(&canvas, "a").abs() < f64::EPSILON);
        assert!(!canvas.document.can_undo());
    }

    #[test]
    fn test_transform_session() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 100.0, 100.0)]);
        assert!(canvas.begin_transform("a"));
        let sample = TransformSample {
            position: Point::ZERO,
            rotation: 0.0,
            scale_x: 2.0,
            scale_y: 1.5,
        };
        canvas.update_transform(&sample);
        assert!((canvas.document.get_shape("a").unwrap().placement().scale_x - 2.0).abs() < f64::EPSILON);

        assert!(canvas.end_transform(&sample));
        let shape = canvas.document.get_shape("a").unwrap();
        assert!((shape.placement().scale_x - 1.0).abs() < f64::EPSILON);
        assert!((shape.bounds().width() - 200.0).abs() < f64::EPSILON);
        assert!((shape.bounds().height() - 150.0).abs() < f64::EPSILON);

        assert!(canvas.undo());
        assert!((canvas.document.get_shape("a").unwrap().bounds().width() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_zooms_at_pointer() {
        let mut canvas = canvas_with(vec![]);
        let position = Point::new(400.0, 300.0);
        let before = canvas.screen_to_world(position);
        canvas.handle_pointer_event(
            PointerEvent::Scroll {
                position,
                delta: Vec2::new(0.0, -1.0),
            },
            Modifiers::NONE,
        );
        assert!(canvas.camera.zoom > 1.0);
        let after = canvas.screen_to_world(position);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_key_delete_and_undo() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 50.0, 50.0)]);
        canvas.select("a");
        canvas.handle_key_event(&KeyEvent::Pressed("Delete".into()), Modifiers::NONE).unwrap();
        assert!(canvas.document.is_empty());
        canvas.handle_key_event(&KeyEvent::Pressed("z".into()), Modifiers::ctrl()).unwrap();
        assert!(canvas.document.contains("a"));
    }

    #[test]
    fn test_scroll_out_keeps_point_under_cursor() {
        let mut canvas = canvas_with(vec![]);
        let position = Point::new(400.0, 300.0);
        let before = canvas.screen_to_world(position);
        canvas.handle_pointer_event(
            PointerEvent::Scroll {
                position,
                delta: Vec2::new(0.0, 1.0),
            },
            Modifiers::NONE,
        );
        assert!(canvas.camera.zoom < 1.0);
        let after = canvas.screen_to_world(position);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_group_key_reports_rejection() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 50.0, 50.0)]);
        canvas.select("a");
        let result = canvas.handle_key_event(&KeyEvent::Pressed("g".into()), Modifiers::ctrl());
        assert_eq!(result, Err(Rejection::NothingToGroup { selected: 1 }));
        assert!(canvas.document.get_shape("a").unwrap().group_id().is_none());
        assert!(!canvas.document.can_undo());
    }

    #[test]
    fn test_shift_marquee_extends_selection() {
        let mut canvas = canvas_with(vec![
            rect("a", 0.0, 0.0, 50.0, 50.0),
            rect("b", 300.0, 300.0, 50.0, 50.0),
        ]);
        canvas.select("a");
        let shift_down = PointerEvent::Down {
            position: Point::new(250.0, 250.0),
            button: MouseButton::Left,
        };
        canvas.handle_pointer_event(shift_down, Modifiers::shift());
        move_to(&mut canvas, 400.0, 400.0);
        up(&mut canvas, 400.0, 400.0);
        assert_eq!(canvas.selection.ids(), ["a", "b"]);

        down(&mut canvas, 250.0, 250.0);
        move_to(&mut canvas, 400.0, 400.0);
        up(&mut canvas, 400.0, 400.0);
        assert_eq!(canvas.selection.ids(), ["b"]);
    }

    #[test]
    fn test_drag_stays_inside_canvas() {
        let mut canvas = canvas_with(vec![rect("a", 100.0, 100.0, 50.0, 50.0)]);
        canvas.toggle_snapping();
        down(&mut canvas, 110.0, 110.0);
        move_to(&mut canvas, -200.0, 60.0);
        up(&mut canvas, -200.0, 60.0);
        assert_eq!(canvas.document.get_shape("a").unwrap().position(), Point::new(0.0, 50.0));
    }

    #[test]
    fn test_drag_may_leave_canvas_when_unbounded() {
        let config = CanvasConfig {
            keep_in_bounds: false,
            snapping: false,
            ..CanvasConfig::default()
        };
        let mut doc = CanvasDocument::new();
        doc.add_shape(rect("a", 100.0, 100.0, 50.0, 50.0));
        let mut canvas = Canvas::with_document(doc, config);
        down(&mut canvas, 110.0, 110.0);
        up(&mut canvas, -200.0, 60.0);
        assert_eq!(canvas.document.get_shape("a").unwrap().position(), Point::new(-210.0, 50.0));
    }

    #[test]
    fn test_cut_paste_keys_at_pointer() {
        let mut canvas = canvas_with(vec![rect("rectangle_1", 0.0, 0.0, 50.0, 50.0)]);
        canvas.document.allocate_id(ShapeKind::Rectangle);
        canvas.select("rectangle_1");
        let cut = canvas.handle_key_event(&KeyEvent::Pressed("x".into()), Modifiers::ctrl());
        assert_eq!(cut, Ok(Some(KeyCommand::Cut)));
        assert!(canvas.document.is_empty());

        move_to(&mut canvas, 600.0, 400.0);
        canvas.handle_key_event(&KeyEvent::Pressed("v".into()), Modifiers::ctrl()).unwrap();
        let pasted = canvas.document.get_shape("rectangle_2").unwrap();
        assert_eq!(pasted.position(), Point::new(600.0, 400.0));
        assert_eq!(canvas.selection.ids(), ["rectangle_2"]);
    }
}
