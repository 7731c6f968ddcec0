//! Session scripts: a recorded list of user actions replayed against a canvas.

use crate::{AppResult, read_bytes, read_file};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use shapeboard_core::{
    AlignEdge, Axis, Canvas, CanvasConfig, CanvasResult, ContextAction, DropRequest, KeyEvent, Modifiers,
    PointerEvent, PrimitiveDescriptor, SceneFile, ShapeId, ShapeKind, ShapePatch, TransformSample,
};
use shapeboard_core::shapes::Image;
use std::path::PathBuf;

/// One user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Palette drop. `x`/`y` are world coordinates unless `screen` is set.
    Drop {
        kind: ShapeKind,
        x: f64,
        y: f64,
        #[serde(default)]
        src: Option<String>,
        #[serde(default)]
        screen: bool,
    },
    /// Drop an image file, embedded as a data URL, at a world point.
    DropImage {
        path: PathBuf,
        x: f64,
        y: f64,
    },
    Pointer {
        event: PointerEvent,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Select {
        id: ShapeId,
    },
    SelectAll,
    ClearSelection,
    /// Marquee in world coordinates.
    Marquee {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    Update {
        id: ShapeId,
        patch: ShapePatch,
    },
    Move {
        id: ShapeId,
        x: f64,
        y: f64,
    },
    Transform {
        id: ShapeId,
        sample: TransformSample,
    },
    SetOrigin {
        x: f64,
        y: f64,
    },
    Align {
        edge: AlignEdge,
    },
    Distribute {
        axis: Axis,
    },
    Flip {
        axis: Axis,
    },
    Group,
    Ungroup,
    Delete,
    Pan {
        dx: f64,
        dy: f64,
    },
    Zoom {
        x: f64,
        y: f64,
        zoom: f64,
    },
    /// Right click at a screen point.
    ContextClick {
        x: f64,
        y: f64,
    },
    ContextAction {
        action: ContextAction,
    },
    ToggleSnapping,
    Import {
        primitives: Vec<PrimitiveDescriptor>,
    },
    LoadScene {
        path: PathBuf,
    },
    Undo,
    Redo,
}

/// A canvas plus the warnings raised while driving it.
#[derive(Debug)]
pub struct Session {
    pub canvas: Canvas,
    /// Messages for rejected actions, in order.
    pub warnings: Vec<String>,
    base_dir: PathBuf,
}

impl Session {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            canvas: Canvas::with_config(config),
            warnings: Vec::new(),
            base_dir: PathBuf::new(),
        }
    }

    /// Directory that relative scene paths resolve against.
    pub fn with_base_dir(mut self, base_dir: PathBuf) -> Self {
        self.base_dir = base_dir;
        self
    }

    /// Replay `commands` in order. Rejections become warnings; I/O, scene and
    /// image errors stop the run.
    pub fn run(&mut self, commands: &[Command]) -> AppResult<()> {
        for (index, command) in commands.iter().enumerate() {
            log::debug!("Command {}: {:?}", index, command);
            self.apply(command)?;
        }
        log::info!(
            "Session finished: {} shape(s), {} warning(s)",
            self.canvas.document.len(),
            self.warnings.len()
        );
        Ok(())
    }

    fn note<T>(&mut self, result: CanvasResult<T>) {
        if let Err(rejection) = result {
            self.warnings.push(rejection.to_string());
        }
    }

    /// Apply a single command.
    pub fn apply(&mut self, command: &Command) -> AppResult<()> {
        let canvas = &mut self.canvas;
        match command {
            Command::Drop { kind, x, y, src, screen } => {
                let point = Point::new(*x, *y);
                let point = if *screen { canvas.screen_to_world(point) } else { point };
                let mut request = DropRequest::new(*kind, point);
                if let Some(src) = src {
                    request = request.with_src(src.clone());
                }
                let result = canvas.drop_shape(&request);
                self.note(result);
            }
            Command::Pointer { event, modifiers } => canvas.handle_pointer_event(*event, *modifiers),
            Command::DropImage { path, x, y } => {
                let bytes = read_bytes(&self.base_dir.join(path))?;
                let request = DropRequest::new(ShapeKind::Image, Point::new(*x, *y)).with_src(Image::data_url(&bytes)?);
                let result = self.canvas.drop_shape(&request);
                self.note(result);
            }
            Command::Key { key, modifiers } => {
                let result = canvas.handle_key_event(&KeyEvent::Pressed(key.clone()), *modifiers);
                self.note(result);
            }
            Command::Select { id } => canvas.select(id),
            Command::SelectAll => canvas.select_all(),
            Command::ClearSelection => canvas.clear_selection(),
            Command::Marquee { x0, y0, x1, y1 } => {
                canvas.marquee_select(Rect::new(*x0, *y0, *x1, *y1));
            }
            Command::Update { id, patch } => {
                canvas.update_shape(id, patch);
            }
            Command::Move { id, x, y } => {
                canvas.commit_move(id, Point::new(*x, *y));
            }
            Command::Transform { id, sample } => {
                canvas.commit_transform(id, sample);
            }
            Command::SetOrigin { x, y } => {
                canvas.set_selection_origin(Point::new(*x, *y));
            }
            Command::Align { edge } => {
                canvas.align_selected(*edge);
            }
            Command::Distribute { axis } => {
                let result = canvas.distribute_selected(*axis);
                self.note(result);
            }
            Command::Flip { axis } => {
                canvas.flip_selected(*axis);
            }
            Command::Group => {
                let result = canvas.group_selected();
                self.note(result);
            }
            Command::Ungroup => {
                canvas.ungroup_selected();
            }
            Command::Delete => {
                canvas.delete_selected();
            }
            Command::Pan { dx, dy } => canvas.pan(Vec2::new(*dx, *dy)),
            Command::Zoom { x, y, zoom } => {
                let result = canvas.zoom_at(Point::new(*x, *y), *zoom);
                self.note(result);
            }
            Command::ContextClick { x, y } => {
                let screen = Point::new(*x, *y);
                let target = canvas.hit_test(canvas.screen_to_world(screen));
                canvas.context_click(target.as_ref(), screen);
            }
            Command::ContextAction { action } => {
                let result = canvas.apply_context_action(*action);
                self.note(result);
            }
            Command::ToggleSnapping => {
                canvas.toggle_snapping();
            }
            Command::Import { primitives } => {
                canvas.import_primitives(primitives);
            }
            Command::LoadScene { path } => {
                let path = self.base_dir.join(path);
                let scene = SceneFile::from_json(&read_file(&path)?)?;
                self.canvas.load_scene(scene)?;
            }
            Command::Undo => {
                canvas.undo();
            }
            Command::Redo => {
                canvas.redo();
            }
        }
        Ok(())
    }
}
