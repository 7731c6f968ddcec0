//! Shapeboard Core Library
//!
//! Headless scene engine for a 2D diagramming canvas: the shape model,
//! hit-testing and selection, snapping guides, multi-shape transforms and the
//! screen/world mapping under pan and zoom. Painting and UI chrome belong to
//! the host, which plugs in through [`render::Renderer`].

pub mod camera;
pub mod canvas;
pub mod config;
pub mod dnd;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod import;
pub mod input;
pub mod render;
pub mod ruler;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod transform;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasDocument};
pub use config::CanvasConfig;
pub use dnd::DropRequest;
pub use error::{CanvasResult, ConfigError, Rejection, SceneError, SceneResult};
pub use geometry::Axis;
pub use gesture::Gesture;
pub use import::{PrimitiveDescriptor, SceneFile};
pub use input::{KeyCommand, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use render::{RenderContext, Renderer, ShapeRenderer};
pub use selection::{ContextAction, ContextMenu, MarqueeState, MultiMoveState, Selection};
pub use shapes::{GroupId, Shape, ShapeId, ShapeKind, ShapePatch};
pub use snap::{GUIDELINE_OFFSET, Guide, SnapResult, Snapper};
pub use transform::{AlignEdge, TransformSample};
