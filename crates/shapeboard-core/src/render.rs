//! Renderer abstraction. Painting lives with the host; the core only decides
//! what goes on screen and in which order.

use crate::canvas::Canvas;
use crate::ruler;
use crate::selection::ContextMenu;
use crate::shapes::Shape;
use crate::snap::{Guide, GuideOrientation};
use crate::transform;
use kurbo::{Affine, Line, Point, Rect, Size};
use peniko::Color;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Snap guides to draw (world coordinates).
    pub guides: &'a [Guide],
    /// Marquee rectangle in world coordinates.
    pub marquee: Option<Rect>,
    pub context_menu: Option<&'a ContextMenu>,
    /// Draw the background grid.
    pub grid_lines: bool,
    /// World point the crosshair goes through, when enabled.
    pub crosshair: Option<Point>,
}

impl<'a> RenderContext<'a> {
    /// Capture the canvas as it is now: current guides, marquee and menu.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            viewport_size: canvas.viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            guides: canvas.snapper.guides(),
            marquee: canvas.marquee_rect(),
            context_menu: canvas.context_menu.as_ref(),
            grid_lines: canvas.grid_lines,
            crosshair: canvas.pointer.filter(|_| canvas.crosshair),
        }
    }

    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.viewport_size = size;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Set the selection rectangle.
    pub fn with_marquee(mut self, rect: Option<Rect>) -> Self {
        self.marquee = rect;
        self
    }

    pub fn with_guides(mut self, guides: &'a [Guide]) -> Self {
        self.guides = guides;
        self
    }

    /// World-to-screen transform for this frame.
    pub fn view_transform(&self) -> Affine {
        self.canvas.camera.transform()
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

/// Primitive drawing calls a backend provides to [`draw_frame`].
pub trait ShapeRenderer {
    /// Render a shape with the given view transform.
    fn render_shape(&mut self, shape: &Shape, transform: Affine, selected: bool);

    /// Render one guide line (world coordinates).
    fn render_guide(&mut self, line: Line, transform: Affine);

    /// Render the rubber band.
    fn render_marquee(&mut self, rect: Rect, transform: Affine, color: Color);

    /// Render selection handles around `bounds`.
    fn render_selection_handles(&mut self, bounds: Rect, transform: Affine, color: Color);

    /// Render one background grid line (world coordinates).
    fn render_grid_line(&mut self, line: Line, transform: Affine);

    /// Render one arm of the pointer crosshair (world coordinates).
    fn render_crosshair(&mut self, line: Line, transform: Affine);
}

/// The full-length line for `guide` across a canvas of `canvas` size.
pub fn guide_line(guide: &Guide, canvas: Size) -> Line {
    match guide.orientation {
        GuideOrientation::Vertical => Line::new(
            Point::new(guide.position, 0.0),
            Point::new(guide.position, canvas.height),
        ),
        GuideOrientation::Horizontal => Line::new(
            Point::new(0.0, guide.position),
            Point::new(canvas.width, guide.position),
        ),
    }
}

/// The vertical and horizontal crosshair lines through `point`.
pub fn crosshair_lines(point: Point, canvas: Size) -> [Line; 2] {
    [
        Line::new(Point::new(point.x, 0.0), Point::new(point.x, canvas.height)),
        Line::new(Point::new(0.0, point.y), Point::new(canvas.width, point.y)),
    ]
}

/// Draw one frame: grid, shapes back to front, then the selection box, guides,
/// marquee and crosshair.
pub fn draw_frame<R: ShapeRenderer + ?Sized>(renderer: &mut R, ctx: &RenderContext) {
    let canvas = ctx.canvas;
    let transform = ctx.view_transform();
    let canvas_size = canvas.canvas_size();
    if ctx.grid_lines {
        for line in ruler::grid_lines(canvas_size) {
            renderer.render_grid_line(line, transform);
        }
    }
    for shape in canvas.document.shapes_ordered() {
        renderer.render_shape(shape, transform, canvas.selection.contains(shape.id()));
    }
    if let Some(bounds) = transform::bounding_box(&canvas.document, canvas.selection.iter()) {
        renderer.render_selection_handles(bounds, transform, ctx.selection_color);
    }
    for guide in ctx.guides {
        renderer.render_guide(guide_line(guide, canvas_size), transform);
    }
    if let Some(rect) = ctx.marquee {
        renderer.render_marquee(rect, transform, ctx.selection_color);
    }
    if let Some(point) = ctx.crosshair {
        for line in crosshair_lines(point, canvas_size) {
            renderer.render_crosshair(line, transform);
        }
    }
}
