//! A renderer that reports draw calls through the log instead of painting.

use kurbo::{Affine, Line, Rect};
use peniko::Color;
use shapeboard_core::render::{self, RenderContext, Renderer, ShapeRenderer};
use shapeboard_core::ruler::{self, RulerTick};
use shapeboard_core::{Axis, Shape};

/// Counts and logs what a frame would draw.
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub frames: usize,
    pub shapes: usize,
    pub selected: usize,
    pub flipped: usize,
    pub guides: usize,
    pub marquees: usize,
    pub grid_lines: usize,
    pub crosshairs: usize,
    /// Labelled ruler ticks across both rulers.
    pub ruler_labels: usize,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.frames += 1;
        let background = self.background_color(ctx).to_rgba8();
        log::debug!(
            "Frame {} ({}x{}, background #{:02x}{:02x}{:02x})",
            self.frames,
            ctx.viewport_size.width,
            ctx.viewport_size.height,
            background.r,
            background.g,
            background.b
        );
        render::draw_frame(self, ctx);
        let camera = &ctx.canvas.camera;
        for (axis, length) in [
            (Axis::Horizontal, ctx.viewport_size.width),
            (Axis::Vertical, ctx.viewport_size.height),
        ] {
            let ticks = ruler::ruler_ticks(axis, camera, length);
            let labels: Vec<String> = ticks.iter().filter_map(RulerTick::label).collect();
            self.ruler_labels += labels.len();
            log::debug!("{:?} ruler: {} tick(s), labels {}", axis, ticks.len(), labels.join(" "));
        }
        if let Some(menu) = ctx.context_menu {
            log::debug!("Context menu for {} at ({:.0}, {:.0})", menu.target, menu.position.x, menu.position.y);
        }
    }
}

impl ShapeRenderer for LogRenderer {
    fn render_shape(&mut self, shape: &Shape, transform: Affine, selected: bool) {
        self.shapes += 1;
        if selected {
            self.selected += 1;
        }
        let flipped = shape.placement().is_flipped();
        if flipped {
            self.flipped += 1;
        }
        let screen = transform.transform_rect_bbox(shape.bounds());
        log::debug!(
            "{} {} at ({:.1}, {:.1}) {:.1}x{:.1}{}{}",
            shape.kind(),
            shape.id(),
            screen.x0,
            screen.y0,
            screen.width(),
            screen.height(),
            if flipped { " [flipped]" } else { "" },
            if selected { " [selected]" } else { "" }
        );
        if let Some(image) = shape.as_image() {
            match (image.format(), image.decoded_bytes()) {
                (Some(format), Some(bytes)) => {
                    log::debug!("  embedded {} ({} bytes)", format.mime_type(), bytes.len())
                }
                _ => log::debug!("  linked {}", image.src),
            }
        }
    }

    fn render_guide(&mut self, line: Line, transform: Affine) {
        self.guides += 1;
        let line = transform * line;
        log::debug!("Guide ({:.1}, {:.1}) -> ({:.1}, {:.1})", line.p0.x, line.p0.y, line.p1.x, line.p1.y);
    }

    fn render_marquee(&mut self, rect: Rect, transform: Affine, _color: Color) {
        self.marquees += 1;
        log::debug!("Marquee {:?}", transform.transform_rect_bbox(rect));
    }

    fn render_selection_handles(&mut self, bounds: Rect, transform: Affine, _color: Color) {
        log::debug!("Selection box {:?}", transform.transform_rect_bbox(bounds));
    }

    fn render_grid_line(&mut self, _line: Line, _transform: Affine) {
        self.grid_lines += 1;
    }

    fn render_crosshair(&mut self, line: Line, transform: Affine) {
        self.crosshairs += 1;
        let line = transform * line;
        log::debug!("Crosshair ({:.1}, {:.1}) -> ({:.1}, {:.1})", line.p0.x, line.p0.y, line.p1.x, line.p1.y);
    }
}
