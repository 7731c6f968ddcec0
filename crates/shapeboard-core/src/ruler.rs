//! Tick marks for the rulers along the top and left of the viewport, and the
//! background grid that lines up with their major ticks.

use crate::camera::Camera;
use crate::geometry::Axis;
use kurbo::{Line, Point, Size};
use serde::{Deserialize, Serialize};

/// Thickness of a ruler strip in screen pixels.
pub const RULER_SIZE: f64 = 30.0;
/// Screen pixels per ruler unit at zoom 1.
pub const PIXELS_PER_UNIT: f64 = 10.0;
/// Every n-th unit gets a long tick and a label.
pub const MAJOR_EVERY: i64 = 10;
/// Smallest screen distance between labelled ticks.
pub const MIN_LABEL_SPACING: f64 = 100.0;

/// Round `range` up to 1, 2, 5 or 10 times a power of ten.
pub fn nice_number(range: f64) -> f64 {
    if !range.is_finite() || range <= 0.0 {
        return 1.0;
    }
    let exponent = range.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = range / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// One tick on a ruler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RulerTick {
    /// Screen coordinate along the ruler.
    pub position: f64,
    /// Ruler unit this tick marks.
    pub value: i64,
    pub major: bool,
}

impl RulerTick {
    /// Length of the tick line, measured from the inner edge of the ruler.
    pub fn length(&self) -> f64 {
        if self.major { RULER_SIZE } else { RULER_SIZE / 2.0 }
    }

    pub fn label(&self) -> Option<String> {
        self.major.then(|| self.value.to_string())
    }
}

/// Ruler units covered by one label step at `zoom`.
pub fn units_per_label(zoom: f64) -> f64 {
    nice_number(MIN_LABEL_SPACING / (zoom * PIXELS_PER_UNIT))
}

/// Ticks visible on a ruler `length` screen pixels long.
///
/// `Axis::Horizontal` is the top ruler (follows the pan in x), `Axis::Vertical`
/// the left one. A unit sits at `unit * zoom * 10 + offset`.
pub fn ruler_ticks(axis: Axis, camera: &Camera, length: f64) -> Vec<RulerTick> {
    let pixels_per_unit = camera.zoom * PIXELS_PER_UNIT;
    if pixels_per_unit <= 0.0 || length <= 0.0 {
        return Vec::new();
    }
    let offset = match axis {
        Axis::Horizontal => camera.offset.x,
        Axis::Vertical => camera.offset.y,
    };
    let first = (-offset / pixels_per_unit).ceil() as i64;
    let last = ((length - offset) / pixels_per_unit).floor() as i64;
    (first..=last)
        .map(|unit| RulerTick {
            position: unit as f64 * pixels_per_unit + offset,
            value: unit,
            major: unit % MAJOR_EVERY == 0,
        })
        .collect()
}

/// World distance between grid lines: one major ruler step at zoom 1.
pub const GRID_SPACING: f64 = PIXELS_PER_UNIT * MAJOR_EVERY as f64;

/// Grid lines covering a canvas of `canvas` size, vertical ones first.
pub fn grid_lines(canvas: Size) -> Vec<Line> {
    let steps = |extent: f64| (0..).map(|i| i as f64 * GRID_SPACING).take_while(move |p| *p <= extent);
    let vertical = steps(canvas.width).map(|x| Line::new(Point::new(x, 0.0), Point::new(x, canvas.height)));
    let horizontal = steps(canvas.height).map(|y| Line::new(Point::new(0.0, y), Point::new(canvas.width, y)));
    vertical.chain(horizontal).collect()
}
