//! Shape definitions for the canvas.

mod circle;
mod image;
mod rectangle;
mod star;
mod text;

pub use circle::Circle;
pub use image::{Image, ImageFormat};
pub use rectangle::Rectangle;
pub use star::Star;
pub use text::Text;

use crate::error::SceneError;
use crate::geometry::{self, Axis};
use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Floor for width, height and radii after a resize.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Unique identifier for shapes (e.g. `"rectangle_1"`).
pub type ShapeId = String;

/// Identifier shared by the members of a group.
pub type GroupId = String;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `transparent` or a
    /// common color name. Anything else falls back to black.
    pub fn parse(color: &str) -> Self {
        let color = color.trim();
        let parsed = match color.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => named_color(&color.to_ascii_lowercase()),
        };
        parsed.unwrap_or_else(|| {
            log::warn!("Unrecognized color '{}', using black", color);
            Self::black()
        })
    }
}

fn parse_hex(hex: &str) -> Option<SerializableColor> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match hex.len() {
        // #rgb -> #rrggbb
        3 => Some(SerializableColor::new(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
            255,
        )),
        6 => Some(SerializableColor::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
        8 => Some(SerializableColor::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<SerializableColor> {
    let c = match name {
        "transparent" => SerializableColor::transparent(),
        "black" => SerializableColor::new(0, 0, 0, 255),
        "white" => SerializableColor::new(255, 255, 255, 255),
        "red" => SerializableColor::new(255, 0, 0, 255),
        "green" => SerializableColor::new(0, 128, 0, 255),
        "blue" => SerializableColor::new(0, 0, 255, 255),
        "yellow" => SerializableColor::new(255, 255, 0, 255),
        "orange" => SerializableColor::new(255, 165, 0, 255),
        "purple" => SerializableColor::new(128, 0, 128, 255),
        "gray" | "grey" => SerializableColor::new(128, 128, 128, 255),
        "lightgray" | "lightgrey" => SerializableColor::new(211, 211, 211, 255),
        _ => return None,
    };
    Some(c)
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color.
    pub fill: SerializableColor,
}

impl ShapeStyle {
    pub fn new(fill: SerializableColor) -> Self {
        Self { fill }
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Color {
        self.fill.into()
    }

    /// Set the fill color from a peniko Color.
    pub fn set_fill(&mut self, color: Color) {
        self.fill = color.into();
    }
}

/// Position, rotation and scale of a shape.
///
/// `position` is the anchor: top-left (before rotation) for box-like shapes,
/// the center for circles and stars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Point,
    /// Rotation in degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl Placement {
    /// Placement at `position` with no rotation and unit scale.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Local-to-world transform.
    pub fn transform(&self) -> Affine {
        geometry::placement_transform(self.position, self.rotation, self.scale_x, self.scale_y)
    }

    /// Drop the magnitude of the scale, keeping only its sign (the mirror bit).
    pub(crate) fn reset_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x = scale_x.signum();
        self.scale_y = scale_y.signum();
    }

    /// Whether the shape is drawn mirrored on either axis.
    pub fn is_flipped(&self) -> bool {
        self.scale_x < 0.0 || self.scale_y < 0.0
    }
}

/// Free-form metadata attached to a shape (shown as a hover tooltip).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeMeta {
    /// Tooltip text.
    pub tooltip: String,
    /// Extra detail lines.
    #[serde(default)]
    pub details: Vec<String>,
}

/// The kind of a shape, also used as the palette token for drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Star,
    Image,
    Text,
}

impl ShapeKind {
    /// Lower-case name, used as the id prefix.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Star => "star",
            ShapeKind::Image => "image",
            ShapeKind::Text => "text",
        }
    }

    /// Get all shape kinds.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Star,
            ShapeKind::Image,
            ShapeKind::Text,
        ]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Ok(ShapeKind::Rectangle),
            "circle" => Ok(ShapeKind::Circle),
            "star" => Ok(ShapeKind::Star),
            "image" | "svg" => Ok(ShapeKind::Image),
            "text" => Ok(ShapeKind::Text),
            other => Err(SceneError::UnknownKind(other.to_string())),
        }
    }
}

/// Partial update for a shape. `None` leaves a field unchanged.
///
/// Size fields that do not apply to the target kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapePatch {
    pub position: Option<Point>,
    pub rotation: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub fill: Option<SerializableColor>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: Option<f64>,
    pub num_points: Option<u32>,
    pub inner_radius: Option<f64>,
    pub outer_radius: Option<f64>,
    pub content: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub src: Option<String>,
    /// `Some(None)` removes the shape from its group.
    pub group_id: Option<Option<GroupId>>,
    pub meta: Option<Option<ShapeMeta>>,
}

impl ShapePatch {
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_fill(mut self, fill: SerializableColor) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Apply the fields shared by every kind.
    fn apply_common(
        &self,
        placement: &mut Placement,
        style: &mut ShapeStyle,
        group_id: &mut Option<GroupId>,
        meta: &mut Option<ShapeMeta>,
    ) {
        if let Some(position) = self.position {
            placement.position = position;
        }
        if let Some(rotation) = self.rotation {
            placement.rotation = rotation;
        }
        if let Some(sx) = self.scale_x {
            placement.scale_x = sx;
        }
        if let Some(sy) = self.scale_y {
            placement.scale_y = sy;
        }
        if let Some(fill) = self.fill {
            style.fill = fill;
        }
        if let Some(group) = &self.group_id {
            *group_id = group.clone();
        }
        if let Some(m) = &self.meta {
            *meta = m.clone();
        }
    }
}

/// Behavior every shape kind provides. `Shape` dispatches to these.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> &ShapeId;

    /// Get the kind token.
    fn kind(&self) -> ShapeKind;

    fn placement(&self) -> &Placement;

    fn placement_mut(&mut self) -> &mut Placement;

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    fn group_id(&self) -> Option<&GroupId>;

    fn set_group_id(&mut self, group_id: Option<GroupId>);

    /// Geometry in the shape's own frame (before placement).
    fn local_bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point) -> bool;

    /// Bake a post-gesture scale into the size fields and reset the scale.
    fn normalize_transform(&mut self, scale_x: f64, scale_y: f64, min_size: f64);

    /// Apply a partial update.
    fn apply_patch(&mut self, patch: &ShapePatch);

    /// Axis-aligned bounding box in world coordinates (the "client rect").
    fn bounds(&self) -> Rect {
        geometry::client_rect(self.local_bounds(), self.placement().transform())
    }
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Star(Star),
    Image(Image),
    Text(Text),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Rectangle($s) => $body,
            Shape::Circle($s) => $body,
            Shape::Star($s) => $body,
            Shape::Image($s) => $body,
            Shape::Text($s) => $body,
        }
    };
}

impl Shape {
    /// Create a shape of `kind` with the palette defaults, anchored at `anchor`.
    pub fn new_default(kind: ShapeKind, id: ShapeId, anchor: Point) -> Self {
        match kind {
            ShapeKind::Rectangle => Shape::Rectangle(Rectangle::new(id, anchor)),
            ShapeKind::Circle => Shape::Circle(Circle::new(id, anchor)),
            ShapeKind::Star => Shape::Star(Star::new(id, anchor)),
            ShapeKind::Image => Shape::Image(Image::new(id, anchor, String::new())),
            ShapeKind::Text => Shape::Text(Text::new(id, anchor, Text::DEFAULT_CONTENT)),
        }
    }

    /// Default size of a freshly created shape of `kind`.
    pub fn default_size(kind: ShapeKind) -> kurbo::Size {
        match kind {
            ShapeKind::Rectangle => kurbo::Size::new(Rectangle::DEFAULT_SIZE, Rectangle::DEFAULT_SIZE),
            ShapeKind::Circle => kurbo::Size::new(Circle::DEFAULT_RADIUS * 2.0, Circle::DEFAULT_RADIUS * 2.0),
            ShapeKind::Star => kurbo::Size::new(Star::DEFAULT_OUTER_RADIUS * 2.0, Star::DEFAULT_OUTER_RADIUS * 2.0),
            ShapeKind::Image => kurbo::Size::new(Image::DEFAULT_SIZE, Image::DEFAULT_SIZE),
            ShapeKind::Text => kurbo::Size::new(Text::DEFAULT_WIDTH, Text::DEFAULT_HEIGHT),
        }
    }

    /// Whether the anchor of `kind` is its center (as opposed to its top-left).
    pub fn is_center_anchored(kind: ShapeKind) -> bool {
        matches!(kind, ShapeKind::Circle | ShapeKind::Star)
    }

    pub fn id(&self) -> &ShapeId {
        dispatch!(self, s => s.id())
    }

    pub(crate) fn set_id(&mut self, id: ShapeId) {
        dispatch!(self, s => s.id = id)
    }

    pub fn kind(&self) -> ShapeKind {
        dispatch!(self, s => s.kind())
    }

    pub fn placement(&self) -> &Placement {
        dispatch!(self, s => s.placement())
    }

    pub fn placement_mut(&mut self) -> &mut Placement {
        dispatch!(self, s => s.placement_mut())
    }

    pub fn position(&self) -> Point {
        self.placement().position
    }

    pub fn set_position(&mut self, position: Point) {
        self.placement_mut().position = position;
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.placement().rotation
    }

    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        dispatch!(self, s => s.style_mut())
    }

    pub fn group_id(&self) -> Option<&GroupId> {
        dispatch!(self, s => s.group_id())
    }

    pub fn set_group_id(&mut self, group_id: Option<GroupId>) {
        dispatch!(self, s => s.set_group_id(group_id))
    }

    pub fn meta(&self) -> Option<&ShapeMeta> {
        match self {
            Shape::Rectangle(s) => s.meta.as_ref(),
            Shape::Circle(s) => s.meta.as_ref(),
            Shape::Star(s) => s.meta.as_ref(),
            Shape::Image(s) => s.meta.as_ref(),
            Shape::Text(s) => s.meta.as_ref(),
        }
    }

    /// Client rect in world coordinates.
    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    pub fn hit_test(&self, point: Point) -> bool {
        dispatch!(self, s => s.hit_test(point))
    }

    /// Offset from the anchor to the client-rect origin.
    ///
    /// Negative for center-anchored shapes, non-zero for rotated or mirrored ones.
    pub fn anchor_offset(&self) -> Vec2 {
        let bounds = self.bounds();
        let position = self.position();
        Vec2::new(bounds.x0 - position.x, bounds.y0 - position.y)
    }

    /// Size of the client rect along an axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        let (start, end) = axis.span(self.bounds());
        end - start
    }

    /// Move the anchor by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        let placement = self.placement_mut();
        placement.position += delta;
    }

    /// Bake a gesture scale into the size fields; see [`ShapeTrait::normalize_transform`].
    pub fn normalize_transform(&mut self, scale_x: f64, scale_y: f64, min_size: f64) {
        dispatch!(self, s => s.normalize_transform(scale_x, scale_y, min_size))
    }

    pub fn apply_patch(&mut self, patch: &ShapePatch) {
        dispatch!(self, s => s.apply_patch(patch))
    }

    /// Get the image if this shape is an image.
    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Shape::Image(img) => Some(img),
            _ => None,
        }
    }
}
