//! Text shape.
//!
//! The text box is a fixed rectangle; glyph layout is left to the renderer.

use super::{
    GroupId, MIN_SHAPE_SIZE, Placement, SerializableColor, ShapeId, ShapeKind, ShapeMeta,
    ShapePatch, ShapeStyle, ShapeTrait,
};
use crate::geometry;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A text box anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    pub placement: Placement,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Width of the text box.
    pub width: f64,
    /// Height of the text box.
    pub height: f64,
    pub style: ShapeStyle,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ShapeMeta>,
}

fn default_font_size() -> f64 {
    Text::DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    Text::DEFAULT_FONT_FAMILY.to_string()
}

impl Text {
    pub const DEFAULT_CONTENT: &'static str = "Text";
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    pub const DEFAULT_WIDTH: f64 = 100.0;
    pub const DEFAULT_HEIGHT: f64 = 50.0;

    /// Create a new text shape with the default font and box size.
    pub fn new(id: ShapeId, position: Point, content: impl Into<String>) -> Self {
        Self {
            id,
            placement: Placement::at(position),
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            style: ShapeStyle::new(SerializableColor::black()),
            group_id: None,
            meta: None,
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_box(mut self, width: f64, height: f64) -> Self {
        self.width = width.max(MIN_SHAPE_SIZE);
        self.height = height.max(MIN_SHAPE_SIZE);
        self
    }

    /// Check if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Text
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn group_id(&self) -> Option<&GroupId> {
        self.group_id.as_ref()
    }

    fn set_group_id(&mut self, group_id: Option<GroupId>) {
        self.group_id = group_id;
    }

    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn hit_test(&self, point: Point) -> bool {
        geometry::point_in_rotated_rect(
            point,
            self.placement.position,
            self.width * self.placement.scale_x,
            self.height * self.placement.scale_y,
            self.placement.rotation,
        )
    }

    fn normalize_transform(&mut self, scale_x: f64, scale_y: f64, min_size: f64) {
        self.width = (self.width * scale_x).abs().max(min_size);
        self.height = (self.height * scale_y).abs().max(min_size);
        self.placement.reset_scale(scale_x, scale_y);
    }

    fn apply_patch(&mut self, patch: &ShapePatch) {
        patch.apply_common(&mut self.placement, &mut self.style, &mut self.group_id, &mut self.meta);
        if let Some(width) = patch.width {
            self.width = width.max(MIN_SHAPE_SIZE);
        }
        if let Some(height) = patch.height {
            self.height = height.max(MIN_SHAPE_SIZE);
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(size) = patch.font_size {
            self.font_size = size.max(1.0);
        }
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let text = Text::new("text_1".into(), Point::new(10.0, 20.0), Text::DEFAULT_CONTENT);
        assert_eq!(text.content, "Text");
        assert_eq!(text.font_family, "Arial");
        assert!((text.font_size - 20.0).abs() < f64::EPSILON);
        assert!((text.width - 100.0).abs() < f64::EPSILON);
        assert!((text.height - 50.0).abs() < f64::EPSILON);
        assert_eq!(text.style.fill, SerializableColor::black());
        assert!(!text.is_empty());
    }

    #[test]
    fn test_patch_text_fields() {
        let mut text = Text::new("t".into(), Point::ZERO, "Hello");
        let patch = ShapePatch {
            content: Some("World".to_string()),
            font_size: Some(32.0),
            font_family: Some("Courier".to_string()),
            ..Default::default()
        };
        text.apply_patch(&patch);
        assert_eq!(text.content, "World");
        assert_eq!(text.font_family, "Courier");
        assert!((text.font_size - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_with_font_defaults() {
        let json = r#"{
            "id": "text_4",
            "placement": { "position": { "x": 1.0, "y": 2.0 } },
            "content": "hi",
            "width": 80.0,
            "height": 30.0,
            "style": { "fill": { "r": 0, "g": 0, "b": 0, "a": 255 } }
        }"#;
        let text: Text = serde_json::from_str(json).unwrap();
        assert_eq!(text.font_family, "Arial");
        assert!((text.placement.scale_x - 1.0).abs() < f64::EPSILON);
    }
}
