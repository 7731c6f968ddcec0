//! Image shape for embedding raster or SVG images.

use super::{
    GroupId, MIN_SHAPE_SIZE, Placement, SerializableColor, ShapeId, ShapeKind, ShapeMeta,
    ShapePatch, ShapeStyle, ShapeTrait,
};
use crate::error::{SceneError, SceneResult};
use crate::geometry;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Svg,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        let head = String::from_utf8_lossy(&data[..data.len().min(256)]);
        let head = head.trim_start();
        if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
            return Some(ImageFormat::Svg);
        }

        None
    }
}

/// An image shape anchored at its top-left corner.
///
/// `src` is either a plain URL or a `data:` URL holding the bytes inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    pub placement: Placement,
    pub width: f64,
    pub height: f64,
    pub src: String,
    pub style: ShapeStyle,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ShapeMeta>,
}

impl Image {
    pub const DEFAULT_SIZE: f64 = 100.0;

    /// Create an image that references `src`, at the default size.
    pub fn new(id: ShapeId, position: Point, src: impl Into<String>) -> Self {
        Self {
            id,
            placement: Placement::at(position),
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            src: src.into(),
            style: ShapeStyle::new(SerializableColor::transparent()),
            group_id: None,
            meta: None,
        }
    }

    /// Encode raw image bytes as a base64 data URL usable as `src`.
    pub fn data_url(data: &[u8]) -> SceneResult<String> {
        let format = ImageFormat::from_magic_bytes(data).ok_or(SceneError::InvalidImage)?;
        Ok(format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data)))
    }

    /// Set the display size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width.max(MIN_SHAPE_SIZE);
        self.height = height.max(MIN_SHAPE_SIZE);
        self
    }

    /// Format of an embedded data URL, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        let (mime, _) = self.src.strip_prefix("data:")?.split_once(';')?;
        [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP, ImageFormat::Svg]
            .into_iter()
            .find(|f| f.mime_type() == mime)
    }

    /// Get the embedded image bytes, or `None` when `src` is not a base64 data URL.
    pub fn decoded_bytes(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.src.strip_prefix("data:")?.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }

    /// Whether the image bytes live inside the document.
    pub fn is_embedded(&self) -> bool {
        self.src.starts_with("data:")
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Image
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
        if let Some(src) = &patch.src {
            self.src = src.clone();
        }
    }
}
