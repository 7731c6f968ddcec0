//! Bringing shapes in from outside: parsed SVG primitives and saved scene files.

use crate::canvas::Canvas;
use crate::error::{SceneError, SceneResult};
use crate::shapes::{SerializableColor, Shape, ShapeId, ShapeKind, ShapeMeta, ShapePatch};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A primitive already extracted from SVG markup by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "primitive", rename_all = "snake_case")]
pub enum PrimitiveDescriptor {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        fill: Option<String>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        #[serde(default)]
        fill: Option<String>,
    },
    /// A star-like polygon.
    Polygon {
        cx: f64,
        cy: f64,
        points: u32,
        inner_radius: f64,
        outer_radius: f64,
        #[serde(default)]
        fill: Option<String>,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: String,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        fill: Option<String>,
    },
}

impl PrimitiveDescriptor {
    pub fn kind(&self) -> ShapeKind {
        match self {
            PrimitiveDescriptor::Rect { .. } => ShapeKind::Rectangle,
            PrimitiveDescriptor::Circle { .. } => ShapeKind::Circle,
            PrimitiveDescriptor::Polygon { .. } => ShapeKind::Star,
            PrimitiveDescriptor::Image { .. } => ShapeKind::Image,
            PrimitiveDescriptor::Text { .. } => ShapeKind::Text,
        }
    }

    /// Build the shape this primitive describes.
    pub fn to_shape(&self, id: ShapeId) -> Shape {
        let (anchor, patch) = match self {
            PrimitiveDescriptor::Rect { x, y, width, height, .. } => (
                Point::new(*x, *y),
                ShapePatch::default().with_size(*width, *height),
            ),
            PrimitiveDescriptor::Circle { cx, cy, r, .. } => {
                (Point::new(*cx, *cy), ShapePatch::default().with_radius(*r))
            }
            PrimitiveDescriptor::Polygon {
                cx,
                cy,
                points,
                inner_radius,
                outer_radius,
                ..
            } => (
                Point::new(*cx, *cy),
                ShapePatch {
                    num_points: Some(*points),
                    inner_radius: Some(*inner_radius),
                    outer_radius: Some(*outer_radius),
                    ..ShapePatch::default()
                },
            ),
            PrimitiveDescriptor::Image { x, y, width, height, href } => (
                Point::new(*x, *y),
                ShapePatch {
                    src: Some(href.clone()),
                    ..ShapePatch::default().with_size(*width, *height)
                },
            ),
            PrimitiveDescriptor::Text { x, y, content, font_size, .. } => (
                Point::new(*x, *y),
                ShapePatch {
                    content: Some(content.clone()),
                    font_size: *font_size,
                    ..ShapePatch::default()
                },
            ),
        };
        let mut shape = Shape::new_default(self.kind(), id, anchor);
        shape.apply_patch(&patch);
        if let Some(fill) = self.fill() {
            shape.style_mut().fill = SerializableColor::parse(fill);
        }
        shape
    }

    fn fill(&self) -> Option<&str> {
        match self {
            PrimitiveDescriptor::Rect { fill, .. }
            | PrimitiveDescriptor::Circle { fill, .. }
            | PrimitiveDescriptor::Polygon { fill, .. }
            | PrimitiveDescriptor::Text { fill, .. } => fill.as_deref(),
            PrimitiveDescriptor::Image { .. } => None,
        }
    }
}

/// Header of a saved scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneProfile {
    pub name: String,
    #[serde(default)]
    pub lastupdated: String,
}

/// One named layer: an offset plus the shapes drawn on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayer {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<ShapeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneStage {
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub layers: BTreeMap<String, SceneLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneObjects {
    #[serde(default)]
    pub shapes: Vec<ShapeRecord>,
}

/// Hover data attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    #[serde(default)]
    pub tooltip: String,
    /// Detail lines keyed by name; imported in key order.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

/// A shape as stored in a scene file. Which fields are required depends on `kind`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: Option<f64>,
    pub num_points: Option<u32>,
    pub inner_radius: Option<f64>,
    pub fill: Option<String>,
    pub rotation: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub mydata: Option<RecordMeta>,
}

impl ShapeRecord {
    fn require<T: Copy>(&self, value: Option<T>, field: &'static str) -> SceneResult<T> {
        value.ok_or_else(|| SceneError::MissingField {
            id: self.id.clone(),
            field,
        })
    }

    /// Validate the record and build its shape, shifted by the layer `offset`.
    pub fn to_shape(&self, offset: Vec2) -> SceneResult<Shape> {
        let kind: ShapeKind = self.kind.parse()?;
        let mut patch = ShapePatch {
            rotation: self.rotation,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            fill: self.fill.as_deref().map(SerializableColor::parse),
            meta: self.mydata.as_ref().map(|data| {
                Some(ShapeMeta {
                    tooltip: data.tooltip.clone(),
                    details: data.details.values().cloned().collect(),
                })
            }),
            ..ShapePatch::default()
        };
        match kind {
            ShapeKind::Rectangle => {
                patch.width = Some(self.require(self.width, "width")?);
                patch.height = Some(self.require(self.height, "height")?);
            }
            ShapeKind::Circle => {
                patch.radius = Some(self.require(self.radius, "radius")?);
            }
            ShapeKind::Star => {
                patch.num_points = Some(self.require(self.num_points, "numPoints")?);
                patch.inner_radius = Some(self.require(self.inner_radius, "innerRadius")?);
                patch.outer_radius = Some(self.require(self.radius, "radius")?);
            }
            ShapeKind::Image => {
                let src = self.image.as_ref().filter(|s| !s.is_empty());
                patch.src = Some(
                    src.cloned()
                        .ok_or_else(|| SceneError::MissingField { id: self.id.clone(), field: "image" })?,
                );
                patch.width = self.width;
                patch.height = self.height;
            }
            ShapeKind::Text => {
                let content = self.text.as_ref().filter(|s| !s.is_empty());
                patch.content = Some(
                    content
                        .cloned()
                        .ok_or_else(|| SceneError::MissingField { id: self.id.clone(), field: "text" })?,
                );
                patch.font_size = self.font_size;
                patch.font_family = self.font_family.clone();
                patch.width = self.width;
                patch.height = self.height;
            }
        }

        let mut shape = Shape::new_default(kind, self.id.clone(), Point::new(self.x, self.y) + offset);
        shape.apply_patch(&patch);
        Ok(shape)
    }
}

/// A saved scene: profile, stage with named layers, plus loose objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub canvasprofile: SceneProfile,
    pub canvasstage: SceneStage,
    #[serde(default)]
    pub canvasobjects: SceneObjects,
}

impl SceneFile {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn stage_size(&self) -> Size {
        Size::new(self.canvasstage.w, self.canvasstage.h)
    }

    /// Validate every record and build the shapes: layers in name order, then
    /// the loose objects. The first bad record fails the whole import.
    pub fn into_shapes(self) -> SceneResult<Vec<Shape>> {
        let layered = self
            .canvasstage
            .layers
            .values()
            .flat_map(|layer| layer.shapes.iter().map(move |r| (r, Vec2::new(layer.x, layer.y))));
        let loose = self.canvasobjects.shapes.iter().map(|r| (r, Vec2::ZERO));

        let mut seen = HashSet::new();
        let mut shapes = Vec::new();
        for (record, offset) in layered.chain(loose) {
            if !seen.insert(record.id.as_str()) {
                return Err(SceneError::DuplicateId(record.id.clone()));
            }
            shapes.push(record.to_shape(offset)?);
        }
        Ok(shapes)
    }
}

impl Canvas {
    /// Add shapes for already-parsed SVG primitives as one undoable step.
    pub fn import_primitives(&mut self, primitives: &[PrimitiveDescriptor]) -> Vec<ShapeId> {
        let ids = self.record(
            |doc, _| {
                primitives
                    .iter()
                    .map(|primitive| {
                        let id = doc.allocate_id(primitive.kind());
                        doc.add_shape(primitive.to_shape(id.clone()));
                        id
                    })
                    .collect::<Vec<_>>()
            },
            |ids| !ids.is_empty(),
        );
        log::info!("Imported {} primitive(s)", ids.len());
        ids
    }

    /// Replace the document contents with a scene file. Nothing changes if
    /// any record is invalid.
    pub fn load_scene(&mut self, scene: SceneFile) -> SceneResult<usize> {
        let stage = scene.stage_size();
        let name = scene.canvasprofile.name.clone();
        let shapes = scene.into_shapes()?;
        let count = shapes.len();
        self.record(
            |doc, selection| {
                doc.clear();
                selection.clear();
                for shape in shapes {
                    doc.add_shape(shape);
                }
                doc.reconcile_id_counter();
                if !name.is_empty() {
                    doc.name = name;
                }
            },
            |_| true,
        );
        if stage.width > 0.0 && stage.height > 0.0 {
            self.config.canvas_width = stage.width;
            self.config.canvas_height = stage.height;
            self.camera.clamp_pan(self.viewport_size, self.canvas_size());
        }
        log::info!("Loaded scene with {} shape(s)", count);
        Ok(count)
    }
}
