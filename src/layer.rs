//! Layer data model.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// Kind tag assigned to a layer when it is finalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    /// Background board covering the whole surface.
    Artboard,
    /// Optionally rounded, filled, stroked or image-clipped rectangle.
    Rectangle,
    /// Rectangular bitmap.
    Image,
    /// Bitmap clipped to a circle of diameter `d`.
    CircleImage,
    /// Greedily wrapped text block.
    WrapText,
}

impl LayerKind {
    /// Stable name used in diagnostics and serialized scenes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artboard => "artboard",
            Self::Rectangle => "rectangle",
            Self::Image => "image",
            Self::CircleImage => "circleImage",
            Self::WrapText => "wrapText",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image fitting mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageMode {
    /// Draw the whole bitmap into the destination box.
    #[default]
    Stretch,
    /// Crop the source around its center to the destination aspect ratio.
    Center,
}

impl From<String> for ImageMode {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("center") {
            Self::Center
        } else {
            Self::Stretch
        }
    }
}

impl From<ImageMode> for String {
    fn from(value: ImageMode) -> Self {
        match value {
            ImageMode::Stretch => "stretch".to_string(),
            ImageMode::Center => "center".to_string(),
        }
    }
}

/// One-shot positioning constraint against an already registered layer.
///
/// `top`/`left` are offsets from the referenced layer's bottom/right edge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferLayer {
    /// Identifier of the referenced layer.
    pub id: String,
    /// Offset below the referenced layer's bottom edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    /// Offset right of the referenced layer's right edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
}

/// One drawable unit.
///
/// Every field is optional; shape routines apply their own defaults. Numeric
/// lengths are in caller units until resolved, see [`crate::Scale`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LayerKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Diameter of a circle image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    /// Opaque image resource reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ImageMode>,
    /// Source width used by [`ImageMode::Center`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s_width: Option<f32>,
    /// Source height used by [`ImageMode::Center`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s_height: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Extra spacing between wrapped lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    /// Wrapped line count at which text is cut with an ellipsis.
    ///
    /// Scaled like every other number, so it only cuts when the scaled value
    /// is a whole line count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refer_layer: Option<ReferLayer>,
}

impl Layer {
    /// Names of the scalable fields, in [`numeric_fields_mut`](Self::numeric_fields_mut) order.
    ///
    /// Every `f32` field of `Layer` must appear here and in `numeric_fields_mut`.
    pub const NUMERIC_FIELDS: [&'static str; 12] = [
        "top",
        "left",
        "width",
        "height",
        "d",
        "borderWidth",
        "radius",
        "sWidth",
        "sHeight",
        "fontSize",
        "lineHeight",
        "maxLine",
    ];

    /// Decode one layer from its JSON description.
    pub fn from_json_str(json: &str) -> Result<Self, CanvasError> {
        serde_json::from_str(json).map_err(|err| CanvasError::invalid_layer_json(&err))
    }

    /// Mutable access to every scalable field.
    pub fn numeric_fields_mut(&mut self) -> [&mut Option<f32>; 12] {
        [
            &mut self.top,
            &mut self.left,
            &mut self.width,
            &mut self.height,
            &mut self.d,
            &mut self.border_width,
            &mut self.radius,
            &mut self.s_width,
            &mut self.s_height,
            &mut self.font_size,
            &mut self.line_height,
            &mut self.max_line,
        ]
    }

    /// Multiply every present numeric field by `factor`.
    pub fn scale_by(&mut self, factor: f32) {
        for value in self.numeric_fields_mut().into_iter().flatten() {
            *value *= factor;
        }
    }

    /// `top + height`, reading missing fields as zero.
    pub fn bottom_edge(&self) -> f32 {
        self.top.unwrap_or(0.0) + self.height.unwrap_or(0.0)
    }

    /// `left + width`, reading missing fields as zero.
    pub fn right_edge(&self) -> f32 {
        self.left.unwrap_or(0.0) + self.width.unwrap_or(0.0)
    }

    /// Identifier for log output.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<unnamed>")
    }
}
