use core::fmt;
use serde::Serialize;

/// Font selection handed to measurement and text drawing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FontSpec {
    /// CSS-like style prefix (`italic`, `bold`, or empty).
    pub style: String,
    /// Size in device pixels.
    pub size_px: f32,
    pub family: String,
}

impl fmt::Display for FontSpec {
    /// Formats as `"{style} {size}px {family}"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}px {}", self.style, self.size_px, self.family)
    }
}

/// Backend-agnostic drawing operation in device units.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Solid axis-aligned fill.
    Fill(FillCommand),
    /// Rounded rectangle path with optional fill, image clip and stroke.
    RoundedRect(RoundedRectCommand),
    /// Bitmap blit.
    Image(ImageCommand),
    /// Bitmap clipped to a circle.
    CircleImage(CircleImageCommand),
    /// One line of text at a baseline.
    Text(TextCommand),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FillCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

/// Stroke settings; `width: None` keeps the surface's current line width.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub color: String,
    pub width: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundedRectCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Corner radius; `0` draws square corners.
    pub radius: f32,
    pub fill: Option<String>,
    /// Image drawn into the rectangle, clipped to its path.
    pub image: Option<String>,
    pub stroke: Option<StrokeStyle>,
}

/// Source crop in bitmap pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SourceRect {
    /// Center crop of a `src_w`×`src_h` box matching the destination aspect ratio.
    ///
    /// Fits the crop to the full source width first, then falls back to the
    /// full source height when that would overflow. Returns `None` for a
    /// degenerate destination.
    pub fn center_fit(dest_w: f32, dest_h: f32, src_w: f32, src_h: f32) -> Option<Self> {
        if dest_w <= 0.0 || dest_h <= 0.0 {
            return None;
        }
        let mut width = src_w;
        let mut height = dest_h * (src_w / dest_w);
        if height > src_h {
            height = src_h;
            width = dest_w * (src_h / dest_h);
        }
        Some(Self {
            x: (src_w - width) / 2.0,
            y: (src_h - height) / 2.0,
            width,
            height,
        })
    }

    /// Divide every component by `factor`.
    pub fn unscaled(self, factor: f32) -> Self {
        Self {
            x: self.x / factor,
            y: self.y / factor,
            width: self.width / factor,
            height: self.height / factor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageCommand {
    /// Opaque image reference.
    pub path: String,
    /// Optional crop of the source bitmap.
    pub source: Option<SourceRect>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CircleImageCommand {
    pub path: String,
    /// Top-left of the bounding square.
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
}

impl CircleImageCommand {
    /// Circle center.
    pub fn center(&self) -> (f32, f32) {
        let r = self.diameter / 2.0;
        (self.x + r, self.y + r)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextCommand {
    pub text: String,
    /// Left x.
    pub x: f32,
    /// Baseline y.
    pub baseline_y: f32,
    pub font: FontSpec,
    pub color: String,
}

/// Ordered draw commands committed by one present.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Text commands only, in draw order.
    pub fn text_commands(&self) -> impl Iterator<Item = &TextCommand> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Pretty JSON dump for inspection and golden tests.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
