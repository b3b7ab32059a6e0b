use layer_canvas::{
    CanvasError, ImageMode, Layer, LayerKind, LayerRegistry, LayoutDiagnostic, LayoutSession,
    Scale,
};

use crate::render_ir::{
    CircleImageCommand, DrawCommand, FillCommand, FontSpec, ImageCommand, RoundedRectCommand,
    SourceRect, StrokeStyle, TextCommand,
};
use crate::render_layout::{wrap_text, WrapRequest};
use crate::surface::Surface;

/// Fallbacks for wrapped text, in device units.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDefaults {
    pub font_size: f32,
    pub font_style: String,
    pub font_family: String,
    pub color: String,
    /// Wrap box width.
    pub width: f32,
    /// Extra spacing between lines.
    pub line_height: f32,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            font_style: String::new(),
            font_family: "Arial".to_string(),
            color: "#333333".to_string(),
            width: 200.0,
            line_height: 1.0,
        }
    }
}

/// Canvas session options.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
    /// Device units per caller unit.
    pub scale: f32,
    pub text: TextDefaults,
    /// Artboard fill when the layer sets no `backgroundColor`.
    pub artboard_background: String,
    /// Suffix for text cut at `maxLine`.
    pub ellipsis: String,
}

impl CanvasConfig {
    /// Defaults with an explicit scale.
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            text: TextDefaults::default(),
            artboard_background: "#cccccc".to_string(),
            ellipsis: "...".to_string(),
        }
    }
}

/// One drawing session: resolves layers, draws them onto `S`, registers them.
///
/// Creation methods return `&mut Self` so calls chain with `?`. Layout
/// problems never fail a call; they surface as [`LayoutDiagnostic`]s.
pub struct Canvas<S> {
    cfg: CanvasConfig,
    session: LayoutSession,
    surface: S,
}

impl<S> core::fmt::Debug for Canvas<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("cfg", &self.cfg)
            .field("session", &self.session)
            .finish()
    }
}

impl<S> Canvas<S>
where
    S: Surface,
{
    /// Start a session on `surface`.
    pub fn new(cfg: CanvasConfig, surface: S) -> Result<Self, CanvasError> {
        let scale = Scale::new(cfg.scale)?;
        Ok(Self {
            cfg,
            session: LayoutSession::new(scale),
            surface,
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &LayerRegistry {
        self.session.registry()
    }

    pub fn diagnostics(&self) -> &[LayoutDiagnostic] {
        self.session.diagnostics()
    }

    pub fn set_diagnostic_sink<F>(&mut self, sink: F)
    where
        F: FnMut(&LayoutDiagnostic) + 'static,
    {
        self.session.set_diagnostic_sink(sink);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Lowest content edge in caller units, ignoring artboards.
    ///
    /// `None` until a layer has been added.
    pub fn auto_height(&self) -> Option<f32> {
        self.session.auto_height()
    }

    /// Fill the board at the origin.
    ///
    /// Artboard geometry is taken as device units and is not resolved
    /// against other layers.
    pub fn create_artboard(&mut self, layer: Layer) -> Result<&mut Self, S::Error> {
        let mut board = self.session.adopt_device_layer(layer);
        let color = board
            .background_color
            .clone()
            .unwrap_or_else(|| self.cfg.artboard_background.clone());
        self.surface.draw(&DrawCommand::Fill(FillCommand {
            x: 0.0,
            y: 0.0,
            width: board.width.unwrap_or(0.0),
            height: board.height.unwrap_or(0.0),
            color,
        }))?;
        board.set_kind(LayerKind::Artboard);
        self.session.add_layer(board);
        Ok(self)
    }

    pub fn create_rectangle(&mut self, layer: Layer) -> Result<&mut Self, S::Error> {
        let mut rect = self.session.resolve_position(layer);
        let stroke = rect.border_color.clone().map(|color| StrokeStyle {
            color,
            width: rect.border_width.filter(|w| *w != 0.0),
        });
        self.surface
            .draw(&DrawCommand::RoundedRect(RoundedRectCommand {
                x: rect.left.unwrap_or(0.0),
                y: rect.top.unwrap_or(0.0),
                width: rect.width.unwrap_or(0.0),
                height: rect.height.unwrap_or(0.0),
                radius: rect.radius.unwrap_or(0.0),
                fill: rect.background_color.clone(),
                image: rect.path.clone(),
                stroke,
            }))?;
        rect.set_kind(LayerKind::Rectangle);
        self.session.add_layer(rect);
        Ok(self)
    }

    /// Draw a bitmap; `mode: center` crops the source to the box's aspect ratio.
    pub fn draw_image(&mut self, layer: Layer) -> Result<&mut Self, S::Error> {
        let mut image = self.session.resolve_position(layer);
        let scale = self.session.scale().forward();
        let width = image.width.unwrap_or(0.0);
        let height = image.height.unwrap_or(0.0);
        let source = match (image.mode, image.s_width, image.s_height) {
            (Some(ImageMode::Center), Some(s_width), Some(s_height)) => {
                SourceRect::center_fit(width, height, s_width, s_height)
                    .map(|crop| crop.unscaled(scale))
            }
            (Some(ImageMode::Center), _, _) => {
                log::debug!(
                    "image {}: center mode needs sWidth and sHeight; drawing unfitted",
                    image.label()
                );
                None
            }
            _ => None,
        };
        match image.path.clone() {
            Some(path) => self.surface.draw(&DrawCommand::Image(ImageCommand {
                path,
                source,
                x: image.left.unwrap_or(0.0),
                y: image.top.unwrap_or(0.0),
                width,
                height,
            }))?,
            None => log::debug!("image {}: no path, nothing drawn", image.label()),
        }
        image.set_kind(LayerKind::Image);
        self.session.add_layer(image);
        Ok(self)
    }

    /// Draw a bitmap clipped to a circle of diameter `d`; the layer's box becomes `d`×`d`.
    pub fn draw_circle_image(&mut self, layer: Layer) -> Result<&mut Self, S::Error> {
        let mut circle = self.session.resolve_position(layer);
        match circle.path.clone() {
            Some(path) => self
                .surface
                .draw(&DrawCommand::CircleImage(CircleImageCommand {
                    path,
                    x: circle.left.unwrap_or(0.0),
                    y: circle.top.unwrap_or(0.0),
                    diameter: circle.d.unwrap_or(0.0),
                }))?,
            None => log::debug!("circle image {}: no path, nothing drawn", circle.label()),
        }
        let d = circle.d;
        circle.set_kind(LayerKind::CircleImage);
        circle.set_width(d);
        circle.set_height(d);
        self.session.add_layer(circle);
        Ok(self)
    }

    /// Wrap text into the layer's `width` using the surface's measurement.
    ///
    /// The finished layer's `height` reaches the last baseline and its `width`
    /// is the width of the last line.
    pub fn draw_wrap_text(&mut self, layer: Layer) -> Result<&mut Self, S::Error> {
        let mut block = self.session.resolve_position(layer);
        let defaults = &self.cfg.text;
        let color = block
            .color
            .clone()
            .unwrap_or_else(|| defaults.color.clone());
        let req = WrapRequest {
            text: block.text.as_deref().unwrap_or(""),
            font: FontSpec {
                style: block
                    .font_style
                    .clone()
                    .unwrap_or_else(|| defaults.font_style.clone()),
                size_px: block.font_size.unwrap_or(defaults.font_size),
                family: block
                    .font_family
                    .clone()
                    .unwrap_or_else(|| defaults.font_family.clone()),
            },
            left: block.left.unwrap_or(0.0),
            top: block.top.unwrap_or(0.0),
            max_width: block.width.unwrap_or(defaults.width),
            line_height: block.line_height.unwrap_or(defaults.line_height),
            max_line: block.max_line,
            ellipsis: &self.cfg.ellipsis,
        };
        let wrapped = wrap_text(&req, &self.surface);
        let font = req.font;

        for line in wrapped.lines {
            self.surface.draw(&DrawCommand::Text(TextCommand {
                text: line.text,
                x: line.x,
                baseline_y: line.baseline_y,
                font: font.clone(),
                color: color.clone(),
            }))?;
        }

        block.set_kind(LayerKind::WrapText);
        block.set_height(Some(wrapped.height));
        block.set_width(Some(wrapped.width));
        self.session.add_layer(block);
        Ok(self)
    }

    /// Commit all drawing; `on_complete` fires once the surface is done.
    pub fn present<F>(&mut self, on_complete: F) -> Result<(), S::Error>
    where
        F: FnOnce(),
    {
        log::debug!(
            "present: {} layer(s), {} diagnostic(s)",
            self.registry().len(),
            self.diagnostics().len()
        );
        self.surface.present(on_complete)
    }

    /// Await the surface's completion signal instead of passing a callback.
    #[cfg(feature = "async")]
    pub async fn present_async(&mut self) -> Result<(), S::Error> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.present(move || {
            let _ = tx.send(());
        })?;
        if rx.await.is_err() {
            log::warn!("present: surface dropped the completion callback without firing it");
        }
        Ok(())
    }
}
