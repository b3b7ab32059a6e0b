//! embedded-graphics surface for `layer-canvas-render` canvases.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

use embedded_graphics::{
    mono_font::{
        ascii::{
            FONT_10X20, FONT_6X13_BOLD, FONT_6X13_ITALIC, FONT_6X9, FONT_7X13_ITALIC, FONT_7X14,
            FONT_7X14_BOLD, FONT_8X13, FONT_8X13_BOLD, FONT_8X13_ITALIC, FONT_9X18,
            FONT_9X18_BOLD,
        },
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{
        Circle, ContainsPoint, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle,
        RoundedRectangle,
    },
    text::{Baseline, Text},
};
use layer_canvas_render::{
    CircleImageCommand, DrawCommand, FillCommand, FontSpec, ImageCommand, RoundedRectCommand,
    SourceRect, Surface, TextCommand, TextMeasurer,
};
use std::borrow::Cow;

/// Limits for the in-memory image registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageRegistryLimits {
    /// Maximum number of registered images.
    pub max_images: usize,
    /// Maximum aggregate pixel count across all registered images.
    pub max_total_pixels: usize,
}

impl Default for ImageRegistryLimits {
    fn default() -> Self {
        Self {
            max_images: 32,
            max_total_pixels: 2048 * 2048,
        }
    }
}

/// Error returned when image registration fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageRegistryError {
    RegistryDisabled,
    EmptyPath,
    InvalidDimensions,
    InvalidPixelData,
    MaxImagesExceeded,
    MaxTotalPixelsExceeded,
}

/// Pre-decoded RGB bitmap, row-major, three bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbBitmap {
    /// Construct a bitmap from packed `r, g, b` bytes.
    pub fn from_rgb_bytes(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageRegistryError> {
        if width == 0 || height == 0 {
            return Err(ImageRegistryError::InvalidDimensions);
        }
        let Some(required_bytes) = Self::required_bytes(width, height) else {
            return Err(ImageRegistryError::InvalidDimensions);
        };
        if pixels.len() != required_bytes {
            return Err(ImageRegistryError::InvalidPixelData);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-color bitmap, handy for placeholders.
    pub fn solid(width: u32, height: u32, color: Rgb888) -> Result<Self, ImageRegistryError> {
        let count = width
            .checked_mul(height)
            .ok_or(ImageRegistryError::InvalidDimensions)? as usize;
        let pixels = [color.r(), color.g(), color.b()].repeat(count);
        Self::from_rgb_bytes(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Color at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        let rgb = self.pixels.get(offset..offset + 3)?;
        Some(Rgb888::new(rgb[0], rgb[1], rgb[2]))
    }

    fn sample(&self, x: f32, y: f32) -> Option<Rgb888> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        self.pixel(x as u32, y as u32)
    }

    fn full_source(&self) -> SourceRect {
        SourceRect {
            x: 0.0,
            y: 0.0,
            width: self.width as f32,
            height: self.height as f32,
        }
    }

    fn required_bytes(width: u32, height: u32) -> Option<usize> {
        let pixels = width.checked_mul(height)? as usize;
        pixels.checked_mul(3)
    }
}

#[derive(Clone, Debug)]
struct ImageRegistryEntry {
    path: String,
    bitmap: RgbBitmap,
}

#[derive(Clone, Debug, Default)]
struct ImageRegistry {
    limits: ImageRegistryLimits,
    total_pixels: usize,
    entries: Vec<ImageRegistryEntry>,
}

impl ImageRegistry {
    fn with_limits(limits: ImageRegistryLimits) -> Self {
        Self {
            limits,
            total_pixels: 0,
            entries: Vec::new(),
        }
    }

    fn enabled(&self) -> bool {
        self.limits.max_images > 0 && self.limits.max_total_pixels > 0
    }

    fn set_limits(&mut self, limits: ImageRegistryLimits) -> Result<(), ImageRegistryError> {
        if limits.max_images == 0 || limits.max_total_pixels == 0 {
            if self.entries.is_empty() {
                self.limits = limits;
                return Ok(());
            }
            return Err(ImageRegistryError::RegistryDisabled);
        }
        if self.entries.len() > limits.max_images {
            return Err(ImageRegistryError::MaxImagesExceeded);
        }
        if self.total_pixels > limits.max_total_pixels {
            return Err(ImageRegistryError::MaxTotalPixelsExceeded);
        }
        self.limits = limits;
        Ok(())
    }

    fn register(&mut self, path: String, bitmap: RgbBitmap) -> Result<(), ImageRegistryError> {
        if path.trim().is_empty() {
            return Err(ImageRegistryError::EmptyPath);
        }
        if !self.enabled() {
            return Err(ImageRegistryError::RegistryDisabled);
        }

        let new_pixels = bitmap.pixel_count();
        if let Some(existing) = self.entries.iter().position(|entry| entry.path == path) {
            let updated_total = self
                .total_pixels
                .saturating_sub(self.entries[existing].bitmap.pixel_count())
                .saturating_add(new_pixels);
            if updated_total > self.limits.max_total_pixels {
                return Err(ImageRegistryError::MaxTotalPixelsExceeded);
            }
            self.entries[existing].bitmap = bitmap;
            self.total_pixels = updated_total;
            return Ok(());
        }

        if self.entries.len() >= self.limits.max_images {
            return Err(ImageRegistryError::MaxImagesExceeded);
        }
        let updated_total = self.total_pixels.saturating_add(new_pixels);
        if updated_total > self.limits.max_total_pixels {
            return Err(ImageRegistryError::MaxTotalPixelsExceeded);
        }
        self.entries.push(ImageRegistryEntry { path, bitmap });
        self.total_pixels = updated_total;
        Ok(())
    }

    fn bitmap_for(&self, path: &str) -> Option<&RgbBitmap> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| &entry.bitmap)
    }
}

/// What to draw for an image path with no registered bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFallbackPolicy {
    /// Outline the destination box only.
    OutlineOnly,
    /// Outline plus the path's file name when the box is large enough.
    OutlineWithLabel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EgSurfaceConfig {
    pub image_fallback: ImageFallbackPolicy,
    pub image_limits: ImageRegistryLimits,
    /// Color of fallback outlines and labels.
    pub outline_color: Rgb888,
}

impl Default for EgSurfaceConfig {
    fn default() -> Self {
        Self {
            image_fallback: ImageFallbackPolicy::OutlineWithLabel,
            image_limits: ImageRegistryLimits::default(),
            outline_color: Rgb888::new(0x99, 0x99, 0x99),
        }
    }
}

/// Counters for degraded draws since the surface was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EgSurfaceDiagnostics {
    /// Image or circle-image draws that hit the outline fallback.
    pub image_fallback_draws: u64,
    /// Colors that did not parse and were drawn black.
    pub color_fallbacks: u64,
    /// Rectangle image fills skipped for lack of a bitmap.
    pub skipped_rect_images: u64,
}

/// Mono-font text measurement without a display.
///
/// Matches what [`EgSurface`] draws, so layouts can be sized ahead of time.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoMeasurer;

impl MonoMeasurer {
    /// Mono font drawn for `font`: size picks the bucket, style the variant.
    pub fn font_for(font: &FontSpec) -> &'static MonoFont<'static> {
        let variant = FontVariant::from_style(&font.style);
        match (SizeBucket::for_px(font.size_px), variant) {
            (SizeBucket::Small, FontVariant::Regular) => &FONT_6X9,
            (SizeBucket::Small, FontVariant::Italic) => &FONT_6X13_ITALIC,
            (SizeBucket::Small, FontVariant::Bold | FontVariant::BoldItalic) => &FONT_6X13_BOLD,
            (SizeBucket::Medium, FontVariant::Regular) => &FONT_7X14,
            (SizeBucket::Medium, FontVariant::Italic) => &FONT_7X13_ITALIC,
            (SizeBucket::Medium, FontVariant::Bold | FontVariant::BoldItalic) => &FONT_7X14_BOLD,
            (SizeBucket::Large, FontVariant::Regular) => &FONT_8X13,
            (SizeBucket::Large, FontVariant::Italic) => &FONT_8X13_ITALIC,
            (SizeBucket::Large, FontVariant::Bold | FontVariant::BoldItalic) => &FONT_8X13_BOLD,
            (SizeBucket::Xl, FontVariant::Regular) => &FONT_10X20,
            (SizeBucket::Xl, FontVariant::Italic) => &FONT_9X18,
            (SizeBucket::Xl, FontVariant::Bold | FontVariant::BoldItalic) => &FONT_9X18_BOLD,
        }
    }
}

impl TextMeasurer for MonoMeasurer {
    fn measure_text_px(&self, text: &str, font: &FontSpec) -> f32 {
        let font = Self::font_for(font);
        let chars = normalize_text_for_mono(text).chars().count() as u32;
        if chars == 0 {
            return 0.0;
        }
        let advance = chars * font.character_size.width;
        let spacing = (chars - 1) * font.character_spacing;
        (advance + spacing) as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SizeBucket {
    Small,
    Medium,
    Large,
    Xl,
}

impl SizeBucket {
    fn for_px(size_px: f32) -> Self {
        if size_px >= 24.0 {
            Self::Xl
        } else if size_px >= 20.0 {
            Self::Large
        } else if size_px >= 16.0 {
            Self::Medium
        } else {
            Self::Small
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FontVariant {
    Regular,
    Italic,
    Bold,
    BoldItalic,
}

impl FontVariant {
    /// Parse the style prefix of a CSS font shorthand (`"italic bold"`, `"700"`).
    fn from_style(style: &str) -> Self {
        let mut bold = false;
        let mut italic = false;
        for word in style.split_whitespace() {
            match word.to_ascii_lowercase().as_str() {
                "bold" | "bolder" => bold = true,
                "italic" | "oblique" => italic = true,
                other => {
                    if other.parse::<u16>().is_ok_and(|weight| weight >= 700) {
                        bold = true;
                    }
                }
            }
        }
        match (bold, italic) {
            (true, true) => Self::BoldItalic,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (false, false) => Self::Regular,
        }
    }
}

/// [`Surface`] that draws straight into an embedded-graphics target.
#[derive(Clone, Debug)]
pub struct EgSurface<D> {
    display: D,
    cfg: EgSurfaceConfig,
    images: ImageRegistry,
    line_width: u32,
    presents: usize,
    diagnostics: EgSurfaceDiagnostics,
}

impl<D> EgSurface<D>
where
    D: DrawTarget<Color = Rgb888>,
{
    pub fn new(display: D) -> Self {
        Self::with_config(display, EgSurfaceConfig::default())
    }

    pub fn with_config(display: D, cfg: EgSurfaceConfig) -> Self {
        Self {
            display,
            images: ImageRegistry::with_limits(cfg.image_limits),
            cfg,
            line_width: 1,
            presents: 0,
            diagnostics: EgSurfaceDiagnostics::default(),
        }
    }

    pub fn config(&self) -> &EgSurfaceConfig {
        &self.cfg
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Register or replace the bitmap drawn for an image `path`.
    pub fn register_image(
        &mut self,
        path: impl Into<String>,
        bitmap: RgbBitmap,
    ) -> Result<(), ImageRegistryError> {
        self.images.register(path.into(), bitmap)
    }

    pub fn set_image_registry_limits(
        &mut self,
        limits: ImageRegistryLimits,
    ) -> Result<(), ImageRegistryError> {
        self.images.set_limits(limits)
    }

    pub fn registered_image_count(&self) -> usize {
        self.images.entries.len()
    }

    pub fn registered_total_image_pixels(&self) -> usize {
        self.images.total_pixels
    }

    /// Stroke width used when a stroke does not carry its own.
    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    pub fn present_count(&self) -> usize {
        self.presents
    }

    pub fn diagnostics(&self) -> EgSurfaceDiagnostics {
        self.diagnostics
    }

    fn color(&mut self, css: &str) -> Rgb888 {
        match parse_color(css) {
            Some(color) => color,
            None => {
                log::warn!("unsupported color {:?}; drawing black", css);
                self.diagnostics.color_fallbacks = self.diagnostics.color_fallbacks.saturating_add(1);
                Rgb888::BLACK
            }
        }
    }

    fn draw_fill(&mut self, fill: &FillCommand) -> Result<(), D::Error> {
        let color = self.color(&fill.color);
        rect_from(fill.x, fill.y, fill.width, fill.height)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.display)
    }

    fn draw_rounded_rect(&mut self, rect: &RoundedRectCommand) -> Result<(), D::Error> {
        let area = rect_from(rect.x, rect.y, rect.width, rect.height);
        let shape =
            RoundedRectangle::with_equal_corners(area, Size::new_equal(px_len(rect.radius)));

        if let Some(fill) = &rect.fill {
            let color = self.color(fill);
            shape
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut self.display)?;
        }

        if let Some(path) = &rect.image {
            match self.images.bitmap_for(path) {
                Some(bitmap) => blit(
                    &mut self.display,
                    bitmap,
                    bitmap.full_source(),
                    area,
                    |point| shape.contains(point),
                )?,
                None => {
                    log::debug!("rectangle image {:?} not registered; skipped", path);
                    self.diagnostics.skipped_rect_images =
                        self.diagnostics.skipped_rect_images.saturating_add(1);
                }
            }
        }

        if let Some(stroke) = &rect.stroke {
            if let Some(width) = stroke.width {
                let width = px_len(width);
                if width > 0 {
                    self.line_width = width;
                }
            }
            let color = self.color(&stroke.color);
            let style = PrimitiveStyleBuilder::new()
                .stroke_color(color)
                .stroke_width(self.line_width)
                .build();
            shape.into_styled(style).draw(&mut self.display)?;
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageCommand) -> Result<(), D::Error> {
        let area = rect_from(image.x, image.y, image.width, image.height);
        if let Some(bitmap) = self.images.bitmap_for(&image.path) {
            let source = image.source.unwrap_or_else(|| bitmap.full_source());
            return blit(&mut self.display, bitmap, source, area, |_| true);
        }
        self.note_image_fallback(&image.path);
        area.into_styled(PrimitiveStyle::with_stroke(self.cfg.outline_color, 1))
            .draw(&mut self.display)?;
        if self.cfg.image_fallback == ImageFallbackPolicy::OutlineWithLabel {
            self.draw_fallback_label(&image.path, area)?;
        }
        Ok(())
    }

    fn draw_circle_image(&mut self, circle: &CircleImageCommand) -> Result<(), D::Error> {
        let diameter = px_len(circle.diameter);
        let shape = Circle::new(Point::new(px(circle.x), px(circle.y)), diameter);
        if let Some(bitmap) = self.images.bitmap_for(&circle.path) {
            let area = Rectangle::new(shape.top_left, Size::new_equal(diameter));
            return blit(
                &mut self.display,
                bitmap,
                bitmap.full_source(),
                area,
                |point| shape.contains(point),
            );
        }
        self.note_image_fallback(&circle.path);
        shape
            .into_styled(PrimitiveStyle::with_stroke(self.cfg.outline_color, 1))
            .draw(&mut self.display)
    }

    fn draw_text(&mut self, cmd: &TextCommand) -> Result<(), D::Error> {
        let color = self.color(&cmd.color);
        let style = MonoTextStyle::new(MonoMeasurer::font_for(&cmd.font), color);
        let text = normalize_text_for_mono(&cmd.text);
        Text::with_baseline(
            text.as_ref(),
            Point::new(px(cmd.x), px(cmd.baseline_y)),
            style,
            Baseline::Alphabetic,
        )
        .draw(&mut self.display)?;
        Ok(())
    }

    fn draw_fallback_label(&mut self, path: &str, area: Rectangle) -> Result<(), D::Error> {
        if area.size.width < 10 || area.size.height < 10 {
            return Ok(());
        }
        let Some(name) = path.rsplit('/').next().filter(|name| !name.is_empty()) else {
            return Ok(());
        };
        let style = MonoTextStyle::new(&FONT_6X9, self.cfg.outline_color);
        let max_chars = (area.size.width - 4) / style.font.character_size.width.max(1);
        let label = truncate_label(name, max_chars as usize);
        if label.is_empty() {
            return Ok(());
        }
        Text::with_baseline(
            &label,
            area.top_left + Point::new(2, 2),
            style,
            Baseline::Top,
        )
        .draw(&mut self.display)?;
        Ok(())
    }

    fn note_image_fallback(&mut self, path: &str) {
        log::debug!("image {:?} not registered; drawing outline", path);
        self.diagnostics.image_fallback_draws =
            self.diagnostics.image_fallback_draws.saturating_add(1);
    }
}

impl<D> TextMeasurer for EgSurface<D> {
    fn measure_text_px(&self, text: &str, font: &FontSpec) -> f32 {
        MonoMeasurer.measure_text_px(text, font)
    }
}

impl<D> Surface for EgSurface<D>
where
    D: DrawTarget<Color = Rgb888>,
{
    type Error = D::Error;

    fn draw(&mut self, cmd: &DrawCommand) -> Result<(), Self::Error> {
        match cmd {
            DrawCommand::Fill(fill) => self.draw_fill(fill),
            DrawCommand::RoundedRect(rect) => self.draw_rounded_rect(rect),
            DrawCommand::Image(image) => self.draw_image(image),
            DrawCommand::CircleImage(circle) => self.draw_circle_image(circle),
            DrawCommand::Text(text) => self.draw_text(text),
        }
    }

    /// Pixels are already in the target; this only counts and signals.
    fn present<F>(&mut self, on_complete: F) -> Result<(), Self::Error>
    where
        F: FnOnce(),
    {
        self.presents += 1;
        on_complete();
        Ok(())
    }
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_color(css: &str) -> Option<Rgb888> {
    let hex = css.trim().strip_prefix('#')?;
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, ch) in rgb.iter_mut().zip(hex.chars()) {
                *slot = ch.to_digit(16)? as u8 * 17;
            }
            Some(Rgb888::new(rgb[0], rgb[1], rgb[2]))
        }
        6 => {
            let value = u32::from_str_radix(hex, 16).ok()?;
            Some(Rgb888::new(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ))
        }
        _ => None,
    }
}

/// Nearest-neighbour copy of `source` into `dest`, skipping points `clip` rejects.
fn blit<D, F>(
    display: &mut D,
    bitmap: &RgbBitmap,
    source: SourceRect,
    dest: Rectangle,
    clip: F,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
    F: Fn(Point) -> bool,
{
    let Size { width, height } = dest.size;
    if width == 0 || height == 0 || source.width <= 0.0 || source.height <= 0.0 {
        return Ok(());
    }
    let step_x = source.width / width as f32;
    let step_y = source.height / height as f32;

    for dy in 0..height {
        let src_y = (source.y + (dy as f32 + 0.5) * step_y).floor();
        let y = dest.top_left.y + dy as i32;
        display.draw_iter((0..width).filter_map(|dx| {
            let point = Point::new(dest.top_left.x + dx as i32, y);
            if !clip(point) {
                return None;
            }
            let src_x = (source.x + (dx as f32 + 0.5) * step_x).floor();
            bitmap
                .sample(src_x, src_y)
                .map(|color| Pixel(point, color))
        }))?;
    }
    Ok(())
}

fn px(value: f32) -> i32 {
    value.round() as i32
}

fn px_len(value: f32) -> u32 {
    value.round().max(0.0) as u32
}

fn rect_from(x: f32, y: f32, width: f32, height: f32) -> Rectangle {
    Rectangle::new(
        Point::new(px(x), px(y)),
        Size::new(px_len(width), px_len(height)),
    )
}

fn truncate_label(label: &str, max_chars: usize) -> Cow<'_, str> {
    if label.chars().count() <= max_chars {
        return Cow::Borrowed(label);
    }
    if max_chars <= 3 {
        return Cow::Owned(label.chars().take(max_chars).collect());
    }
    let mut out: String = label.chars().take(max_chars - 3).collect();
    out.push_str("...");
    Cow::Owned(out)
}

/// ASCII stand-in for typographic punctuation the ASCII mono fonts lack.
fn mono_stand_in(ch: char) -> Option<&'static str> {
    Some(match ch {
        '\u{00A0}' => " ",
        '\u{2013}' | '\u{2014}' => "-",
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        '\u{2026}' => "...",
        _ => return None,
    })
}

fn normalize_text_for_mono(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|ch| mono_stand_in(ch).is_some()) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match mono_stand_in(ch) {
            Some(stand_in) => out.push_str(stand_in),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}
