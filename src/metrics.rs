//! Font-free text size estimates for pre-layout sizing.
//!
//! Widths are counted in full-width character equivalents: ASCII and
//! halfwidth forms count half a unit, everything else (CJK and friends)
//! counts a full unit. Good enough to size a canvas before any surface can
//! measure glyphs; never used for glyph placement.

/// Length of `text` in full-width character equivalents, rounded up.
pub fn str_length(text: &str) -> usize {
    let half_units: usize = text
        .chars()
        .map(|ch| if is_single_width(ch) { 1 } else { 2 })
        .sum();
    half_units.div_ceil(2)
}

fn is_single_width(ch: char) -> bool {
    matches!(ch as u32, 0x0001..=0x007E | 0xFF60..=0xFF9F)
}

/// Inputs of a text size estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct TextEstimate<'a> {
    pub text: &'a str,
    /// Box width used to derive the row count.
    pub width: f32,
    /// Extra spacing between rows.
    pub line_height: f32,
    pub font_size: f32,
    pub scale: f32,
}

impl Default for TextEstimate<'_> {
    fn default() -> Self {
        Self {
            text: "",
            width: 200.0,
            line_height: 1.0,
            font_size: 12.0,
            scale: 1.0,
        }
    }
}

impl TextEstimate<'_> {
    /// Single-line width estimate.
    pub fn estimated_width(&self) -> f32 {
        str_length(self.text) as f32 * self.font_size * self.scale
    }

    /// Upper-bound height for the text wrapped into `width`.
    ///
    /// Only one trailing `line_height` is subtracted, so the result overshoots
    /// by the spacing of the last row. Empty text yields `-line_height`.
    pub fn estimated_height(&self) -> f32 {
        let unscaled_width = str_length(self.text) as f32 * self.font_size;
        let rows = (unscaled_width / self.width).ceil();
        rows * (self.line_height + self.font_size) * self.scale - self.line_height
    }
}

/// Shorthand for [`TextEstimate::estimated_width`].
pub fn text_width(estimate: &TextEstimate<'_>) -> f32 {
    estimate.estimated_width()
}

/// Shorthand for [`TextEstimate::estimated_height`].
pub fn text_height(estimate: &TextEstimate<'_>) -> f32 {
    estimate.estimated_height()
}
