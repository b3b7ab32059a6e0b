use layer_canvas::str_length;
use smallvec::SmallVec;

use crate::render_ir::FontSpec;

/// Exact text measurement provided by a drawing surface.
pub trait TextMeasurer {
    /// Rendered width of `text` in device pixels.
    fn measure_text_px(&self, text: &str, font: &FontSpec) -> f32;
}

/// Font-free measurer: full-width-equivalent length times font size.
///
/// Used where no surface can measure glyphs, e.g. headless sizing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn measure_text_px(&self, text: &str, font: &FontSpec) -> f32 {
        str_length(text) as f32 * font.size_px
    }
}

/// Inputs of one wrap pass, all lengths in device units.
#[derive(Clone, Debug, PartialEq)]
pub struct WrapRequest<'a> {
    pub text: &'a str,
    pub font: FontSpec,
    pub left: f32,
    pub top: f32,
    /// Lines must measure strictly less than this.
    pub max_width: f32,
    /// Extra spacing between lines.
    pub line_height: f32,
    /// Cut with `ellipsis` when the line count equals this exactly.
    ///
    /// `None`, `0` and non-integral values never match.
    pub max_line: Option<f32>,
    pub ellipsis: &'a str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub baseline_y: f32,
}

/// Result of a wrap pass.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedText {
    /// Never empty; empty input yields one empty line.
    pub lines: SmallVec<[TextLine; 4]>,
    /// Measured width of the last line.
    pub width: f32,
    /// Distance from `top` to the last baseline.
    pub height: f32,
    /// Whether the text was cut at `max_line` with an ellipsis.
    pub truncated: bool,
}

/// Greedy char-by-char line breaking with ellipsis truncation.
///
/// Every line takes at least one char, so the pass always advances even when
/// a single glyph is wider than `max_width`.
pub fn wrap_text<M>(req: &WrapRequest<'_>, measurer: &M) -> WrappedText
where
    M: TextMeasurer + ?Sized,
{
    let measure = |text: &str| measurer.measure_text_px(text, &req.font);
    let mut rows: SmallVec<[String; 4]> = SmallVec::new();
    let mut buffer = String::new();
    let mut candidate = String::new();
    let mut line = 1u32;
    let mut truncated = false;

    let mut chars = req.text.chars().peekable();
    while let Some(&ch) = chars.peek() {
        candidate.clear();
        candidate.push_str(&buffer);
        candidate.push(ch);
        if buffer.is_empty() || measure(&candidate) < req.max_width {
            buffer.push(ch);
            chars.next();
        } else if req.max_line == Some(line as f32) {
            truncate_with_ellipsis(&mut buffer, req.ellipsis, req.max_width, &measure);
            truncated = true;
            break;
        } else {
            line += 1;
            rows.push(core::mem::take(&mut buffer));
        }
    }
    rows.push(buffer);

    if truncated {
        log::debug!(
            "wrap: truncated {:?} at {} line(s)",
            req.text,
            rows.len()
        );
    }

    let font_size = req.font.size_px;
    let lines: SmallVec<[TextLine; 4]> = rows
        .into_iter()
        .enumerate()
        .map(|(row, text)| {
            let row = row as f32;
            TextLine {
                text,
                x: req.left,
                baseline_y: req.top + (font_size + (row * font_size + row * req.line_height)),
            }
        })
        .collect();

    let (width, height) = match lines.last() {
        Some(last) => (measure(&last.text), last.baseline_y - req.top),
        None => (0.0, 0.0),
    };

    WrappedText {
        lines,
        width,
        height,
        truncated,
    }
}

fn truncate_with_ellipsis<F>(buffer: &mut String, ellipsis: &str, max_width: f32, measure: &F)
where
    F: Fn(&str) -> f32,
{
    let mut candidate = String::with_capacity(buffer.len() + ellipsis.len());
    loop {
        if buffer.chars().nth(1).is_none() {
            break;
        }
        candidate.clear();
        candidate.push_str(buffer);
        candidate.push_str(ellipsis);
        if measure(&candidate) <= max_width {
            break;
        }
        buffer.pop();
    }
    buffer.push_str(ellipsis);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every char is `size_px / 2` wide.
    struct HalfEm;

    impl TextMeasurer for HalfEm {
        fn measure_text_px(&self, text: &str, font: &FontSpec) -> f32 {
            text.chars().count() as f32 * font.size_px / 2.0
        }
    }

    fn font(size_px: f32) -> FontSpec {
        FontSpec {
            style: String::new(),
            size_px,
            family: "Arial".to_string(),
        }
    }

    fn request(text: &str, max_width: f32, max_line: Option<f32>) -> WrapRequest<'_> {
        WrapRequest {
            text,
            font: font(10.0),
            left: 4.0,
            top: 100.0,
            max_width,
            line_height: 2.0,
            max_line,
            ellipsis: "...",
        }
    }

    fn texts(wrapped: &WrappedText) -> Vec<&str> {
        wrapped.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn packs_chars_until_width_is_reached() {
        // 5px per char, lines must stay under 23px: four chars per line.
        let wrapped = wrap_text(&request("abcdefghij", 23.0, None), &HalfEm);
        assert_eq!(texts(&wrapped), vec!["abcd", "efgh", "ij"]);
        assert!(!wrapped.truncated);
    }

    #[test]
    fn exact_fit_moves_to_next_line() {
        // Width comparison is strict: 20px does not fit under 20px.
        let wrapped = wrap_text(&request("abcdefgh", 20.0, None), &HalfEm);
        assert_eq!(texts(&wrapped), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn baselines_step_by_font_size_plus_line_height() {
        let wrapped = wrap_text(&request("abcdefghij", 23.0, None), &HalfEm);
        let baselines: Vec<f32> = wrapped.lines.iter().map(|l| l.baseline_y).collect();
        assert_eq!(baselines, vec![110.0, 122.0, 134.0]);
        assert!(wrapped.lines.iter().all(|l| l.x == 4.0));
        assert_eq!(wrapped.height, 34.0);
    }

    #[test]
    fn reported_width_is_last_line_only() {
        let wrapped = wrap_text(&request("abcdefghij", 23.0, None), &HalfEm);
        assert_eq!(wrapped.width, 10.0);
    }

    #[test]
    fn oversized_glyphs_still_make_progress() {
        let wrapped = wrap_text(&request("abc", 1.0, None), &HalfEm);
        assert_eq!(texts(&wrapped), vec!["a", "b", "c"]);
    }

    #[test]
    fn never_emits_empty_lines_for_non_empty_text() {
        for width in [6.0, 11.0, 16.0, 21.0, 40.0] {
            let wrapped = wrap_text(&request("the quick brown fox", width, None), &HalfEm);
            assert!(wrapped.lines.iter().all(|l| !l.text.is_empty()));
            let joined: String = wrapped.lines.iter().map(|l| l.text.as_str()).collect();
            assert_eq!(joined, "the quick brown fox");
        }
    }

    #[test]
    fn empty_text_yields_single_empty_line() {
        let wrapped = wrap_text(&request("", 23.0, Some(1.0)), &HalfEm);
        assert_eq!(texts(&wrapped), vec![""]);
        assert_eq!(wrapped.width, 0.0);
        assert_eq!(wrapped.height, 10.0);
    }

    #[test]
    fn max_line_one_truncates_with_ellipsis_within_width() {
        let wrapped = wrap_text(&request("abcdefghij", 33.0, Some(1.0)), &HalfEm);
        assert_eq!(texts(&wrapped), vec!["abc..."]);
        assert!(wrapped.truncated);
        assert!(HalfEm.measure_text_px("abc...", &font(10.0)) <= 33.0);
        assert_eq!(wrapped.width, 30.0);
    }

    #[test]
    fn truncation_applies_on_the_last_allowed_line() {
        let wrapped = wrap_text(&request("abcdefghijklmnop", 38.0, Some(2.0)), &HalfEm);
        assert_eq!(texts(&wrapped), vec!["abcdefg", "hijk..."]);
        assert_eq!(wrapped.lines[1].baseline_y, 122.0);
    }

    #[test]
    fn truncation_keeps_one_char_when_ellipsis_cannot_fit() {
        let wrapped = wrap_text(&request("abcdef", 12.0, Some(1.0)), &HalfEm);
        assert_eq!(texts(&wrapped), vec!["a..."]);
    }

    #[test]
    fn zero_max_line_means_unlimited() {
        let wrapped = wrap_text(&request("abcdefghij", 23.0, Some(0.0)), &HalfEm);
        assert_eq!(wrapped.lines.len(), 3);
        assert!(!wrapped.truncated);
    }

    #[test]
    fn fractional_max_line_never_truncates() {
        let wrapped = wrap_text(&request("abcdefghij", 23.0, Some(1.5)), &HalfEm);
        assert_eq!(texts(&wrapped), vec!["abcd", "efgh", "ij"]);
        assert!(!wrapped.truncated);
    }

    #[test]
    fn text_that_fits_is_not_truncated() {
        let wrapped = wrap_text(&request("abc", 100.0, Some(1.0)), &HalfEm);
        assert_eq!(texts(&wrapped), vec!["abc"]);
        assert!(!wrapped.truncated);
    }

    #[test]
    fn heuristic_measurer_counts_full_width_equivalents() {
        let f = font(12.0);
        assert_eq!(HeuristicMeasurer.measure_text_px("中文", &f), 24.0);
        assert_eq!(HeuristicMeasurer.measure_text_px("ab", &f), 12.0);
        assert_eq!(HeuristicMeasurer.measure_text_px("", &f), 0.0);
    }
}
