//! Error type for session setup and scene decoding.

use core::fmt;

/// Structured error for canvas configuration and layer decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasError {
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: Box<str>,
    /// Optional name of the offending field.
    pub field: Option<Box<str>>,
}

impl CanvasError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into().into_boxed_str(),
            field: None,
        }
    }

    pub(crate) fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into().into_boxed_str());
        self
    }

    /// Error for a scale factor that cannot normalize layer units.
    pub fn invalid_scale(value: f32) -> Self {
        Self::new(
            "invalid_scale",
            format!("scale factor must be finite and greater than zero, got {value}"),
        )
        .with_field("scale")
    }

    /// Error for a JSON layer description that failed to decode.
    pub fn invalid_layer_json(err: &serde_json::Error) -> Self {
        Self::new("invalid_layer_json", err.to_string())
    }
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(field) = self.field.as_deref() {
            write!(f, " [field={}]", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for CanvasError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_field() {
        let err = CanvasError::invalid_scale(0.0);
        let rendered = err.to_string();
        assert!(rendered.starts_with("invalid_scale: "));
        assert!(rendered.ends_with("[field=scale]"));
    }
}
