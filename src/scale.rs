//! Session scale factor and the numeric-field scale transform.

use crate::error::CanvasError;
use crate::layer::Layer;

/// Validated scale factor between caller units and device units.
///
/// Device value = caller value * factor. Layers are normalized down by
/// [`inverse`](Self::inverse) when stored and restored by
/// [`forward`](Self::forward) when resolved for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale(f32);

impl Scale {
    /// Identity scale.
    pub const ONE: Self = Self(1.0);

    /// Validate and wrap a scale factor.
    pub fn new(factor: f32) -> Result<Self, CanvasError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(CanvasError::invalid_scale(factor))
        }
    }

    /// Factor applied when restoring device units before drawing.
    pub fn forward(self) -> f32 {
        self.0
    }

    /// Factor applied when normalizing a finished layer for storage.
    pub fn inverse(self) -> f32 {
        1.0 / self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ONE
    }
}

/// Multiply every numeric field of `layer` by `factor`; no-op on `None`.
pub fn scale_layer(layer: Option<&mut Layer>, factor: f32) {
    if let Some(layer) = layer {
        layer.scale_by(factor);
    }
}
