//! Draw-command IR, text wrapping and canvas sessions for `layer-canvas`.

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

mod render_engine;
mod render_ir;
mod render_layout;
mod scene;
mod surface;

pub use layer_canvas::{
    CanvasError, ImageMode, Layer, LayerKind, LayerRegistry, LayoutDiagnostic, ReferLayer,
};
pub use render_engine::{Canvas, CanvasConfig, TextDefaults};
pub use render_ir::{
    CircleImageCommand, DrawCommand, FillCommand, FontSpec, Frame, ImageCommand,
    RoundedRectCommand, SourceRect, StrokeStyle, TextCommand,
};
pub use render_layout::{
    wrap_text, HeuristicMeasurer, TextLine, TextMeasurer, WrapRequest, WrappedText,
};
pub use scene::{parse_scene, ApplyError, LayerOp};
pub use surface::{RecordingSurface, Surface};
