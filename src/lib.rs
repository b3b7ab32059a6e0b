//! Declarative layer layout for 2D canvases.
//!
//! Callers describe [`Layer`]s in their own unit system. A [`LayoutSession`]
//! resolves relative positions (`referLayer`), converts to device units with
//! the session [`Scale`], and keeps finished layers in an append-only
//! [`LayerRegistry`]. The [`metrics`] module estimates text size without a
//! font so a canvas can be sized before anything is drawn.
//!
//! Drawing itself lives in `layer-canvas-render`.

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

mod diagnostic;
mod error;
mod layer;
pub mod metrics;
mod registry;
mod scale;
mod session;

pub use diagnostic::LayoutDiagnostic;
pub use error::CanvasError;
pub use layer::{ImageMode, Layer, LayerKind, ReferLayer};
pub use metrics::{str_length, text_height, text_width, TextEstimate};
pub use registry::{LayerRegistry, Registration};
pub use scale::{scale_layer, Scale};
pub use session::{LayoutSession, ResolvedLayer};
