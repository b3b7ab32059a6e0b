//! Non-fatal layout diagnostics.

use core::fmt;

use crate::layer::LayerKind;

/// Recoverable layout problem surfaced while resolving or registering layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutDiagnostic {
    /// A finished layer has no id; it is drawn but cannot be referenced.
    MissingId { kind: Option<LayerKind> },
    /// A finished layer reuses an id; the earlier layer stays indexed.
    DuplicateId { id: String },
    /// A `referLayer` names an id that is not registered yet.
    UnresolvedReference {
        id: String,
        layer_id: Option<String>,
    },
}

impl LayoutDiagnostic {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingId { .. } => "missing_id",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::UnresolvedReference { .. } => "unresolved_reference",
        }
    }
}

impl fmt::Display for LayoutDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId { kind } => {
                let kind = kind.map(LayerKind::as_str).unwrap_or("untyped");
                write!(f, "{} layer has no id and cannot be referenced", kind)
            }
            Self::DuplicateId { id } => {
                write!(f, "id {:?} is already registered; keeping the first layer", id)
            }
            Self::UnresolvedReference { id, layer_id } => write!(
                f,
                "referLayer id {:?} is not registered (layer {})",
                id,
                layer_id.as_deref().unwrap_or("<unnamed>")
            ),
        }
    }
}

pub(crate) type DiagnosticSink = Box<dyn FnMut(&LayoutDiagnostic)>;
