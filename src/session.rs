//! Per-drawing-session state: scale, registry and diagnostics.

use core::ops::Deref;

use crate::diagnostic::{DiagnosticSink, LayoutDiagnostic};
use crate::layer::{Layer, LayerKind};
use crate::registry::{LayerRegistry, Registration};
use crate::scale::Scale;

/// A layer whose geometry is absolute and in device units.
///
/// Only produced by [`LayoutSession`], and only accepted back by
/// [`LayoutSession::add_layer`], so each layer is scaled once per direction.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLayer {
    layer: Layer,
}

impl ResolvedLayer {
    /// Tag the layer with the shape routine that drew it.
    pub fn set_kind(&mut self, kind: LayerKind) {
        self.layer.kind = Some(kind);
    }

    /// Record a width derived while drawing (device units).
    pub fn set_width(&mut self, width: Option<f32>) {
        self.layer.width = width;
    }

    /// Record a height derived while drawing (device units).
    pub fn set_height(&mut self, height: Option<f32>) {
        self.layer.height = height;
    }

    pub fn into_inner(self) -> Layer {
        self.layer
    }
}

impl Deref for ResolvedLayer {
    type Target = Layer;

    fn deref(&self) -> &Layer {
        &self.layer
    }
}

/// Layout state for one drawing session.
pub struct LayoutSession {
    scale: Scale,
    registry: LayerRegistry,
    diagnostics: Vec<LayoutDiagnostic>,
    sink: Option<DiagnosticSink>,
}

impl core::fmt::Debug for LayoutSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutSession")
            .field("scale", &self.scale)
            .field("layers", &self.registry.len())
            .field("diagnostics", &self.diagnostics.len())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl LayoutSession {
    /// Start an empty session.
    pub fn new(scale: Scale) -> Self {
        Self {
            scale,
            registry: LayerRegistry::new(),
            diagnostics: Vec::new(),
            sink: None,
        }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// Diagnostics emitted so far, oldest first.
    pub fn diagnostics(&self) -> &[LayoutDiagnostic] {
        &self.diagnostics
    }

    /// Forward every future diagnostic to `sink` as well.
    pub fn set_diagnostic_sink<F>(&mut self, sink: F)
    where
        F: FnMut(&LayoutDiagnostic) + 'static,
    {
        self.sink = Some(Box::new(sink));
    }

    fn emit(&mut self, diagnostic: LayoutDiagnostic) {
        log::warn!("layout: {}", diagnostic);
        if let Some(sink) = self.sink.as_mut() {
            sink(&diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Resolve `referLayer` offsets and restore device units.
    ///
    /// Offsets are added to the referenced layer's bottom/right edge. An
    /// unknown reference leaves `top`/`left` as given. `refer_layer` never
    /// survives resolution.
    pub fn resolve_position(&mut self, mut layer: Layer) -> ResolvedLayer {
        if let Some(refer) = layer.refer_layer.take() {
            match self.registry.get(&refer.id) {
                Some(target) => {
                    if let Some(dt) = refer.top {
                        layer.top = Some(target.bottom_edge() + dt);
                    }
                    if let Some(dl) = refer.left {
                        layer.left = Some(target.right_edge() + dl);
                    }
                }
                None => self.emit(LayoutDiagnostic::UnresolvedReference {
                    id: refer.id,
                    layer_id: layer.id.clone(),
                }),
            }
        }
        layer.scale_by(self.scale.forward());
        ResolvedLayer { layer }
    }

    /// Wrap a layer that is already in device units, skipping resolution.
    pub fn adopt_device_layer(&mut self, mut layer: Layer) -> ResolvedLayer {
        layer.refer_layer = None;
        ResolvedLayer { layer }
    }

    /// Normalize a finished layer back to caller units and register it.
    pub fn add_layer(&mut self, resolved: ResolvedLayer) -> Registration {
        let mut layer = resolved.layer;
        layer.scale_by(self.scale.inverse());
        let kind = layer.kind;
        let id = layer.id.clone();
        let registration = self.registry.push(layer);
        match registration {
            Registration::Indexed => {}
            Registration::Unindexed => self.emit(LayoutDiagnostic::MissingId { kind }),
            Registration::Duplicate => self.emit(LayoutDiagnostic::DuplicateId {
                id: id.unwrap_or_default(),
            }),
        }
        registration
    }

    /// See [`LayerRegistry::auto_height`].
    pub fn auto_height(&self) -> Option<f32> {
        self.registry.auto_height()
    }
}
