//! Append-only layer storage with an id index.

use std::collections::HashMap;

use crate::layer::{Layer, LayerKind};

/// Outcome of appending a layer to the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// Appended and indexed by its id.
    Indexed,
    /// Appended in draw order only; the layer has no id.
    Unindexed,
    /// Appended in draw order only; the id already names an earlier layer.
    Duplicate,
}

/// Layers of one drawing session in draw order.
#[derive(Clone, Debug, Default)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
    index: HashMap<String, usize>,
}

impl LayerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `layer`. The first layer registered under an id wins the index slot.
    pub fn push(&mut self, layer: Layer) -> Registration {
        let slot = self.layers.len();
        let registration = match layer.id.as_deref() {
            None => Registration::Unindexed,
            Some(id) if self.index.contains_key(id) => Registration::Duplicate,
            Some(id) => {
                self.index.insert(id.to_string(), slot);
                Registration::Indexed
            }
        };
        self.layers.push(layer);
        registration
    }

    /// Look up an indexed layer.
    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.index.get(id).and_then(|&slot| self.layers.get(slot))
    }

    /// Whether `id` is indexed.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All layers in draw order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Lowest content edge over all layers, in stored (caller) units.
    ///
    /// Artboards contribute zero. Returns `None` when nothing is registered.
    pub fn auto_height(&self) -> Option<f32> {
        self.layers
            .iter()
            .map(|layer| match layer.kind {
                Some(LayerKind::Artboard) => 0.0,
                _ => layer.bottom_edge(),
            })
            .reduce(f32::max)
    }
}
