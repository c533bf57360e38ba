//! # Timeline Model
//!
//! The composition: an ordered layer list plus the overall duration.
//!
//! ## Invariants
//! - List order is stack order: later layers are drawn on top.
//! - `duration` covers the end of every layer placed through an insert. It is never
//!   shrunk automatically, and moves/resizes do not grow it either.
//!
//! Layers are stored behind `Arc` so history snapshots share unchanged layers; edits go
//! through [`Composition::layer_mut`], which copies a layer only when a snapshot still
//! holds it.

use crate::layer::Layer;
use crate::types::LayerId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub layers: Vec<Arc<Layer>>,
    /// Total length in seconds.
    pub duration: f64,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn position(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id).map(|l| l.as_ref())
    }

    /// Mutable access, detaching the layer from any snapshot that shares it.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id).map(Arc::make_mut)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().map(|l| l.as_ref())
    }

    /// Appends on top of the stack and grows the duration to cover the new layer.
    pub fn push(&mut self, layer: Layer) {
        self.extend_to(layer.end_time());
        self.layers.push(Arc::new(layer));
    }

    pub fn remove(&mut self, id: LayerId) -> Option<Arc<Layer>> {
        let index = self.position(id)?;
        Some(self.layers.remove(index))
    }

    /// Grows (never shrinks) the duration so that `end` is covered.
    pub fn extend_to(&mut self, end: f64) {
        if end > self.duration {
            self.duration = end;
        }
    }

    /// Latest end time over all layers, 0 when empty.
    pub fn content_end(&self) -> f64 {
        self.layers.iter().map(|l| l.end_time()).fold(0.0, f64::max)
    }

    /// Every visible layer whose active window contains `time`, in stack order.
    ///
    /// A linear scan; compositions are expected to hold tens of layers.
    pub fn visible_layers(&self, time: f64) -> Vec<&Layer> {
        self.iter()
            .filter(|l| l.visible && l.is_active_at(time))
            .collect()
    }
}
