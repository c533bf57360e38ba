//! # Effects API
//!
//! Effect and compositing functions for Rhai scripts.
//!
//! ## Responsibilities
//! - **Effects**: `add_effect`, `remove_effect` by name
//! - **Compositing**: `set_opacity`, `set_blend_mode` shortcuts over `update_layer`

use crate::effects::Effect;
use crate::layer::LayerPatch;
use crate::types::BlendMode;
use rhai::{Dynamic, Engine};
use tracing::warn;

use super::super::types::EditorHandle;
use super::super::utils::{as_f64, layer_id};

/// Register effect-related Rhai functions.
pub fn register(engine: &mut Engine) {
    engine.register_fn("add_effect", |editor: &mut EditorHandle, id: i64, name: &str| {
        editor.lock().add_effect(layer_id(id), Effect::parse(name))
    });
    engine.register_fn("remove_effect", |editor: &mut EditorHandle, id: i64, name: &str| {
        editor.lock().remove_effect(layer_id(id), &Effect::parse(name))
    });

    engine.register_fn("set_opacity", |editor: &mut EditorHandle, id: i64, opacity: Dynamic| {
        match as_f64(&opacity) {
            Some(o) => editor.lock().update_layer(layer_id(id), LayerPatch::opacity(o)),
            None => false,
        }
    });
    engine.register_fn("set_blend_mode", |editor: &mut EditorHandle, id: i64, mode: &str| {
        match BlendMode::parse(mode) {
            Some(m) => editor.lock().update_layer(layer_id(id), LayerPatch::blend_mode(m)),
            None => {
                warn!("Unknown blend mode '{}'", mode);
                false
            }
        }
    });
}
