//! # Animation API
//!
//! Keyframe functions for Rhai scripts.
//!
//! ## Responsibilities
//! - **Keying**: `add_keyframe` records a value at the playhead
//! - **Sampling**: `value_at` evaluates a keyed property at any time

use crate::animation::{interpolate_keyframes, KeyframeValue};
use rhai::{Dynamic, Engine};

use super::super::types::EditorHandle;
use super::super::utils::{as_f64, keyframe_value, layer_id};

/// Register animation-related Rhai functions.
pub fn register(engine: &mut Engine) {
    engine.register_fn(
        "add_keyframe",
        |editor: &mut EditorHandle, id: i64, property: &str, value: Dynamic| {
            editor
                .lock()
                .add_keyframe(layer_id(id), property, keyframe_value(value))
        },
    );

    engine.register_fn(
        "value_at",
        |editor: &mut EditorHandle, id: i64, property: &str, time: Dynamic| {
            let session = editor.lock();
            let Some(layer) = session.layer(layer_id(id)) else {
                return Dynamic::UNIT;
            };
            let time = as_f64(&time).unwrap_or_else(|| session.current_time());
            match interpolate_keyframes(&layer.keyframes, time, property) {
                Some(KeyframeValue::Number(n)) => Dynamic::from(n),
                Some(KeyframeValue::Bool(b)) => Dynamic::from(b),
                Some(KeyframeValue::Text(s)) => s.into(),
                None => Dynamic::UNIT,
            }
        },
    );
}
