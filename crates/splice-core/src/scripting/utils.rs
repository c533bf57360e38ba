//! # Scripting Utilities
//!
//! Conversions between Rhai values and editor types.
//!
//! ## Responsibilities
//! - **Ids**: `layer_id`, `id_or_unit` for integer ids in scripts
//! - **Patches**: `parse_layer_patch`, `parse_transform_patch` from object maps
//! - **Values**: `keyframe_value` from dynamic script values
//! - **Config**: `parse_editor_config` for `new_editor(#{...})`
//! - **Reports**: `layer_to_map` for reading layers back in scripts

use crate::animation::KeyframeValue;
use crate::config::EditorConfig;
use crate::layer::{Layer, LayerPatch};
use crate::types::{BlendMode, Color, LayerId, LayerKind, TransformPatch};
use rhai::{Array, Dynamic, Map};
use tracing::warn;

pub fn layer_id(id: i64) -> LayerId {
    LayerId(id.max(0) as u64)
}

pub fn id_or_unit(id: Option<LayerId>) -> Dynamic {
    match id {
        Some(id) => Dynamic::from(id.0 as i64),
        None => Dynamic::UNIT,
    }
}

/// Reads a number that may have been written as an integer or a float.
pub fn as_f64(value: &Dynamic) -> Option<f64> {
    value
        .as_float()
        .ok()
        .or_else(|| value.as_int().ok().map(|i| i as f64))
}

fn get_f64(map: &Map, key: &str) -> Option<f64> {
    map.get(key).and_then(as_f64)
}

fn get_bool(map: &Map, key: &str) -> Option<bool> {
    map.get(key).and_then(|v| v.as_bool().ok())
}

fn get_string(map: &Map, key: &str) -> Option<String> {
    map.get(key).and_then(|v| v.clone().into_string().ok())
}

/// Builds a patch from keys such as `opacity`, `blend_mode`, `start_time`, `name`.
/// Unrecognised values are skipped with a warning.
pub fn parse_layer_patch(map: &Map) -> LayerPatch {
    let blend_mode = get_string(map, "blend_mode").and_then(|s| {
        let parsed = BlendMode::parse(&s);
        if parsed.is_none() {
            warn!("Unknown blend mode '{}'", s);
        }
        parsed
    });
    let kind = get_string(map, "kind").and_then(|s| LayerKind::parse(&s));
    let color = get_string(map, "color").and_then(|s| Color::from_hex(&s));

    LayerPatch {
        name: get_string(map, "name"),
        kind,
        visible: get_bool(map, "visible"),
        locked: get_bool(map, "locked"),
        start_time: get_f64(map, "start_time"),
        duration: get_f64(map, "duration"),
        color,
        opacity: get_f64(map, "opacity"),
        blend_mode,
        content: get_string(map, "content"),
        speed: get_f64(map, "speed"),
        ..Default::default()
    }
}

pub fn parse_transform_patch(map: &Map) -> TransformPatch {
    TransformPatch {
        x: get_f64(map, "x"),
        y: get_f64(map, "y"),
        scale: get_f64(map, "scale"),
        rotation: get_f64(map, "rotation"),
    }
}

pub fn keyframe_value(value: Dynamic) -> KeyframeValue {
    if let Some(n) = as_f64(&value) {
        return KeyframeValue::Number(n);
    }
    if let Ok(b) = value.as_bool() {
        return KeyframeValue::Bool(b);
    }
    KeyframeValue::Text(value.to_string())
}

pub fn parse_editor_config(map: &Map) -> EditorConfig {
    let mut config = EditorConfig::default();
    if let Some(v) = get_f64(map, "grid_step") {
        config.grid_step = v;
    }
    if let Some(v) = get_bool(map, "snap_to_grid") {
        config.snap_to_grid = v;
    }
    if let Some(v) = get_f64(map, "ingest_timeout_ms") {
        config.ingest_timeout_ms = v.max(0.0) as u64;
    }
    if let Some(v) = get_f64(map, "history_limit") {
        config.history_limit = Some(v.max(1.0) as usize);
    }
    if let Some(v) = get_string(map, "default_text") {
        config.default_text = v;
    }
    config.with_env_overrides()
}

pub fn layer_to_map(layer: &Layer) -> Map {
    let mut map = Map::new();
    map.insert("id".into(), Dynamic::from(layer.id.0 as i64));
    map.insert("name".into(), layer.name.clone().into());
    map.insert("start_time".into(), Dynamic::from(layer.start_time));
    map.insert("duration".into(), Dynamic::from(layer.duration));
    map.insert("visible".into(), Dynamic::from(layer.visible));
    map.insert("locked".into(), Dynamic::from(layer.locked));
    map.insert("opacity".into(), Dynamic::from(layer.opacity));
    map.insert("blend_mode".into(), layer.blend_mode.as_str().into());
    let effects: Array = layer
        .effects
        .iter()
        .map(|e| Dynamic::from(e.name().to_string()))
        .collect();
    map.insert("effects".into(), effects.into());
    map.insert("keyframes".into(), Dynamic::from(layer.keyframes.len() as i64));
    map.insert("x".into(), Dynamic::from(layer.transform.x));
    map.insert("y".into(), Dynamic::from(layer.transform.y));
    map.insert("scale".into(), Dynamic::from(layer.transform.scale));
    map.insert("rotation".into(), Dynamic::from(layer.transform.rotation));
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_from_map() {
        let mut map = Map::new();
        map.insert("opacity".into(), Dynamic::from(50_i64));
        map.insert("blend_mode".into(), "multiply".into());
        map.insert("visible".into(), Dynamic::from(false));
        let patch = parse_layer_patch(&map);
        assert_eq!(patch.opacity, Some(50.0));
        assert_eq!(patch.blend_mode, Some(BlendMode::Multiply));
        assert_eq!(patch.visible, Some(false));
        assert_eq!(patch.duration, None);
    }

    #[test]
    fn keyframe_values_from_dynamic() {
        assert_eq!(keyframe_value(Dynamic::from(3_i64)), KeyframeValue::Number(3.0));
        assert_eq!(keyframe_value(Dynamic::from(true)), KeyframeValue::Bool(true));
        assert_eq!(keyframe_value("hi".into()), KeyframeValue::Text("hi".into()));
    }
}
