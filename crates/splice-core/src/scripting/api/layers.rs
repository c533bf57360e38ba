//! # Layers API
//!
//! Layer creation and edit operations for Rhai scripts.
//!
//! ## Responsibilities
//! - **Creation**: `add_text_layer`, `duplicate_layer`
//! - **Edits**: `update_layer`, `update_transform`, `commit_transform`, `move_layer`, `resize_layer`
//! - **Toggles**: `toggle_visibility`, `toggle_lock`
//! - **Reading**: `layer`, `layers`, `select`, `selected`

use rhai::{Array, Dynamic, Engine, Map};

use super::super::types::EditorHandle;
use super::super::utils::{
    as_f64, id_or_unit, layer_id, layer_to_map, parse_layer_patch, parse_transform_patch,
};

/// Register layer-related Rhai functions.
pub fn register(engine: &mut Engine) {
    engine.register_fn("add_text_layer", |editor: &mut EditorHandle| {
        editor.lock().add_text_layer(None).0 as i64
    });
    engine.register_fn("add_text_layer", |editor: &mut EditorHandle, text: &str| {
        editor.lock().add_text_layer(Some(text)).0 as i64
    });

    engine.register_fn("update_layer", |editor: &mut EditorHandle, id: i64, fields: Map| {
        editor.lock().update_layer(layer_id(id), parse_layer_patch(&fields))
    });
    engine.register_fn(
        "update_transform",
        |editor: &mut EditorHandle, id: i64, fields: Map| {
            editor
                .lock()
                .update_layer_transform(layer_id(id), parse_transform_patch(&fields))
        },
    );
    engine.register_fn("commit_transform", |editor: &mut EditorHandle, id: i64| {
        editor.lock().commit_transform(layer_id(id))
    });

    engine.register_fn("delete_layer", |editor: &mut EditorHandle, id: i64| {
        editor.lock().delete_layer(layer_id(id))
    });
    engine.register_fn("duplicate_layer", |editor: &mut EditorHandle, id: i64| {
        id_or_unit(editor.lock().duplicate_layer(layer_id(id)))
    });
    engine.register_fn("move_layer", |editor: &mut EditorHandle, id: i64, start: Dynamic| {
        match as_f64(&start) {
            Some(t) => editor.lock().move_layer(layer_id(id), t),
            None => false,
        }
    });
    engine.register_fn(
        "resize_layer",
        |editor: &mut EditorHandle, id: i64, duration: Dynamic| match as_f64(&duration) {
            Some(d) => editor.lock().resize_layer(layer_id(id), d),
            None => false,
        },
    );

    engine.register_fn("toggle_visibility", |editor: &mut EditorHandle, id: i64| {
        editor.lock().toggle_visibility(layer_id(id))
    });
    engine.register_fn("toggle_lock", |editor: &mut EditorHandle, id: i64| {
        editor.lock().toggle_lock(layer_id(id))
    });

    engine.register_fn("layer", |editor: &mut EditorHandle, id: i64| {
        editor
            .lock()
            .layer(layer_id(id))
            .map(|l| Dynamic::from(layer_to_map(l)))
            .unwrap_or(Dynamic::UNIT)
    });
    engine.register_fn("layers", |editor: &mut EditorHandle| {
        editor
            .lock()
            .layers()
            .map(|l| Dynamic::from(layer_to_map(l)))
            .collect::<Array>()
    });
    engine.register_fn("layer_count", |editor: &mut EditorHandle| {
        editor.lock().composition().len() as i64
    });

    engine.register_fn("select", |editor: &mut EditorHandle, id: i64| {
        editor.lock().select_layer(Some(layer_id(id)));
    });
    engine.register_fn("clear_selection", |editor: &mut EditorHandle| {
        editor.lock().select_layer(None);
    });
    engine.register_fn("selected", |editor: &mut EditorHandle| {
        id_or_unit(editor.lock().selected_layer())
    });
}
