//! # Media API
//!
//! Ingestion and media registry access for Rhai scripts.
//!
//! ## Responsibilities
//! - **Ingestion**: `ingest(path)` returns `#{ ok, id }` or `#{ ok: false, error }`
//! - **Listing**: `media` returns the registry contents in insertion order
//! - **Placement**: `add_layer_from_media`, `drop_media`
//! - **Removal**: `remove_asset`

use crate::types::MediaId;
use crate::AssetLoader;
use rhai::{Array, Dynamic, Engine, Map};
use std::sync::Arc;
use tracing::warn;

use super::super::types::EditorHandle;
use super::super::utils::{as_f64, id_or_unit};

fn media_id(id: i64) -> MediaId {
    MediaId(id.max(0) as u64)
}

/// Register media-related Rhai functions.
pub fn register(engine: &mut Engine, loader: Arc<dyn AssetLoader>) {
    engine.register_fn("ingest", move |editor: &mut EditorHandle, path: &str| {
        let mut result = Map::new();
        match editor.lock().ingest_path(loader.as_ref(), path) {
            Ok(id) => {
                result.insert("ok".into(), Dynamic::from(true));
                result.insert("id".into(), Dynamic::from(id.0 as i64));
            }
            Err(e) => {
                warn!("Ingest of '{}' failed: {}", path, e);
                result.insert("ok".into(), Dynamic::from(false));
                result.insert("error".into(), e.to_string().into());
            }
        }
        result
    });

    engine.register_fn("media", |editor: &mut EditorHandle| {
        editor
            .lock()
            .media()
            .list()
            .iter()
            .map(|asset| {
                let mut map = Map::new();
                map.insert("id".into(), Dynamic::from(asset.id.0 as i64));
                map.insert("name".into(), asset.name.clone().into());
                map.insert("kind".into(), asset.kind.to_string().into());
                map.insert("size".into(), Dynamic::from(asset.size as i64));
                map.insert(
                    "duration".into(),
                    asset.duration.map(Dynamic::from).unwrap_or(Dynamic::UNIT),
                );
                Dynamic::from(map)
            })
            .collect::<Array>()
    });

    engine.register_fn("add_layer_from_media", |editor: &mut EditorHandle, id: i64| {
        id_or_unit(editor.lock().add_layer_from_media(media_id(id), None))
    });
    engine.register_fn(
        "add_layer_from_media",
        |editor: &mut EditorHandle, id: i64, start: Dynamic| {
            id_or_unit(editor.lock().add_layer_from_media(media_id(id), as_f64(&start)))
        },
    );
    engine.register_fn("drop_media", |editor: &mut EditorHandle, id: i64| {
        id_or_unit(editor.lock().drop_media(media_id(id)))
    });

    engine.register_fn("remove_asset", |editor: &mut EditorHandle, id: i64| {
        match editor.lock().remove_asset(media_id(id)) {
            Ok(_) => true,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    });
}
