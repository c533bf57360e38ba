//! # Lifecycle API
//!
//! Editor creation and teardown for Rhai scripts.
//!
//! ## Responsibilities
//! - **Editor Creation**: `new_editor` with an optional config map
//! - **Teardown**: `close` releases media sources
//! - **Formatting**: `format_time`, `format_file_size`

use crate::config::EditorConfig;
use crate::editor::EditorSession;
use crate::format::{format_file_size, format_time};
use rhai::Engine;

use super::super::types::EditorHandle;
use super::super::utils::{as_f64, parse_editor_config};

/// Register lifecycle-related Rhai functions.
pub fn register(engine: &mut Engine) {
    engine.register_type_with_name::<EditorHandle>("Editor");

    // Overload 1: defaults
    engine.register_fn("new_editor", || {
        EditorHandle::new(EditorSession::new(EditorConfig::default().with_env_overrides()))
    });

    // Overload 2: config map
    engine.register_fn("new_editor", |config: rhai::Map| {
        EditorHandle::new(EditorSession::new(parse_editor_config(&config)))
    });

    engine.register_fn("close", |editor: &mut EditorHandle| {
        editor.lock().close();
    });

    engine.register_fn("format_time", |seconds: rhai::Dynamic| {
        format_time(as_f64(&seconds).unwrap_or(0.0))
    });
    engine.register_fn("format_file_size", |bytes: i64| format_file_size(bytes.max(0) as u64));
}
