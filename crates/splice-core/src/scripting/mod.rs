//! # Scripting Module
//!
//! Rhai scripting API bindings for the editor.
//!
//! ## Responsibilities
//! - **Engine Setup**: Registers the `Editor` type and its functions with Rhai.
//! - **Media**: `ingest` files through the session's registry.
//! - **Editing**: Layer creation and edit operations, effects and keyframes.
//! - **Transport**: Play/pause/seek, frame ticks, undo/redo and queries.
//!
//! ## Pattern
//! All bindings follow: `engine.register_fn("name", |editor: &mut EditorHandle, ...| { ... })`
//!
//! Layer and media ids cross into scripts as integers. Operations that find nothing
//! return `()` or `false`, mirroring the session's no-op policy.
//!
//! ## Module Structure
//! - `types`: The `EditorHandle` wrapper
//! - `utils`: Conversions between Rhai values and editor types
//! - `api/`: Sub-modules for lifecycle, media, layers, animation, effects, playback

mod api;
pub mod types;
pub mod utils;

pub use types::EditorHandle;

use crate::AssetLoader;
use rhai::Engine;
use std::sync::Arc;

/// Registers the editor API into the provided Rhai `Engine`.
///
/// This exposes the `Editor` type, its methods and the `format_*` helpers.
pub fn register_rhai_api(engine: &mut Engine, loader: Arc<dyn AssetLoader>) {
    api::register_all(engine, loader);
}
