//! # Splice
//!
//! `splice-core` is the state machine behind a real-time video timeline editor.
//!
//! It keeps a layered composition (video, image, text, audio and graphic layers with
//! timing, transforms, effects, blend modes and keyframes), a playback clock driven by
//! animation frames, and a linear undo/redo history, all consistent with each other while
//! edits happen.
//!
//! ## Core Features
//!
//! *   **Media Registry**: Ingests uploads, probing duration, dimensions and thumbnails with a timeout.
//! *   **Timeline**: Ordered layers whose list order is the drawing order.
//! *   **Edit Operations**: Add, update, delete, duplicate, move and resize layers; effects and keyframes.
//! *   **History**: Snapshot-based undo/redo with structural sharing between snapshots.
//! *   **Playback**: Frame-driven clock that auto-stops and rewinds at the end.
//! *   **Preview**: Resolves the visible stack at the playhead for a presentation layer.
//! *   **Scripting**: Rhai bindings to drive a session headlessly.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use splice_core::{EditorConfig, EditorSession};
//!
//! let mut editor = EditorSession::new(EditorConfig::default());
//! let title = editor.add_text_layer(Some("Hello"));
//! editor.move_layer(title, 2.0);
//! editor.undo();
//! assert_eq!(editor.layer(title).map(|l| l.start_time), Some(0.0));
//! ```

/// Keyframes, easing curves and interpolation.
pub mod animation;

/// Session configuration.
pub mod config;

/// The editor session and its edit operations.
pub mod editor;

pub mod errors;

/// Typed layer effects.
pub mod effects;

pub mod format;

/// Undo/redo snapshots.
pub mod history;

/// Layer data and partial updates.
pub mod layer;

/// Uploaded assets, probing and the media registry.
pub mod media;

/// Playback clock and frame sources.
pub mod playback;

/// Preview surface resolution.
pub mod preview;

/// Rhai scripting API bindings.
pub mod scripting;

/// The composition model.
pub mod timeline;

/// Shared data structures used across the editor.
pub mod types;

pub use config::EditorConfig;
pub use editor::EditorSession;
pub use errors::{EditorError, IngestError};
pub use format::{format_file_size, format_time};
pub use layer::{Layer, LayerPatch};

use anyhow::Result;
use tracing::instrument;

/// A trait for abstracting file system access.
///
/// This allows the editor to be embedded where uploads don't come from a local disk
/// (e.g. a network store or an archive).
pub trait AssetLoader: Send + Sync {
    /// Loads the raw bytes of an asset from the given path.
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>>;
}

/// The default implementation of `AssetLoader` using the standard `std::fs` filesystem.
pub struct DefaultAssetLoader;

impl AssetLoader for DefaultAssetLoader {
    /// Loads bytes directly from the local filesystem.
    #[instrument(level = "debug", skip(self), fields(path = path))]
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>> {
        if let Ok(bytes) = std::fs::read(path) {
            return Ok(bytes);
        }
        // Fallback to assets/
        let alt = format!("assets/{}", path);
        std::fs::read(&alt).map_err(|e| {
            anyhow::anyhow!(
                "Asset not found: {} (checked '{}' and '{}'): {}",
                path,
                path,
                alt,
                e
            )
        })
    }
}
