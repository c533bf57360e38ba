//! # API Module
//!
//! Aggregates all Rhai API sub-modules and provides a single registration point.
//!
//! ## Sub-modules
//! - **lifecycle**: Editor creation, configuration and teardown
//! - **media**: Ingestion and the media list
//! - **layers**: Layer creation and edit operations
//! - **animation**: Keyframes
//! - **effects**: Effect list edits
//! - **playback**: Transport, history and queries

pub mod animation;
pub mod effects;
pub mod layers;
pub mod lifecycle;
pub mod media;
pub mod playback;

use crate::AssetLoader;
use rhai::Engine;
use std::sync::Arc;

/// Register all API functions with the Rhai engine.
pub fn register_all(engine: &mut Engine, loader: Arc<dyn AssetLoader>) {
    lifecycle::register(engine);
    media::register(engine, loader);
    layers::register(engine);
    animation::register(engine);
    effects::register(engine);
    playback::register(engine);
}
