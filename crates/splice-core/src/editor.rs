//! # Editor Session
//!
//! The owned editor instance: media registry, composition, playback clock, undo history
//! and view state.
//!
//! ## Responsibilities
//! - **Edit operations**: add/update/delete/duplicate/move/resize layers, effects, keyframes.
//! - **History**: every content edit ends by recording a snapshot. Visibility, lock and
//!   live transform drags do not; [`EditorSession::commit_transform`] records the latter.
//! - **Transport**: play/pause/seek and the per-frame `tick`.
//! - **Teardown**: [`EditorSession::close`] (also run on drop) frees every media source.
//!
//! ## Error policy
//! Operations addressing a layer id that doesn't exist are no-ops that return `false` or
//! `None`. Out-of-range inputs are clamped. Only ingestion and asset removal report errors.

use crate::animation::{EasingType, Keyframe, KeyframeValue};
use crate::config::EditorConfig;
use crate::effects::Effect;
use crate::errors::{EditorError, IngestError};
use crate::history::{HistoryManager, Snapshot};
use crate::layer::{Layer, LayerPatch};
use crate::media::{
    CancelToken, DefaultProbe, IngestOptions, MediaAsset, MediaFile, MediaProbe, MediaRegistry,
};
use crate::playback::{FrameSource, PlaybackClock, TickOutcome};
use crate::timeline::Composition;
use crate::types::{LayerId, LayerKind, MediaId, MediaKind, TransformPatch};
use crate::AssetLoader;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const MIN_ZOOM: f64 = 10.0;
pub const MAX_ZOOM: f64 = 400.0;
pub const MIN_TIMELINE_ZOOM: f64 = 0.1;
pub const MAX_TIMELINE_ZOOM: f64 = 10.0;
const MIN_SPEED: f64 = 0.1;
const MAX_SPEED: f64 = 10.0;

/// Playback and view state exposed to the UI layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewState {
    pub current_time: f64,
    pub is_playing: bool,
    /// Preview scale in percent.
    pub zoom: f64,
    /// Horizontal scale factor of the time axis.
    pub timeline_zoom: f64,
    pub snap_to_grid: bool,
    pub selected_layer: Option<LayerId>,
}

pub struct EditorSession {
    config: EditorConfig,
    media: MediaRegistry,
    composition: Composition,
    clock: PlaybackClock,
    history: HistoryManager,
    selected: Option<LayerId>,
    zoom: f64,
    timeline_zoom: f64,
    snap_to_grid: bool,
}

impl EditorSession {
    /// Creates a session using the built-in media probes.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_probe(config, Arc::new(DefaultProbe))
    }

    pub fn with_probe(config: EditorConfig, probe: Arc<dyn MediaProbe>) -> Self {
        let composition = Composition::new();
        let history = HistoryManager::new(Snapshot::capture(&composition, 0.0), config.history_limit);
        let snap_to_grid = config.snap_to_grid;
        info!(grid_step = config.grid_step, snap_to_grid, "Editor session opened");
        Self {
            config,
            media: MediaRegistry::new(probe),
            composition,
            clock: PlaybackClock::new(),
            history,
            selected: None,
            zoom: 100.0,
            timeline_zoom: 1.0,
            snap_to_grid,
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.composition.iter()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.composition.layer(id)
    }

    pub fn duration(&self) -> f64 {
        self.composition.duration
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing
    }

    pub fn media(&self) -> &MediaRegistry {
        &self.media
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selected_layer(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn timeline_zoom(&self) -> f64 {
        self.timeline_zoom
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_to_grid
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            current_time: self.clock.current_time,
            is_playing: self.clock.is_playing,
            zoom: self.zoom,
            timeline_zoom: self.timeline_zoom,
            snap_to_grid: self.snap_to_grid,
            selected_layer: self.selected,
        }
    }

    // --- Media ---

    /// Probes and registers an upload, bounded by the configured timeout.
    pub fn ingest(&mut self, file: MediaFile) -> Result<MediaId, IngestError> {
        let options = IngestOptions::with_timeout(self.config.ingest_timeout());
        self.media.ingest(file, &options).map(|a| a.id)
    }

    /// Like [`ingest`](Self::ingest), abandoning the probe once `token` is cancelled.
    pub fn ingest_cancellable(&mut self, file: MediaFile, token: CancelToken) -> Result<MediaId, IngestError> {
        let options = IngestOptions::with_timeout(self.config.ingest_timeout()).cancellable(token);
        self.media.ingest(file, &options).map(|a| a.id)
    }

    /// Loads `path` through `loader` and ingests it.
    pub fn ingest_path(&mut self, loader: &dyn AssetLoader, path: &str) -> Result<MediaId, IngestError> {
        let file = MediaFile::open(loader, path).map_err(|e| IngestError::Unreadable(format!("{:#}", e)))?;
        self.ingest(file)
    }

    /// Removes an asset nothing on the timeline refers to.
    ///
    /// Snapshots in the undo history may still name the asset; such layers render as
    /// missing media if they are restored.
    pub fn remove_asset(&mut self, id: MediaId) -> Result<MediaAsset, EditorError> {
        if !self.media.contains(id) {
            return Err(EditorError::UnknownAsset(id));
        }
        let layers = self.layers().filter(|l| l.media_id == Some(id)).count();
        if layers > 0 {
            return Err(EditorError::AssetInUse { id, layers });
        }
        info!(media = %id, "Removing media asset");
        self.media.remove(id).ok_or(EditorError::UnknownAsset(id))
    }

    // --- Grid ---

    /// Rounds `time` to the placement grid when snapping is on.
    pub fn snap(&self, time: f64) -> f64 {
        if self.snap_to_grid {
            snap_to(time, self.config.grid_step)
        } else {
            time
        }
    }

    // --- Edit operations ---

    /// Places an asset on top of the stack at `start_time` (default: the playhead).
    ///
    /// Returns `None` when the asset is unknown.
    pub fn add_layer_from_media(&mut self, media_id: MediaId, start_time: Option<f64>) -> Option<LayerId> {
        let asset = self.media.get(media_id)?;
        // Timed media keeps its probed length, even below the resize minimum.
        let fallback = self.config.default_image_duration.max(self.config.min_layer_duration);
        let duration = match asset.kind {
            MediaKind::Image => fallback,
            MediaKind::Video | MediaKind::Audio => {
                asset.duration.filter(|d| *d > 0.0).unwrap_or(fallback)
            }
        };
        let kind = LayerKind::from(asset.kind);
        let name = asset.name.clone();

        let start = self.snap(start_time.unwrap_or(self.clock.current_time)).max(0.0);
        let mut layer = Layer::new(kind, name, start, duration);
        layer.media_id = Some(media_id);
        if kind == LayerKind::Video {
            layer.speed = Some(1.0);
        }

        let id = layer.id;
        debug!(layer = %id, media = %media_id, start, duration, "Adding media layer");
        self.composition.push(layer);
        self.selected = Some(id);
        self.save_history("Add layer");
        Some(id)
    }

    /// Adds a text layer at the playhead. `None` uses the configured placeholder text.
    pub fn add_text_layer(&mut self, text: Option<&str>) -> LayerId {
        let content = text.unwrap_or(&self.config.default_text).to_string();
        let start = self.snap(self.clock.current_time).max(0.0);
        let mut layer = Layer::new(LayerKind::Text, content.clone(), start, self.config.default_text_duration);
        layer.content = Some(content);

        let id = layer.id;
        debug!(layer = %id, start, "Adding text layer");
        self.composition.push(layer);
        self.selected = Some(id);
        self.save_history("Add text");
        id
    }

    /// Shallow-merges `patch` into the layer. Never grows the composition duration.
    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> bool {
        let min_duration = self.config.min_layer_duration;
        let Some(layer) = self.composition.layer_mut(id) else {
            return false;
        };
        patch.apply(layer);
        sanitize(layer, min_duration);
        debug!(layer = %id, "Layer updated");
        self.save_history("Update layer");
        true
    }

    /// Live transform edit. Not recorded in history until [`commit_transform`](Self::commit_transform).
    pub fn update_layer_transform(&mut self, id: LayerId, patch: TransformPatch) -> bool {
        let Some(layer) = self.composition.layer_mut(id) else {
            return false;
        };
        patch.apply(&mut layer.transform);
        if !layer.transform.scale.is_finite() || layer.transform.scale < 0.0 {
            layer.transform.scale = 0.0;
        }
        true
    }

    /// Records the current state after a transform drag ends.
    pub fn commit_transform(&mut self, id: LayerId) -> bool {
        if self.composition.layer(id).is_none() {
            return false;
        }
        self.save_history("Transform layer");
        true
    }

    /// Removes a layer. The composition keeps its duration.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        if self.composition.remove(id).is_none() {
            return false;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        debug!(layer = %id, "Layer deleted");
        self.save_history("Delete layer");
        true
    }

    /// Copies a layer to start right after the original ends (snapped) and selects it.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Option<LayerId> {
        let source = self.composition.layer(id)?;
        let start = self.snap(source.end_time());
        let copy = source.duplicate_at(start);
        let copy_id = copy.id;

        debug!(layer = %id, copy = %copy_id, start, "Layer duplicated");
        self.composition.push(copy);
        self.selected = Some(copy_id);
        self.save_history("Duplicate layer");
        Some(copy_id)
    }

    /// Moves a layer to a new start time (clamped at 0, snapped).
    pub fn move_layer(&mut self, id: LayerId, start_time: f64) -> bool {
        let start = self.snap(start_time.max(0.0)).max(0.0);
        self.update_layer(id, LayerPatch::start_time(start))
    }

    /// Sets a layer's duration, clamped to the minimum and rounded to the resize step.
    pub fn resize_layer(&mut self, id: LayerId, duration: f64) -> bool {
        let min = self.config.min_layer_duration;
        let duration = snap_to(duration.max(min), self.config.resize_step).max(min);
        self.update_layer(id, LayerPatch::duration(duration))
    }

    /// View-state toggle; not part of undo history.
    pub fn toggle_visibility(&mut self, id: LayerId) -> bool {
        let Some(layer) = self.composition.layer_mut(id) else {
            return false;
        };
        layer.visible = !layer.visible;
        debug!(layer = %id, visible = layer.visible, "Visibility toggled");
        true
    }

    /// View-state toggle; not part of undo history.
    pub fn toggle_lock(&mut self, id: LayerId) -> bool {
        let Some(layer) = self.composition.layer_mut(id) else {
            return false;
        };
        layer.locked = !layer.locked;
        debug!(layer = %id, locked = layer.locked, "Lock toggled");
        true
    }

    pub fn add_effect(&mut self, id: LayerId, effect: Effect) -> bool {
        let Some(layer) = self.composition.layer_mut(id) else {
            return false;
        };
        debug!(layer = %id, effect = %effect, "Effect added");
        layer.effects.push(effect);
        self.save_history("Add effect");
        true
    }

    /// Removes the first matching effect. Still records history when nothing matched.
    pub fn remove_effect(&mut self, id: LayerId, effect: &Effect) -> bool {
        let Some(layer) = self.composition.layer_mut(id) else {
            return false;
        };
        if let Some(pos) = layer.effects.iter().position(|e| e == effect) {
            layer.effects.remove(pos);
            debug!(layer = %id, effect = %effect, "Effect removed");
        }
        self.save_history("Remove effect");
        true
    }

    /// Keys `property` to `value` at the playhead with ease-in-out easing.
    pub fn add_keyframe(&mut self, id: LayerId, property: &str, value: impl Into<KeyframeValue>) -> bool {
        let time = self.clock.current_time;
        let Some(layer) = self.composition.layer_mut(id) else {
            return false;
        };
        layer
            .keyframes
            .push(Keyframe::new(time, property, value, EasingType::EaseInOut));
        debug!(layer = %id, property, time, "Keyframe added");
        self.save_history("Add keyframe");
        true
    }

    /// Changes the composition length; it never drops below the end of the last layer.
    pub fn set_duration(&mut self, duration: f64) {
        let floor = self.composition.content_end();
        let duration = if duration.is_finite() { duration.max(floor).max(0.0) } else { floor };
        self.composition.duration = duration;
        if self.clock.current_time > duration {
            self.clock.current_time = duration;
        }
        self.save_history("Set duration");
    }

    // --- Queries ---

    /// Visible layers active at the playhead, bottom to top.
    pub fn visible_layers(&self) -> Vec<&Layer> {
        self.composition.visible_layers(self.clock.current_time)
    }

    // --- History ---

    fn save_history(&mut self, label: &str) {
        self.history
            .record(label, Snapshot::capture(&self.composition, self.clock.current_time));
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.composition = snapshot.composition;
        self.clock.current_time = snapshot.current_time;
        if let Some(id) = self.selected {
            if self.composition.layer(id).is_none() {
                self.selected = None;
            }
        }
    }

    // --- Selection & view ---

    /// Selects a layer, or clears the selection. Unknown ids clear it too.
    pub fn select_layer(&mut self, id: Option<LayerId>) {
        self.selected = id.filter(|id| self.composition.layer(*id).is_some());
    }

    pub fn set_zoom(&mut self, percent: f64) {
        if percent.is_finite() {
            self.zoom = percent.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn set_timeline_zoom(&mut self, factor: f64) {
        if factor.is_finite() {
            self.timeline_zoom = factor.clamp(MIN_TIMELINE_ZOOM, MAX_TIMELINE_ZOOM);
        }
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
    }

    // --- Transport ---

    pub fn toggle_play(&mut self) {
        self.clock.toggle(self.composition.duration);
    }

    pub fn play(&mut self) {
        self.clock.play(self.composition.duration);
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Jumps to `time` clamped to the composition. Always pauses.
    pub fn seek_to(&mut self, time: f64) {
        self.clock.seek(time, self.composition.duration);
    }

    /// Animation-frame callback; `timestamp_ms` is the frame time in milliseconds.
    pub fn tick(&mut self, timestamp_ms: f64) -> TickOutcome {
        self.clock.tick(timestamp_ms, self.composition.duration)
    }

    /// Feeds frames from `frames` until playback stops or the source runs dry.
    pub fn run_playback(&mut self, frames: &mut dyn FrameSource) -> TickOutcome {
        let mut outcome = TickOutcome::Idle;
        while self.clock.is_playing {
            let Some(ts) = frames.next_frame() else {
                break;
            };
            outcome = self.tick(ts);
        }
        outcome
    }

    // --- Teardown ---

    /// Stops playback and releases every media source.
    pub fn close(&mut self) {
        self.clock.pause();
        self.selected = None;
        self.media.release_all();
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Rounds `value` to the nearest multiple of `step`; a non-positive step disables it.
pub fn snap_to(value: f64, step: f64) -> f64 {
    if step > 0.0 && value.is_finite() {
        (value / step).round() * step
    } else {
        value
    }
}

fn sanitize(layer: &mut Layer, min_duration: f64) {
    if !layer.start_time.is_finite() || layer.start_time < 0.0 {
        layer.start_time = 0.0;
    }
    if !layer.duration.is_finite() || layer.duration < min_duration {
        layer.duration = min_duration;
    }
    layer.opacity = if layer.opacity.is_nan() { 100.0 } else { layer.opacity.clamp(0.0, 100.0) };
    if let Some(speed) = layer.speed {
        layer.speed = Some(if speed.is_finite() { speed.clamp(MIN_SPEED, MAX_SPEED) } else { 1.0 });
    }
}
