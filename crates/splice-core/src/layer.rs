//! # Layer
//!
//! One item placed on the timeline, with its own timing, transform, effects and keyframes.
//!
//! Media-backed layers hold a [`MediaId`] only; the asset itself stays owned by the
//! media registry.

use crate::animation::Keyframe;
use crate::effects::Effect;
use crate::types::{BlendMode, Color, LayerId, LayerKind, MediaId, Transform};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub visible: bool,
    pub locked: bool,
    /// Composition time where the layer becomes active, in seconds.
    pub start_time: f64,
    /// Length of the active window, in seconds.
    pub duration: f64,
    pub color: Color,
    /// 0 to 100.
    pub opacity: f64,
    pub blend_mode: BlendMode,
    pub effects: Vec<Effect>,
    pub keyframes: Vec<Keyframe>,
    pub transform: Transform,
    pub media_id: Option<MediaId>,
    /// Inline content of text layers.
    pub content: Option<String>,
    /// Playback-rate multiplier of the backing media.
    pub speed: Option<f64>,
}

impl Layer {
    /// Creates a visible, unlocked layer with neutral appearance.
    pub fn new(kind: LayerKind, name: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            id: LayerId::fresh(),
            name: name.into(),
            kind,
            visible: true,
            locked: false,
            start_time,
            duration,
            color: Color::random_tag(),
            opacity: 100.0,
            blend_mode: BlendMode::Normal,
            effects: Vec::new(),
            keyframes: Vec::new(),
            transform: Transform::default(),
            media_id: None,
            content: None,
            speed: None,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether `time` falls inside the active window (both ends inclusive).
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time()
    }

    /// Copy with a fresh id, a " Copy" name suffix and the given start time.
    pub fn duplicate_at(&self, start_time: f64) -> Self {
        Self {
            id: LayerId::fresh(),
            name: format!("{} Copy", self.name),
            start_time,
            ..self.clone()
        }
    }

    /// Time inside the backing media that is shown at composition time `time`.
    pub fn media_time(&self, time: f64) -> f64 {
        ((time - self.start_time) * self.speed.unwrap_or(1.0)).max(0.0)
    }
}

/// Shallow partial update for a [`Layer`]; `None` leaves a field untouched.
///
/// The id and the media reference are not patchable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub kind: Option<LayerKind>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub color: Option<Color>,
    pub opacity: Option<f64>,
    pub blend_mode: Option<BlendMode>,
    pub effects: Option<Vec<Effect>>,
    pub keyframes: Option<Vec<Keyframe>>,
    pub transform: Option<Transform>,
    pub content: Option<String>,
    pub speed: Option<f64>,
}

impl LayerPatch {
    pub fn start_time(start_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            ..Default::default()
        }
    }

    pub fn duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Default::default()
        }
    }

    pub fn opacity(opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..Default::default()
        }
    }

    pub fn blend_mode(mode: BlendMode) -> Self {
        Self {
            blend_mode: Some(mode),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, layer: &mut Layer) {
        if let Some(v) = self.name {
            layer.name = v;
        }
        if let Some(v) = self.kind {
            layer.kind = v;
        }
        if let Some(v) = self.visible {
            layer.visible = v;
        }
        if let Some(v) = self.locked {
            layer.locked = v;
        }
        if let Some(v) = self.start_time {
            layer.start_time = v;
        }
        if let Some(v) = self.duration {
            layer.duration = v;
        }
        if let Some(v) = self.color {
            layer.color = v;
        }
        if let Some(v) = self.opacity {
            layer.opacity = v;
        }
        if let Some(v) = self.blend_mode {
            layer.blend_mode = v;
        }
        if let Some(v) = self.effects {
            layer.effects = v;
        }
        if let Some(v) = self.keyframes {
            layer.keyframes = v;
        }
        if let Some(v) = self.transform {
            layer.transform = v;
        }
        if let Some(v) = self.content {
            layer.content = Some(v);
        }
        if let Some(v) = self.speed {
            layer.speed = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_window_is_inclusive() {
        let layer = Layer::new(LayerKind::Text, "Title", 2.0, 3.0);
        assert!(!layer.is_active_at(1.99));
        assert!(layer.is_active_at(2.0));
        assert!(layer.is_active_at(5.0));
        assert!(!layer.is_active_at(5.01));
    }

    #[test]
    fn duplicate_keeps_everything_but_identity_and_start() {
        let mut layer = Layer::new(LayerKind::Image, "Logo", 1.0, 4.0);
        layer.effects.push(Effect::Blur);
        layer.opacity = 60.0;
        let copy = layer.duplicate_at(5.0);
        assert_ne!(copy.id, layer.id);
        assert_eq!(copy.name, "Logo Copy");
        assert_eq!(copy.start_time, 5.0);
        assert_eq!(copy.duration, layer.duration);
        assert_eq!(copy.effects, layer.effects);
        assert_eq!(copy.opacity, layer.opacity);
        assert_eq!(copy.color, layer.color);
    }

    #[test]
    fn patch_merges_shallowly() {
        let mut layer = Layer::new(LayerKind::Video, "Clip", 0.0, 10.0);
        LayerPatch {
            opacity: Some(25.0),
            blend_mode: Some(BlendMode::Screen),
            ..Default::default()
        }
        .apply(&mut layer);
        assert_eq!(layer.opacity, 25.0);
        assert_eq!(layer.blend_mode, BlendMode::Screen);
        assert_eq!(layer.duration, 10.0);
        assert_eq!(layer.name, "Clip");
    }

    #[test]
    fn media_time_honours_speed() {
        let mut layer = Layer::new(LayerKind::Video, "Clip", 4.0, 10.0);
        assert_eq!(layer.media_time(6.0), 2.0);
        layer.speed = Some(2.0);
        assert_eq!(layer.media_time(6.0), 4.0);
        assert_eq!(layer.media_time(1.0), 0.0);
    }
}
