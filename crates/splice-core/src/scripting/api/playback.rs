//! # Playback API
//!
//! Transport, history and view functions for Rhai scripts.
//!
//! ## Responsibilities
//! - **Transport**: `toggle_play`, `play`, `pause`, `seek`, `tick`, `play_frames`
//! - **History**: `undo`, `redo`, `can_undo`, `can_redo`
//! - **Queries**: `current_time`, `duration`, `is_playing`, `visible_layers`
//! - **View**: `set_zoom`, `set_timeline_zoom`, `set_snap_to_grid`, `set_duration`

use crate::playback::{ManualFrames, TickOutcome};
use rhai::{Array, Dynamic, Engine};

use super::super::types::EditorHandle;
use super::super::utils::as_f64;

fn outcome_name(outcome: TickOutcome) -> &'static str {
    match outcome {
        TickOutcome::Idle => "idle",
        TickOutcome::Advanced(_) => "advanced",
        TickOutcome::Ended => "ended",
    }
}

/// Register playback-related Rhai functions.
pub fn register(engine: &mut Engine) {
    // Transport
    engine.register_fn("toggle_play", |editor: &mut EditorHandle| {
        editor.lock().toggle_play();
    });
    engine.register_fn("play", |editor: &mut EditorHandle| {
        editor.lock().play();
    });
    engine.register_fn("pause", |editor: &mut EditorHandle| {
        editor.lock().pause();
    });
    engine.register_fn("seek", |editor: &mut EditorHandle, time: Dynamic| {
        if let Some(t) = as_f64(&time) {
            editor.lock().seek_to(t);
        }
    });
    engine.register_fn("tick", |editor: &mut EditorHandle, timestamp_ms: Dynamic| {
        let outcome = match as_f64(&timestamp_ms) {
            Some(ts) => editor.lock().tick(ts),
            None => TickOutcome::Idle,
        };
        outcome_name(outcome).to_string()
    });
    // Simulated frames: `count` frames `interval_ms` apart.
    engine.register_fn(
        "play_frames",
        |editor: &mut EditorHandle, interval_ms: Dynamic, count: i64| {
            let interval = as_f64(&interval_ms).unwrap_or(1000.0 / 60.0);
            let mut frames = ManualFrames::every(interval, count.max(0) as usize);
            outcome_name(editor.lock().run_playback(&mut frames)).to_string()
        },
    );

    // History
    engine.register_fn("undo", |editor: &mut EditorHandle| editor.lock().undo());
    engine.register_fn("redo", |editor: &mut EditorHandle| editor.lock().redo());
    engine.register_fn("can_undo", |editor: &mut EditorHandle| editor.lock().can_undo());
    engine.register_fn("can_redo", |editor: &mut EditorHandle| editor.lock().can_redo());

    // Queries
    engine.register_fn("current_time", |editor: &mut EditorHandle| {
        editor.lock().current_time()
    });
    engine.register_fn("duration", |editor: &mut EditorHandle| editor.lock().duration());
    engine.register_fn("is_playing", |editor: &mut EditorHandle| {
        editor.lock().is_playing()
    });
    engine.register_fn("visible_layers", |editor: &mut EditorHandle| {
        editor
            .lock()
            .visible_layers()
            .iter()
            .map(|l| Dynamic::from(l.id.0 as i64))
            .collect::<Array>()
    });

    // View
    engine.register_fn("set_zoom", |editor: &mut EditorHandle, percent: Dynamic| {
        if let Some(p) = as_f64(&percent) {
            editor.lock().set_zoom(p);
        }
    });
    engine.register_fn("set_timeline_zoom", |editor: &mut EditorHandle, factor: Dynamic| {
        if let Some(f) = as_f64(&factor) {
            editor.lock().set_timeline_zoom(f);
        }
    });
    engine.register_fn("set_snap_to_grid", |editor: &mut EditorHandle, enabled: bool| {
        editor.lock().set_snap_to_grid(enabled);
    });
    engine.register_fn("set_duration", |editor: &mut EditorHandle, seconds: Dynamic| {
        if let Some(s) = as_f64(&seconds) {
            editor.lock().set_duration(s);
        }
    });
}
