//! Undo/Redo Tests
//!
//! Round trips through the snapshot history for each edit operation.

mod common;

use common::{ingest_video, session};
use splice_core::effects::Effect;
use splice_core::timeline::Composition;
use splice_core::types::TransformPatch;
use splice_core::{EditorSession, LayerPatch};

fn state(editor: &EditorSession) -> (Composition, f64) {
    (editor.composition().clone(), editor.current_time())
}

/// Runs `op`, then checks undo restores the old state and redo the new one.
fn assert_round_trip(editor: &mut EditorSession, op: impl FnOnce(&mut EditorSession)) {
    let before = state(editor);
    op(editor);
    let after = state(editor);
    assert_ne!(before, after, "operation should change something");

    assert!(editor.undo());
    assert_eq!(state(editor), before);
    assert!(editor.redo());
    assert_eq!(state(editor), after);
}

#[test]
fn every_edit_round_trips() {
    let mut editor = session();
    let media = ingest_video(&mut editor, "a.mp4");

    assert_round_trip(&mut editor, |e| {
        e.add_layer_from_media(media, Some(0.0));
    });
    let id = editor.layers().next().map(|l| l.id).expect("one layer");

    assert_round_trip(&mut editor, |e| {
        e.add_text_layer(Some("Title"));
    });
    assert_round_trip(&mut editor, |e| {
        e.update_layer(id, LayerPatch::opacity(25.0));
    });
    assert_round_trip(&mut editor, |e| {
        e.move_layer(id, 3.0);
    });
    assert_round_trip(&mut editor, |e| {
        e.resize_layer(id, 2.0);
    });
    assert_round_trip(&mut editor, |e| {
        e.duplicate_layer(id);
    });
    assert_round_trip(&mut editor, |e| {
        e.add_effect(id, Effect::Grayscale);
    });
    assert_round_trip(&mut editor, |e| {
        e.add_keyframe(id, "x", 120.0);
    });
    assert_round_trip(&mut editor, |e| {
        e.set_duration(60.0);
    });
    assert_round_trip(&mut editor, |e| {
        e.delete_layer(id);
    });
}

/// The very first edit can be undone back to the empty session.
#[test]
fn first_edit_is_undoable() {
    let mut editor = session();
    assert!(!editor.can_undo());
    editor.add_text_layer(None);
    assert!(editor.can_undo());

    assert!(editor.undo());
    assert!(editor.composition().is_empty());
    assert_eq!(editor.duration(), 0.0);
    assert!(!editor.can_undo());
    assert!(editor.can_redo());
}

#[test]
fn toggles_do_not_touch_history() {
    let mut editor = session();
    let id = editor.add_text_layer(None);
    let entries = editor.history().len();
    let can_undo = editor.can_undo();

    editor.toggle_visibility(id);
    editor.toggle_lock(id);
    assert_eq!(editor.can_undo(), can_undo);
    assert_eq!(editor.history().len(), entries);
}

#[test]
fn transform_drag_commits_once() {
    let mut editor = session();
    let id = editor.add_text_layer(None);
    let entries = editor.history().len();

    for step in 1..=5 {
        editor.update_layer_transform(
            id,
            TransformPatch {
                x: Some(step as f64 * 10.0),
                ..Default::default()
            },
        );
    }
    assert_eq!(editor.history().len(), entries);

    assert!(editor.commit_transform(id));
    assert_eq!(editor.history().len(), entries + 1);
    assert_eq!(editor.history().undo_label(), Some("Transform layer"));

    editor.undo();
    assert_eq!(editor.layer(id).map(|l| l.transform.x), Some(0.0));
}

#[test]
fn new_edit_discards_redo_branch() {
    let mut editor = session();
    let id = editor.add_text_layer(None);
    editor.move_layer(id, 2.0);
    editor.undo();
    assert!(editor.can_redo());

    editor.resize_layer(id, 1.0);
    assert!(!editor.can_redo());
    assert!(!editor.redo());
}

/// Undo also restores the playhead captured with the snapshot.
#[test]
fn undo_restores_playhead() {
    let mut editor = session();
    editor.set_duration(20.0);
    editor.seek_to(4.0);
    let id = editor.add_text_layer(None);
    editor.seek_to(9.0);
    editor.move_layer(id, 6.0);
    assert_eq!(editor.current_time(), 9.0);

    editor.undo();
    assert_eq!(editor.current_time(), 4.0);
    assert_eq!(editor.layer(id).map(|l| l.start_time), Some(4.0));
}

/// Undoing past a layer's creation clears a selection pointing at it.
#[test]
fn undo_clears_dangling_selection() {
    let mut editor = session();
    let id = editor.add_text_layer(None);
    assert_eq!(editor.selected_layer(), Some(id));
    editor.undo();
    assert_eq!(editor.selected_layer(), None);
}
