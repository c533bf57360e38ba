//! Rhai API Tests
//!
//! Drives a headless session through the scripting bindings.

use rhai::{Dynamic, Engine, Map};
use splice_core::scripting::{register_rhai_api, EditorHandle};
use splice_core::DefaultAssetLoader;
use std::io::Cursor;
use std::sync::Arc;

fn engine() -> Engine {
    let mut engine = Engine::new();
    register_rhai_api(&mut engine, Arc::new(DefaultAssetLoader));
    engine
}

/// Quick smoke test: a script builds a session and returns it.
#[test]
fn smoke_test_rhai_engine() {
    let script = r#"
let editor = new_editor();
let title = editor.add_text_layer("Hello");
editor.move_layer(title, 1.0);
editor
"#;
    let editor = engine().eval::<EditorHandle>(script).expect("script runs");
    let session = editor.lock();
    assert_eq!(session.composition().len(), 1);
    assert_eq!(session.layers().next().map(|l| l.start_time), Some(1.0));
}

#[test]
fn edits_undo_and_read_back() {
    let script = r#"
let editor = new_editor(#{ grid_step: 1.0 });
let id = editor.add_text_layer();
editor.update_layer(id, #{ opacity: 50, blend_mode: "multiply" });
editor.add_effect(id, "blur");
editor.resize_layer(id, 2);
editor.undo();

let layer = editor.layer(id);
#{
    opacity: layer.opacity,
    blend: layer.blend_mode,
    effects: layer.effects,
    duration: layer.duration,
    can_redo: editor.can_redo(),
    missing: editor.layer(999999999)
}
"#;
    let result = engine().eval::<Map>(script).expect("script runs");
    assert_eq!(result["opacity"].as_float().ok(), Some(50.0));
    assert_eq!(result["blend"].clone().into_string().ok().as_deref(), Some("multiply"));
    assert_eq!(result["effects"].clone().into_array().map(|a| a.len()).ok(), Some(1));
    assert_eq!(result["duration"].as_float().ok(), Some(5.0));
    assert_eq!(result["can_redo"].as_bool().ok(), Some(true));
    assert!(result["missing"].is_unit());
}

/// Toggles return to the script but leave history alone.
#[test]
fn toggles_keep_can_undo() {
    let script = r#"
let editor = new_editor();
let id = editor.add_text_layer();
editor.undo();
let id2 = editor.add_text_layer("Again");
editor.undo();
let before = editor.can_undo();
editor.redo();
editor.toggle_visibility(id2);
editor.toggle_lock(id2);
[before, editor.can_undo(), editor.visible_layers().len()]
"#;
    let result = engine().eval::<rhai::Array>(script).expect("script runs");
    assert_eq!(result[0].as_bool().ok(), Some(false));
    assert_eq!(result[1].as_bool().ok(), Some(true));
    assert_eq!(result[2].as_int().ok(), Some(0));
}

#[test]
fn playback_from_script() {
    let script = r#"
let editor = new_editor();
editor.set_duration(2.0);
editor.play();
let outcome = editor.play_frames(250.0, 20);
[outcome, editor.is_playing(), editor.current_time()]
"#;
    let result = engine().eval::<rhai::Array>(script).expect("script runs");
    assert_eq!(result[0].clone().into_string().ok().as_deref(), Some("ended"));
    assert_eq!(result[1].as_bool().ok(), Some(false));
    assert_eq!(result[2].as_float().ok(), Some(0.0));
}

#[test]
fn keyframes_from_script() {
    let script = r#"
let editor = new_editor();
let id = editor.add_text_layer();
editor.add_keyframe(id, "x", 0.0);
editor.seek(4.0);
editor.add_keyframe(id, "x", 100.0);
editor.value_at(id, "x", 2.0)
"#;
    let value = engine().eval::<Dynamic>(script).expect("script runs");
    // Ease-in-out is symmetric around the midpoint.
    let x = value.as_float().expect("numeric keyframe");
    assert!((x - 50.0).abs() < 1e-9);
}

#[test]
fn formatting_helpers() {
    let engine = engine();
    assert_eq!(engine.eval::<String>("format_time(65.5)").unwrap(), "1:05.50");
    assert_eq!(engine.eval::<String>("format_file_size(1536)").unwrap(), "1.5 KB");
}

/// `ingest` reports failures as data instead of aborting the script.
#[test]
fn ingest_from_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("still.png");
    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image::RgbImage::new(40, 30))
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();
    std::fs::write(&path, png.into_inner()).unwrap();

    let script = format!(
        r#"
let editor = new_editor();
let ok = editor.ingest("{}");
let bad = editor.ingest("/no/such/file.png");
let layer = editor.add_layer_from_media(ok.id, 0.0);
[ok.ok, bad.ok, editor.media().len(), editor.layer(layer).duration]
"#,
        path.display()
    );
    let result = engine().eval::<rhai::Array>(&script).expect("script runs");
    assert_eq!(result[0].as_bool().ok(), Some(true));
    assert_eq!(result[1].as_bool().ok(), Some(false));
    assert_eq!(result[2].as_int().ok(), Some(1));
    assert_eq!(result[3].as_float().ok(), Some(5.0));
}

/// Colors that aren't ASCII hex are ignored, the rest of the patch still applies.
#[test]
fn non_ascii_color_is_ignored() {
    let script = r#"
let editor = new_editor();
let id = editor.add_text_layer();
let updated = editor.update_layer(id, #{ color: "1é234", opacity: 20 });
[updated, editor.layer(id).opacity]
"#;
    let result = engine().eval::<rhai::Array>(script).expect("script runs");
    assert_eq!(result[0].as_bool().ok(), Some(true));
    assert_eq!(result[1].as_float().ok(), Some(20.0));
}
