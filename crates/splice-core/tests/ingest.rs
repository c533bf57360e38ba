//! Media Ingestion Tests
//!
//! Real probing of generated WAV and PNG files, plus timeout and cancellation.

mod common;

use common::{init_logging, StuckProbe};
use splice_core::media::{CancelToken, MediaFile};
use splice_core::types::MediaKind;
use splice_core::{DefaultAssetLoader, EditorConfig, EditorSession, IngestError};
use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn wav_bytes(sample_rate: u32, seconds: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buf = Vec::new();
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut buf), spec).unwrap();
        for i in 0..sample_rate * seconds {
            let t = i as f32 / sample_rate as f32;
            let sample = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
            writer.write_sample((sample * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    buf
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::new(width, height);
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// WAV duration is read from the stream header.
#[test]
fn wav_duration_is_probed() {
    init_logging();
    let mut editor = EditorSession::new(EditorConfig::default());
    let id = editor
        .ingest(MediaFile::from_bytes("tone.wav", Some("audio/wav"), wav_bytes(8000, 2)))
        .expect("valid wav");

    let asset = editor.media().get(id).expect("registered");
    assert_eq!(asset.kind, MediaKind::Audio);
    let duration = asset.duration.expect("audio has a duration");
    assert!((duration - 2.0).abs() < 1e-6, "duration was {}", duration);

    let layer = editor.add_layer_from_media(id, Some(0.0)).expect("asset exists");
    assert_eq!(editor.layer(layer).map(|l| l.duration), Some(2.0));
}

#[test]
fn png_dimensions_are_probed() {
    let mut editor = EditorSession::new(EditorConfig::default());
    let id = editor
        .ingest(MediaFile::from_bytes("logo.png", None, png_bytes(320, 200)))
        .expect("valid png");

    let asset = editor.media().get(id).expect("registered");
    assert_eq!(asset.kind, MediaKind::Image);
    assert_eq!(asset.dimensions, Some((320, 200)));
    assert_eq!(asset.duration, None);
}

/// A declared type wins over a misleading extension.
#[test]
fn declared_type_beats_extension() {
    let mut editor = EditorSession::new(EditorConfig::default());
    let id = editor
        .ingest(MediaFile::from_bytes("export.bin", Some("image/png"), png_bytes(8, 8)))
        .expect("valid png");
    assert_eq!(editor.media().get(id).map(|a| a.kind), Some(MediaKind::Image));
}

#[test]
fn corrupt_upload_is_rejected() {
    let mut editor = EditorSession::new(EditorConfig::default());
    let result = editor.ingest(MediaFile::from_bytes("broken.png", None, vec![0u8; 64]));
    assert!(matches!(result, Err(IngestError::Probe(_))));
    assert!(editor.media().is_empty());
}

/// Without FFmpeg, video duration comes from the container header.
#[cfg(not(feature = "video-rs"))]
#[test]
fn video_duration_falls_back_to_the_container_header() {
    let mut editor = EditorSession::new(EditorConfig::default());
    let id = editor
        .ingest(MediaFile::from_bytes("capture.wav", Some("video/x-wav"), wav_bytes(8000, 2)))
        .expect("container is readable");

    let asset = editor.media().get(id).expect("registered");
    assert_eq!(asset.kind, MediaKind::Video);
    let duration = asset.duration.expect("video has a duration");
    assert!((duration - 2.0).abs() < 1e-6, "duration was {}", duration);
    assert_eq!(asset.dimensions, None);
}

#[test]
fn unreadable_video_fails_ingestion() {
    let mut editor = EditorSession::new(EditorConfig::default());
    let result = editor.ingest(MediaFile::from_bytes("clip.mp4", None, vec![0u8; 64]));
    assert!(matches!(result, Err(IngestError::Probe(_))));
    assert!(editor.media().is_empty());
}

/// A probe that never answers is abandoned after the configured timeout.
#[test]
fn stuck_probe_times_out() {
    let config = EditorConfig {
        ingest_timeout_ms: 50,
        ..Default::default()
    };
    let mut editor = EditorSession::with_probe(config, Arc::new(StuckProbe(Duration::from_secs(2))));

    let started = Instant::now();
    let result = editor.ingest(MediaFile::from_bytes("slow.mp4", None, vec![1u8; 16]));
    assert!(matches!(result, Err(IngestError::TimedOut(d)) if d == Duration::from_millis(50)));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(editor.media().is_empty());
}

#[test]
fn cancelled_ingest_registers_nothing() {
    let mut editor = EditorSession::with_probe(
        EditorConfig::default(),
        Arc::new(StuckProbe(Duration::from_secs(2))),
    );
    let token = CancelToken::new();
    let canceller = token.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        canceller.cancel();
    });

    let started = Instant::now();
    let result = editor.ingest_cancellable(MediaFile::from_bytes("slow.mp4", None, vec![1u8; 16]), token);
    handle.join().unwrap();

    assert!(matches!(result, Err(IngestError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(editor.media().is_empty());
}

/// Files on disk go through the asset loader and keep their file name.
#[test]
fn ingest_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("poster.png");
    std::fs::write(&path, png_bytes(16, 9)).unwrap();

    let mut editor = EditorSession::new(EditorConfig::default());
    let id = editor
        .ingest_path(&DefaultAssetLoader, path.to_str().unwrap())
        .expect("readable file");
    let asset = editor.media().get(id).expect("registered");
    assert_eq!(asset.name, "poster.png");
    assert_eq!(asset.size, std::fs::metadata(&path).unwrap().len());

    let missing = editor.ingest_path(&DefaultAssetLoader, "/definitely/not/here.png");
    assert!(matches!(missing, Err(IngestError::Unreadable(_))));
}
