//! Shared fixtures for integration tests.

#![allow(dead_code)]

use splice_core::media::{MediaFile, MediaProbe, ProbedMetadata};
use splice_core::types::{MediaId, MediaKind};
use splice_core::{EditorConfig, EditorSession};
use std::sync::Arc;
use std::time::Duration;

/// Probe answering from the declared kind, without decoding anything.
pub struct FakeProbe {
    pub video_duration: f64,
    pub audio_duration: f64,
    pub image_size: (u32, u32),
}

impl Default for FakeProbe {
    fn default() -> Self {
        Self {
            video_duration: 10.0,
            audio_duration: 4.0,
            image_size: (640, 360),
        }
    }
}

impl MediaProbe for FakeProbe {
    fn probe(&self, kind: MediaKind, _file: &MediaFile) -> anyhow::Result<ProbedMetadata> {
        Ok(match kind {
            MediaKind::Video => ProbedMetadata {
                duration: Some(self.video_duration),
                dimensions: Some((1920, 1080)),
                thumbnail: None,
            },
            MediaKind::Audio => ProbedMetadata {
                duration: Some(self.audio_duration),
                ..Default::default()
            },
            MediaKind::Image => ProbedMetadata {
                dimensions: Some(self.image_size),
                ..Default::default()
            },
        })
    }
}

/// Probe that never answers in time.
pub struct StuckProbe(pub Duration);

impl MediaProbe for StuckProbe {
    fn probe(&self, _kind: MediaKind, _file: &MediaFile) -> anyhow::Result<ProbedMetadata> {
        std::thread::sleep(self.0);
        Ok(ProbedMetadata::default())
    }
}

pub fn session() -> EditorSession {
    EditorSession::with_probe(EditorConfig::default(), Arc::new(FakeProbe::default()))
}

pub fn ingest_video(session: &mut EditorSession, name: &str) -> MediaId {
    session
        .ingest(MediaFile::from_bytes(name, Some("video/mp4"), vec![0u8; 1024]))
        .expect("fake probe always succeeds")
}

pub fn ingest_image(session: &mut EditorSession, name: &str) -> MediaId {
    session
        .ingest(MediaFile::from_bytes(name, Some("image/png"), vec![0u8; 256]))
        .expect("fake probe always succeeds")
}

pub fn ingest_audio(session: &mut EditorSession, name: &str) -> MediaId {
    session
        .ingest(MediaFile::from_bytes(name, Some("audio/wav"), vec![0u8; 512]))
        .expect("fake probe always succeeds")
}

/// Routes `tracing` output through the test harness; honours `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
