//! # Media Module
//!
//! Uploaded assets and the registry that owns them.
//!
//! ## Responsibilities
//! - **MediaFile**: Raw upload (name, declared type, bytes) before probing.
//! - **MediaAsset**: Immutable, fully-probed asset owned by the registry.
//! - **Probing**: [`probe::MediaProbe`] derives duration, dimensions and thumbnails.
//! - **Registry**: [`registry::MediaRegistry`] runs probes with a timeout and hands out ids.

pub mod probe;
pub mod registry;
mod video;

pub use probe::{DefaultProbe, MediaProbe, ProbedMetadata};
pub use registry::{CancelToken, IngestOptions, MediaRegistry};

use crate::types::{MediaId, MediaKind};
use crate::AssetLoader;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file handed to the editor for ingestion.
#[derive(Clone, Debug)]
pub struct MediaFile {
    pub name: String,
    /// Declared MIME-like type, if the upload carried one.
    pub mime: Option<String>,
    pub bytes: Arc<[u8]>,
    /// Where the bytes came from, when they came from disk.
    pub path: Option<PathBuf>,
}

impl MediaFile {
    pub fn from_bytes(name: impl Into<String>, mime: Option<&str>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.map(str::to_string),
            bytes: bytes.into(),
            path: None,
        }
    }

    /// Reads a file through the given loader; the kind is inferred from the extension.
    pub fn open(loader: &dyn AssetLoader, path: &str) -> Result<Self> {
        let bytes = loader.load_bytes(path)?;
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Ok(Self {
            name,
            mime: None,
            bytes: bytes.into(),
            path: Some(PathBuf::from(path)),
        })
    }

    pub fn with_mime(mut self, mime: &str) -> Self {
        self.mime = Some(mime.to_string());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Declared type first, then the file extension, then video.
    pub fn kind(&self) -> MediaKind {
        if let Some(mime) = self.mime.as_deref().filter(|m| !m.trim().is_empty()) {
            return MediaKind::from_mime(mime);
        }
        Path::new(&self.name)
            .extension()
            .map(|ext| MediaKind::from_extension(&ext.to_string_lossy()))
            .unwrap_or(MediaKind::Video)
    }
}

/// Playable source of an asset. Only the registry holds these.
#[derive(Clone, Debug)]
pub enum MediaSource {
    Bytes(Arc<[u8]>),
    File(PathBuf),
}

/// One ingested asset. Never modified after creation.
#[derive(Clone, Debug, Serialize)]
pub struct MediaAsset {
    pub id: MediaId,
    pub name: String,
    pub kind: MediaKind,
    /// Size in bytes.
    pub size: u64,
    /// Seconds; video and audio only.
    pub duration: Option<f64>,
    /// Pixel size; image and video only.
    pub dimensions: Option<(u32, u32)>,
    /// PNG-encoded poster frame; video only.
    #[serde(skip)]
    pub thumbnail: Option<Arc<[u8]>>,
    #[serde(skip)]
    pub(crate) source: MediaSource,
}

impl MediaAsset {
    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail.is_some()
    }
}
