use crate::types::MediaId;
use std::time::Duration;
use thiserror::Error;

/// Terminal outcome of a media ingestion that did not produce a usable asset.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Media not readable: {0}")]
    Unreadable(String),
    #[error("Metadata probe failed: {0}")]
    Probe(String),
    #[error("Metadata probe timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Ingestion cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unknown media asset: {0}")]
    UnknownAsset(MediaId),
    #[error("Media asset {id} is referenced by {layers} layer(s)")]
    AssetInUse { id: MediaId, layers: usize },
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
