use super::probe::{MediaProbe, ProbedMetadata};
use super::{MediaAsset, MediaFile, MediaSource};
use crate::errors::IngestError;
use crate::types::{MediaId, MediaKind};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often a pending ingestion re-checks its cancel token.
const CANCEL_POLL: Duration = Duration::from_millis(20);

/// Shared flag that aborts a pending ingestion.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug)]
pub struct IngestOptions {
    pub timeout: Duration,
    pub cancel: Option<CancelToken>,
}

impl IngestOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: None,
        }
    }

    pub fn cancellable(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Owns every ingested asset and its playable source.
///
/// Assets are kept in insertion order. Layers refer to them by [`MediaId`] only.
pub struct MediaRegistry {
    assets: Vec<MediaAsset>,
    probe: Arc<dyn MediaProbe>,
}

impl MediaRegistry {
    pub fn new(probe: Arc<dyn MediaProbe>) -> Self {
        Self {
            assets: Vec::new(),
            probe,
        }
    }

    /// Probes `file` and registers it as a new asset.
    ///
    /// The probe runs on its own thread. If it does not answer within the timeout, or
    /// the token is cancelled first, the worker is abandoned and nothing is registered.
    pub fn ingest(&mut self, file: MediaFile, options: &IngestOptions) -> Result<&MediaAsset, IngestError> {
        let kind = file.kind();
        info!(name = %file.name, %kind, size = file.size(), "Ingesting media");

        let metadata = self.run_probe(kind, &file, options)?;
        let metadata = validate(kind, metadata)?;

        let source = match &file.path {
            Some(path) => MediaSource::File(path.clone()),
            None => MediaSource::Bytes(file.bytes.clone()),
        };
        let asset = MediaAsset {
            id: MediaId::fresh(),
            name: file.name,
            kind,
            size: file.bytes.len() as u64,
            duration: metadata.duration,
            dimensions: metadata.dimensions,
            thumbnail: metadata.thumbnail,
            source,
        };
        debug!(id = %asset.id, duration = ?asset.duration, dimensions = ?asset.dimensions, "Media ready");
        self.assets.push(asset);
        Ok(&self.assets[self.assets.len() - 1])
    }

    fn run_probe(&self, kind: MediaKind, file: &MediaFile, options: &IngestOptions) -> Result<ProbedMetadata, IngestError> {
        let (tx, rx) = bounded(1);
        let probe = self.probe.clone();
        let job = file.clone();
        thread::Builder::new()
            .name("media-probe".into())
            .spawn(move || {
                // The receiver is gone if the ingestion timed out; nothing to report.
                let _ = tx.send(probe.probe(kind, &job));
            })
            .map_err(|e| IngestError::Probe(format!("Cannot start probe worker: {}", e)))?;

        let deadline = Instant::now() + options.timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                warn!(name = %file.name, timeout = ?options.timeout, "Media probe timed out");
                return Err(IngestError::TimedOut(options.timeout));
            }
            let wait = (deadline - now).min(CANCEL_POLL);
            match rx.recv_timeout(wait) {
                Ok(Ok(metadata)) => return Ok(metadata),
                Ok(Err(e)) => {
                    warn!(name = %file.name, "Media probe failed: {:#}", e);
                    return Err(IngestError::Probe(format!("{:#}", e)));
                }
                Err(RecvTimeoutError::Timeout) => {
                    if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                        info!(name = %file.name, "Media ingestion cancelled");
                        return Err(IngestError::Cancelled);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(IngestError::Probe("Probe worker exited without a result".into()));
                }
            }
        }
    }

    pub fn get(&self, id: MediaId) -> Option<&MediaAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: MediaId) -> bool {
        self.get(id).is_some()
    }

    /// All assets in insertion order.
    pub fn list(&self) -> &[MediaAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn source(&self, id: MediaId) -> Option<&MediaSource> {
        self.get(id).map(|a| &a.source)
    }

    /// Drops an asset and its source. Reference checks are the caller's job.
    pub(crate) fn remove(&mut self, id: MediaId) -> Option<MediaAsset> {
        let index = self.assets.iter().position(|a| a.id == id)?;
        Some(self.assets.remove(index))
    }

    /// Frees every source handle.
    pub fn release_all(&mut self) {
        if !self.assets.is_empty() {
            info!(count = self.assets.len(), "Releasing media sources");
        }
        self.assets.clear();
    }
}

fn validate(kind: MediaKind, metadata: ProbedMetadata) -> Result<ProbedMetadata, IngestError> {
    match kind {
        MediaKind::Video | MediaKind::Audio => match metadata.duration {
            Some(d) if d.is_finite() && d >= 0.0 => Ok(metadata),
            _ => Err(IngestError::Probe(format!("{} has no usable duration", kind))),
        },
        MediaKind::Image => match metadata.dimensions {
            Some((w, h)) if w > 0 && h > 0 => Ok(metadata),
            _ => Err(IngestError::Probe("image has no dimensions".into())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(ProbedMetadata);

    impl MediaProbe for FixedProbe {
        fn probe(&self, _kind: MediaKind, _file: &MediaFile) -> anyhow::Result<ProbedMetadata> {
            Ok(self.0.clone())
        }
    }

    fn options() -> IngestOptions {
        IngestOptions::with_timeout(Duration::from_secs(5))
    }

    #[test]
    fn ingest_preserves_insertion_order() {
        let mut registry = MediaRegistry::new(Arc::new(FixedProbe(ProbedMetadata {
            duration: Some(3.0),
            dimensions: Some((10, 10)),
            thumbnail: None,
        })));
        let a = registry
            .ingest(MediaFile::from_bytes("a.mp4", Some("video/mp4"), vec![1u8; 8]), &options())
            .unwrap()
            .id;
        let b = registry
            .ingest(MediaFile::from_bytes("b.png", Some("image/png"), vec![2u8; 4]), &options())
            .unwrap()
            .id;

        let ids: Vec<_> = registry.list().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(registry.get(a).map(|m| m.size), Some(8));
        assert_eq!(registry.get(b).map(|m| m.kind), Some(MediaKind::Image));
    }

    #[test]
    fn missing_duration_is_rejected() {
        let mut registry = MediaRegistry::new(Arc::new(FixedProbe(ProbedMetadata::default())));
        let result = registry.ingest(MediaFile::from_bytes("a.wav", None, vec![0u8; 8]), &options());
        assert!(matches!(result, Err(IngestError::Probe(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn release_all_empties_the_registry() {
        let mut registry = MediaRegistry::new(Arc::new(FixedProbe(ProbedMetadata {
            duration: Some(1.0),
            ..Default::default()
        })));
        registry
            .ingest(MediaFile::from_bytes("a.wav", None, vec![0u8; 8]), &options())
            .unwrap();
        registry.release_all();
        assert!(registry.is_empty());
    }
}
