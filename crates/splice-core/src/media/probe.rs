use super::video;
use super::MediaFile;
use crate::types::MediaKind;
use anyhow::{anyhow, Context, Result};
use std::io::Cursor;
use std::sync::Arc;
use symphonia::core::codecs::CodecParameters;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::instrument;

/// Metadata derived from a media file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbedMetadata {
    pub duration: Option<f64>,
    pub dimensions: Option<(u32, u32)>,
    pub thumbnail: Option<Arc<[u8]>>,
}

/// Derives metadata for an upload.
///
/// Implementations run on a worker thread and may block; the registry bounds how long it
/// waits for them.
pub trait MediaProbe: Send + Sync {
    fn probe(&self, kind: MediaKind, file: &MediaFile) -> Result<ProbedMetadata>;
}

/// Probes images with `image`, audio with `symphonia` and video with `video-rs`.
/// Without the `video-rs` feature, video falls back to the container header.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultProbe;

impl MediaProbe for DefaultProbe {
    fn probe(&self, kind: MediaKind, file: &MediaFile) -> Result<ProbedMetadata> {
        match kind {
            MediaKind::Image => Ok(ProbedMetadata {
                dimensions: Some(probe_image_dimensions(&file.bytes)?),
                ..Default::default()
            }),
            MediaKind::Audio => Ok(ProbedMetadata {
                duration: Some(probe_stream_duration(&file.bytes, &file.name)?),
                ..Default::default()
            }),
            MediaKind::Video => video::probe_video(file),
        }
    }
}

/// Reads the pixel size from the image header without decoding the pixels.
#[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn probe_image_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Unreadable image")?;
    reader.into_dimensions().context("Unsupported image format")
}

/// Computes the playable duration of a media stream in seconds.
///
/// Uses the longest track duration declared in the container header (frame count and
/// time base) when present, otherwise sums the packet durations of the default track.
/// Works for audio files and for video containers symphonia can demux (MP4/MOV).
#[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn probe_stream_duration(bytes: &[u8], name: &str) -> Result<f64> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = std::path::Path::new(name).extension() {
        hint.with_extension(&ext.to_string_lossy());
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Unsupported format")?;

    let mut format = probed.format;
    let declared = format
        .tracks()
        .iter()
        .filter_map(|track| header_duration(&track.codec_params))
        .reduce(f64::max);
    if let Some(duration) = declared {
        return Ok(duration);
    }

    let track = format.default_track().context("No track found")?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let mut total: u64 = 0;
    while let Ok(packet) = format.next_packet() {
        if packet.track_id() == track_id {
            total += packet.dur;
        }
    }

    if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(total);
        return Ok(time.seconds as f64 + time.frac);
    }
    match params.sample_rate {
        Some(rate) if rate > 0 => Ok(total as f64 / rate as f64),
        _ => Err(anyhow!("Stream has no timing information")),
    }
}

fn header_duration(params: &CodecParameters) -> Option<f64> {
    let frames = params.n_frames?;
    if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(frames);
        return Some(time.seconds as f64 + time.frac);
    }
    match params.sample_rate {
        Some(rate) if rate > 0 => Some(frames as f64 / rate as f64),
        _ => None,
    }
}
