// Video probing backed by video-rs (FFmpeg), with a container-header fallback when the
// feature is off.
use super::probe::ProbedMetadata;
use super::MediaFile;
use anyhow::Result;

/// Where the poster frame is taken from, in milliseconds.
#[cfg_attr(not(feature = "video-rs"), allow(dead_code))]
const THUMBNAIL_SEEK_MS: i64 = 100;
#[cfg_attr(not(feature = "video-rs"), allow(dead_code))]
const THUMBNAIL_WIDTH: u32 = 160;

#[cfg(feature = "video-rs")]
mod real {
    use super::*;
    use anyhow::{anyhow, Context};
    use std::io::{Cursor, Write};
    use std::sync::Arc;
    use tracing::{debug, instrument};
    use video_rs::decode::Decoder;

    #[instrument(level = "debug", skip(file), fields(name = %file.name))]
    pub fn probe_video(file: &MediaFile) -> Result<ProbedMetadata> {
        video_rs::init().map_err(|e| anyhow!("FFmpeg init failed: {}", e))?;

        // FFmpeg wants a path; uploads held in memory are spilled to a temp file.
        let mut spill = None;
        let path = match &file.path {
            Some(p) => p.clone(),
            None => {
                let mut tmp = tempfile::NamedTempFile::new()?;
                tmp.write_all(&file.bytes)?;
                let p = tmp.path().to_path_buf();
                spill = Some(tmp);
                p
            }
        };

        let mut decoder = Decoder::new(path).context("Unsupported video")?;
        let duration = decoder
            .duration()
            .map_err(|e| anyhow!("No duration: {}", e))?
            .as_secs_f64();
        let (width, height) = decoder.size();

        let thumbnail = match poster_frame(&mut decoder) {
            Ok(png) => Some(png),
            Err(e) => {
                debug!("No poster frame: {}", e);
                None
            }
        };
        drop(spill);

        Ok(ProbedMetadata {
            duration: Some(duration.max(0.0)),
            dimensions: Some((width, height)),
            thumbnail,
        })
    }

    fn poster_frame(decoder: &mut Decoder) -> Result<Arc<[u8]>> {
        decoder
            .seek(THUMBNAIL_SEEK_MS)
            .map_err(|e| anyhow!("Seek failed: {}", e))?;
        let (_, frame) = decoder.decode().map_err(|e| anyhow!("Decode failed: {}", e))?;
        let shape = frame.shape();
        let (h, w) = (shape[0] as u32, shape[1] as u32);
        let raw = frame
            .as_slice()
            .map(|s| s.to_vec())
            .context("Frame is not contiguous")?;
        let rgb = image::RgbImage::from_raw(w, h, raw).context("Frame size mismatch")?;

        let thumb_h = (h * THUMBNAIL_WIDTH / w.max(1)).max(1);
        let thumb = image::imageops::thumbnail(&rgb, THUMBNAIL_WIDTH, thumb_h);
        let mut png = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(thumb).write_to(&mut png, image::ImageFormat::Png)?;
        Ok(png.into_inner().into())
    }
}

#[cfg(feature = "video-rs")]
pub use real::probe_video;

/// Reads the duration from the container header through symphonia. Frame size and the
/// poster frame need a decoder, so they stay unknown.
#[cfg(not(feature = "video-rs"))]
pub fn probe_video(file: &MediaFile) -> Result<ProbedMetadata> {
    use anyhow::Context;

    let duration = super::probe::probe_stream_duration(&file.bytes, &file.name)
        .with_context(|| format!("Cannot read the container of '{}'", file.name))?;
    Ok(ProbedMetadata {
        duration: Some(duration.max(0.0)),
        dimensions: None,
        thumbnail: None,
    })
}
