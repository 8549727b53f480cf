use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder as _, ImageFormat};

use crate::background::store::{DEFAULT_FRAME_DURATION_MS, FrameStore as _, InMemoryFrameStore};
use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{OverlayError, OverlayResult};

/// Decode an animated GIF or any still image `image` understands into a frame store.
///
/// GIF frames come out fully composited onto the logical screen. Zero delays and still images
/// get [`DEFAULT_FRAME_DURATION_MS`].
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_background(bytes: &[u8]) -> OverlayResult<InMemoryFrameStore> {
    let format = image::guess_format(bytes).context("detect background image format")?;
    let store = match format {
        ImageFormat::Gif => decode_gif(bytes)?,
        _ => decode_still(bytes)?,
    };
    tracing::debug!(?format, frames = store.frame_count(), "decoded background");
    Ok(store)
}

/// Read and decode a background file.
pub fn load_background(path: &Path) -> OverlayResult<InMemoryFrameStore> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read background '{}'", path.display()))?;
    decode_background(&bytes)
}

fn decode_gif(bytes: &[u8]) -> OverlayResult<InMemoryFrameStore> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).context("open gif decoder")?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .context("decode gif frames")?;

    let Some(first) = frames.first() else {
        return Err(OverlayError::invalid_configuration("gif has no frames"));
    };
    let (width, height) = first.buffer().dimensions();

    let mut out = Vec::with_capacity(frames.len());
    let mut durations = Vec::with_capacity(frames.len());
    for frame in frames {
        durations.push(delay_ms(frame.delay()));
        let rgba = frame.into_buffer();
        out.push(FrameRGBA::from_straight_rgba8(
            rgba.width(),
            rgba.height(),
            rgba.into_raw(),
        )?);
    }

    InMemoryFrameStore::new(Canvas::new(width, height), out, durations)
}

fn decode_still(bytes: &[u8]) -> OverlayResult<InMemoryFrameStore> {
    let rgba = image::load_from_memory(bytes)
        .context("decode image from memory")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let frame = FrameRGBA::from_straight_rgba8(width, height, rgba.into_raw())?;
    InMemoryFrameStore::repeated(frame, 1, DEFAULT_FRAME_DURATION_MS)
}

fn delay_ms(delay: image::Delay) -> u32 {
    let (num, den) = delay.numer_denom_ms();
    match num.checked_div(den) {
        Some(ms) if ms > 0 => ms,
        _ => DEFAULT_FRAME_DURATION_MS,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/background/decode.rs"]
mod tests;
