use std::io::Write;
use std::sync::{Arc, Mutex};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::sink::EncodeSink;
use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{OverlayError, OverlayResult};

/// Options for [`GifSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifSinkOpts {
    /// Quantizer speed, `1` (best) to `30` (fastest).
    pub speed: i32,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

impl GifSinkOpts {
    /// Reject a speed outside `1..=30`.
    pub fn validate(&self) -> OverlayResult<()> {
        if !(1..=30).contains(&self.speed) {
            return Err(OverlayError::invalid_configuration(format!(
                "gif speed must be within 1..=30, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Streams frames into an infinitely looping GIF held in memory.
pub struct GifSink {
    enc: Option<GifEncoder<SharedBuf>>,
    out: SharedBuf,
    canvas: Option<Canvas>,
    frames: u64,
}

impl std::fmt::Debug for GifSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifSink")
            .field("open", &self.enc.is_some())
            .field("canvas", &self.canvas)
            .field("frames", &self.frames)
            .finish()
    }
}

impl GifSink {
    /// Open a new GIF stream.
    pub fn new(opts: GifSinkOpts) -> OverlayResult<Self> {
        opts.validate()?;
        let out = SharedBuf::default();
        let mut enc = GifEncoder::new_with_speed(out.clone(), opts.speed);
        enc.set_repeat(Repeat::Infinite)
            .map_err(|e| OverlayError::encoding_failure(format!("set gif repeat: {e}")))?;
        Ok(Self {
            enc: Some(enc),
            out,
            canvas: None,
            frames: 0,
        })
    }

    /// Frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames
    }
}

impl EncodeSink for GifSink {
    fn add_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> OverlayResult<()> {
        let Some(enc) = self.enc.as_mut() else {
            return Err(OverlayError::encoding_failure("gif sink is already finalized"));
        };

        let canvas = frame.canvas();
        match self.canvas {
            None => self.canvas = Some(canvas),
            Some(expected) if expected != canvas => {
                return Err(OverlayError::encoding_failure(format!(
                    "frame size mismatch: got {}x{}, expected {}x{}",
                    canvas.width, canvas.height, expected.width, expected.height
                )));
            }
            Some(_) => {}
        }

        let img = RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba8())
            .ok_or_else(|| {
                OverlayError::encoding_failure("frame.data size mismatch with width*height*4")
            })?;
        enc.encode_frame(Frame::from_parts(
            img,
            0,
            0,
            Delay::from_numer_denom_ms(duration_ms, 1),
        ))
        .map_err(|e| {
            OverlayError::encoding_failure(format!("encode gif frame {}: {e}", self.frames))
        })?;

        self.frames += 1;
        Ok(())
    }

    fn finalize(&mut self) -> OverlayResult<Vec<u8>> {
        let Some(enc) = self.enc.take() else {
            return Err(OverlayError::encoding_failure("gif sink is already finalized"));
        };
        if self.frames == 0 {
            return Err(OverlayError::encoding_failure("gif needs at least one frame"));
        }
        // Dropping the encoder writes the GIF trailer.
        drop(enc);
        self.out.take()
    }
}

/// Write target shared between the encoder and the sink.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn take(&self) -> OverlayResult<Vec<u8>> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| OverlayError::encoding_failure("gif output buffer poisoned"))?;
        Ok(std::mem::take(&mut *guard))
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("gif output buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
