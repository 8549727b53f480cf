use crate::foundation::core::{Canvas, FrameIndex, FrameRGBA};
use crate::foundation::error::{OverlayError, OverlayResult};

/// Display duration used when a source frame carries none.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// Random-access background animation.
///
/// Indices are 0-based and contiguous; anything outside `[0, frame_count)` is
/// [`OverlayError::IndexOutOfRange`].
pub trait FrameStore {
    /// Number of frames.
    fn frame_count(&self) -> u64;
    /// Dimensions shared by every frame.
    fn dimensions(&self) -> Canvas;
    /// Borrow one premultiplied frame.
    fn frame(&self, idx: FrameIndex) -> OverlayResult<&FrameRGBA>;
    /// Display duration of one frame in milliseconds.
    fn frame_duration_ms(&self, idx: FrameIndex) -> OverlayResult<u32>;
}

/// Frames and durations held in memory.
#[derive(Clone, Debug)]
pub struct InMemoryFrameStore {
    canvas: Canvas,
    frames: Vec<FrameRGBA>,
    durations_ms: Vec<u32>,
}

impl InMemoryFrameStore {
    /// Build a store, checking every frame against `canvas`.
    pub fn new(canvas: Canvas, frames: Vec<FrameRGBA>, durations_ms: Vec<u32>) -> OverlayResult<Self> {
        if frames.len() != durations_ms.len() {
            return Err(OverlayError::invalid_configuration(format!(
                "{} frame(s) but {} duration(s)",
                frames.len(),
                durations_ms.len()
            )));
        }
        for (i, f) in frames.iter().enumerate() {
            if f.canvas() != canvas || f.data.len() != canvas.rgba_len() {
                return Err(OverlayError::invalid_configuration(format!(
                    "frame {i} is {}x{} ({} bytes), expected {}x{}",
                    f.width,
                    f.height,
                    f.data.len(),
                    canvas.width,
                    canvas.height
                )));
            }
        }
        Ok(Self {
            canvas,
            frames,
            durations_ms,
        })
    }

    /// A store of `count` copies of one frame, each shown for `duration_ms`.
    pub fn repeated(frame: FrameRGBA, count: usize, duration_ms: u32) -> OverlayResult<Self> {
        let canvas = frame.canvas();
        Self::new(canvas, vec![frame; count], vec![duration_ms; count])
    }

    fn check(&self, idx: FrameIndex) -> OverlayResult<usize> {
        let i = idx.as_usize();
        if idx.0 >= self.frame_count() {
            return Err(OverlayError::index_out_of_range(format!(
                "frame {} outside [0, {})",
                idx.0,
                self.frame_count()
            )));
        }
        Ok(i)
    }
}

impl FrameStore for InMemoryFrameStore {
    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn dimensions(&self) -> Canvas {
        self.canvas
    }

    fn frame(&self, idx: FrameIndex) -> OverlayResult<&FrameRGBA> {
        let i = self.check(idx)?;
        Ok(&self.frames[i])
    }

    fn frame_duration_ms(&self, idx: FrameIndex) -> OverlayResult<u32> {
        let i = self.check(idx)?;
        Ok(self.durations_ms[i])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/background/store.rs"]
mod tests;
