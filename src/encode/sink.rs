use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Append-only, order-preserving consumer of rendered frames.
///
/// Ordering contract: `add_frame` is called in strictly increasing frame order, then `finalize`
/// exactly once. Frames are handed over by value; the sink owns them from then on.
pub trait EncodeSink: Send {
    /// Append one frame shown for `duration_ms`.
    fn add_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> OverlayResult<()>;
    /// Finish the stream and return the encoded bytes.
    fn finalize(&mut self) -> OverlayResult<Vec<u8>>;
}

/// In-memory sink for tests and debugging. Its blob is empty.
#[derive(Debug, Default)]
pub struct InMemorySink {
    pub(crate) frames: Vec<(FrameRGBA, u32)>,
    finalized: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured `(frame, duration_ms)` pairs.
    pub fn frames(&self) -> &[(FrameRGBA, u32)] {
        &self.frames
    }

    /// Return `true` once `finalize` ran.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl EncodeSink for InMemorySink {
    fn add_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> OverlayResult<()> {
        if self.finalized {
            return Err(OverlayError::encoding_failure(
                "add_frame called after finalize",
            ));
        }
        self.frames.push((frame, duration_ms));
        Ok(())
    }

    fn finalize(&mut self) -> OverlayResult<Vec<u8>> {
        if self.finalized {
            return Err(OverlayError::encoding_failure("sink already finalized"));
        }
        self.finalized = true;
        Ok(Vec::new())
    }
}

impl<S: EncodeSink + ?Sized> EncodeSink for Box<S> {
    fn add_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> OverlayResult<()> {
        (**self).add_frame(frame, duration_ms)
    }

    fn finalize(&mut self) -> OverlayResult<Vec<u8>> {
        (**self).finalize()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
