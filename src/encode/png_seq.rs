use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::ImageEncoder as _;
use image::codecs::png::PngEncoder;

use crate::encode::sink::EncodeSink;
use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{OverlayError, OverlayResult};

/// File name of the `index`-th frame in a PNG sequence: `frame-0000.png`, `frame-0001.png`, ...
pub fn frame_file_name(index: usize) -> String {
    format!("frame-{index:04}.png")
}

/// One encoded frame of a sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PngFrame {
    /// Name from [`frame_file_name`].
    pub file_name: String,
    /// PNG bytes, straight alpha.
    pub png: Vec<u8>,
    /// Display duration carried for the caller; PNG itself has no timing.
    pub duration_ms: u32,
}

/// Encodes every frame as a standalone PNG, kept in memory until [`PngSequenceSink::write_to_dir`].
///
/// Nothing touches the filesystem during an export, so a failed export leaves no files behind.
/// The blob returned by `finalize` is empty.
#[derive(Debug, Default)]
pub struct PngSequenceSink {
    frames: Vec<PngFrame>,
    canvas: Option<Canvas>,
    finalized: bool,
}

impl PngSequenceSink {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded frames in order.
    pub fn frames(&self) -> &[PngFrame] {
        &self.frames
    }

    /// Write every frame into `dir` (created if missing) and return the written paths.
    ///
    /// Only valid once the sequence is finalized.
    pub fn write_to_dir(&self, dir: &Path) -> OverlayResult<Vec<PathBuf>> {
        if !self.finalized {
            return Err(OverlayError::encoding_failure(
                "png sequence must be finalized before writing",
            ));
        }
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create png sequence dir '{}'", dir.display()))?;

        let mut written = Vec::with_capacity(self.frames.len());
        for frame in &self.frames {
            let path = dir.join(&frame.file_name);
            std::fs::write(&path, &frame.png)
                .with_context(|| format!("write png '{}'", path.display()))?;
            written.push(path);
        }
        tracing::debug!(dir = %dir.display(), files = written.len(), "wrote png sequence");
        Ok(written)
    }
}

impl EncodeSink for PngSequenceSink {
    fn add_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> OverlayResult<()> {
        if self.finalized {
            return Err(OverlayError::encoding_failure(
                "png sequence is already finalized",
            ));
        }

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

        let index = self.frames.len();
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(
                &frame.to_straight_rgba8(),
                frame.width,
                frame.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| OverlayError::encoding_failure(format!("encode png frame {index}: {e}")))?;

        self.frames.push(PngFrame {
            file_name: frame_file_name(index),
            png,
            duration_ms,
        });
        Ok(())
    }

    fn finalize(&mut self) -> OverlayResult<Vec<u8>> {
        if self.finalized {
            return Err(OverlayError::encoding_failure(
                "png sequence is already finalized",
            ));
        }
        if self.frames.is_empty() {
            return Err(OverlayError::encoding_failure(
                "png sequence needs at least one frame",
            ));
        }
        self.finalized = true;
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png_seq.rs"]
mod tests;
