use crate::background::store::FrameStore;
use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::encode::sink::EncodeSink;
use crate::export::progress::ProgressSink;
use crate::export::scheduler::HostScheduler;
use crate::foundation::core::{FrameIndex, Vec2};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::render::blend::BlendSettings;
use crate::render::compositor::composite;
use crate::sim::simulation::Simulation;

/// Share of the progress bar covered by rendering; the rest is finalize.
const RENDER_PERCENT: u64 = 95;

/// Options controlling export behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOpts {
    /// Cede to the host scheduler after every `yield_every` frames.
    pub yield_every: u64,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self { yield_every: 5 }
    }
}

impl ExportOpts {
    /// Reject a zero yield interval.
    pub fn validate(&self) -> OverlayResult<()> {
        if self.yield_every == 0 {
            return Err(OverlayError::invalid_configuration(
                "yield_every must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Export state machine: `Idle -> Rendering -> Encoding -> Done`, with `Failed` reachable from
/// both working states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportState {
    /// Nothing in flight.
    Idle,
    /// Rendering `frame` out of `total`.
    Rendering {
        /// Frame being produced.
        frame: FrameIndex,
        /// Frames in the whole export.
        total: u64,
    },
    /// All frames handed over; the sink is finalizing.
    Encoding,
    /// The last export returned a blob.
    Done,
    /// The last export aborted; see [`ExportPipeline::last_error`].
    Failed,
}

/// Drives the compositor over every background frame and streams the results into a sink.
///
/// One export runs at a time (`&mut self`). Frames are produced strictly in index order, each
/// handed to the sink before the next simulation step.
#[derive(Debug)]
pub struct ExportPipeline {
    opts: ExportOpts,
    state: ExportState,
    last_error: Option<String>,
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new(ExportOpts::default())
    }
}

impl ExportPipeline {
    /// Create an idle pipeline.
    pub fn new(opts: ExportOpts) -> Self {
        Self {
            opts,
            state: ExportState::Idle,
            last_error: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Message of the error that failed the last export, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Return to `Idle`, forgetting the last outcome.
    pub fn reset(&mut self) {
        self.transition(ExportState::Idle);
        self.last_error = None;
    }

    /// Render every background frame and return the sink's finalized blob.
    ///
    /// The simulation continues from its current state and is stepped exactly once per frame.
    /// Any failure aborts the export: the sink is not finalized, nothing is returned, and the
    /// state becomes `Failed` until the next `export` or [`ExportPipeline::reset`].
    #[tracing::instrument(skip_all, fields(frames = store.frame_count()))]
    pub fn export(
        &mut self,
        store: &dyn FrameStore,
        sim: &mut Simulation,
        blend: &BlendSettings,
        sink: &mut dyn EncodeSink,
        progress: &mut dyn ProgressSink,
        scheduler: &mut dyn HostScheduler,
    ) -> OverlayResult<Vec<u8>> {
        self.reset();

        match self.run(store, sim, blend, sink, progress, scheduler) {
            Ok(blob) => {
                self.transition(ExportState::Done);
                tracing::info!(bytes = blob.len(), "export finished");
                progress.report(100, "Export complete");
                Ok(blob)
            }
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                self.last_error = Some(err.to_string());
                self.transition(ExportState::Failed);
                Err(err)
            }
        }
    }

    /// [`ExportPipeline::export`] into a fresh [`GifSink`].
    pub fn export_gif(
        &mut self,
        store: &dyn FrameStore,
        sim: &mut Simulation,
        blend: &BlendSettings,
        gif: GifSinkOpts,
        progress: &mut dyn ProgressSink,
        scheduler: &mut dyn HostScheduler,
    ) -> OverlayResult<Vec<u8>> {
        let mut sink = GifSink::new(gif)?;
        self.export(store, sim, blend, &mut sink, progress, scheduler)
    }

    fn run(
        &mut self,
        store: &dyn FrameStore,
        sim: &mut Simulation,
        blend: &BlendSettings,
        sink: &mut dyn EncodeSink,
        progress: &mut dyn ProgressSink,
        scheduler: &mut dyn HostScheduler,
    ) -> OverlayResult<Vec<u8>> {
        self.opts.validate()?;
        blend.validate()?;

        let total = store.frame_count();
        if total == 0 {
            return Err(OverlayError::invalid_configuration(
                "background has no frames to export",
            ));
        }
        let canvas = sim.canvas()?;
        if canvas != store.dimensions() {
            return Err(OverlayError::invalid_configuration(format!(
                "simulation space {}x{} does not match background {}x{}",
                canvas.width,
                canvas.height,
                store.dimensions().width,
                store.dimensions().height
            )));
        }

        progress.report(0, "Preparing export...");
        for i in 0..total {
            let idx = FrameIndex(i);
            self.transition(ExportState::Rendering { frame: idx, total });

            sim.step()?;
            let visual = sim.render(idx)?;
            let frame = composite(store.frame(idx)?, &visual, Vec2::ZERO, blend)?;
            let duration_ms = store.frame_duration_ms(idx)?;
            sink.add_frame(frame, duration_ms).map_err(as_encoding_failure)?;

            let done = i + 1;
            progress.report(
                (done * RENDER_PERCENT / total) as u8,
                &format!("Rendering frame {done}/{total}"),
            );

            if done < total
                && done.is_multiple_of(self.opts.yield_every)
                && scheduler.cede(done, total).is_break()
            {
                return Err(OverlayError::cancelled(format!(
                    "stopped by host after {done}/{total} frames"
                )));
            }
        }

        self.transition(ExportState::Encoding);
        progress.report(RENDER_PERCENT as u8, "Encoding...");
        sink.finalize().map_err(as_encoding_failure)
    }

    fn transition(&mut self, next: ExportState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "export state");
        }
        self.state = next;
    }
}

fn as_encoding_failure(err: OverlayError) -> OverlayError {
    match err {
        OverlayError::EncodingFailure(_) => err,
        other => OverlayError::encoding_failure(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
