//! Looping on-screen playback over the same compositor the exporter uses.

use crate::background::store::FrameStore;
use crate::foundation::core::{FrameIndex, FrameRGBA, Vec2};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::render::blend::BlendSettings;
use crate::render::compositor::composite;
use crate::sim::simulation::Simulation;

/// Playback cursor.
///
/// Each distinct displayed frame gets exactly one simulation step, taken the first time it is
/// presented. Wrapping from the last frame back to 0 counts as a new frame; the simulation is
/// never rewound.
#[derive(Clone, Debug)]
pub struct Player {
    current: FrameIndex,
    playing: bool,
    elapsed_ms: f64,
    step_pending: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Paused at frame 0.
    pub fn new() -> Self {
        Self {
            current: FrameIndex(0),
            playing: false,
            elapsed_ms: 0.0,
            step_pending: true,
        }
    }

    /// Frame currently on screen.
    pub fn current_frame(&self) -> FrameIndex {
        self.current
    }

    /// Return `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start or resume.
    pub fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.elapsed_ms = 0.0;
        }
    }

    /// Pause on the current frame.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Pause and rewind to frame 0.
    pub fn stop(&mut self) {
        self.pause();
        self.jump(FrameIndex(0));
    }

    /// Jump to `frame`, e.g. from a timeline scrubber.
    pub fn seek(&mut self, frame: FrameIndex, store: &dyn FrameStore) -> OverlayResult<()> {
        if frame.0 >= store.frame_count() {
            return Err(OverlayError::index_out_of_range(format!(
                "seek to frame {} outside [0, {})",
                frame.0,
                store.frame_count()
            )));
        }
        self.jump(frame);
        Ok(())
    }

    /// Feed wall-clock time. Once the current frame's display duration has elapsed, moves to the
    /// next frame and returns it composited; otherwise returns `None`.
    pub fn advance(
        &mut self,
        elapsed_ms: f64,
        store: &dyn FrameStore,
        sim: &mut Simulation,
        blend: &BlendSettings,
    ) -> OverlayResult<Option<FrameRGBA>> {
        if !self.playing {
            return Ok(None);
        }
        let count = store.frame_count();
        if count == 0 {
            return Ok(None);
        }

        self.elapsed_ms += elapsed_ms.max(0.0);
        let duration = f64::from(store.frame_duration_ms(self.current)?);
        if self.elapsed_ms < duration {
            return Ok(None);
        }

        self.elapsed_ms = 0.0;
        self.jump(FrameIndex((self.current.0 + 1) % count));
        self.present(store, sim, blend).map(Some)
    }

    /// Composite the current frame, stepping the simulation first if this frame has not been
    /// shown yet. Repeated calls only redraw.
    pub fn present(
        &mut self,
        store: &dyn FrameStore,
        sim: &mut Simulation,
        blend: &BlendSettings,
    ) -> OverlayResult<FrameRGBA> {
        let background = store.frame(self.current)?;
        if self.step_pending {
            sim.step()?;
            self.step_pending = false;
        }
        let visual = sim.render(self.current)?;
        composite(background, &visual, Vec2::ZERO, blend)
    }

    fn jump(&mut self, frame: FrameIndex) {
        self.current = frame;
        self.step_pending = true;
    }
}

#[cfg(test)]
#[path = "../tests/unit/playback.rs"]
mod tests;
