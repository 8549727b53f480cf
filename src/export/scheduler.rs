use std::ops::ControlFlow;

/// Host hook the export loop cedes control to between frames.
///
/// Called every `yield_every` frames, never mid-frame. Returning `Break` abandons the export
/// before the next frame's simulation step.
pub trait HostScheduler {
    /// Let other pending host work run. `frames_done` of `total` are already encoded.
    fn cede(&mut self, frames_done: u64, total: u64) -> ControlFlow<()>;
}

impl<F> HostScheduler for F
where
    F: FnMut(u64, u64) -> ControlFlow<()>,
{
    fn cede(&mut self, frames_done: u64, total: u64) -> ControlFlow<()> {
        self(frames_done, total)
    }
}

/// Yields the OS thread to the scheduler.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadYield;

impl HostScheduler for ThreadYield {
    fn cede(&mut self, _frames_done: u64, _total: u64) -> ControlFlow<()> {
        std::thread::yield_now();
        ControlFlow::Continue(())
    }
}

/// Never cedes; runs the export in one burst.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoYield;

impl HostScheduler for NoYield {
    fn cede(&mut self, _frames_done: u64, _total: u64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
