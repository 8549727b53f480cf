/// Observer for export progress. Purely informational, no backpressure.
pub trait ProgressSink {
    /// `percent` is in `0..=100`.
    fn report(&mut self, percent: u8, message: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(u8, &str),
{
    fn report(&mut self, percent: u8, message: &str) {
        self(percent, message)
    }
}

/// Discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8, _message: &str) {}
}

/// Forwards updates to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, percent: u8, message: &str) {
        tracing::info!(percent, "{message}");
    }
}
