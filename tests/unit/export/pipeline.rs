use super::*;
use crate::background::store::InMemoryFrameStore;
use crate::encode::sink::InMemorySink;
use crate::export::progress::NoProgress;
use crate::export::scheduler::NoYield;
use crate::foundation::core::{Canvas, FrameRGBA, Rgba8Premul};
use crate::sim::settings::SimulationSettings;
use std::ops::ControlFlow;

fn store(frames: usize, durations: Vec<u32>) -> InMemoryFrameStore {
    let canvas = Canvas::new(8, 6);
    let frames = (0..frames)
        .map(|i| FrameRGBA::solid(canvas, Rgba8Premul::from_straight_rgba((i * 20) as u8, 0, 0, 255)))
        .collect();
    InMemoryFrameStore::new(canvas, frames, durations).unwrap()
}

fn sim(particles: usize) -> Simulation {
    let mut sim = Simulation::with_seed(11);
    sim.initialize(
        Canvas::new(8, 6),
        SimulationSettings {
            particle_count: particles,
            ..SimulationSettings::default()
        },
    )
    .unwrap();
    sim
}

/// Accepts frames until `fail_at`, then rejects.
struct FailingSink {
    accepted: usize,
    fail_at: usize,
    finalized: bool,
}

impl EncodeSink for FailingSink {
    fn add_frame(&mut self, _frame: FrameRGBA, _duration_ms: u32) -> OverlayResult<()> {
        if self.accepted == self.fail_at {
            return Err(OverlayError::encoding_failure("disk full"));
        }
        self.accepted += 1;
        Ok(())
    }

    fn finalize(&mut self) -> OverlayResult<Vec<u8>> {
        self.finalized = true;
        Ok(vec![1, 2, 3])
    }
}

#[test]
fn empty_overlay_export_is_background_copies_with_durations() {
    let store = store(3, vec![100, 100, 100]);
    let mut sim = sim(0);
    let mut sink = InMemorySink::new();
    let mut pipeline = ExportPipeline::default();

    pipeline
        .export(
            &store,
            &mut sim,
            &BlendSettings::default(),
            &mut sink,
            &mut NoProgress,
            &mut NoYield,
        )
        .unwrap();

    assert_eq!(pipeline.state(), ExportState::Done);
    assert!(sink.is_finalized());
    assert_eq!(sink.frames().len(), 3);
    for (i, (frame, ms)) in sink.frames().iter().enumerate() {
        assert_eq!(*ms, 100);
        assert_eq!(frame, store.frame(FrameIndex(i as u64)).unwrap());
    }
}

#[test]
fn steps_simulation_once_per_frame() {
    let store = store(7, vec![50; 7]);
    let mut sim = sim(10);
    let mut sink = InMemorySink::new();
    ExportPipeline::default()
        .export(
            &store,
            &mut sim,
            &BlendSettings::default(),
            &mut sink,
            &mut NoProgress,
            &mut NoYield,
        )
        .unwrap();
    assert_eq!(sim.tick().unwrap(), 7);
}

#[test]
fn encoding_failure_aborts_and_pipeline_can_retry() {
    let store = store(5, vec![100; 5]);
    let mut sim = sim(4);
    let mut pipeline = ExportPipeline::default();
    let mut failing = FailingSink {
        accepted: 0,
        fail_at: 2,
        finalized: false,
    };

    let err = pipeline
        .export(
            &store,
            &mut sim,
            &BlendSettings::default(),
            &mut failing,
            &mut NoProgress,
            &mut NoYield,
        )
        .unwrap_err();
    assert!(matches!(err, OverlayError::EncodingFailure(_)));
    assert!(!failing.finalized);
    assert_eq!(failing.accepted, 2);
    assert_eq!(pipeline.state(), ExportState::Failed);
    assert!(pipeline.last_error().unwrap().contains("disk full"));

    pipeline.reset();
    assert_eq!(pipeline.state(), ExportState::Idle);
    assert!(pipeline.last_error().is_none());

    let mut sink = InMemorySink::new();
    pipeline
        .export(
            &store,
            &mut sim,
            &BlendSettings::default(),
            &mut sink,
            &mut NoProgress,
            &mut NoYield,
        )
        .unwrap();
    assert_eq!(pipeline.state(), ExportState::Done);
    assert_eq!(sink.frames().len(), 5);
}

#[test]
fn cedes_every_fifth_frame_and_can_be_cancelled() {
    let store = store(12, vec![100; 12]);
    let mut sim = sim(3);
    let mut sink = InMemorySink::new();
    let mut cedes = Vec::new();
    let mut scheduler = |done: u64, total: u64| {
        cedes.push((done, total));
        ControlFlow::Continue(())
    };
    ExportPipeline::default()
        .export(
            &store,
            &mut sim,
            &BlendSettings::default(),
            &mut sink,
            &mut NoProgress,
            &mut scheduler,
        )
        .unwrap();
    assert_eq!(cedes, vec![(5, 12), (10, 12)]);

    let mut sim = self::sim(3);
    let mut sink = InMemorySink::new();
    let mut pipeline = ExportPipeline::new(ExportOpts { yield_every: 2 });
    let mut cancel = |_done: u64, _total: u64| ControlFlow::Break(());
    let err = pipeline
        .export(
            &store,
            &mut sim,
            &BlendSettings::default(),
            &mut sink,
            &mut NoProgress,
            &mut cancel,
        )
        .unwrap_err();
    assert!(matches!(err, OverlayError::Cancelled(_)));
    assert_eq!(sink.frames().len(), 2);
    assert!(!sink.is_finalized());
    assert_eq!(sim.tick().unwrap(), 2);
    assert_eq!(pipeline.state(), ExportState::Failed);
}

#[test]
fn progress_is_monotonic_and_ends_at_100() {
    let store = store(4, vec![100; 4]);
    let mut sim = sim(2);
    let mut sink = InMemorySink::new();
    let mut updates: Vec<(u8, String)> = Vec::new();
    let mut progress = |pct: u8, msg: &str| updates.push((pct, msg.to_owned()));

    ExportPipeline::default()
        .export(
            &store,
            &mut sim,
            &BlendSettings::default(),
            &mut sink,
            &mut progress,
            &mut NoYield,
        )
        .unwrap();

    assert!(updates.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(updates.last().map(|u| u.0), Some(100));
    assert!(updates.iter().any(|(_, m)| m == "Rendering frame 4/4"));
}

#[test]
fn rejects_bad_inputs_before_rendering() {
    let mut pipeline = ExportPipeline::default();
    let mut sink = InMemorySink::new();

    let empty = InMemoryFrameStore::new(Canvas::new(8, 6), vec![], vec![]).unwrap();
    let err = pipeline
        .export(
            &empty,
            &mut sim(1),
            &BlendSettings::default(),
            &mut sink,
            &mut NoProgress,
            &mut NoYield,
        )
        .unwrap_err();
    assert!(matches!(err, OverlayError::InvalidConfiguration(_)));

    let err = pipeline
        .export(
            &store(2, vec![100; 2]),
            &mut Simulation::with_seed(0),
            &BlendSettings::default(),
            &mut sink,
            &mut NoProgress,
            &mut NoYield,
        )
        .unwrap_err();
    assert!(matches!(err, OverlayError::NotInitialized(_)));

    let mut other = Simulation::with_seed(0);
    other
        .initialize(Canvas::new(4, 4), SimulationSettings::default())
        .unwrap();
    let err = pipeline
        .export(
            &store(2, vec![100; 2]),
            &mut other,
            &BlendSettings::default(),
            &mut sink,
            &mut NoProgress,
            &mut NoYield,
        )
        .unwrap_err();
    assert!(matches!(err, OverlayError::InvalidConfiguration(_)));
    assert!(sink.frames().is_empty());
    assert_eq!(pipeline.state(), ExportState::Failed);
}

#[test]
fn zero_yield_interval_is_invalid() {
    assert!(ExportOpts { yield_every: 0 }.validate().is_err());
}

#[derive(Clone, Default)]
struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn export_with_log(level: tracing::Level) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut sink = InMemorySink::new();
        ExportPipeline::default()
            .export(
                &store(2, vec![100; 2]),
                &mut sim(1),
                &BlendSettings::default(),
                &mut sink,
                &mut crate::export::progress::LogProgress,
                &mut NoYield,
            )
            .unwrap();
    });
    log.text()
}

#[test]
fn state_transitions_are_logged_at_debug() {
    let debug = export_with_log(tracing::Level::DEBUG);
    assert!(debug.contains("export state"), "{debug}");
    assert!(debug.contains("to=Encoding"), "{debug}");
    assert!(debug.contains("to=Done"), "{debug}");

    let info = export_with_log(tracing::Level::INFO);
    assert!(!info.contains("export state"), "{info}");
}

#[test]
fn log_progress_reports_through_tracing() {
    let info = export_with_log(tracing::Level::INFO);
    assert!(info.contains("Rendering frame 2/2"), "{info}");
    assert!(info.contains("Export complete"), "{info}");
}
