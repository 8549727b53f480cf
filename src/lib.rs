//! Motion overlay renders a particle system on top of a looping background animation.
//!
//! The pieces fit together as follows:
//!
//! - Load the background into a [`FrameStore`] (see [`decode_background`])
//! - Optionally draw a [`Stroke`] and [`derive`] a [`ContainmentRegion`] from it
//! - Seed a [`Simulation`] against the background dimensions
//! - Play it back with a [`Player`], or stream every frame into an [`EncodeSink`] through an
//!   [`ExportPipeline`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod background;
pub(crate) mod config;
/// Encoding sinks.
pub mod encode;
pub(crate) mod export;
pub(crate) mod playback;
pub(crate) mod region;
pub(crate) mod render;
pub(crate) mod sim;

pub use crate::foundation::color::ColorDef;
pub use crate::foundation::core::{Canvas, FrameIndex, FrameRGBA, Point, Rgba8Premul, Vec2};
pub use crate::foundation::error::{OverlayError, OverlayResult};

pub use crate::background::decode::{decode_background, load_background};
pub use crate::background::store::{DEFAULT_FRAME_DURATION_MS, FrameStore, InMemoryFrameStore};
pub use crate::config::{ExportSection, OverlayConfig, SimulationSection};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::png_seq::{PngFrame, PngSequenceSink, frame_file_name};
pub use crate::encode::sink::{EncodeSink, InMemorySink};
pub use crate::export::pipeline::{ExportOpts, ExportPipeline, ExportState};
pub use crate::export::progress::{LogProgress, NoProgress, ProgressSink};
pub use crate::export::scheduler::{HostScheduler, NoYield, ThreadYield};
pub use crate::playback::Player;
pub use crate::region::derive::{
    ContainmentRegion, RegionKind, contains, derive, derive_with, smooth,
};
pub use crate::region::stroke::{Stroke, StrokeCapture};
pub use crate::render::blend::{BlendMode, BlendSettings};
pub use crate::render::compositor::composite;
pub use crate::sim::particle::{Particle, ParticleVisual, VisualState};
pub use crate::sim::settings::{MAX_PARTICLES, RadiusRange, SimulationSettings};
pub use crate::sim::simulation::{BOUNCE_DAMPING, Simulation};
