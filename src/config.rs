use crate::encode::gif::GifSinkOpts;
use crate::export::pipeline::ExportOpts;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::region::derive::RegionKind;
use crate::render::blend::BlendSettings;
use crate::sim::settings::SimulationSettings;
use crate::sim::simulation::Simulation;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON-facing overlay document.
///
/// Every field is optional and falls back to the stock overlay (200 indigo particles drifting to
/// the right, normal blending, yielding every 5 frames during export).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Particle population.
    pub simulation: SimulationSection,
    /// Blend mode, opacity and visibility of the overlay.
    pub blend: BlendSettings,
    /// Export cadence and GIF quality.
    pub export: ExportSection,
    /// Shape derived from a stroke.
    pub region: RegionKind,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

/// `"simulation"` section: [`SimulationSettings`] plus an optional angle overriding `direction`.
///
/// Keys that belong to neither are kept aside and rejected by [`OverlayConfig::validate`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulationSection {
    /// Population settings, inlined into the section.
    #[serde(flatten)]
    pub settings: SimulationSettings,
    /// Drift angle in degrees (0 = +x, 90 = +y); wins over `direction` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction_degrees: Option<f64>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

/// `"export"` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    /// Frames rendered between host yields.
    pub yield_every: u64,
    /// GIF quantizer speed, `1..=30`.
    pub gif_speed: i32,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            yield_every: ExportOpts::default().yield_every,
            gif_speed: GifSinkOpts::default().speed,
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> OverlayResult<Self> {
        let cfg: Self = serde_json::from_reader(r).map_err(|e| {
            OverlayError::invalid_configuration(format!("parse overlay config JSON: {e}"))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(s: &str) -> OverlayResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a config file on disk.
    pub fn from_json_path(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            OverlayError::invalid_configuration(format!(
                "open overlay config '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject unknown simulation keys and out-of-range values.
    pub fn validate(&self) -> OverlayResult<()> {
        if !self.simulation.unknown.is_empty() {
            let keys = self
                .simulation
                .unknown
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(OverlayError::invalid_configuration(format!(
                "unknown simulation field(s): {keys}"
            )));
        }
        if let Some(deg) = self.simulation.direction_degrees
            && !deg.is_finite()
        {
            return Err(OverlayError::invalid_configuration(
                "direction_degrees must be finite",
            ));
        }
        self.simulation_settings().validate()?;
        self.blend.validate()?;
        self.export_opts().validate()?;
        self.gif_opts().validate()
    }

    /// Effective simulation settings, with `direction_degrees` applied.
    pub fn simulation_settings(&self) -> SimulationSettings {
        let settings = self.simulation.settings.clone();
        match self.simulation.direction_degrees {
            Some(deg) => settings.with_direction_degrees(deg),
            None => settings,
        }
    }

    /// Export loop options.
    pub fn export_opts(&self) -> ExportOpts {
        ExportOpts {
            yield_every: self.export.yield_every,
        }
    }

    /// GIF sink options.
    pub fn gif_opts(&self) -> GifSinkOpts {
        GifSinkOpts {
            speed: self.export.gif_speed,
        }
    }

    /// Fresh, uninitialized simulation honoring `seed`.
    pub fn new_simulation(&self) -> Simulation {
        match self.seed {
            Some(seed) => Simulation::with_seed(seed),
            None => Simulation::new(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
