use crate::foundation::color::ColorDef;
use crate::foundation::core::Vec2;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Upper bound on the population size accepted by [`SimulationSettings::validate`].
pub const MAX_PARTICLES: usize = 100_000;

/// Inclusive `[min, max]` disc radius range in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RadiusRange {
    /// Smallest radius.
    pub min: f64,
    /// Largest radius.
    pub max: f64,
}

impl Default for RadiusRange {
    fn default() -> Self {
        Self { min: 2.0, max: 8.0 }
    }
}

/// Particle population parameters.
///
/// Immutable for the lifetime of a population; changing them goes through
/// [`crate::Simulation::reconfigure`], which reseeds every particle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Population size, constant until the next reseed.
    pub particle_count: usize,
    /// Disc radius range.
    pub radius: RadiusRange,
    /// Base speed scalar. Initial velocities are drawn from `[-speed, speed]` per axis.
    pub speed: f64,
    /// Drift direction. Normalized to unit length when the population is seeded.
    pub direction: Vec2,
    /// Spread factor in `[0, 1]`.
    pub spread: f64,
    /// Lifetime in ticks.
    pub lifetime: u32,
    /// Particle fill color.
    pub color: ColorDef,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            particle_count: 200,
            radius: RadiusRange::default(),
            speed: 1.0,
            direction: Vec2::new(1.0, 0.0),
            spread: 0.5,
            lifetime: 100,
            color: ColorDef::default(),
        }
    }
}

impl SimulationSettings {
    /// Set the drift direction from an angle in degrees (0 = +x, 90 = +y).
    pub fn with_direction_degrees(mut self, degrees: f64) -> Self {
        let rad = degrees.to_radians();
        self.direction = Vec2::new(rad.cos(), rad.sin());
        self
    }

    /// Reject settings that cannot seed a population.
    pub fn validate(&self) -> OverlayResult<()> {
        if self.particle_count > MAX_PARTICLES {
            return Err(OverlayError::invalid_configuration(format!(
                "particle_count {} exceeds the maximum of {MAX_PARTICLES}",
                self.particle_count
            )));
        }
        let RadiusRange { min, max } = self.radius;
        if !min.is_finite() || !max.is_finite() || min < 0.0 {
            return Err(OverlayError::invalid_configuration(
                "radius range must be finite and non-negative",
            ));
        }
        if min > max {
            return Err(OverlayError::invalid_configuration(format!(
                "radius range is inverted (min {min} > max {max})"
            )));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(OverlayError::invalid_configuration(
                "speed must be finite and >= 0",
            ));
        }
        if !self.direction.is_finite() || self.direction.hypot2() == 0.0 {
            return Err(OverlayError::invalid_configuration(
                "direction must be a finite non-zero vector",
            ));
        }
        if !(0.0..=1.0).contains(&self.spread) {
            return Err(OverlayError::invalid_configuration(
                "spread must be within [0, 1]",
            ));
        }
        if self.lifetime == 0 {
            return Err(OverlayError::invalid_configuration(
                "lifetime must be at least 1 tick",
            ));
        }
        Ok(())
    }

    pub(crate) fn unit_direction(&self) -> Vec2 {
        self.direction.normalize()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/settings.rs"]
mod tests;
