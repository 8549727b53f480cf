use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::core::{Canvas, FrameIndex, Vec2};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::region::derive::{ContainmentRegion, contains};
use crate::sim::particle::{Particle, VisualState, random_position};
use crate::sim::settings::SimulationSettings;

/// Velocity factor applied to an axis when a particle hits the matching boundary.
pub const BOUNCE_DAMPING: f64 = 0.8;

/// Particle population stepped once per displayed frame.
///
/// Ordering contract: call [`Simulation::step`] exactly once per distinct frame index, in
/// increasing order, before [`Simulation::render`] for that index. `render` never advances time.
#[derive(Debug)]
pub struct Simulation {
    rng: StdRng,
    state: Option<SimState>,
    region: Option<ContainmentRegion>,
}

#[derive(Debug)]
struct SimState {
    canvas: Canvas,
    settings: SimulationSettings,
    particles: Vec<Particle>,
    tick: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Uninitialized simulation with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Uninitialized simulation with a reproducible RNG.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            state: None,
            region: None,
        }
    }

    /// Seed a fresh population over `canvas`.
    ///
    /// Settings are validated before anything changes, so a rejected call leaves the previous
    /// population in place.
    #[tracing::instrument(skip(self, settings), fields(particles = settings.particle_count))]
    pub fn initialize(&mut self, canvas: Canvas, settings: SimulationSettings) -> OverlayResult<()> {
        settings.validate()?;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(OverlayError::invalid_configuration(format!(
                "background dimensions must be non-zero, got {}x{}",
                canvas.width, canvas.height
            )));
        }

        let particles = seed_particles(canvas, &settings, &mut self.rng);
        self.state = Some(SimState {
            canvas,
            settings,
            particles,
            tick: 0,
        });
        Ok(())
    }

    /// Replace the settings and reseed every particle.
    pub fn reconfigure(&mut self, settings: SimulationSettings) -> OverlayResult<()> {
        settings.validate()?;
        let canvas = self.state()?.canvas;
        self.initialize(canvas, settings)
    }

    /// Swap the containment region. Takes effect on the next [`Simulation::step`].
    pub fn install_region(&mut self, region: Option<ContainmentRegion>) {
        tracing::debug!(installed = region.is_some(), "containment region swapped");
        self.region = region;
    }

    /// Currently installed containment region.
    pub fn region(&self) -> Option<&ContainmentRegion> {
        self.region.as_ref()
    }

    /// Return `true` once [`Simulation::initialize`] succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Background dimensions the population lives in.
    pub fn canvas(&self) -> OverlayResult<Canvas> {
        Ok(self.state()?.canvas)
    }

    /// Active settings.
    pub fn settings(&self) -> OverlayResult<&SimulationSettings> {
        Ok(&self.state()?.settings)
    }

    /// Borrow the population in order.
    pub fn particles(&self) -> OverlayResult<&[Particle]> {
        Ok(&self.state()?.particles)
    }

    /// Number of steps taken since the last seed.
    pub fn tick(&self) -> OverlayResult<u64> {
        Ok(self.state()?.tick)
    }

    /// Advance every particle by one tick.
    pub fn step(&mut self) -> OverlayResult<()> {
        let Self { rng, state, region } = self;
        let state = state
            .as_mut()
            .ok_or_else(|| OverlayError::not_initialized("step called before initialize"))?;

        let canvas = state.canvas;
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let drift: Vec2 = state.settings.unit_direction() * state.settings.speed;

        for p in &mut state.particles {
            p.position += p.velocity + drift;

            if p.position.x < 0.0 || p.position.x > w {
                p.velocity.x *= -BOUNCE_DAMPING;
                p.position.x = p.position.x.clamp(0.0, w);
            }
            if p.position.y < 0.0 || p.position.y > h {
                p.velocity.y *= -BOUNCE_DAMPING;
                p.position.y = p.position.y.clamp(0.0, h);
            }

            if !contains(region.as_ref(), p.position) {
                p.respawn(canvas, rng);
            }

            p.life = p.life.saturating_sub(1);
            if p.life == 0 {
                p.respawn(canvas, rng);
            }
        }

        state.tick += 1;
        Ok(())
    }

    /// Visual state of the current population, tagged with `frame`.
    pub fn render(&self, frame: FrameIndex) -> OverlayResult<VisualState> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| OverlayError::not_initialized("render called before initialize"))?;
        Ok(VisualState {
            frame,
            tick: state.tick,
            particles: state.particles.iter().map(Particle::visual).collect(),
        })
    }

    fn state(&self) -> OverlayResult<&SimState> {
        self.state
            .as_ref()
            .ok_or_else(|| OverlayError::not_initialized("simulation has not been initialized"))
    }
}

fn seed_particles(
    canvas: Canvas,
    settings: &SimulationSettings,
    rng: &mut impl Rng,
) -> Vec<Particle> {
    let color = settings.color.to_rgba8_premul();
    let speed = settings.speed;
    let (rmin, rmax) = (settings.radius.min, settings.radius.max);

    (0..settings.particle_count)
        .map(|_| Particle {
            position: random_position(canvas, rng),
            velocity: Vec2::new(
                (rng.r#gen::<f64>() - 0.5) * speed * 2.0,
                (rng.r#gen::<f64>() - 0.5) * speed * 2.0,
            ),
            radius: rmin + rng.r#gen::<f64>() * (rmax - rmin),
            color,
            life: settings.lifetime,
            max_life: settings.lifetime,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/sim/simulation.rs"]
mod tests;
