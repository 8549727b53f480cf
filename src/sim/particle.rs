use rand::Rng;

use crate::foundation::core::{Canvas, FrameIndex, Point, Rgba8Premul, Vec2};

/// One simulated point-mass, drawn as a disc.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Position in background pixel space.
    pub position: Point,
    /// Per-tick velocity.
    pub velocity: Vec2,
    /// Disc radius in pixels.
    pub radius: f64,
    /// Fill color.
    pub color: Rgba8Premul,
    /// Remaining ticks before respawn.
    pub life: u32,
    /// Lifetime a respawn resets to.
    pub max_life: u32,
}

impl Particle {
    /// Remaining lifetime as a fraction of `max_life`.
    pub fn life_fraction(&self) -> f64 {
        if self.max_life == 0 {
            return 0.0;
        }
        f64::from(self.life) / f64::from(self.max_life)
    }

    /// Move to a uniformly random position in `canvas` and refill lifetime.
    ///
    /// Velocity and radius carry over. The new position is not checked against any region.
    pub(crate) fn respawn(&mut self, canvas: Canvas, rng: &mut impl Rng) {
        self.position = random_position(canvas, rng);
        self.life = self.max_life;
    }

    pub(crate) fn visual(&self) -> ParticleVisual {
        ParticleVisual {
            position: self.position,
            radius: self.radius,
            color: self.color,
            life_fraction: self.life_fraction(),
        }
    }
}

pub(crate) fn random_position(canvas: Canvas, rng: &mut impl Rng) -> Point {
    Point::new(
        rng.r#gen::<f64>() * f64::from(canvas.width),
        rng.r#gen::<f64>() * f64::from(canvas.height),
    )
}

/// What the compositor needs to draw one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleVisual {
    /// Disc center in background pixel space.
    pub position: Point,
    /// Disc radius in pixels.
    pub radius: f64,
    /// Fill color.
    pub color: Rgba8Premul,
    /// Remaining lifetime over maximum lifetime, in `[0, 1]`.
    pub life_fraction: f64,
}

/// Snapshot of a population for one frame, in population order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualState {
    /// Frame this state was rendered for.
    pub frame: FrameIndex,
    /// Number of steps the simulation had taken.
    pub tick: u64,
    /// One entry per particle.
    pub particles: Vec<ParticleVisual>,
}
