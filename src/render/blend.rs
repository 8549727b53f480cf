use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::mul_div255_u16;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Closed set of overlay blend modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Channel-wise saturating sum ("lighter").
    #[serde(alias = "add")]
    Additive,
    /// Product of source and destination.
    Multiply,
    /// Inverse product of inverses.
    Screen,
}

/// How particles are laid over the background.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlendSettings {
    /// Blend mode used for every particle.
    pub mode: BlendMode,
    /// Overlay opacity in `[0, 1]`, multiplied with each particle's life fraction.
    pub opacity: f64,
    /// When `false`, frames are pure background copies.
    pub visible: bool,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            mode: BlendMode::Normal,
            opacity: 1.0,
            visible: true,
        }
    }
}

impl BlendSettings {
    /// Reject out-of-range opacity.
    pub fn validate(&self) -> OverlayResult<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(OverlayError::invalid_configuration(format!(
                "overlay opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

impl BlendMode {
    /// Blend premultiplied `src` onto premultiplied `dst`.
    ///
    /// `src` must already carry its coverage and opacity.
    pub fn blend(self, dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
        if src[3] == 0 {
            return dst;
        }

        let sa = u16::from(src[3]);
        let da = u16::from(dst[3]);
        let inv_sa = 255 - sa;
        let inv_da = 255 - da;

        let mut out = [0u8; 4];
        out[3] = match self {
            BlendMode::Additive => sat(sa + da),
            _ => sat(sa + mul_div255_u16(da, inv_sa)),
        };

        for i in 0..3 {
            let s = u16::from(src[i]);
            let d = u16::from(dst[i]);
            let c = match self {
                BlendMode::Normal => s + mul_div255_u16(d, inv_sa),
                BlendMode::Additive => s + d,
                BlendMode::Multiply => {
                    mul_div255_u16(s, d) + mul_div255_u16(s, inv_da) + mul_div255_u16(d, inv_sa)
                }
                BlendMode::Screen => (s + d).saturating_sub(mul_div255_u16(s, d)),
            };
            out[i] = sat(c).min(out[3]);
        }
        out
    }
}

fn sat(v: u16) -> u8 {
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
