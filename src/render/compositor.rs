use crate::foundation::core::{Canvas, FrameRGBA, Vec2, premultiply_rgba8_in_place};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::unit_to_u8;
use crate::render::blend::{BlendMode, BlendSettings};
use crate::sim::particle::{ParticleVisual, VisualState};

/// Produce one finished frame: `background` drawn at `origin`, then every particle as a filled
/// disc at `origin + position`, in population order.
///
/// The output has the background's dimensions; anything drawn outside it is clipped. Per-particle
/// alpha is `opacity * life_fraction`. The background is never modified or retained. The output is
/// always premultiplied; a straight-alpha background is premultiplied on copy.
pub fn composite(
    background: &FrameRGBA,
    visual: &VisualState,
    origin: Vec2,
    blend: &BlendSettings,
) -> OverlayResult<FrameRGBA> {
    let canvas = background.canvas();
    if background.data.len() != canvas.rgba_len() {
        return Err(OverlayError::invalid_configuration(format!(
            "background buffer has {} bytes, expected {} for {}x{}",
            background.data.len(),
            canvas.rgba_len(),
            canvas.width,
            canvas.height
        )));
    }
    blend.validate()?;

    let mut out = FrameRGBA::new_transparent(canvas);
    blit_offset(&mut out.data, &background.data, canvas, origin);
    if !background.premultiplied {
        premultiply_rgba8_in_place(&mut out.data);
    }

    if blend.visible && blend.opacity > 0.0 {
        for p in &visual.particles {
            fill_disc(&mut out.data, canvas, p, origin, blend.opacity, blend.mode);
        }
    }

    Ok(out)
}

fn blit_offset(dst: &mut [u8], src: &[u8], canvas: Canvas, origin: Vec2) {
    let dx = origin.x.round() as i64;
    let dy = origin.y.round() as i64;
    let (w, h) = (i64::from(canvas.width), i64::from(canvas.height));

    if dx == 0 && dy == 0 {
        dst.copy_from_slice(src);
        return;
    }
    // Shifted entirely off the frame.
    if dx.unsigned_abs() >= w as u64 || dy.unsigned_abs() >= h as u64 {
        return;
    }

    let x0 = dx.max(0);
    let x1 = (w + dx).min(w);
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        let d = ((y * w + x0) * 4) as usize;
        let s = ((sy * w + (x0 - dx)) * 4) as usize;
        let n = ((x1 - x0) * 4) as usize;
        dst[d..d + n].copy_from_slice(&src[s..s + n]);
    }
}

/// Anti-aliased filled disc; coverage falls off over one pixel at the rim.
fn fill_disc(
    dst: &mut [u8],
    canvas: Canvas,
    p: &ParticleVisual,
    origin: Vec2,
    opacity: f64,
    mode: BlendMode,
) {
    let alpha = opacity * p.life_fraction.clamp(0.0, 1.0);
    if alpha <= 0.0 || p.radius <= 0.0 {
        return;
    }

    let center = p.position + origin;
    let reach = p.radius + 0.5;
    let (w, h) = (i64::from(canvas.width), i64::from(canvas.height));
    let x0 = ((center.x - reach).floor() as i64).max(0);
    let x1 = ((center.x + reach).ceil() as i64).min(w);
    let y0 = ((center.y - reach).floor() as i64).max(0);
    let y1 = ((center.y + reach).ceil() as i64).min(h);

    for y in y0..y1 {
        let py = y as f64 + 0.5 - center.y;
        for x in x0..x1 {
            let px = x as f64 + 0.5 - center.x;
            let dist = (px * px + py * py).sqrt();
            let coverage = (p.radius + 0.5 - dist).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }

            let k = unit_to_u8(alpha * coverage);
            if k == 0 {
                continue;
            }
            let src = p.color.scale(k).to_array();
            let idx = ((y * w + x) * 4) as usize;
            let d = [dst[idx], dst[idx + 1], dst[idx + 2], dst[idx + 3]];
            dst[idx..idx + 4].copy_from_slice(&mode.blend(d, src));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
