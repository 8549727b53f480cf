use kurbo::{BezPath, Shape as _};

use crate::foundation::core::Point;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::region::stroke::Stroke;

/// Geometric predicate confining where particles may persist.
///
/// Installed wholesale into a simulation and never mutated in place.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ContainmentRegion {
    /// Disc of `radius` around `center`. Boundary points are inside.
    Circle {
        /// Disc center in background pixel space.
        center: Point,
        /// Disc radius in pixels.
        radius: f64,
    },
    /// Closed polygon through `points` (last point joins the first), nonzero winding.
    Polygon {
        /// Polygon vertices in order.
        points: Vec<Point>,
    },
}

impl ContainmentRegion {
    /// Point-in-region test.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Circle { center, radius } => (p - *center).hypot2() <= radius * radius,
            Self::Polygon { points } => polygon_path(points).contains(p),
        }
    }
}

/// Which shape [`derive_with`] should emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Bounding circle of the smoothed stroke.
    #[default]
    Circle,
    /// The smoothed stroke itself, closed.
    Polygon,
}

/// Return `true` iff `region` is `None` or contains `p`.
pub fn contains(region: Option<&ContainmentRegion>, p: Point) -> bool {
    region.is_none_or(|r| r.contains(p))
}

/// Derive a circular containment region from a stroke.
pub fn derive(stroke: &Stroke) -> OverlayResult<ContainmentRegion> {
    derive_with(stroke, RegionKind::Circle)
}

/// Derive a containment region of the requested `kind` from a stroke.
///
/// The stroke is de-jittered with [`smooth`] first. Circles are centered on the centroid of the
/// smoothed polyline with the largest centroid distance as radius.
#[tracing::instrument(skip(stroke), fields(points = stroke.len()))]
pub fn derive_with(stroke: &Stroke, kind: RegionKind) -> OverlayResult<ContainmentRegion> {
    if stroke.len() < 2 {
        return Err(OverlayError::insufficient_points(format!(
            "stroke has {} point(s), need at least 2",
            stroke.len()
        )));
    }

    let smoothed = smooth(stroke.points());
    let region = match kind {
        RegionKind::Circle => {
            let center = centroid(&smoothed);
            let radius = smoothed
                .iter()
                .map(|p| (*p - center).hypot())
                .fold(0.0_f64, f64::max);
            ContainmentRegion::Circle { center, radius }
        }
        RegionKind::Polygon => {
            if smoothed.len() < 3 {
                return Err(OverlayError::insufficient_points(
                    "polygon regions need at least 3 points",
                ));
            }
            ContainmentRegion::Polygon { points: smoothed }
        }
    };

    tracing::debug!(?region, "derived containment region");
    Ok(region)
}

/// Single-pass 3-point moving average. Endpoints are kept as-is.
pub fn smooth(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for w in points.windows(3) {
        out.push(Point::new(
            (w[0].x + w[1].x + w[2].x) / 3.0,
            (w[0].y + w[1].y + w[2].y) / 3.0,
        ));
    }
    out.push(points[points.len() - 1]);
    out
}

fn centroid(points: &[Point]) -> Point {
    let n = points.len().max(1) as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut it = points.iter();
    if let Some(first) = it.next() {
        path.move_to(*first);
        for p in it {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/region/derive.rs"]
mod tests;
