use crate::foundation::core::Point;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Ordered freehand input points in background pixel space.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Create an empty stroke.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one point.
    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    /// Borrow the points in input order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return `true` when no point was recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for Stroke {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// One pointer-down..pointer-up capture session.
///
/// The host forwards pointer coordinates already mapped to background pixel space.
#[derive(Debug, Default)]
pub struct StrokeCapture {
    current: Option<Stroke>,
}

impl StrokeCapture {
    /// Create an idle capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `true` while a session is open.
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Start a new session at `p`, dropping any unfinished one.
    pub fn begin(&mut self, p: Point) {
        let mut stroke = Stroke::new();
        stroke.push(p);
        self.current = Some(stroke);
    }

    /// Record a move. Ignored when no session is open.
    pub fn add_point(&mut self, p: Point) {
        if let Some(stroke) = self.current.as_mut() {
            stroke.push(p);
        }
    }

    /// Borrow the in-progress stroke, e.g. for a preview overlay.
    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    /// Close the session and hand the stroke over.
    ///
    /// A stroke with fewer than 2 points is discarded and reported as
    /// [`OverlayError::InsufficientPoints`].
    pub fn end(&mut self) -> OverlayResult<Stroke> {
        let stroke = self
            .current
            .take()
            .ok_or_else(|| OverlayError::insufficient_points("no stroke in progress"))?;
        if stroke.len() < 2 {
            return Err(OverlayError::insufficient_points(format!(
                "stroke has {} point(s), need at least 2",
                stroke.len()
            )));
        }
        Ok(stroke)
    }

    /// Abandon the session.
    pub fn cancel(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/stroke.rs"]
mod tests;
