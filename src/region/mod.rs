//! Containment regions derived from freehand strokes.
//!
//! A [`crate::Stroke`] is collected while the pointer is down (see [`crate::StrokeCapture`]), then
//! turned into a [`crate::ContainmentRegion`] by [`crate::derive`]. The simulation only ever asks
//! the region one question: [`crate::contains`].

pub(crate) mod derive;
pub(crate) mod stroke;
