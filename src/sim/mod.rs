//! Fixed-size particle population advanced one tick per rendered frame.

pub(crate) mod particle;
pub(crate) mod settings;
pub(crate) mod simulation;
