//! Frame-by-frame export: step, render, composite, encode, repeat.

pub(crate) mod pipeline;
pub(crate) mod progress;
pub(crate) mod scheduler;
