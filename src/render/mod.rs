//! Frame compositing: background copy plus particle discs.

pub(crate) mod blend;
pub(crate) mod compositor;
