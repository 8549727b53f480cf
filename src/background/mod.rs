//! Read-only random-access frame stores for the background animation.

pub(crate) mod decode;
pub(crate) mod store;
