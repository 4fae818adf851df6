//! Internal utility helpers.

pub(crate) mod cache;
