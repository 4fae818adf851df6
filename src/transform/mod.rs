//! Adapters from upstream JSON shapes into catalog records and predictions.

pub(crate) mod condition;
pub(crate) mod prediction;
