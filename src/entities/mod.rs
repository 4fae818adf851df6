//! Domain types and the pure matching workflow used by the CLI.

pub mod catalog;
pub mod condition;
pub mod matching;
pub mod selection;
pub mod symptom_index;
