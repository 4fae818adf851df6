//! Output renderers for Markdown and JSON modes.

pub mod json;
pub mod markdown;
