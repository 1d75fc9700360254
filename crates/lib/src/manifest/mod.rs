//! Controller manifest types.
//!
//! A manifest declares which resources are generated from which sources and
//! the command that regenerates them. Manifests are parsed once and never
//! mutated.

mod types;
mod validate;

pub use types::*;
pub use validate::*;
