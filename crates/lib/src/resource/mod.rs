//! Catalog resource types.
//!
//! Resources are the records returned by a catalog listing: apis, versions,
//! specs and artifacts, each identified by a fully-qualified hierarchical name.

mod types;

pub use types::*;
