//! regctl-lib: Core types and logic for regctl
//!
//! regctl keeps generated catalog resources (lint reports, scores, summaries)
//! up to date with the resources they are computed from:
//! - `Manifest`: rules naming a generated resource pattern, its dependencies,
//!   and the command that regenerates it
//! - `Resource`: a named catalog resource with an update timestamp
//! - `Lister`: the catalog listing contract, with `MemoryCatalog` as a
//!   snapshot-backed implementation
//! - `controller`: joins targets against dependency groups and produces the
//!   commands for stale or missing targets

pub mod catalog;
pub mod consts;
pub mod controller;
pub mod manifest;
pub mod pattern;
pub mod placeholder;
pub mod platform;
pub mod resource;
