//! Report rendering for ratebench results
//!
//! This crate turns the structured views produced by the engine into:
//!
//! - One-line live snapshots
//! - The final text report
//! - A JSON document for machine consumers
//!
//! Result codes are printed through a label function, usually
//! [`Target::code_label`](ratebench_core::Target::code_label).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod json;
mod text;

pub use json::{to_json, JsonReport};
pub use text::{render_overall, render_snapshot, OverallText, SnapshotLine};
