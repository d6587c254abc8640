//! Tetraversus (workspace facade crate).
//!
//! Re-exports the member crates as `tetraversus::{types, core, adapter}`; the
//! implementation lives in dedicated crates under `crates/`.

pub use tetraversus_adapter as adapter;
pub use tetraversus_core as core;
pub use tetraversus_types as types;
