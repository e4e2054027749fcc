//! Cairn - floating player nameplates for a plugin-hosted game overlay
//!
//! The core pipeline: a timer tick locates the local and nearby character
//! entities through a probed reflection cache, converts each raw handle
//! into an immutable snapshot, and reconciles the visible set against
//! reusable per-entity label views. Rendering, input decoding, and process
//! attachment live in the plugin shell behind the `host` boundary traits.

pub mod access;
pub mod compat;
pub mod core;
pub mod host;
pub mod overlay;
pub mod snapshot;
