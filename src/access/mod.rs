//! Runtime entity introspection over the host object model
//!
//! The host's character layout is probed once by name and cached; every
//! capability may independently come up empty, and all later reads branch
//! on the cached bound state instead of re-probing.

mod accessor;
mod shape;

pub use accessor::EntityAccessor;
