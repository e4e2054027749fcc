//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for a tracked entity
///
/// Wraps the host's stable object identity, so the same character maps to
/// the same id across refresh cycles and the id can be used as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Keys a config file may bind the overlay toggle to
///
/// The plugin shell owns raw key decoding and delivers a plain
/// "toggle pressed this tick" signal; this enum only names the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl Default for KeyCode {
    fn default() -> Self {
        KeyCode::F9
    }
}
