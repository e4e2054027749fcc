//! Overlay configuration with documented defaults
//!
//! All tunables are collected here with explanations of their purpose.
//! The plugin shell binds them from its own config surface; `from_toml_str`
//! covers hosts that hand the overlay a raw TOML fragment.

use crate::core::error::{OverlayError, Result};
use crate::core::types::KeyCode;
use serde::{Deserialize, Serialize};

/// Configuration for the nameplate overlay
///
/// Defaults are tuned for a small co-op session; raising `max_distance`
/// mostly adds labels that are too far away to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Maximum distance at which nameplates are shown (world units)
    ///
    /// The filter is inclusive: an entity at exactly this distance is shown.
    pub max_distance: f32,

    /// Seconds between full data refreshes
    ///
    /// Label anchors keep tracking every tick regardless; this only gates
    /// how often entity stats are re-queried from the host.
    pub refresh_interval: f32,

    /// Key that toggles the overlay on and off
    pub toggle_key: KeyCode,

    /// Keep nameplates visible while a HUD-hiding mod suppresses the HUD
    pub show_when_hud_hidden: bool,

    /// Refresh cycles an entity may go unseen before its presentation
    /// state is dropped
    ///
    /// 0 keeps state for the whole session, matching label-object reuse
    /// by id. A small value (2-4) bounds memory on servers with player
    /// churn.
    pub evict_after_cycles: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_distance: 40.0,
            refresh_interval: 0.2,
            toggle_key: KeyCode::F9,
            show_when_hud_hidden: false,
            evict_after_cycles: 0,
        }
    }
}

impl OverlayConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        // The `!(x > 0.0)` form also rejects NaN.
        if !(self.max_distance > 0.0) {
            return Err(format!(
                "max_distance ({}) must be positive",
                self.max_distance
            ));
        }

        if !(self.refresh_interval > 0.0) {
            return Err(format!(
                "refresh_interval ({}) must be positive",
                self.refresh_interval
            ));
        }

        Ok(())
    }

    /// Parse and validate a config from a TOML string
    ///
    /// Missing fields take their defaults, so a partial fragment like
    /// `max_distance = 25.0` is accepted.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate().map_err(OverlayError::InvalidConfig)?;
        Ok(config)
    }
}
