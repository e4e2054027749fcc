//! Compatibility probes for third-party mods sharing the host

mod hud_hider;

pub use hud_hider::HudPolicy;
