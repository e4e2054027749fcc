//! HUD-visibility policy probe
//!
//! Some hosts carry a HUD-hiding mod whose API this overlay should honor.
//! The API surface is resolved once at startup by name; when it is absent
//! the policy always answers "visible".

use crate::host::{ClassRef, ClassShape, MemberKey, MethodSig, ObjectModel, Value};

/// Class names the HUD-hider mod has shipped under.
const API_CLASS_NAMES: [&str; 2] = ["SelectiveHUDHider.API", "SelectiveHudHider.Api"];
const VISIBILITY_METHOD: &str = "IsHudVisible";
const VISIBILITY_PROPERTY: &str = "HudVisible";
/// Identifier handed to the one-argument query variant.
const OVERLAY_ID: &str = "cairn";

enum Binding {
    Method { class: ClassRef, sig: MethodSig },
    Property { class: ClassRef, key: MemberKey },
}

/// External HUD-visibility policy, resolved once at startup
pub struct HudPolicy {
    binding: Option<Binding>,
}

impl HudPolicy {
    /// Resolve the policy against the attached host.
    pub fn probe(model: &dyn ObjectModel) -> Self {
        let Some(class) = API_CLASS_NAMES.iter().find_map(|&name| model.class(name)) else {
            tracing::debug!("no HUD-hider mod detected");
            return Self::allow_all();
        };

        // The query method takes either no arguments or a caller id.
        if let Some(sig) = class.static_method(VISIBILITY_METHOD).filter(|s| s.arity <= 1) {
            tracing::debug!(arity = sig.arity, "bound HUD visibility method");
            return Self {
                binding: Some(Binding::Method { class, sig }),
            };
        }

        if let Some(key) = class.static_property(VISIBILITY_PROPERTY) {
            tracing::debug!("bound HUD visibility property");
            return Self {
                binding: Some(Binding::Property { class, key }),
            };
        }

        tracing::debug!("HUD-hider API present but exposes no known visibility query");
        Self::allow_all()
    }

    /// Always-allow policy for hosts without the compat layer.
    pub fn allow_all() -> Self {
        Self { binding: None }
    }

    /// Whether the external policy currently allows HUD display.
    ///
    /// A faulting or non-boolean answer counts as visible; a broken
    /// third-party mod must not blank the overlay.
    pub fn should_show_hud(&self) -> bool {
        match &self.binding {
            None => true,
            Some(Binding::Method { class, sig }) => {
                let id_arg;
                let args: &[Value] = if sig.arity == 1 {
                    id_arg = [Value::Str(OVERLAY_ID.to_string())];
                    &id_arg
                } else {
                    &[]
                };
                match class.call_static(*sig, args) {
                    Ok(answer) => answer.as_bool().unwrap_or(true),
                    Err(_) => true,
                }
            }
            Some(Binding::Property { class, key }) => match class.read_static(*key) {
                Ok(answer) => answer.as_bool().unwrap_or(true),
                Err(_) => true,
            },
        }
    }
}
