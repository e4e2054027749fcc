//! Capability probe over the host's character layout
//!
//! Names here target one versioned build of the host. A member the build
//! does not declare is recorded as unbound and stays unbound for the life
//! of the process; partial knowledge of the layout must never take the
//! overlay down.

use crate::host::{ClassRef, ClassShape, MemberKey, MethodSig, ObjectModel, Value};

pub(crate) const CHARACTER_CLASS: &str = "Character";
const DATA_CLASS: &str = "CharacterData";
const REFS_CLASS: &str = "CharacterRefs";
const AFFLICTIONS_CLASS: &str = "CharacterAfflictions";

/// Accessor chain for the stamina value nested under the character's
/// data object
#[derive(Debug, Clone, Copy)]
pub(crate) struct StaminaChain {
    pub data: MemberKey,
    pub current: MemberKey,
}

/// Accessor chain for the normalized injury status, reached through the
/// refs object and queried with the host's own Injury tag
#[derive(Debug, Clone)]
pub(crate) struct InjuryChain {
    pub refs: MemberKey,
    pub afflictions: MemberKey,
    pub status_of: MethodSig,
    pub injury_tag: Value,
}

/// Probed shape of the host character type
///
/// Built once per accessor and immutable afterwards. When the class itself
/// cannot be resolved, every capability is unbound and the queries built on
/// top degrade to empty results.
pub(crate) struct CharacterShape {
    pub class: Option<ClassRef>,
    pub local_character: Option<MemberKey>,
    pub all_characters: Option<MemberKey>,
    pub center: Option<MemberKey>,
    pub display_name: Option<MemberKey>,
    pub is_local: Option<MemberKey>,
    pub latency: Option<MemberKey>,
    pub stamina: Option<StaminaChain>,
    pub injury: Option<InjuryChain>,
}

impl CharacterShape {
    fn degraded() -> Self {
        Self {
            class: None,
            local_character: None,
            all_characters: None,
            center: None,
            display_name: None,
            is_local: None,
            latency: None,
            stamina: None,
            injury: None,
        }
    }

    /// Resolve the character layout against the attached host.
    pub fn probe(model: &dyn ObjectModel) -> Self {
        let Some(class) = model.class(CHARACTER_CLASS) else {
            tracing::warn!(
                class = CHARACTER_CLASS,
                "character type not found; nameplates will stay empty"
            );
            return Self::degraded();
        };

        let local_character = bind(class.static_property("localCharacter"), "localCharacter");
        let all_characters = bind(class.static_property("AllCharacters"), "AllCharacters");
        // The specialized center is preferred; older builds only expose the
        // transform position.
        let center = bind(
            class.property("Center").or_else(|| class.property("position")),
            "Center/position",
        );
        let display_name = bind(
            class
                .property("characterName")
                .or_else(|| class.property("name")),
            "characterName/name",
        );
        let is_local = bind(class.property("IsLocal"), "IsLocal");
        let latency = bind(class.property("Latency"), "Latency");
        let stamina = bind(Self::probe_stamina(model, &class), "stamina chain");
        let injury = bind(Self::probe_injury(model, &class), "injury chain");

        Self {
            class: Some(class),
            local_character,
            all_characters,
            center,
            display_name,
            is_local,
            latency,
            stamina,
            injury,
        }
    }

    fn probe_stamina(model: &dyn ObjectModel, class: &ClassRef) -> Option<StaminaChain> {
        let data = class.property("data")?;
        let data_class = model.class(DATA_CLASS)?;
        let current = data_class.property("currentStamina")?;
        Some(StaminaChain { data, current })
    }

    fn probe_injury(model: &dyn ObjectModel, class: &ClassRef) -> Option<InjuryChain> {
        let refs = class.property("refs")?;
        let refs_class = model.class(REFS_CLASS)?;
        let afflictions = refs_class.property("afflictions")?;
        let afflictions_class = model.class(AFFLICTIONS_CLASS)?;
        let status_of = afflictions_class.method("GetCurrentStatus")?;
        let injury_tag = afflictions_class.enum_tag("Injury")?;
        Some(InjuryChain {
            refs,
            afflictions,
            status_of,
            injury_tag,
        })
    }
}

fn bind<T>(slot: Option<T>, member: &str) -> Option<T> {
    if slot.is_none() {
        tracing::debug!(member, "character member not available in this host build");
    }
    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryModel;

    #[test]
    fn test_missing_class_degrades_everything() {
        let model = MemoryModel::new();
        let shape = CharacterShape::probe(&model);
        assert!(shape.class.is_none());
        assert!(shape.local_character.is_none());
        assert!(shape.stamina.is_none());
        assert!(shape.injury.is_none());
    }

    #[test]
    fn test_members_probe_independently() {
        let model = MemoryModel::new();
        let class = model.define_class(CHARACTER_CLASS);
        class.declare_static_property("localCharacter");
        class.declare_property("Center");
        // No collection, name, stamina or injury members declared.

        let shape = CharacterShape::probe(&model);
        assert!(shape.class.is_some());
        assert!(shape.local_character.is_some());
        assert!(shape.center.is_some());
        assert!(shape.all_characters.is_none());
        assert!(shape.display_name.is_none());
        assert!(shape.stamina.is_none());
    }

    #[test]
    fn test_position_fallback_when_center_absent() {
        let model = MemoryModel::new();
        let class = model.define_class(CHARACTER_CLASS);
        let fallback = class.declare_property("position");

        let shape = CharacterShape::probe(&model);
        assert_eq!(shape.center, Some(fallback));
    }

    #[test]
    fn test_stamina_chain_needs_both_hops() {
        let model = MemoryModel::new();
        let class = model.define_class(CHARACTER_CLASS);
        class.declare_property("data");
        // CharacterData class exists but lacks the stamina member.
        model.define_class(DATA_CLASS);

        let shape = CharacterShape::probe(&model);
        assert!(shape.stamina.is_none());

        model.define_class(DATA_CLASS).declare_property("currentStamina");
        let reprobed = CharacterShape::probe(&model);
        assert!(reprobed.stamina.is_some());
    }

    #[test]
    fn test_injury_chain_needs_enum_tag() {
        let model = MemoryModel::new();
        let class = model.define_class(CHARACTER_CLASS);
        class.declare_property("refs");
        model.define_class(REFS_CLASS).declare_property("afflictions");
        let afflictions = model.define_class(AFFLICTIONS_CLASS);
        afflictions.declare_method("GetCurrentStatus", 1);

        // Tag missing from the host enumeration.
        let shape = CharacterShape::probe(&model);
        assert!(shape.injury.is_none());

        afflictions.declare_enum_tag("Injury", Value::Int(1));
        let reprobed = CharacterShape::probe(&model);
        assert!(reprobed.injury.is_some());
    }
}
