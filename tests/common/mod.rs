//! Shared in-memory character world for integration tests
#![allow(dead_code)]

use cairn::core::types::EntityId;
use cairn::host::memory::{MemoryClass, MemoryModel, MemoryObject};
use cairn::host::{HostError, HostObject, MemberKey, MethodSig, Value};
use glam::Vec3;
use std::cell::Cell;
use std::rc::Rc;

pub const INJURY_TAG: i64 = 2;

/// Which parts of the character layout the fake host declares
pub struct Layout {
    pub character_class: bool,
    pub local_static: bool,
    pub all_static: bool,
    pub center: bool,
    pub position_fallback: bool,
    pub name: bool,
    pub is_local: bool,
    pub latency: bool,
    pub stamina_chain: bool,
    pub injury_chain: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            character_class: true,
            local_static: true,
            all_static: true,
            center: true,
            position_fallback: false,
            name: true,
            is_local: true,
            latency: true,
            stamina_chain: true,
            injury_chain: true,
        }
    }
}

impl Layout {
    pub fn full() -> Self {
        Self::default()
    }

    /// Host build with no character type at all.
    pub fn bare() -> Self {
        Self {
            character_class: false,
            local_static: false,
            all_static: false,
            center: false,
            position_fallback: false,
            name: false,
            is_local: false,
            latency: false,
            stamina_chain: false,
            injury_chain: false,
        }
    }
}

/// Handles for one spawned character
pub struct Climber {
    pub body: Rc<MemoryObject>,
    data: Option<Rc<MemoryObject>>,
    afflictions: Option<Rc<MemoryObject>>,
    injury: Rc<Cell<f64>>,
    center_key: Option<MemberKey>,
    name_key: Option<MemberKey>,
    latency_key: Option<MemberKey>,
    stamina_key: Option<MemberKey>,
    status_sig: Option<MethodSig>,
}

impl Climber {
    pub fn id(&self) -> EntityId {
        EntityId(self.body.identity())
    }

    pub fn set_position(&self, position: Vec3) {
        if let Some(key) = self.center_key {
            self.body.set(key, Value::Vec3(position));
        }
    }

    /// Drop the position field, as if the live object lost its transform.
    pub fn clear_position(&self) {
        if let Some(key) = self.center_key {
            self.body.clear(key);
        }
    }

    pub fn set_name(&self, name: &str) {
        if let Some(key) = self.name_key {
            self.body.set(key, Value::from(name));
        }
    }

    pub fn clear_name(&self) {
        if let Some(key) = self.name_key {
            self.body.clear(key);
        }
    }

    pub fn set_raw_name(&self, value: Value) {
        if let Some(key) = self.name_key {
            self.body.set(key, value);
        }
    }

    pub fn set_ping(&self, ms: i64) {
        if let Some(key) = self.latency_key {
            self.body.set(key, Value::Int(ms));
        }
    }

    pub fn set_raw_ping(&self, value: Value) {
        if let Some(key) = self.latency_key {
            self.body.set(key, value);
        }
    }

    pub fn set_stamina(&self, stamina: f32) {
        if let (Some(data), Some(key)) = (&self.data, self.stamina_key) {
            data.set(key, Value::from(stamina));
        }
    }

    pub fn set_raw_stamina(&self, value: Value) {
        if let (Some(data), Some(key)) = (&self.data, self.stamina_key) {
            data.set(key, value);
        }
    }

    pub fn set_injury(&self, fraction: f64) {
        self.injury.set(fraction);
    }

    /// Make every injury-status query fault on this character.
    pub fn fail_injury_queries(&self) {
        if let (Some(afflictions), Some(sig)) = (&self.afflictions, self.status_sig) {
            afflictions.on_call(sig, |_| Err(HostError::Faulted("status query failed".into())));
        }
    }
}

/// Switchable stand-in for the HUD-hider mod's visibility property
pub struct HudSwitch {
    class: Rc<MemoryClass>,
    key: MemberKey,
}

impl HudSwitch {
    pub fn set(&self, visible: bool) {
        self.class.set_static(self.key, Value::Bool(visible));
    }
}

/// A fake host exposing the character layout selected by [`Layout`]
pub struct CharacterWorld {
    pub model: Rc<MemoryModel>,
    character: Option<Rc<MemoryClass>>,
    local_key: Option<MemberKey>,
    all_key: Option<MemberKey>,
    center_key: Option<MemberKey>,
    name_key: Option<MemberKey>,
    is_local_key: Option<MemberKey>,
    latency_key: Option<MemberKey>,
    data_key: Option<MemberKey>,
    refs_key: Option<MemberKey>,
    stamina_key: Option<MemberKey>,
    afflictions_key: Option<MemberKey>,
    status_sig: Option<MethodSig>,
    roster: Vec<Value>,
}

impl CharacterWorld {
    pub fn new() -> Self {
        Self::with_layout(Layout::full())
    }

    pub fn with_layout(layout: Layout) -> Self {
        let model = Rc::new(MemoryModel::new());

        let mut world = Self {
            model: model.clone(),
            character: None,
            local_key: None,
            all_key: None,
            center_key: None,
            name_key: None,
            is_local_key: None,
            latency_key: None,
            data_key: None,
            refs_key: None,
            stamina_key: None,
            afflictions_key: None,
            status_sig: None,
            roster: Vec::new(),
        };

        if !layout.character_class {
            return world;
        }

        let character = model.define_class("Character");
        if layout.local_static {
            world.local_key = Some(character.declare_static_property("localCharacter"));
        }
        if layout.all_static {
            world.all_key = Some(character.declare_static_property("AllCharacters"));
        }
        if layout.center {
            world.center_key = Some(character.declare_property("Center"));
        } else if layout.position_fallback {
            world.center_key = Some(character.declare_property("position"));
        }
        if layout.name {
            world.name_key = Some(character.declare_property("characterName"));
        }
        if layout.is_local {
            world.is_local_key = Some(character.declare_property("IsLocal"));
        }
        if layout.latency {
            world.latency_key = Some(character.declare_property("Latency"));
        }
        if layout.stamina_chain {
            world.data_key = Some(character.declare_property("data"));
            world.stamina_key = Some(
                model
                    .define_class("CharacterData")
                    .declare_property("currentStamina"),
            );
        }
        if layout.injury_chain {
            world.refs_key = Some(character.declare_property("refs"));
            world.afflictions_key = Some(
                model
                    .define_class("CharacterRefs")
                    .declare_property("afflictions"),
            );
            let afflictions = model.define_class("CharacterAfflictions");
            world.status_sig = Some(afflictions.declare_method("GetCurrentStatus", 1));
            afflictions.declare_enum_tag("Injury", Value::Int(INJURY_TAG));
        }

        world.character = Some(character);
        world
    }

    /// Spawn a remote character with the given stats.
    pub fn spawn(&mut self, id: u64, name: &str, position: Vec3) -> Climber {
        self.spawn_inner(id, name, position, false)
    }

    /// Spawn the local player's character.
    pub fn spawn_local(&mut self, id: u64, position: Vec3) -> Climber {
        self.spawn_inner(id, "You", position, true)
    }

    fn spawn_inner(&mut self, id: u64, name: &str, position: Vec3, is_local: bool) -> Climber {
        let body = Rc::new(MemoryObject::new(id));
        if let Some(key) = self.center_key {
            body.set(key, Value::Vec3(position));
        }
        if let Some(key) = self.name_key {
            body.set(key, Value::from(name));
        }
        if let Some(key) = self.is_local_key {
            body.set(key, Value::Bool(is_local));
        }
        if let Some(key) = self.latency_key {
            body.set(key, Value::Int(0));
        }

        let mut data = None;
        if let (Some(data_key), Some(stamina_key)) = (self.data_key, self.stamina_key) {
            let object = Rc::new(MemoryObject::new(id + 1000));
            object.set(stamina_key, Value::from(100.0_f32));
            body.set(data_key, Value::Object(object.clone()));
            data = Some(object);
        }

        let injury = Rc::new(Cell::new(0.0_f64));
        let mut afflictions_handle = None;
        if let (Some(refs_key), Some(afflictions_key), Some(status_sig)) =
            (self.refs_key, self.afflictions_key, self.status_sig)
        {
            let afflictions = Rc::new(MemoryObject::new(id + 2000));
            let status = injury.clone();
            afflictions.on_call(status_sig, move |args| {
                if args[0].as_i64() == Some(INJURY_TAG) {
                    Ok(Value::Float(status.get()))
                } else {
                    Ok(Value::Float(0.0))
                }
            });
            let refs = Rc::new(MemoryObject::new(id + 3000));
            refs.set(afflictions_key, Value::Object(afflictions.clone()));
            body.set(refs_key, Value::Object(refs));
            afflictions_handle = Some(afflictions);
        }

        self.roster.push(Value::Object(body.clone()));
        self.sync_roster();
        if is_local {
            self.set_local_object(Value::Object(body.clone()));
        }

        Climber {
            body,
            data,
            afflictions: afflictions_handle,
            injury,
            center_key: self.center_key,
            name_key: self.name_key,
            latency_key: self.latency_key,
            stamina_key: self.stamina_key,
            status_sig: self.status_sig,
        }
    }

    /// Make the local-player static read as empty.
    pub fn clear_local(&self) {
        self.set_local_object(Value::Nil);
    }

    /// Restore a previously spawned character as the local player.
    pub fn set_local(&self, climber: &Climber) {
        self.set_local_object(Value::Object(climber.body.clone()));
    }

    fn set_local_object(&self, value: Value) {
        if let (Some(character), Some(key)) = (&self.character, self.local_key) {
            character.set_static(key, value);
        }
    }

    fn sync_roster(&self) {
        if let (Some(character), Some(key)) = (&self.character, self.all_key) {
            character.set_static(key, Value::List(self.roster.clone()));
        }
    }

    /// Install the HUD-hider property variant and return its switch.
    pub fn install_hud_hider(&self, visible: bool) -> HudSwitch {
        let class = self.model.define_class("SelectiveHUDHider.API");
        let key = class.declare_static_property("HudVisible");
        class.set_static(key, Value::Bool(visible));
        HudSwitch { class, key }
    }

    /// Install a HUD-hider whose query always faults.
    pub fn install_faulting_hud_hider(&self) {
        let class = self.model.define_class("SelectiveHUDHider.API");
        class.declare_static_method("IsHudVisible", 0, |_| {
            Err(HostError::Faulted("mod crashed".into()))
        });
    }
}
