//! Nameplate overlay demo against a scripted in-memory host
//!
//! Spawns a local climber and three remote climbers on a ridge, drains
//! stamina, accumulates injuries, walks one climber out of label range,
//! toggles the overlay off near the end, and prints every label update.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;

use cairn::access::EntityAccessor;
use cairn::compat::HudPolicy;
use cairn::core::config::OverlayConfig;
use cairn::core::error::Result;
use cairn::core::types::EntityId;
use cairn::host::memory::{MemoryClass, MemoryModel, MemoryObject};
use cairn::host::{
    Clock, LabelAnchor, LabelSink, MemberKey, MethodSig, Value, Viewpoint, ViewpointProvider,
};
use cairn::overlay::Overlay;

const TICKS: u32 = 150;
const TICK_SECONDS: f64 = 1.0 / 60.0;
const INJURY_TAG: i64 = 1;

/// Scripted clock advanced by the main loop
struct ScriptClock(Rc<Cell<f64>>);

impl Clock for ScriptClock {
    fn now(&self) -> f64 {
        self.0.get()
    }
}

/// Camera parked at base camp, looking up the ridge
struct BaseCampViewpoint;

impl ViewpointProvider for BaseCampViewpoint {
    fn viewpoint(&self) -> Option<Viewpoint> {
        Some(Viewpoint {
            position: Vec3::new(0.0, 1.7, -6.0),
            forward: Vec3::Z,
        })
    }
}

/// Label sink that prints updates to stdout
struct PrintSink;

impl LabelSink for PrintSink {
    fn set_text(&mut self, id: EntityId, text: &str) {
        println!("[{}] {}", id.0, text.replace('\n', " | "));
    }

    fn set_anchor(&mut self, id: EntityId, anchor: LabelAnchor) {
        tracing::trace!(id = id.0, ?anchor, "anchor updated");
    }

    fn set_visible(&mut self, id: EntityId, visible: bool) {
        println!("[{}] visible = {}", id.0, visible);
    }
}

/// Handles for one spawned climber so the script can move it around
struct Climber {
    body: Rc<MemoryObject>,
    data: Rc<MemoryObject>,
    injury: Rc<Cell<f64>>,
    center_key: MemberKey,
    stamina_key: MemberKey,
}

impl Climber {
    fn set_position(&self, position: Vec3) {
        self.body.set(self.center_key, Value::Vec3(position));
    }

    fn set_stamina(&self, stamina: f32) {
        self.data.set(self.stamina_key, Value::from(stamina));
    }

    fn set_injury(&self, fraction: f64) {
        self.injury.set(fraction);
    }
}

/// The scripted world: a Character layout plus a roster of climbers
struct RidgeWorld {
    character: Rc<MemoryClass>,
    local_key: MemberKey,
    all_key: MemberKey,
    center_key: MemberKey,
    name_key: MemberKey,
    is_local_key: MemberKey,
    latency_key: MemberKey,
    data_key: MemberKey,
    refs_key: MemberKey,
    stamina_key: MemberKey,
    afflictions_key: MemberKey,
    status_sig: MethodSig,
    roster: Vec<Value>,
}

impl RidgeWorld {
    fn new(model: &MemoryModel) -> Self {
        let character = model.define_class("Character");
        let local_key = character.declare_static_property("localCharacter");
        let all_key = character.declare_static_property("AllCharacters");
        let center_key = character.declare_property("Center");
        let name_key = character.declare_property("characterName");
        let is_local_key = character.declare_property("IsLocal");
        let latency_key = character.declare_property("Latency");
        let data_key = character.declare_property("data");
        let refs_key = character.declare_property("refs");

        let stamina_key = model.define_class("CharacterData").declare_property("currentStamina");
        let afflictions_key = model
            .define_class("CharacterRefs")
            .declare_property("afflictions");
        let afflictions_class = model.define_class("CharacterAfflictions");
        let status_sig = afflictions_class.declare_method("GetCurrentStatus", 1);
        afflictions_class.declare_enum_tag("Injury", Value::Int(INJURY_TAG));

        Self {
            character,
            local_key,
            all_key,
            center_key,
            name_key,
            is_local_key,
            latency_key,
            data_key,
            refs_key,
            stamina_key,
            afflictions_key,
            status_sig,
            roster: Vec::new(),
        }
    }

    fn spawn(&mut self, id: u64, name: &str, position: Vec3, is_local: bool, ping: i64) -> Climber {
        let body = Rc::new(MemoryObject::new(id));
        body.set(self.center_key, Value::Vec3(position));
        body.set(self.name_key, Value::from(name));
        body.set(self.is_local_key, Value::Bool(is_local));
        body.set(self.latency_key, Value::Int(ping));

        let data = Rc::new(MemoryObject::new(id + 100));
        data.set(self.stamina_key, Value::from(80.0_f32));
        body.set(self.data_key, Value::Object(data.clone()));

        let injury = Rc::new(Cell::new(0.0_f64));
        let afflictions = Rc::new(MemoryObject::new(id + 200));
        let status = injury.clone();
        afflictions.on_call(self.status_sig, move |args| {
            if args[0].as_i64() == Some(INJURY_TAG) {
                Ok(Value::Float(status.get()))
            } else {
                Ok(Value::Float(0.0))
            }
        });
        let refs = Rc::new(MemoryObject::new(id + 300));
        refs.set(self.afflictions_key, Value::Object(afflictions));
        body.set(self.refs_key, Value::Object(refs));

        self.roster.push(Value::Object(body.clone()));
        self.character
            .set_static(self.all_key, Value::List(self.roster.clone()));
        if is_local {
            self.character
                .set_static(self.local_key, Value::Object(body.clone()));
        }

        Climber {
            body,
            data,
            injury,
            center_key: self.center_key,
            stamina_key: self.stamina_key,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("cairn=debug").init();

    tracing::info!("starting nameplate simulation");

    let config = OverlayConfig::from_toml_str("max_distance = 30.0\nrefresh_interval = 0.2")?;

    let model = Rc::new(MemoryModel::new());
    let mut world = RidgeWorld::new(&model);

    world.spawn(1, "You", Vec3::ZERO, true, 0);
    let mira = world.spawn(2, "Mira", Vec3::new(6.0, 1.0, 4.0), false, 48);
    let jonas = world.spawn(3, "Jonas", Vec3::new(-8.0, 2.5, 10.0), false, 95);
    let petra = world.spawn(4, "Petra", Vec3::new(20.0, 4.0, 18.0), false, 130);

    let accessor = EntityAccessor::new(model.clone());
    let hud_policy = HudPolicy::probe(model.as_ref());

    let elapsed = Rc::new(Cell::new(0.0));
    let mut overlay = Overlay::new(
        config,
        accessor,
        hud_policy,
        Box::new(ScriptClock(elapsed.clone())),
        Box::new(BaseCampViewpoint),
    );
    let mut sink = PrintSink;

    for tick in 0..TICKS {
        let t = tick as f32;
        // Petra keeps walking along the ridge and leaves label range.
        petra.set_position(Vec3::new(20.0 + t * 0.15, 4.0, 18.0 + t * 0.1));
        mira.set_stamina((80.0 - t * 0.4).max(0.0));
        jonas.set_injury((f64::from(t) * 0.004).min(0.9));

        // The player hits the toggle key near the end of the run.
        let toggle_pressed = tick == 120;
        overlay.tick(toggle_pressed, &mut sink);

        elapsed.set(elapsed.get() + TICK_SECONDS);
    }

    tracing::info!("simulation finished");
    Ok(())
}
