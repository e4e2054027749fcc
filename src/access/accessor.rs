//! Read API over host-managed character entities

use crate::access::shape::CharacterShape;
use crate::host::{ClassShape, HostObject, MemberKey, ObjectModel, ObjectRef, Value};
use glam::Vec3;
use std::cell::OnceCell;
use std::rc::Rc;

/// Locates character entities in the attached host and reads their fields
///
/// The layout probe runs lazily on first use and is cached for the life of
/// the accessor. Every read here is null-safe: a missing member, a faulting
/// call, or a wrong-shaped value becomes `None` at this layer and nothing
/// above it ever sees a host error.
pub struct EntityAccessor {
    model: Rc<dyn ObjectModel>,
    shape: OnceCell<CharacterShape>,
}

impl EntityAccessor {
    pub fn new(model: Rc<dyn ObjectModel>) -> Self {
        Self {
            model,
            shape: OnceCell::new(),
        }
    }

    fn shape(&self) -> &CharacterShape {
        self.shape
            .get_or_init(|| CharacterShape::probe(self.model.as_ref()))
    }

    /// Entity the local player controls, if the host exposes one right now.
    pub fn try_local_entity(&self) -> Option<ObjectRef> {
        let shape = self.shape();
        let class = shape.class.as_ref()?;
        let key = shape.local_character?;
        class.read_static(key).ok()?.as_object().cloned()
    }

    /// All non-local entities within `radius` of `origin`.
    ///
    /// The distance filter is inclusive. Host collection order is
    /// preserved; nothing about it is stable across calls.
    pub fn entities_near(&self, origin: Vec3, radius: f32) -> Vec<ObjectRef> {
        let shape = self.shape();
        let Some(class) = shape.class.as_ref() else {
            return Vec::new();
        };
        let Some(key) = shape.all_characters else {
            return Vec::new();
        };
        let Ok(collection) = class.read_static(key) else {
            return Vec::new();
        };
        let Some(entries) = collection.as_list() else {
            return Vec::new();
        };

        let radius_sq = radius * radius;
        let mut nearby = Vec::new();
        for entry in entries {
            let Some(entity) = entry.as_object() else {
                continue;
            };
            if self.read_is_local(entity).unwrap_or(false) {
                continue;
            }
            let Some(position) = self.read_position(entity) else {
                continue;
            };
            if position.distance_squared(origin) <= radius_sq {
                nearby.push(entity.clone());
            }
        }
        nearby
    }

    /// World-space center of an entity.
    pub fn read_position(&self, entity: &ObjectRef) -> Option<Vec3> {
        self.read_member(entity, self.shape().center)?.as_vec3()
    }

    /// Display name of an entity.
    pub fn read_name(&self, entity: &ObjectRef) -> Option<String> {
        self.read_member(entity, self.shape().display_name)?
            .as_str()
            .map(str::to_string)
    }

    /// Whether the host considers this the local player's entity.
    pub fn read_is_local(&self, entity: &ObjectRef) -> Option<bool> {
        self.read_member(entity, self.shape().is_local)?.as_bool()
    }

    /// Current network latency in milliseconds.
    pub fn read_latency(&self, entity: &ObjectRef) -> Option<i64> {
        self.read_member(entity, self.shape().latency)?.as_i64()
    }

    /// Current stamina in raw host units.
    pub fn read_stamina(&self, entity: &ObjectRef) -> Option<f32> {
        let chain = self.shape().stamina?;
        let data = entity.read(chain.data).ok()?;
        data.as_object()?.read(chain.current).ok()?.as_f32()
    }

    /// Normalized injury fraction, 0 = unhurt, 1 = fully injured.
    pub fn read_injury_fraction(&self, entity: &ObjectRef) -> Option<f32> {
        let chain = self.shape().injury.clone()?;
        let refs = entity.read(chain.refs).ok()?;
        let afflictions = refs.as_object()?.read(chain.afflictions).ok()?;
        let status = afflictions
            .as_object()?
            .call(chain.status_of, &[chain.injury_tag])
            .ok()?;
        status.as_f32()
    }

    fn read_member(&self, entity: &ObjectRef, key: Option<MemberKey>) -> Option<Value> {
        entity.read(key?).ok()
    }
}
