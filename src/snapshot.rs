//! Immutable per-entity stat snapshots

use crate::access::EntityAccessor;
use crate::core::types::EntityId;
use crate::host::{HostObject, ObjectRef};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Self-contained summary of one entity's displayable stats at one instant
///
/// Holds no reference back to the host object, so it outlives the frame
/// that produced it and can be compared or cached freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    /// Falls back to "Unknown" when the host has no name for the entity.
    pub display_name: String,
    /// Normalized 0-100 scale; 0 when the injury status is unavailable.
    pub health: f32,
    /// Raw host units; 0 when unavailable.
    pub stamina: f32,
    /// Network latency in milliseconds; 0 when unavailable.
    pub ping: u32,
    pub world_position: Vec3,
}

/// Converts raw handles into snapshots, applying every default in one place
pub struct SnapshotBuilder<'a> {
    accessor: &'a EntityAccessor,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(accessor: &'a EntityAccessor) -> Self {
        Self { accessor }
    }

    /// Build a snapshot for one entity.
    ///
    /// Returns `None` only when the position cannot be determined; every
    /// other field independently falls back to its default. An unavailable
    /// injury chain reads as 0 health, never as full health.
    pub fn build(&self, entity: &ObjectRef) -> Option<EntitySnapshot> {
        let world_position = self.accessor.read_position(entity)?;

        let display_name = self
            .accessor
            .read_name(entity)
            .unwrap_or_else(|| "Unknown".to_string());

        let health = match self.accessor.read_injury_fraction(entity) {
            Some(injury) => (1.0 - injury).clamp(0.0, 1.0) * 100.0,
            None => 0.0,
        };

        let stamina = self.accessor.read_stamina(entity).unwrap_or(0.0);

        let ping = self
            .accessor
            .read_latency(entity)
            .unwrap_or(0)
            .clamp(0, i64::from(u32::MAX)) as u32;

        Some(EntitySnapshot {
            id: EntityId(entity.identity()),
            display_name,
            health,
            stamina,
            ping,
            world_position,
        })
    }
}
