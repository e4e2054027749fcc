//! Per-entity presentation state

use crate::host::{LabelAnchor, Viewpoint};
use crate::snapshot::EntitySnapshot;
use glam::Vec3;

/// World-space rise of the label above the entity's center.
const ANCHOR_HEIGHT: f32 = 2.1;

/// Presentation state for one tracked entity
///
/// Created the first time an id is seen nearby; when the entity leaves
/// range the view is hidden rather than destroyed, so the label object on
/// the rendering side can be reused by id.
#[derive(Debug, Clone)]
pub struct NameplateView {
    snapshot: EntitySnapshot,
    cached_position: Vec3,
    visible: bool,
    last_seen_cycle: u64,
}

impl NameplateView {
    pub(crate) fn new(snapshot: EntitySnapshot, cycle: u64) -> Self {
        let cached_position = snapshot.world_position;
        Self {
            snapshot,
            cached_position,
            visible: false,
            last_seen_cycle: cycle,
        }
    }

    /// Absorb a fresh snapshot, updating the cached position.
    pub(crate) fn update_data(&mut self, snapshot: EntitySnapshot, cycle: u64) {
        self.cached_position = snapshot.world_position;
        self.snapshot = snapshot;
        self.last_seen_cycle = cycle;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn last_seen_cycle(&self) -> u64 {
        self.last_seen_cycle
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn snapshot(&self) -> &EntitySnapshot {
        &self.snapshot
    }

    /// Multi-line label body for this entity.
    pub fn label_text(&self) -> String {
        format!(
            "{}\nHP: {:.0}\nStamina: {:.0}\nPing: {} ms",
            self.snapshot.display_name, self.snapshot.health, self.snapshot.stamina, self.snapshot.ping
        )
    }

    /// Anchor placement for the current viewpoint.
    ///
    /// Pure function of the cached position and the viewpoint, so the
    /// fine-cadence update can run every tick without new host queries.
    pub fn anchor(&self, viewpoint: &Viewpoint) -> LabelAnchor {
        let position = self.cached_position + Vec3::Y * ANCHOR_HEIGHT;
        let offset = position - viewpoint.position;
        let facing = if offset.length_squared() > f32::EPSILON {
            offset.normalize()
        } else {
            // Viewpoint sitting exactly on the anchor; any direction works.
            Vec3::Z
        };
        LabelAnchor { position, facing }
    }
}
