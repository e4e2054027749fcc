//! The per-tick reconciliation loop
//!
//! Runs at two cadences: a coarse data refresh that re-queries the host
//! for nearby entities and rebuilds snapshots, and a fine position-only
//! update that re-anchors existing labels from cached data every tick so
//! tracking stays smooth between refreshes.

use crate::access::EntityAccessor;
use crate::compat::HudPolicy;
use crate::core::config::OverlayConfig;
use crate::core::types::EntityId;
use crate::host::{Clock, LabelSink, ViewpointProvider};
use crate::overlay::view::NameplateView;
use crate::snapshot::SnapshotBuilder;
use ahash::{AHashMap, AHashSet};

/// Whether the overlay is currently toggled on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Hidden,
    Active,
}

/// Owns the id-to-view mapping and runs the tick loop
///
/// All collaborators are injected: the accessor for entity data, the HUD
/// policy, and the clock and viewpoint providers. The shell calls
/// [`Overlay::tick`] once per frame with the toggle signal and a sink for
/// label updates.
pub struct Overlay {
    config: OverlayConfig,
    accessor: EntityAccessor,
    hud_policy: HudPolicy,
    clock: Box<dyn Clock>,
    viewpoint: Box<dyn ViewpointProvider>,
    views: AHashMap<EntityId, NameplateView>,
    state: OverlayState,
    next_refresh: f64,
    refresh_cycle: u64,
}

impl Overlay {
    pub fn new(
        config: OverlayConfig,
        accessor: EntityAccessor,
        hud_policy: HudPolicy,
        clock: Box<dyn Clock>,
        viewpoint: Box<dyn ViewpointProvider>,
    ) -> Self {
        Self {
            config,
            accessor,
            hud_policy,
            clock,
            viewpoint,
            views: AHashMap::new(),
            state: OverlayState::Active,
            next_refresh: 0.0,
            refresh_cycle: 0,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Presentation state for one tracked entity, if any.
    pub fn view(&self, id: EntityId) -> Option<&NameplateView> {
        self.views.get(&id)
    }

    /// Number of tracked entities, visible or not.
    pub fn tracked_count(&self) -> usize {
        self.views.len()
    }

    /// Advance the overlay by one frame.
    pub fn tick(&mut self, toggle_pressed: bool, sink: &mut dyn LabelSink) {
        if toggle_pressed {
            self.handle_toggle(sink);
        }

        if self.state == OverlayState::Hidden {
            return;
        }

        // The external policy is rechecked every tick, not only at toggle
        // time.
        if !self.policy_allows() {
            tracing::debug!("HUD policy suppressed the overlay");
            self.enter_hidden(sink);
            return;
        }

        let now = self.clock.now();
        if now < self.next_refresh {
            self.update_anchors(sink);
            return;
        }

        self.next_refresh = now + f64::from(self.config.refresh_interval);
        self.refresh(sink);
    }

    fn handle_toggle(&mut self, sink: &mut dyn LabelSink) {
        match self.state {
            OverlayState::Active => {
                tracing::debug!("overlay toggled off");
                self.enter_hidden(sink);
            }
            OverlayState::Hidden if self.policy_allows() => {
                tracing::debug!("overlay toggled on");
                self.state = OverlayState::Active;
            }
            OverlayState::Hidden => {}
        }
    }

    fn policy_allows(&self) -> bool {
        self.hud_policy.should_show_hud() || self.config.show_when_hud_hidden
    }

    fn enter_hidden(&mut self, sink: &mut dyn LabelSink) {
        self.state = OverlayState::Hidden;
        self.hide_all(sink);
    }

    /// Mark every view not-visible without dropping its state.
    fn hide_all(&mut self, sink: &mut dyn LabelSink) {
        for (id, view) in self.views.iter_mut() {
            view.set_visible(false);
            sink.set_visible(*id, false);
        }
    }

    /// Fine-cadence step: re-anchor every tracked label from its cached
    /// position. No host queries.
    fn update_anchors(&self, sink: &mut dyn LabelSink) {
        let Some(viewpoint) = self.viewpoint.viewpoint() else {
            return;
        };
        for (id, view) in &self.views {
            sink.set_anchor(*id, view.anchor(&viewpoint));
        }
    }

    /// Coarse-cadence step: re-query the host and reconcile the visible
    /// set against the tracked views.
    fn refresh(&mut self, sink: &mut dyn LabelSink) {
        self.refresh_cycle += 1;

        // Without a reference point nothing nearby can be determined.
        let Some(local) = self.accessor.try_local_entity() else {
            self.hide_all(sink);
            return;
        };
        let Some(origin) = self.accessor.read_position(&local) else {
            self.hide_all(sink);
            return;
        };

        let nearby = self.accessor.entities_near(origin, self.config.max_distance);
        let builder = SnapshotBuilder::new(&self.accessor);
        let viewpoint = self.viewpoint.viewpoint();
        let cycle = self.refresh_cycle;

        let mut seen = AHashSet::with_capacity(nearby.len());
        for entity in &nearby {
            let Some(snapshot) = builder.build(entity) else {
                continue;
            };
            let id = snapshot.id;
            seen.insert(id);

            let view = self
                .views
                .entry(id)
                .or_insert_with(|| NameplateView::new(snapshot.clone(), cycle));
            view.update_data(snapshot, cycle);
            view.set_visible(true);

            sink.set_text(id, &view.label_text());
            if let Some(viewpoint) = &viewpoint {
                sink.set_anchor(id, view.anchor(viewpoint));
            }
            sink.set_visible(id, true);
        }

        for (id, view) in self.views.iter_mut() {
            if !seen.contains(id) {
                view.set_visible(false);
                sink.set_visible(*id, false);
            }
        }

        self.evict_stale();
    }

    /// Drop views unseen for longer than the configured horizon.
    fn evict_stale(&mut self) {
        let horizon = self.config.evict_after_cycles;
        if horizon == 0 {
            return;
        }
        let cycle = self.refresh_cycle;
        self.views
            .retain(|_, view| cycle - view.last_seen_cycle() <= u64::from(horizon));
    }
}
