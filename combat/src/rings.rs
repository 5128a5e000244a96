//! Ring activations: the staged area-effect state machine and its registry.

use std::collections::BTreeSet;
use std::time::Duration;

use glam::Vec2;
use volt_barrage_core::{Event, RingId, RingKind, RingPhase, TargetId, TargetView, TILE_LENGTH};

use crate::RingTuning;

/// One active ring discharge.
#[derive(Debug)]
pub(crate) struct Ring {
    id: RingId,
    kind: RingKind,
    center: Vec2,
    max_range_tiles: u32,
    damage: u32,
    stun: Duration,
    radius: f32,
    phase: RingPhase,
    phase_clock: Duration,
    check_clock: Duration,
    hit: BTreeSet<TargetId>,
    finished: bool,
}

impl Ring {
    fn new(
        id: RingId,
        kind: RingKind,
        center: Vec2,
        max_range_tiles: u32,
        damage: u32,
        stun: Duration,
    ) -> Self {
        Self {
            id,
            kind,
            center,
            max_range_tiles,
            damage,
            stun,
            radius: 0.0,
            phase: RingPhase::Expanding,
            phase_clock: Duration::ZERO,
            check_clock: Duration::ZERO,
            hit: BTreeSet::new(),
            finished: false,
        }
    }

    pub(crate) fn id(&self) -> RingId {
        self.id
    }

    pub(crate) fn kind(&self) -> RingKind {
        self.kind
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.center
    }

    pub(crate) fn max_range_tiles(&self) -> u32 {
        self.max_range_tiles
    }

    pub(crate) fn radius(&self) -> f32 {
        self.radius
    }

    pub(crate) fn phase(&self) -> RingPhase {
        self.phase
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    fn max_radius(&self) -> f32 {
        self.max_range_tiles as f32 * TILE_LENGTH / 2.0
    }

    /// Advances the activation by one frame delta.
    ///
    /// The damage sweep runs on its own cadence before the phase advances,
    /// so the very first sweep still observes a zero radius; only targets
    /// standing exactly on the center can be caught that early.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        tuning: &RingTuning,
        targets: &TargetView,
        out_events: &mut Vec<Event>,
    ) {
        if self.finished {
            return;
        }

        self.check_clock = self.check_clock.saturating_add(dt);
        if self.check_clock >= tuning.damage_check() {
            self.check_clock = Duration::ZERO;
            self.sweep(targets, out_events);
        }

        self.advance_phase(dt, tuning, out_events);
    }

    /// Damages and stuns every in-range target not already hit.
    fn sweep(&mut self, targets: &TargetView, out_events: &mut Vec<Event>) {
        for target in targets.iter() {
            if self.hit.contains(&target.id) {
                continue;
            }

            if target.position.distance(self.center) > self.radius {
                continue;
            }

            out_events.push(Event::DamageDealt {
                target: target.id,
                amount: self.damage,
            });
            out_events.push(Event::StunApplied {
                target: target.id,
                duration: self.stun,
            });
            let _ = self.hit.insert(target.id);
        }
    }

    fn advance_phase(&mut self, dt: Duration, tuning: &RingTuning, out_events: &mut Vec<Event>) {
        self.phase_clock = self.phase_clock.saturating_add(dt);

        match self.phase {
            RingPhase::Expanding => {
                let expand = tuning.expand();
                let progress = if expand.is_zero() {
                    1.0
                } else {
                    (self.phase_clock.as_secs_f32() / expand.as_secs_f32()).min(1.0)
                };
                self.radius = self.max_radius() * progress;

                if self.phase_clock >= expand {
                    self.radius = self.max_radius();
                    self.enter_phase(RingPhase::Sustaining, out_events);
                }
            }
            RingPhase::Sustaining => {
                if self.phase_clock >= tuning.sustain() {
                    self.enter_phase(RingPhase::Fading, out_events);
                }
            }
            RingPhase::Fading => {
                if self.phase_clock >= tuning.fade() {
                    self.finished = true;
                    out_events.push(Event::RingFaded { ring: self.id });
                }
            }
        }
    }

    fn enter_phase(&mut self, phase: RingPhase, out_events: &mut Vec<Event>) {
        self.phase = phase;
        self.phase_clock = Duration::ZERO;
        out_events.push(Event::RingPhaseChanged {
            ring: self.id,
            phase,
        });
    }
}

/// Registry that owns every active ring and allocates their handles.
#[derive(Debug)]
pub(crate) struct RingRegistry {
    entries: Vec<Ring>,
    next_ring_id: RingId,
}

impl RingRegistry {
    /// Creates an empty ring registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_ring_id: RingId::new(0),
        }
    }

    /// Tracks a new activation and returns the allocated handle.
    pub(crate) fn spawn(
        &mut self,
        kind: RingKind,
        center: Vec2,
        max_range_tiles: u32,
        damage: u32,
        stun: Duration,
    ) -> RingId {
        let id = self.next_ring_id;
        self.next_ring_id = RingId::new(id.get().wrapping_add(1));
        self.entries
            .push(Ring::new(id, kind, center, max_range_tiles, damage, stun));
        id
    }

    /// Advances every tracked ring, then drops the finished ones.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        tuning: &RingTuning,
        targets: &TargetView,
        out_events: &mut Vec<Event>,
    ) {
        for ring in self.entries.iter_mut() {
            ring.advance(dt, tuning, targets, out_events);
        }
        self.entries.retain(|ring| !ring.is_finished());
    }

    /// Unconditionally drops every tracked ring.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Ring> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
