#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sentry system for the wearable ring caster.
//!
//! The sentry watches the target view each frame and discharges a pulse
//! ring around its wearer whenever an enemy strays into range, on its own
//! attack cadence. A separately cooled storm ultimate casts a larger ring on
//! demand. The system responds exclusively with [`Command::CastRing`]
//! batches; the combat state owns the rings it spawns.

use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;
use volt_barrage_core::{Command, RingKind, TargetView, TILE_LENGTH};

/// Tuning knobs for the sentry caster.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SentryTuning {
    /// Damage applied once per target caught by a pulse ring.
    pub base_damage: u32,
    /// Automatic attack radius and pulse-ring range, in whole tiles.
    pub attack_range_tiles: u32,
    /// Delay between automatic pulses, in milliseconds.
    pub cooldown_ms: u64,
    /// Probability that a ring hit paralyzes. The stock rings always roll
    /// 1.0; the knob is recognized so packs can declare it ahead of time.
    pub paralyze_chance: f32,
    /// Paralyze length applied alongside ring damage, in milliseconds.
    pub paralyze_duration_ms: u64,
    /// Storm-ring range, in whole tiles.
    pub storm_range_tiles: u32,
    /// Damage applied once per target caught by a storm ring.
    pub storm_damage: u32,
    /// Delay between storm calls, in milliseconds.
    pub storm_cooldown_ms: u64,
}

impl Default for SentryTuning {
    fn default() -> Self {
        Self {
            base_damage: 70,
            attack_range_tiles: 3,
            cooldown_ms: 2_000,
            paralyze_chance: 1.0,
            paralyze_duration_ms: 1_000,
            storm_range_tiles: 5,
            storm_damage: 200,
            storm_cooldown_ms: 60_000,
        }
    }
}

impl SentryTuning {
    /// Automatic attack radius converted to world units.
    #[must_use]
    pub fn attack_radius(&self) -> f32 {
        self.attack_range_tiles as f32 * TILE_LENGTH
    }

    /// Delay between automatic pulses as a duration.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Paralyze length as a duration.
    #[must_use]
    pub fn paralyze_duration(&self) -> Duration {
        Duration::from_millis(self.paralyze_duration_ms)
    }

    /// Delay between storm calls as a duration.
    #[must_use]
    pub fn storm_cooldown(&self) -> Duration {
        Duration::from_millis(self.storm_cooldown_ms)
    }
}

/// Outcome of a storm call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StormOutcome {
    /// The storm ring was cast and its cooldown restarted.
    Called,
    /// The storm is still cooling down; nothing was cast.
    CoolingDown {
        /// Time left before the storm can be called again.
        remaining: Duration,
    },
}

/// Auto-casting ring system bound to one worn weapon instance.
#[derive(Debug)]
pub struct Sentry {
    tuning: SentryTuning,
    attack_cooldown: Duration,
    storm_cooldown: Duration,
}

impl Sentry {
    /// Creates a new sentry using the supplied tuning.
    #[must_use]
    pub fn new(tuning: SentryTuning) -> Self {
        Self {
            tuning,
            attack_cooldown: Duration::ZERO,
            storm_cooldown: Duration::ZERO,
        }
    }

    /// Reports whether the storm ultimate is ready.
    #[must_use]
    pub fn storm_ready(&self) -> bool {
        self.storm_cooldown.is_zero()
    }

    /// Time left before the storm ultimate can be called again.
    #[must_use]
    pub fn storm_remaining(&self) -> Duration {
        self.storm_cooldown
    }

    /// Ticks cooldowns and casts a pulse ring when an enemy is in range.
    pub fn handle(
        &mut self,
        dt: Duration,
        wearer: Vec2,
        targets: &TargetView,
        out: &mut Vec<Command>,
    ) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(dt);
        self.storm_cooldown = self.storm_cooldown.saturating_sub(dt);

        if !self.attack_cooldown.is_zero() {
            return;
        }

        let radius = self.tuning.attack_radius();
        let enemy_near = targets
            .iter()
            .any(|target| target.position.distance(wearer) <= radius);
        if !enemy_near {
            return;
        }

        out.push(Command::CastRing {
            kind: RingKind::Pulse,
            center: wearer,
            max_range_tiles: self.tuning.attack_range_tiles,
            damage: self.tuning.base_damage,
            stun: self.tuning.paralyze_duration(),
        });
        self.attack_cooldown = self.tuning.cooldown();
    }

    /// Calls the storm ultimate, if its cooldown allows.
    pub fn call_storm(&mut self, wearer: Vec2, out: &mut Vec<Command>) -> StormOutcome {
        if !self.storm_cooldown.is_zero() {
            return StormOutcome::CoolingDown {
                remaining: self.storm_cooldown,
            };
        }

        out.push(Command::CastRing {
            kind: RingKind::Storm,
            center: wearer,
            max_range_tiles: self.tuning.storm_range_tiles,
            damage: self.tuning.storm_damage,
            stun: self.tuning.paralyze_duration(),
        });
        self.storm_cooldown = self.tuning.storm_cooldown();
        StormOutcome::Called
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volt_barrage_core::{TargetId, TargetSnapshot};

    const STEP: Duration = Duration::from_millis(50);

    fn sentry() -> Sentry {
        Sentry::new(SentryTuning::default())
    }

    fn targets_at(distance: f32) -> TargetView {
        TargetView::from_snapshots(vec![TargetSnapshot {
            id: TargetId::new(1),
            position: Vec2::new(distance, 0.0),
        }])
    }

    #[test]
    fn no_cast_without_a_target_in_range() {
        let mut sentry = sentry();
        let mut out = Vec::new();

        sentry.handle(STEP, Vec2::ZERO, &TargetView::default(), &mut out);
        sentry.handle(STEP, Vec2::ZERO, &targets_at(200.0), &mut out);

        assert!(out.is_empty(), "attack radius is 192 world units");
    }

    #[test]
    fn nearby_target_triggers_a_pulse_and_rearms_the_cooldown() {
        let mut sentry = sentry();
        let mut out = Vec::new();

        sentry.handle(STEP, Vec2::ZERO, &targets_at(100.0), &mut out);

        assert_eq!(
            out,
            vec![Command::CastRing {
                kind: RingKind::Pulse,
                center: Vec2::ZERO,
                max_range_tiles: 3,
                damage: 70,
                stun: Duration::from_secs(1),
            }],
        );

        // The cooldown holds for two seconds even with the enemy camping.
        let mut during_cooldown = Vec::new();
        for _ in 0..39 {
            sentry.handle(STEP, Vec2::ZERO, &targets_at(100.0), &mut during_cooldown);
        }
        assert!(during_cooldown.is_empty());

        sentry.handle(STEP, Vec2::ZERO, &targets_at(100.0), &mut during_cooldown);
        assert_eq!(during_cooldown.len(), 1);
    }

    #[test]
    fn storm_casts_then_reports_the_remaining_cooldown() {
        let mut sentry = sentry();
        let mut out = Vec::new();

        assert!(sentry.storm_ready());
        assert_eq!(sentry.call_storm(Vec2::ZERO, &mut out), StormOutcome::Called);
        assert_eq!(
            out,
            vec![Command::CastRing {
                kind: RingKind::Storm,
                center: Vec2::ZERO,
                max_range_tiles: 5,
                damage: 200,
                stun: Duration::from_secs(1),
            }],
        );

        let outcome = sentry.call_storm(Vec2::ZERO, &mut out);
        assert_eq!(
            outcome,
            StormOutcome::CoolingDown {
                remaining: Duration::from_secs(60),
            },
        );
        assert_eq!(out.len(), 1, "a cooling storm casts nothing");
    }

    #[test]
    fn storm_cooldown_drains_with_handle_ticks() {
        let mut sentry = sentry();
        let mut out = Vec::new();

        let _ = sentry.call_storm(Vec2::ZERO, &mut out);
        sentry.handle(Duration::from_secs(59), Vec2::ZERO, &TargetView::default(), &mut out);
        assert!(!sentry.storm_ready());
        assert_eq!(sentry.storm_remaining(), Duration::from_secs(1));

        sentry.handle(Duration::from_secs(1), Vec2::ZERO, &TargetView::default(), &mut out);
        assert!(sentry.storm_ready());
    }
}
