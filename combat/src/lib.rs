#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative combat runtime state for Volt Barrage.
//!
//! [`CombatState`] owns every per-weapon burst scheduler and every active
//! ring. The host and the decision systems submit [`Command`] values and the
//! state executes them deterministically through [`apply`], broadcasting
//! [`Event`] values that the host turns into projectiles, damage, stuns,
//! sounds, and HUD feedback.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use volt_barrage_core::{
    BurstKind, Command, Event, FeedbackKind, RingKind, SoundCue, WeaponId, TILE_LENGTH,
};

mod rings;
mod weapons;

use rings::RingRegistry;
use weapons::WeaponState;

/// Screen-flash intensity accompanying an ultimate barrage.
const BARRAGE_FLASH_ALPHA: f32 = 0.3;
/// Screen-flash intensity accompanying a storm ring.
const STORM_FLASH_ALPHA: f32 = 0.5;

/// Tuning for the projectiles fired out of burst queues.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Travel speed in world units per tick.
    pub speed: f32,
    /// Maximum travel distance expressed in whole tiles.
    pub attack_range_tiles: u32,
    /// Stun applied to struck targets, in milliseconds.
    pub stun_ms: u64,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 12.0,
            attack_range_tiles: 15,
            stun_ms: 1_500,
        }
    }
}

impl ProjectileTuning {
    /// Maximum travel distance converted to world units.
    #[must_use]
    pub fn max_distance(&self) -> f32 {
        self.attack_range_tiles as f32 * TILE_LENGTH
    }

    /// Stun converted to a duration.
    #[must_use]
    pub fn stun(&self) -> Duration {
        Duration::from_millis(self.stun_ms)
    }
}

/// Tuning for the ring lifecycle shared by every activation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RingTuning {
    /// Length of the expanding phase, in milliseconds.
    pub expand_ms: u64,
    /// Length of the sustaining phase, in milliseconds.
    pub sustain_ms: u64,
    /// Length of the fading phase, in milliseconds.
    pub fade_ms: u64,
    /// Interval between damage sweeps, in milliseconds.
    pub damage_check_ms: u64,
}

impl Default for RingTuning {
    fn default() -> Self {
        Self {
            expand_ms: 250,
            sustain_ms: 100,
            fade_ms: 150,
            damage_check_ms: 50,
        }
    }
}

impl RingTuning {
    /// Expanding-phase length as a duration.
    #[must_use]
    pub fn expand(&self) -> Duration {
        Duration::from_millis(self.expand_ms)
    }

    /// Sustaining-phase length as a duration.
    #[must_use]
    pub fn sustain(&self) -> Duration {
        Duration::from_millis(self.sustain_ms)
    }

    /// Fading-phase length as a duration.
    #[must_use]
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    /// Damage-sweep interval as a duration.
    #[must_use]
    pub fn damage_check(&self) -> Duration {
        Duration::from_millis(self.damage_check_ms)
    }
}

/// Aggregated tuning owned by the combat state.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Projectile parameters applied when shots fire.
    pub projectile: ProjectileTuning,
    /// Lifecycle parameters applied to every ring.
    pub ring: RingTuning,
}

/// Represents the authoritative combat runtime state.
///
/// Constructed explicitly by the host at session start and dropped at
/// session end; nothing in this crate holds global state.
#[derive(Debug)]
pub struct CombatState {
    tuning: CombatTuning,
    weapons: BTreeMap<WeaponId, WeaponState>,
    rings: RingRegistry,
}

impl CombatState {
    /// Creates a new combat state using the supplied tuning.
    #[must_use]
    pub fn new(tuning: CombatTuning) -> Self {
        Self {
            tuning,
            weapons: BTreeMap::new(),
            rings: RingRegistry::new(),
        }
    }
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(CombatTuning::default())
    }
}

/// Applies the provided command to the state, mutating it deterministically.
pub fn apply(state: &mut CombatState, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::QueueBurst {
            weapon,
            kind,
            shots,
            cooldown,
        } => {
            let count = shots.len();
            state
                .weapons
                .entry(weapon)
                .or_default()
                .begin_burst(shots, cooldown);

            out_events.push(Event::BurstQueued {
                weapon,
                kind,
                shots: count,
            });

            if let BurstKind::Ultimate { forced } = kind {
                out_events.push(Event::SoundRequested {
                    cue: if forced {
                        SoundCue::Thunder
                    } else {
                        SoundCue::ThunderSmall
                    },
                });
                out_events.push(Event::FeedbackRequested {
                    kind: if forced {
                        FeedbackKind::UltimateForced
                    } else {
                        FeedbackKind::UltimateUnleashed
                    },
                });
                out_events.push(Event::ScreenFlashRequested {
                    alpha: BARRAGE_FLASH_ALPHA,
                });
            }
        }
        Command::AdvanceWeapon {
            weapon,
            dt,
            origin,
            aim,
        } => {
            let projectile = &state.tuning.projectile;
            if let Some(weapon_state) = state.weapons.get_mut(&weapon) {
                weapon_state.advance(weapon, dt, origin, aim, projectile, out_events);
            }
        }
        Command::SetDestructiveMode { weapon, enabled } => {
            state.weapons.entry(weapon).or_default().destructive = enabled;
        }
        Command::CleanupWeapon { weapon } => {
            let _ = state.weapons.remove(&weapon);
        }
        Command::CastRing {
            kind,
            center,
            max_range_tiles,
            damage,
            stun,
        } => {
            let ring = state
                .rings
                .spawn(kind, center, max_range_tiles, damage, stun);

            out_events.push(Event::RingSpawned {
                ring,
                kind,
                center,
                max_range_tiles,
            });

            match kind {
                RingKind::Pulse => {
                    out_events.push(Event::SoundRequested {
                        cue: SoundCue::ThunderSmall,
                    });
                }
                RingKind::Storm => {
                    out_events.push(Event::SoundRequested {
                        cue: SoundCue::Thunder,
                    });
                    out_events.push(Event::ScreenFlashRequested {
                        alpha: STORM_FLASH_ALPHA,
                    });
                    out_events.push(Event::FeedbackRequested {
                        kind: FeedbackKind::StormCalled,
                    });
                }
            }
        }
        Command::AdvanceRings { dt, targets } => {
            state
                .rings
                .advance(dt, &state.tuning.ring, &targets, out_events);
        }
        Command::ClearRings => {
            state.rings.clear();
        }
    }
}

/// Query functions that provide read-only access to the combat state.
pub mod query {
    use super::{CombatState, RingRegistry};
    use glam::Vec2;
    use volt_barrage_core::{RingId, RingKind, RingPhase, WeaponId, WeaponSnapshot, WeaponView};

    /// Captures a read-only view of every weapon with live runtime state.
    #[must_use]
    pub fn weapon_view(state: &CombatState) -> WeaponView {
        let snapshots = state
            .weapons
            .iter()
            .map(|(weapon, weapon_state)| WeaponSnapshot {
                weapon: *weapon,
                cooldown_remaining: weapon_state.cooldown,
                queued_shots: weapon_state.queue.len(),
                destructive: weapon_state.destructive,
            })
            .collect();
        WeaponView::from_snapshots(snapshots)
    }

    /// Reports whether the weapon's projectiles break obstacles.
    ///
    /// Unknown weapons report `false`; querying never creates state.
    #[must_use]
    pub fn destructive_mode(state: &CombatState, weapon: WeaponId) -> bool {
        state
            .weapons
            .get(&weapon)
            .map_or(false, |weapon_state| weapon_state.destructive)
    }

    /// Captures a read-only view of every active ring.
    #[must_use]
    pub fn ring_view(state: &CombatState) -> RingView {
        RingView::from_registry(&state.rings)
    }

    /// Number of rings currently tracked by the registry.
    #[must_use]
    pub fn active_ring_count(state: &CombatState) -> usize {
        state.rings.len()
    }

    /// Read-only snapshot describing every active ring.
    #[derive(Clone, Debug, Default)]
    pub struct RingView {
        snapshots: Vec<RingSnapshot>,
    }

    impl RingView {
        fn from_registry(registry: &RingRegistry) -> Self {
            let snapshots = registry
                .iter()
                .map(|ring| RingSnapshot {
                    ring: ring.id(),
                    kind: ring.kind(),
                    phase: ring.phase(),
                    radius: ring.radius(),
                    center: ring.center(),
                    max_range_tiles: ring.max_range_tiles(),
                })
                .collect();
            Self { snapshots }
        }

        /// Iterator over the captured ring snapshots.
        pub fn iter(&self) -> impl Iterator<Item = &RingSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<RingSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single ring used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct RingSnapshot {
        /// Handle allocated for the activation.
        pub ring: RingId,
        /// Classification of the activation.
        pub kind: RingKind,
        /// Lifecycle phase currently active.
        pub phase: RingPhase,
        /// Current radius in world units.
        pub radius: f32,
        /// Center of the discharge in world units.
        pub center: Vec2,
        /// Maximum radius expressed in whole tiles.
        pub max_range_tiles: u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use volt_barrage_core::{BulletSize, BurstKind, PendingShot, ShotAim, TargetView};

    fn volley_shot(offset_ms: u64, damage: u32) -> PendingShot {
        PendingShot {
            damage,
            fire_offset: Duration::from_millis(offset_ms),
            aim: ShotAim::Fixed(Vec2::X),
            bullet: BulletSize::Small,
        }
    }

    #[test]
    fn queue_burst_arms_cooldown_and_reports_depth() {
        let mut state = CombatState::default();
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::QueueBurst {
                weapon: WeaponId::new(7),
                kind: BurstKind::Volley,
                shots: vec![volley_shot(0, 50), volley_shot(100, 50)],
                cooldown: Some(Duration::from_millis(500)),
            },
            &mut events,
        );

        let view = query::weapon_view(&state);
        let snapshot = view.snapshot_for(WeaponId::new(7)).expect("snapshot");
        assert_eq!(snapshot.queued_shots, 2);
        assert_eq!(snapshot.cooldown_remaining, Duration::from_millis(500));
        assert_eq!(
            events,
            vec![Event::BurstQueued {
                weapon: WeaponId::new(7),
                kind: BurstKind::Volley,
                shots: 2,
            }],
        );
    }

    #[test]
    fn forced_ultimate_leaves_cooldown_untouched() {
        let mut state = CombatState::default();
        let mut events = Vec::new();
        let weapon = WeaponId::new(3);

        apply(
            &mut state,
            Command::QueueBurst {
                weapon,
                kind: BurstKind::Volley,
                shots: vec![volley_shot(0, 50)],
                cooldown: Some(Duration::from_millis(500)),
            },
            &mut events,
        );
        apply(
            &mut state,
            Command::QueueBurst {
                weapon,
                kind: BurstKind::Ultimate { forced: true },
                shots: vec![volley_shot(0, 75)],
                cooldown: None,
            },
            &mut events,
        );

        let view = query::weapon_view(&state);
        let snapshot = view.snapshot_for(weapon).expect("snapshot");
        assert_eq!(snapshot.cooldown_remaining, Duration::from_millis(500));
    }

    #[test]
    fn ultimate_bursts_carry_cosmetic_events() {
        let mut state = CombatState::default();
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::QueueBurst {
                weapon: WeaponId::new(1),
                kind: BurstKind::Ultimate { forced: false },
                shots: vec![volley_shot(0, 75)],
                cooldown: Some(Duration::from_millis(500)),
            },
            &mut events,
        );

        assert!(events.contains(&Event::SoundRequested {
            cue: SoundCue::ThunderSmall
        }));
        assert!(events.contains(&Event::FeedbackRequested {
            kind: FeedbackKind::UltimateUnleashed
        }));
        assert!(events.contains(&Event::ScreenFlashRequested {
            alpha: BARRAGE_FLASH_ALPHA
        }));
    }

    #[test]
    fn advancing_unknown_weapon_emits_nothing() {
        let mut state = CombatState::default();
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::AdvanceWeapon {
                weapon: WeaponId::new(99),
                dt: Duration::from_millis(50),
                origin: Vec2::ZERO,
                aim: Vec2::X,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert!(query::weapon_view(&state).into_vec().is_empty());
    }

    #[test]
    fn destructive_mode_defaults_to_false_and_survives_toggles() {
        let mut state = CombatState::default();
        let mut events = Vec::new();
        let weapon = WeaponId::new(11);

        assert!(!query::destructive_mode(&state, weapon));

        apply(
            &mut state,
            Command::SetDestructiveMode {
                weapon,
                enabled: true,
            },
            &mut events,
        );
        assert!(query::destructive_mode(&state, weapon));
    }

    #[test]
    fn cleanup_discards_state_and_queries_return_defaults() {
        let mut state = CombatState::default();
        let mut events = Vec::new();
        let weapon = WeaponId::new(11);

        apply(
            &mut state,
            Command::SetDestructiveMode {
                weapon,
                enabled: true,
            },
            &mut events,
        );
        apply(
            &mut state,
            Command::QueueBurst {
                weapon,
                kind: BurstKind::Volley,
                shots: vec![volley_shot(0, 50)],
                cooldown: Some(Duration::from_millis(500)),
            },
            &mut events,
        );
        apply(&mut state, Command::CleanupWeapon { weapon }, &mut events);

        assert!(!query::destructive_mode(&state, weapon));
        assert!(query::weapon_view(&state).snapshot_for(weapon).is_none());
    }

    #[test]
    fn cast_ring_emits_kind_specific_cosmetics() {
        let mut state = CombatState::default();
        let mut pulse_events = Vec::new();
        let mut storm_events = Vec::new();

        apply(
            &mut state,
            Command::CastRing {
                kind: RingKind::Pulse,
                center: Vec2::ZERO,
                max_range_tiles: 3,
                damage: 70,
                stun: Duration::from_secs(1),
            },
            &mut pulse_events,
        );
        apply(
            &mut state,
            Command::CastRing {
                kind: RingKind::Storm,
                center: Vec2::ZERO,
                max_range_tiles: 5,
                damage: 200,
                stun: Duration::from_secs(1),
            },
            &mut storm_events,
        );

        assert!(pulse_events.contains(&Event::SoundRequested {
            cue: SoundCue::ThunderSmall
        }));
        assert!(!pulse_events
            .iter()
            .any(|event| matches!(event, Event::ScreenFlashRequested { .. })));

        assert!(storm_events.contains(&Event::SoundRequested {
            cue: SoundCue::Thunder
        }));
        assert!(storm_events.contains(&Event::ScreenFlashRequested {
            alpha: STORM_FLASH_ALPHA
        }));
        assert!(storm_events.contains(&Event::FeedbackRequested {
            kind: FeedbackKind::StormCalled
        }));
        assert_eq!(query::active_ring_count(&state), 2);
    }

    #[test]
    fn clear_rings_empties_the_registry() {
        let mut state = CombatState::default();
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::CastRing {
                kind: RingKind::Pulse,
                center: Vec2::ZERO,
                max_range_tiles: 3,
                damage: 70,
                stun: Duration::from_secs(1),
            },
            &mut events,
        );
        apply(&mut state, Command::ClearRings, &mut events);

        assert_eq!(query::active_ring_count(&state), 0);

        apply(
            &mut state,
            Command::AdvanceRings {
                dt: Duration::from_millis(50),
                targets: TargetView::default(),
            },
            &mut events,
        );
        assert_eq!(query::active_ring_count(&state), 0);
    }
}
