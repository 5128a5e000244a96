#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Attack decision system that turns trigger pulls into burst commands.
//!
//! The system reads the immutable weapon view, applies the cooldown gate and
//! the backlog guard, rolls the ultimate chance where the weapon kind allows
//! it, and responds exclusively with [`Command::QueueBurst`] batches for the
//! combat state to execute. Randomness comes from a seeded generator so a
//! replayed session reproduces the same bursts.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use volt_barrage_core::{
    aim_direction, BulletSize, BurstKind, Command, PendingShot, ShotAim, WeaponId, WeaponKind,
    WeaponView,
};

/// Tuning knobs for the gatling burst generator.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GatlingTuning {
    /// Damage carried by an ordinary volley shot.
    pub base_damage: u32,
    /// Attack triggers accepted per second; the cooldown is its inverse.
    pub fire_rate: f32,
    /// Shots queued by one ordinary volley.
    pub projectiles_per_shot: u32,
    /// Probability in `[0, 1]` that an ordinary attack rolls an ultimate.
    pub ultimate_trigger_chance: f32,
    /// Shots queued by one ultimate barrage.
    pub ultimate_projectile_count: u32,
    /// Window the ultimate barrage is spread across, in milliseconds.
    pub ultimate_duration_ms: u64,
    /// Half-width of the ultimate spread cone, in degrees.
    pub spread_degrees: f32,
    /// Delay between consecutive volley shots, in milliseconds.
    pub bullet_interval_ms: u64,
    /// Multiplier applied to the base damage for ultimate shots.
    pub ultimate_damage_multiplier: f32,
    /// Probability in `[0, 1]` that an ultimate shot uses the large bullet.
    pub large_bullet_ratio: f32,
    /// Backlog guard: attacks are dropped while more shots than this wait in
    /// the queue. Policy knob, not a derived constant.
    pub max_queued_shots: usize,
}

impl Default for GatlingTuning {
    fn default() -> Self {
        Self {
            base_damage: 50,
            fire_rate: 2.0,
            projectiles_per_shot: 4,
            ultimate_trigger_chance: 0.3,
            ultimate_projectile_count: 210,
            ultimate_duration_ms: 1_500,
            spread_degrees: 15.0,
            bullet_interval_ms: 100,
            ultimate_damage_multiplier: 1.5,
            large_bullet_ratio: 0.5,
            max_queued_shots: 10,
        }
    }
}

impl GatlingTuning {
    /// Delay between consecutive volley shots as a duration.
    #[must_use]
    pub fn bullet_interval(&self) -> Duration {
        Duration::from_millis(self.bullet_interval_ms)
    }

    /// Ultimate barrage window as a duration.
    #[must_use]
    pub fn ultimate_duration(&self) -> Duration {
        Duration::from_millis(self.ultimate_duration_ms)
    }

    /// Cooldown armed after an accepted attack.
    ///
    /// A non-positive fire rate yields a zero cooldown rather than a division
    /// blow-up; the weapon simply accepts every trigger pull.
    #[must_use]
    pub fn attack_cooldown(&self) -> Duration {
        if self.fire_rate > 0.0 {
            Duration::from_secs_f32(1.0 / self.fire_rate)
        } else {
            Duration::ZERO
        }
    }

    /// Damage carried by one ultimate shot.
    #[must_use]
    pub fn ultimate_damage(&self) -> u32 {
        (self.base_damage as f32 * self.ultimate_damage_multiplier) as u32
    }
}

/// Burst decision system holding the tuning surface and the session RNG.
#[derive(Debug)]
pub struct Gunnery {
    tuning: GatlingTuning,
    rng: ChaCha8Rng,
}

impl Gunnery {
    /// Creates a new gunnery system from tuning and a session seed.
    #[must_use]
    pub fn new(tuning: GatlingTuning, rng_seed: u64) -> Self {
        Self {
            tuning,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        }
    }

    /// Read-only access to the tuning surface.
    #[must_use]
    pub fn tuning(&self) -> &GatlingTuning {
        &self.tuning
    }

    /// Handles an ordinary trigger pull for the provided weapon.
    ///
    /// Silently drops the request while the weapon cools down or while the
    /// backlog guard holds; both are ordinary throttling, not errors.
    pub fn on_attack(
        &mut self,
        weapon: WeaponId,
        kind: WeaponKind,
        aim: Vec2,
        weapons: &WeaponView,
        out: &mut Vec<Command>,
    ) {
        let snapshot = weapons.snapshot_for(weapon);
        if snapshot.map_or(false, |snapshot| !snapshot.cooldown_remaining.is_zero()) {
            return;
        }
        if self.backlog_full(weapon, weapons) {
            return;
        }

        let (burst, shots) = match kind {
            WeaponKind::Standard => (BurstKind::Volley, self.volley_shots(aim)),
            WeaponKind::Gatling => {
                if self.rng.gen::<f32>() < self.tuning.ultimate_trigger_chance {
                    (BurstKind::Ultimate { forced: false }, self.barrage_shots())
                } else {
                    (BurstKind::Volley, self.volley_shots(aim))
                }
            }
        };

        out.push(Command::QueueBurst {
            weapon,
            kind: burst,
            shots,
            cooldown: Some(self.tuning.attack_cooldown()),
        });
    }

    /// Handles the special-attack action, forcing an ultimate barrage.
    ///
    /// Independent of the attack cooldown and gated only by the backlog
    /// guard. Returns whether a barrage was actually queued.
    pub fn on_special_attack(
        &mut self,
        weapon: WeaponId,
        kind: WeaponKind,
        weapons: &WeaponView,
        out: &mut Vec<Command>,
    ) -> bool {
        if kind != WeaponKind::Gatling {
            return false;
        }
        if self.backlog_full(weapon, weapons) {
            return false;
        }

        let shots = self.barrage_shots();
        out.push(Command::QueueBurst {
            weapon,
            kind: BurstKind::Ultimate { forced: true },
            shots,
            cooldown: None,
        });
        true
    }

    fn backlog_full(&self, weapon: WeaponId, weapons: &WeaponView) -> bool {
        weapons
            .snapshot_for(weapon)
            .map_or(0, |snapshot| snapshot.queued_shots)
            > self.tuning.max_queued_shots
    }

    /// Builds an ordinary volley: fixed direction frozen at trigger time.
    fn volley_shots(&self, aim: Vec2) -> Vec<PendingShot> {
        let direction = aim_direction(aim);
        let interval = self.tuning.bullet_interval();

        (0..self.tuning.projectiles_per_shot)
            .map(|index| PendingShot {
                damage: self.tuning.base_damage,
                fire_offset: interval * index,
                aim: ShotAim::Fixed(direction),
                bullet: BulletSize::Small,
            })
            .collect()
    }

    /// Builds an ultimate barrage: spread offsets resolved at fire time.
    ///
    /// Each shot draws its spread angle once here; only the base direction is
    /// re-sampled against the live aim when the shot fires.
    fn barrage_shots(&mut self) -> Vec<PendingShot> {
        let count = self.tuning.ultimate_projectile_count;
        if count == 0 {
            return Vec::new();
        }

        let spacing = self.tuning.ultimate_duration() / count;
        let damage = self.tuning.ultimate_damage();

        (0..count)
            .map(|index| PendingShot {
                damage,
                fire_offset: spacing * index,
                aim: ShotAim::Spread {
                    degrees: self.sample_spread(),
                },
                bullet: self.sample_bullet(),
            })
            .collect()
    }

    fn sample_spread(&mut self) -> f32 {
        let spread = self.tuning.spread_degrees;
        if spread > 0.0 {
            self.rng.gen_range(-spread..spread)
        } else {
            0.0
        }
    }

    fn sample_bullet(&mut self) -> BulletSize {
        if self.rng.gen::<f32>() < self.tuning.large_bullet_ratio {
            BulletSize::Large
        } else {
            BulletSize::Small
        }
    }
}
