#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Volt Barrage combat engine.
//!
//! This crate defines the message surface that connects the host adapter,
//! the authoritative combat state, and pure decision systems. The host and
//! the systems submit [`Command`] values describing desired mutations, the
//! combat state executes those commands via its `apply` entry point, and
//! then broadcasts [`Event`] values for the host to act on (spawning
//! projectiles, applying damage, playing sounds). Systems consume immutable
//! snapshot views and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Side length of one world tile expressed in world units.
///
/// Ranges configured in whole tiles are converted through this constant;
/// an expanding ring's maximum radius covers half a tile per range step.
pub const TILE_LENGTH: f32 = 64.0;

/// Normalizes an aim vector, falling back to a rightward unit vector.
///
/// A zero-length aim (cursor resting exactly on the firer) would otherwise
/// produce a NaN direction, so the degenerate case snaps to `+X`.
#[must_use]
pub fn aim_direction(aim: Vec2) -> Vec2 {
    if aim.length_squared() > 0.0 {
        aim.normalize()
    } else {
        Vec2::X
    }
}

/// Rotates a direction vector by the provided angle in degrees.
///
/// Positive angles rotate counter-clockwise in the standard math
/// orientation; spread offsets are expressed in degrees because that is the
/// unit the tuning surface uses.
#[must_use]
pub fn rotate_degrees(direction: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(direction)
}

/// Opaque identifier the host assigns to one weapon instance.
///
/// The host owns the mapping between its weapon objects and these keys and
/// must retire a key with [`Command::CleanupWeapon`] when the weapon is
/// discarded; runtime state is never collected automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(u64);

impl WeaponId {
    /// Creates a new weapon identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Unique identifier the host assigns to one damageable target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a new target identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle allocated by the combat state for one ring activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RingId(u32);

impl RingId {
    /// Creates a new ring identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Visual variant tag carried by every fired projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletSize {
    /// Standard projectile used by ordinary volleys.
    Small,
    /// Oversized projectile mixed into ultimate barrages.
    Large,
}

impl BulletSize {
    /// Sprite scale factor the host applies when drawing the projectile.
    #[must_use]
    pub const fn sprite_scale(self) -> f32 {
        match self {
            Self::Small => 2.0,
            Self::Large => 4.0,
        }
    }
}

/// How a pending shot resolves its direction when it fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShotAim {
    /// Direction frozen when the burst was queued; the shot flies straight.
    Fixed(Vec2),
    /// Relative spread offset applied to the live aim at the moment the
    /// shot fires, producing a sweeping spray that tracks the cursor.
    Spread {
        /// Angular offset from the live aim, in degrees.
        degrees: f32,
    },
}

/// One projectile waiting inside a weapon's burst queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingShot {
    /// Damage applied by the projectile the shot spawns.
    pub damage: u32,
    /// Offset from the start of the burst at which the shot fires.
    pub fire_offset: Duration,
    /// Direction policy resolved when the shot fires.
    pub aim: ShotAim,
    /// Visual variant of the spawned projectile.
    pub bullet: BulletSize,
}

/// Classification of a queued burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BurstKind {
    /// Ordinary fixed-direction volley.
    Volley,
    /// High-volume spread barrage.
    Ultimate {
        /// Whether the barrage was forced by the special-attack action
        /// rather than rolled on an ordinary attack.
        forced: bool,
    },
}

/// Burst-generation strategy attached to a weapon instance by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Fires plain volleys only; never rolls or accepts ultimates.
    Standard,
    /// Rapid-fire weapon that can roll an ultimate barrage on attack and
    /// supports the forced special-attack barrage.
    Gatling,
}

/// Classification of a ring activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingKind {
    /// Standard automatic discharge around the wearer.
    Pulse,
    /// Oversized ultimate discharge with its own long cooldown.
    Storm,
}

/// Lifecycle phase of an active ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingPhase {
    /// Radius grows linearly from zero toward the maximum.
    Expanding,
    /// Radius holds at the maximum.
    Sustaining,
    /// Radius holds while the visual fades; expiry follows.
    Fading,
}

/// Audio cue the host should play in response to a [`Event::SoundRequested`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Single projectile leaving the barrel.
    GatlingShot,
    /// Rolled ultimate barrage or standard ring discharge.
    ThunderSmall,
    /// Forced barrage or storm ring discharge.
    Thunder,
}

impl SoundCue {
    /// Name of the host audio bank entry backing the cue.
    #[must_use]
    pub const fn host_cue(self) -> &'static str {
        match self {
            Self::GatlingShot => "gatling_shot",
            Self::ThunderSmall => "thunder_small",
            Self::Thunder => "thunder",
        }
    }
}

/// HUD feedback the host should surface for a [`Event::FeedbackRequested`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    /// An ordinary attack rolled into an ultimate barrage.
    UltimateUnleashed,
    /// The special-attack action forced an ultimate barrage.
    UltimateForced,
    /// A storm ring was called down.
    StormCalled,
}

impl FeedbackKind {
    /// Display priority the host HUD attaches to the message.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::UltimateUnleashed => 2,
            Self::UltimateForced => 1,
            Self::StormCalled => 2,
        }
    }
}

/// Commands that express all permissible combat-state mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the weapon's burst clock with a fresh burst of shots.
    QueueBurst {
        /// Weapon whose queue receives the burst.
        weapon: WeaponId,
        /// Classification used for bookkeeping and cosmetic events.
        kind: BurstKind,
        /// Shots ordered by non-decreasing fire offset.
        shots: Vec<PendingShot>,
        /// Attack cooldown to arm, or `None` to leave the cooldown
        /// untouched (forced specials never consume it).
        cooldown: Option<Duration>,
    },
    /// Advances one weapon's cooldown and burst clock by the frame delta.
    AdvanceWeapon {
        /// Weapon to advance; unknown keys are ignored.
        weapon: WeaponId,
        /// Simulated time elapsed since the previous advance.
        dt: Duration,
        /// Live muzzle position supplied by the host this frame.
        origin: Vec2,
        /// Live aim vector supplied by the host this frame.
        aim: Vec2,
    },
    /// Toggles whether the weapon's projectiles break obstacles.
    SetDestructiveMode {
        /// Weapon whose flag changes; state is created on first use.
        weapon: WeaponId,
        /// New value of the destructive flag.
        enabled: bool,
    },
    /// Discards all runtime state held for the weapon.
    CleanupWeapon {
        /// Weapon whose state is released.
        weapon: WeaponId,
    },
    /// Spawns a new ring activation.
    CastRing {
        /// Classification of the activation.
        kind: RingKind,
        /// Center of the discharge in world units.
        center: Vec2,
        /// Maximum radius expressed in whole tiles.
        max_range_tiles: u32,
        /// Damage applied once to each target caught by the ring.
        damage: u32,
        /// Stun applied alongside the damage.
        stun: Duration,
    },
    /// Advances every active ring by the frame delta.
    AdvanceRings {
        /// Simulated time elapsed since the previous advance.
        dt: Duration,
        /// Snapshot of damageable targets observed by the host this frame.
        targets: TargetView,
    },
    /// Unconditionally drops every active ring (context reset).
    ClearRings,
}

/// Events broadcast by the combat state after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a burst entered a weapon's queue.
    BurstQueued {
        /// Weapon whose queue received the burst.
        weapon: WeaponId,
        /// Classification of the queued burst.
        kind: BurstKind,
        /// Number of shots appended.
        shots: usize,
    },
    /// Instructs the host to spawn one projectile.
    ProjectileSpawned {
        /// Weapon that fired the shot.
        weapon: WeaponId,
        /// Muzzle position in world units.
        origin: Vec2,
        /// Unit direction of travel.
        direction: Vec2,
        /// Travel speed in world units per tick.
        speed: f32,
        /// Damage applied on impact.
        damage: u32,
        /// Distance after which the projectile expires.
        max_distance: f32,
        /// Stun applied to struck targets.
        stun: Duration,
        /// Visual variant of the projectile.
        bullet: BulletSize,
        /// Whether the projectile breaks obstacles instead of passing
        /// through them.
        destructive: bool,
    },
    /// Asks the host to play an audio cue.
    SoundRequested {
        /// Cue to play.
        cue: SoundCue,
    },
    /// Asks the host to surface a HUD message.
    FeedbackRequested {
        /// Message classification carrying its display priority.
        kind: FeedbackKind,
    },
    /// Asks the host to flash the screen.
    ScreenFlashRequested {
        /// Flash intensity in the `[0, 1]` range.
        alpha: f32,
    },
    /// Confirms that a ring activation started.
    RingSpawned {
        /// Handle allocated for the activation.
        ring: RingId,
        /// Classification of the activation.
        kind: RingKind,
        /// Center of the discharge in world units.
        center: Vec2,
        /// Maximum radius expressed in whole tiles.
        max_range_tiles: u32,
    },
    /// Announces that a ring moved to the next lifecycle phase.
    RingPhaseChanged {
        /// Ring whose phase changed.
        ring: RingId,
        /// Phase that became active.
        phase: RingPhase,
    },
    /// Announces that a ring finished fading and left the registry.
    RingFaded {
        /// Ring that expired.
        ring: RingId,
    },
    /// Instructs the host to apply damage to a target.
    DamageDealt {
        /// Target to damage.
        target: TargetId,
        /// Damage amount.
        amount: u32,
    },
    /// Instructs the host to stun a target.
    StunApplied {
        /// Target to stun.
        target: TargetId,
        /// Stun duration.
        duration: Duration,
    },
}

/// Immutable representation of one weapon's runtime state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSnapshot {
    /// Weapon the snapshot describes.
    pub weapon: WeaponId,
    /// Attack cooldown still to elapse; zero means ready.
    pub cooldown_remaining: Duration,
    /// Number of shots waiting in the burst queue.
    pub queued_shots: usize,
    /// Whether the weapon's projectiles break obstacles.
    pub destructive: bool,
}

/// Read-only snapshot describing every weapon with live runtime state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeaponView {
    snapshots: Vec<WeaponSnapshot>,
}

impl WeaponView {
    /// Creates a new weapon view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<WeaponSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.weapon);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &WeaponSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided weapon, if any.
    #[must_use]
    pub fn snapshot_for(&self, weapon: WeaponId) -> Option<&WeaponSnapshot> {
        self.snapshots
            .binary_search_by_key(&weapon, |snapshot| snapshot.weapon)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<WeaponSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of one damageable target used for hit tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSnapshot {
    /// Identifier the host assigned to the target.
    pub id: TargetId,
    /// Position of the target in world units.
    pub position: Vec2,
}

/// Read-only snapshot of the damageable targets sharing a spatial context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetView {
    snapshots: Vec<TargetSnapshot>,
}

impl TargetView {
    /// Creates a new target view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TargetSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether the view contains no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TargetSnapshot> {
        self.snapshots
    }
}
