//! Per-weapon runtime state and the delayed-burst scheduler.

use std::collections::VecDeque;
use std::time::Duration;

use volt_barrage_core::{
    aim_direction, rotate_degrees, Event, PendingShot, ShotAim, SoundCue, WeaponId,
};

use crate::ProjectileTuning;

/// Runtime state tracked for a single weapon instance.
///
/// Created lazily the first time a command touches the weapon and destroyed
/// only by an explicit cleanup command.
#[derive(Debug, Default)]
pub(crate) struct WeaponState {
    pub(crate) cooldown: Duration,
    pub(crate) burst_clock: Duration,
    pub(crate) queue: VecDeque<PendingShot>,
    pub(crate) destructive: bool,
}

impl WeaponState {
    /// Appends a burst to the queue and restarts the burst clock.
    ///
    /// Shots already waiting keep their old offsets, so a burst queued while
    /// another is draining pushes the remainder later.
    pub(crate) fn begin_burst(&mut self, shots: Vec<PendingShot>, cooldown: Option<Duration>) {
        self.burst_clock = Duration::ZERO;
        self.queue.extend(shots);
        if let Some(cooldown) = cooldown {
            self.cooldown = cooldown;
        }
    }

    /// Advances the cooldown and burst clock, firing every due shot.
    pub(crate) fn advance(
        &mut self,
        weapon: WeaponId,
        dt: Duration,
        origin: glam::Vec2,
        aim: glam::Vec2,
        projectile: &ProjectileTuning,
        out_events: &mut Vec<Event>,
    ) {
        self.cooldown = self.cooldown.saturating_sub(dt);

        if self.queue.is_empty() {
            return;
        }

        self.burst_clock = self.burst_clock.saturating_add(dt);

        while self
            .queue
            .front()
            .map_or(false, |shot| shot.fire_offset <= self.burst_clock)
        {
            let Some(shot) = self.queue.pop_front() else {
                break;
            };

            let direction = match shot.aim {
                ShotAim::Fixed(direction) => direction,
                ShotAim::Spread { degrees } => rotate_degrees(aim_direction(aim), degrees),
            };

            out_events.push(Event::ProjectileSpawned {
                weapon,
                origin,
                direction,
                speed: projectile.speed,
                damage: shot.damage,
                max_distance: projectile.max_distance(),
                stun: projectile.stun(),
                bullet: shot.bullet,
                destructive: self.destructive,
            });
            out_events.push(Event::SoundRequested {
                cue: SoundCue::GatlingShot,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use volt_barrage_core::BulletSize;

    fn shot(offset_ms: u64) -> PendingShot {
        PendingShot {
            damage: 10,
            fire_offset: Duration::from_millis(offset_ms),
            aim: ShotAim::Fixed(Vec2::X),
            bullet: BulletSize::Small,
        }
    }

    #[test]
    fn begin_burst_restarts_clock_and_keeps_existing_shots() {
        let mut state = WeaponState::default();
        state.begin_burst(vec![shot(0), shot(100)], Some(Duration::from_millis(500)));
        state.burst_clock = Duration::from_millis(80);

        state.begin_burst(vec![shot(0)], None);

        assert_eq!(state.burst_clock, Duration::ZERO);
        assert_eq!(state.queue.len(), 3);
        assert_eq!(state.cooldown, Duration::from_millis(500));
    }

    #[test]
    fn cooldown_clamps_at_zero() {
        let mut state = WeaponState {
            cooldown: Duration::from_millis(30),
            ..WeaponState::default()
        };

        let mut events = Vec::new();
        state.advance(
            WeaponId::new(1),
            Duration::from_millis(50),
            Vec2::ZERO,
            Vec2::X,
            &ProjectileTuning::default(),
            &mut events,
        );

        assert_eq!(state.cooldown, Duration::ZERO);
        assert!(events.is_empty());
    }

    #[test]
    fn burst_clock_only_advances_while_shots_wait() {
        let mut state = WeaponState::default();
        let mut events = Vec::new();

        state.advance(
            WeaponId::new(1),
            Duration::from_millis(400),
            Vec2::ZERO,
            Vec2::X,
            &ProjectileTuning::default(),
            &mut events,
        );

        assert_eq!(state.burst_clock, Duration::ZERO);
    }
}
