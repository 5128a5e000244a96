use std::time::Duration;

use glam::Vec2;
use volt_barrage_combat::{self as combat, CombatState};
use volt_barrage_core::{
    BulletSize, BurstKind, Command, Event, PendingShot, RingKind, ShotAim, TargetId,
    TargetSnapshot, TargetView, WeaponId,
};

fn scripted_commands() -> Vec<Command> {
    let weapon = WeaponId::new(1);
    let targets = TargetView::from_snapshots(vec![
        TargetSnapshot {
            id: TargetId::new(1),
            position: Vec2::new(30.0, 0.0),
        },
        TargetSnapshot {
            id: TargetId::new(2),
            position: Vec2::new(0.0, 70.0),
        },
    ]);

    let mut script = vec![
        Command::SetDestructiveMode {
            weapon,
            enabled: true,
        },
        Command::QueueBurst {
            weapon,
            kind: BurstKind::Volley,
            shots: (0..4)
                .map(|index| PendingShot {
                    damage: 50,
                    fire_offset: Duration::from_millis(100) * index,
                    aim: ShotAim::Fixed(Vec2::X),
                    bullet: BulletSize::Small,
                })
                .collect(),
            cooldown: Some(Duration::from_millis(500)),
        },
        Command::CastRing {
            kind: RingKind::Pulse,
            center: Vec2::ZERO,
            max_range_tiles: 3,
            damage: 70,
            stun: Duration::from_secs(1),
        },
    ];

    for step in 0..12_u32 {
        let aim = if step % 2 == 0 { Vec2::X } else { Vec2::Y };
        script.push(Command::AdvanceWeapon {
            weapon,
            dt: Duration::from_millis(50),
            origin: Vec2::ZERO,
            aim,
        });
        script.push(Command::AdvanceRings {
            dt: Duration::from_millis(50),
            targets: targets.clone(),
        });
    }

    script.push(Command::CleanupWeapon { weapon });
    script
}

fn replay(commands: Vec<Command>) -> Vec<Event> {
    let mut state = CombatState::default();
    let mut events = Vec::new();
    for command in commands {
        combat::apply(&mut state, command, &mut events);
    }
    events
}

#[test]
fn identical_scripts_produce_identical_event_streams() {
    let script = scripted_commands();
    let first = replay(script.clone());
    let second = replay(script);

    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn replay_accounts_for_every_shot_and_sweep() {
    let events = replay(scripted_commands());

    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileSpawned { .. }))
        .count();
    assert_eq!(spawned, 4, "every queued shot must eventually fire");

    let destructive_flags: Vec<bool> = events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileSpawned { destructive, .. } => Some(*destructive),
            _ => None,
        })
        .collect();
    assert_eq!(destructive_flags, vec![true; 4]);

    let damaged: Vec<TargetId> = events
        .iter()
        .filter_map(|event| match event {
            Event::DamageDealt { target, .. } => Some(*target),
            _ => None,
        })
        .collect();
    assert_eq!(damaged, vec![TargetId::new(1), TargetId::new(2)]);
}
