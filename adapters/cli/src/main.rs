#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a scripted Volt Barrage skirmish.
//!
//! The driver stands in for a host game: it feeds live aim and target
//! snapshots into the decision systems each frame, pumps the resulting
//! commands through the combat state, and narrates the event stream the
//! host would otherwise turn into projectiles, damage, and effects.

mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use volt_barrage_combat::{self as combat, query, CombatState};
use volt_barrage_core::{
    rotate_degrees, BurstKind, Command, Event, TargetId, TargetSnapshot, TargetView, WeaponId,
    WeaponKind,
};
use volt_barrage_system_gunnery::Gunnery;
use volt_barrage_system_sentry::{Sentry, StormOutcome};

/// Nominal 60 Hz frame delta.
const FRAME: Duration = Duration::from_micros(16_667);
/// Weapon key the skirmish assigns to its single gatling.
const GATLING: WeaponId = WeaponId::new(1);
/// Frame on which the script forces the special attack.
const SPECIAL_FRAME: u32 = 120;
/// Frame on which the script calls the sentry storm.
const STORM_FRAME: u32 = 240;

/// Command-line options for the headless skirmish driver.
#[derive(Debug, Parser)]
#[command(name = "volt-barrage", about = "Runs a scripted Volt Barrage skirmish")]
struct Args {
    /// Weapon tuning file; built-in defaults apply when omitted or broken.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the burst generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Number of frames to simulate at 60 Hz.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Optional file receiving a copy of the narrated event log.
    #[arg(long)]
    log: Option<PathBuf>,
}

/// Running totals accumulated over the whole skirmish.
#[derive(Debug, Default)]
struct Tally {
    bursts: usize,
    ultimates: usize,
    projectiles: usize,
    rings: usize,
    damage: u64,
    stuns: usize,
    sounds: usize,
}

impl Tally {
    fn absorb(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::BurstQueued { kind, .. } => {
                    self.bursts += 1;
                    if matches!(kind, BurstKind::Ultimate { .. }) {
                        self.ultimates += 1;
                    }
                }
                Event::ProjectileSpawned { .. } => self.projectiles += 1,
                Event::RingSpawned { .. } => self.rings += 1,
                Event::DamageDealt { amount, .. } => self.damage += u64::from(*amount),
                Event::StunApplied { .. } => self.stuns += 1,
                Event::SoundRequested { .. } => self.sounds += 1,
                _ => {}
            }
        }
    }
}

/// Entry point for the Volt Barrage command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let weapons_file = config::load_or_default(args.config.as_deref());

    let mut state = CombatState::new(weapons_file.combat_tuning());
    let mut gunnery = Gunnery::new(weapons_file.gatling.clone(), args.seed);
    let mut sentry = Sentry::new(weapons_file.sentry.clone());

    let wearer = Vec2::ZERO;
    let mut tally = Tally::default();
    let mut log = Vec::new();

    // The skirmish gatling runs in destructive mode throughout.
    let mut events = Vec::new();
    combat::apply(
        &mut state,
        Command::SetDestructiveMode {
            weapon: GATLING,
            enabled: true,
        },
        &mut events,
    );

    for frame in 0..args.frames {
        let aim = rotate_degrees(Vec2::X, frame as f32 * 3.0);
        let targets = foe_positions(frame);
        let mut commands = Vec::new();

        gunnery.on_attack(
            GATLING,
            WeaponKind::Gatling,
            aim,
            &query::weapon_view(&state),
            &mut commands,
        );

        if frame == SPECIAL_FRAME {
            let accepted = gunnery.on_special_attack(
                GATLING,
                WeaponKind::Gatling,
                &query::weapon_view(&state),
                &mut commands,
            );
            record(
                &mut log,
                format!(
                    "frame {frame}: special attack {}",
                    if accepted {
                        "unleashed"
                    } else {
                        "dropped by the backlog guard"
                    }
                ),
            );
        }

        sentry.handle(FRAME, wearer, &targets, &mut commands);

        if frame == STORM_FRAME {
            match sentry.call_storm(wearer, &mut commands) {
                StormOutcome::Called => record(&mut log, format!("frame {frame}: storm called")),
                StormOutcome::CoolingDown { remaining } => record(
                    &mut log,
                    format!("frame {frame}: storm cooling down for {remaining:?}"),
                ),
            }
        }

        commands.push(Command::AdvanceWeapon {
            weapon: GATLING,
            dt: FRAME,
            origin: wearer,
            aim,
        });
        commands.push(Command::AdvanceRings {
            dt: FRAME,
            targets,
        });

        events.clear();
        for command in commands {
            combat::apply(&mut state, command, &mut events);
        }

        narrate(frame, &events, &mut log);
        tally.absorb(&events);
    }

    events.clear();
    combat::apply(
        &mut state,
        Command::CleanupWeapon { weapon: GATLING },
        &mut events,
    );

    println!("--- skirmish summary ---");
    println!("frames simulated: {}", args.frames);
    println!("bursts queued: {} ({} ultimate)", tally.bursts, tally.ultimates);
    println!("projectiles spawned: {}", tally.projectiles);
    println!("rings cast: {}", tally.rings);
    println!("damage dealt: {}", tally.damage);
    println!("stuns applied: {}", tally.stuns);
    println!("sound cues: {}", tally.sounds);
    println!(
        "destructive mode after cleanup: {}",
        query::destructive_mode(&state, GATLING)
    );

    if let Some(path) = args.log {
        std::fs::write(&path, log.join("\n"))
            .with_context(|| format!("failed to write event log to {}", path.display()))?;
    }

    Ok(())
}

/// Three foes orbit the wearer at staggered radii and speeds.
fn foe_positions(frame: u32) -> TargetView {
    let snapshots = (0..3_u32)
        .map(|index| {
            let radius = 80.0 + index as f32 * 60.0;
            let degrees = frame as f32 * (0.6 + index as f32 * 0.3) + index as f32 * 120.0;
            TargetSnapshot {
                id: TargetId::new(index + 1),
                position: rotate_degrees(Vec2::X, degrees) * radius,
            }
        })
        .collect();
    TargetView::from_snapshots(snapshots)
}

/// Prints a narration line and keeps a copy for the optional log file.
fn record(log: &mut Vec<String>, line: String) {
    println!("{line}");
    log.push(line);
}

/// Narrates the events a host would surface to the player.
fn narrate(frame: u32, events: &[Event], log: &mut Vec<String>) {
    for event in events {
        match event {
            Event::FeedbackRequested { kind } => record(
                log,
                format!("frame {frame}: hud p{} {kind:?}", kind.priority()),
            ),
            Event::RingSpawned {
                ring,
                kind,
                max_range_tiles,
                ..
            } => record(
                log,
                format!(
                    "frame {frame}: ring {} ({kind:?}) covering {max_range_tiles} tiles",
                    ring.get()
                ),
            ),
            Event::RingFaded { ring } => {
                record(log, format!("frame {frame}: ring {} faded", ring.get()));
            }
            _ => {}
        }
    }
}
