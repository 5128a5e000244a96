//! Weapon tuning file loading with defaults fallback.

use std::{fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;
use volt_barrage_combat::{CombatTuning, ProjectileTuning, RingTuning};
use volt_barrage_system_gunnery::GatlingTuning;
use volt_barrage_system_sentry::SentryTuning;

/// Root of the optional weapon tuning file.
///
/// Every section and every field may be omitted; whatever is missing keeps
/// its built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WeaponsFile {
    /// Tuning for the gatling burst generator.
    pub(crate) gatling: GatlingTuning,
    /// Tuning for the sentry ring caster.
    pub(crate) sentry: SentryTuning,
    /// Tuning for fired projectiles.
    pub(crate) projectile: ProjectileTuning,
    /// Tuning for ring lifecycles.
    pub(crate) ring: RingTuning,
}

impl WeaponsFile {
    /// Assembles the tuning sections owned by the combat state.
    pub(crate) fn combat_tuning(&self) -> CombatTuning {
        CombatTuning {
            projectile: self.projectile.clone(),
            ring: self.ring.clone(),
        }
    }
}

/// Errors that can occur while reading the weapon tuning file.
#[derive(Debug, Error)]
pub(crate) enum TuningFileError {
    /// The file could not be read from disk.
    #[error("failed to read weapon tuning file: {0}")]
    Read(#[from] io::Error),
    /// The file contents were not valid TOML for the expected schema.
    #[error("failed to parse weapon tuning file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads the tuning file at the provided path.
pub(crate) fn load(path: &Path) -> Result<WeaponsFile, TuningFileError> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Loads the tuning file, falling back to defaults on any failure.
///
/// Missing or malformed configuration is never fatal; the warning keeps the
/// fallback visible in the session log.
pub(crate) fn load_or_default(path: Option<&Path>) -> WeaponsFile {
    let Some(path) = path else {
        return WeaponsFile::default();
    };

    match load(path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("warning: {error}; using default weapon tuning");
            WeaponsFile::default()
        }
    }
}
