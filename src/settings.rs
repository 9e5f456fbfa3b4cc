//! Driver settings and preferences
//!
//! Persisted as a JSON file next to the score table. Balance lives in
//! [`Tuning`]; settings only decide how a run is driven.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::MAX_NAME_LEN;
use crate::tuning::Tuning;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Players ===
    pub player_one_name: String,
    pub player_two_name: String,
    /// Start runs in two-player mode
    pub two_player: bool,

    // === Run ===
    /// Fixed RNG seed; a fresh one is picked per run when unset
    pub seed: Option<u64>,
    /// Wall-clock milliseconds per simulation tick when running in real time
    pub tick_ms: u64,
    /// Optional JSON file overriding the default balance
    pub tuning_path: Option<PathBuf>,

    // === Persistence ===
    pub ranking_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_one_name: "Player".to_string(),
            player_two_name: "Player 2".to_string(),
            two_player: false,

            seed: None,
            tick_ms: 16,
            tuning_path: None,

            ranking_path: PathBuf::from("ranking.txt"),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        Ok(settings.sanitized())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Names cut to the storable length
    pub fn sanitized(mut self) -> Self {
        truncate_name(&mut self.player_one_name);
        truncate_name(&mut self.player_two_name);
        self.tick_ms = self.tick_ms.max(1);
        self
    }

    /// Balance for a run: the override file if one is configured and readable, defaults otherwise
    pub fn tuning(&self) -> Tuning {
        let Some(path) = &self.tuning_path else {
            return Tuning::default();
        };
        let loaded = fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|json| Tuning::from_json(&json).map_err(SettingsError::from));
        match loaded {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning at {}: {e}", path.display());
                Tuning::default()
            }
        }
    }

    /// Name shown and recorded for an actor
    pub fn player_name(&self, id: crate::sim::ActorId) -> &str {
        if id == crate::sim::PLAYER_TWO {
            &self.player_two_name
        } else {
            &self.player_one_name
        }
    }
}

fn truncate_name(name: &mut String) {
    if name.len() <= MAX_NAME_LEN {
        return;
    }
    let mut cut = MAX_NAME_LEN;
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }
    name.truncate(cut);
}
