use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::StoreResult;
use crate::common::EnvProvider;

const PREFERENCES_FILE: &str = "preferences.json";

/// The only state persisted locally: the visitor's theme choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub dark_mode: bool,
}

/// Session-scoped owner of [`Preferences`]
///
/// The initial value comes from `preferences.json` when it exists and parses,
/// otherwise from the terminal's reported background colour. Changes are
/// written back through [`PreferenceStore::set_dark_mode`] only.
pub struct PreferenceStore {
    path: PathBuf,
    current: Preferences,
}

impl PreferenceStore {
    pub fn load<P: AsRef<Path>>(dir: P, env: &impl EnvProvider) -> Self {
        let path = dir.as_ref().join(PREFERENCES_FILE);

        let saved = std::fs::read_to_string(&path)
            .ok()
            .and_then(|contents| match serde_json::from_str::<Preferences>(&contents) {
                Ok(preferences) => Some(preferences),
                Err(e) => {
                    log::warn!("Ignoring unreadable {}: {}", path.display(), e);
                    None
                }
            });

        let current = saved.unwrap_or_else(|| Preferences {
            dark_mode: system_prefers_dark(env),
        });
        log::debug!("Initial dark mode: {}", current.dark_mode);

        Self { path, current }
    }

    pub fn preferences(&self) -> Preferences {
        self.current
    }

    pub fn dark_mode(&self) -> bool {
        self.current.dark_mode
    }

    /// Persist a new theme choice; a no-op when nothing changes
    pub fn set_dark_mode(&mut self, dark_mode: bool) -> StoreResult<()> {
        if self.current.dark_mode == dark_mode && self.path.exists() {
            return Ok(());
        }

        self.current.dark_mode = dark_mode;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.current)?)?;
        log::debug!("Saved dark mode: {}", dark_mode);
        Ok(())
    }

    pub fn toggle(&mut self) -> StoreResult<bool> {
        let dark_mode = !self.current.dark_mode;
        self.set_dark_mode(dark_mode)?;
        Ok(dark_mode)
    }
}

/// Read `COLORFGBG` ("fg;bg"): backgrounds 0-6 and 8 are dark palette entries
fn system_prefers_dark(env: &impl EnvProvider) -> bool {
    env.get_var("COLORFGBG")
        .and_then(|value| value.rsplit(';').next().map(str::to_string))
        .and_then(|background| background.trim().parse::<u8>().ok())
        .is_some_and(|background| matches!(background, 0..=6 | 8))
}
