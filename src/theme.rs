use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::AppError;
use crate::storage::Storage;

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted light/dark preference plus the mode currently applied to the
/// display.
pub struct ThemeStore {
    storage: Arc<dyn Storage>,
    prefers_dark: bool,
    dark_applied: AtomicBool,
}

impl ThemeStore {
    pub fn new(storage: Arc<dyn Storage>, prefers_dark: bool) -> Self {
        Self {
            storage,
            prefers_dark,
            dark_applied: AtomicBool::new(false),
        }
    }

    /// Stored preference, falling back to the system preference.
    pub fn get(&self) -> ThemeMode {
        match self.storage.get(THEME_KEY).as_deref() {
            Some("dark") | Some("amoled") => ThemeMode::Dark,
            Some("light") => ThemeMode::Light,
            _ if self.prefers_dark => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn set(&self, mode: ThemeMode) -> Result<(), AppError> {
        self.storage.set(THEME_KEY, mode.as_str())?;
        self.apply(mode);
        Ok(())
    }

    pub fn toggle(&self) -> Result<ThemeMode, AppError> {
        let next = self.get().toggled();
        self.set(next)?;
        tracing::debug!("Theme switched to {next}");
        Ok(next)
    }

    /// Apply the current preference at start-up. Also rewrites a legacy value.
    pub fn init(&self) -> Result<ThemeMode, AppError> {
        let mode = self.get();
        self.set(mode)?;
        Ok(mode)
    }

    /// The mode in effect on screen, which may lag the stored value until
    /// [`init`](Self::init) or [`set`](Self::set) runs.
    pub fn applied(&self) -> ThemeMode {
        if self.dark_applied.load(Ordering::Relaxed) {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    fn apply(&self, mode: ThemeMode) {
        self.dark_applied
            .store(mode == ThemeMode::Dark, Ordering::Relaxed);
    }
}
