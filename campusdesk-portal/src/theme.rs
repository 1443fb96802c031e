//! Theme preference
//!
//! The light/dark preference lives in its own store with a lifecycle
//! independent of the session: signing out leaves it alone.

use crate::storage::{load_snapshot, save_snapshot, DurableStorage};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(format!("Unknown theme mode: {}", s)),
        }
    }
}

/// Presentation state of the root document element.
///
/// Only the `dark` class is tracked; it is what stylesheets key off.
#[derive(Debug, Default)]
pub struct DocumentRoot {
    dark: AtomicBool,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::SeqCst)
    }

    /// Mode currently presented to the user
    pub fn presented_mode(&self) -> ThemeMode {
        if self.is_dark() {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    fn apply(&self, mode: ThemeMode) {
        self.dark.store(mode == ThemeMode::Dark, Ordering::SeqCst);
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeState {
    mode: ThemeMode,
}

pub struct ThemeStore {
    mode: ThemeMode,
    document: Arc<DocumentRoot>,
    storage: Arc<dyn DurableStorage>,
    key: String,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("mode", &self.mode)
            .field("key", &self.key)
            .finish()
    }
}

impl ThemeStore {
    /// Rehydrate the preference and apply it to `document` before anything
    /// is rendered, so a persisted dark mode never flashes light first.
    pub fn init(
        storage: Arc<dyn DurableStorage>,
        key: impl Into<String>,
        document: Arc<DocumentRoot>,
    ) -> Self {
        let key = key.into();
        let state: ThemeState = load_snapshot(storage.as_ref(), &key).unwrap_or_default();

        document.apply(state.mode);
        debug!(mode = %state.mode, "Theme store rehydrated");

        Self {
            mode: state.mode,
            document,
            storage,
            key,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.set_theme(self.mode.toggled());
        self.mode
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.document.apply(mode);

        let state = ThemeState { mode };
        if let Err(e) = save_snapshot(self.storage.as_ref(), &self.key, &state) {
            warn!(key = %self.key, error = %e, "Failed to persist theme");
        }
    }
}
