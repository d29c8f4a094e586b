//! Application settings and in-process change notification.
//!
//! # Responsibility
//! - Hold the persisted `AppSettings` document and fan out changes to
//!   registered observers.
//!
//! # Invariants
//! - Observers are notified only when the applied settings differ from the
//!   current state.
//! - Observer callbacks run outside the hub's internal lock.
//!
//! # See also
//! - docs/architecture/sync.md

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Local slice key the settings document is persisted under.
pub const SETTINGS_KEY: &str = "appSettings";

/// User-facing application settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    #[serde(rename = "darkMode")]
    pub dark_mode: bool,
}

/// Receives settings snapshots whenever they change.
pub trait SettingsObserver: Send + Sync {
    fn on_settings_changed(&self, settings: AppSettings);
}

/// Shared settings state with typed change observers.
#[derive(Default)]
pub struct SettingsHub {
    inner: Mutex<HubState>,
}

#[derive(Default)]
struct HubState {
    current: AppSettings,
    observers: Vec<Arc<dyn SettingsObserver>>,
}

impl SettingsHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> AppSettings {
        self.inner.lock().expect("settings lock poisoned").current
    }

    /// Registers an observer and immediately replays the current snapshot
    /// to it, so late subscribers never miss state.
    pub fn subscribe(&self, observer: Arc<dyn SettingsObserver>) {
        let snapshot = {
            let mut state = self.inner.lock().expect("settings lock poisoned");
            state.observers.push(Arc::clone(&observer));
            state.current
        };
        observer.on_settings_changed(snapshot);
    }

    /// Applies new settings; no-op (and no notifications) when unchanged.
    pub fn apply(&self, settings: AppSettings) {
        let observers = {
            let mut state = self.inner.lock().expect("settings lock poisoned");
            if state.current == settings {
                return;
            }
            state.current = settings;
            state.observers.clone()
        };
        for observer in observers {
            observer.on_settings_changed(settings);
        }
    }
}
