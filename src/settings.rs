use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_CONTAINER_MARKER: &str = "ReactVirtualized__Grid ReactVirtualized__Table__Grid";
pub const DEFAULT_ROW_MARKER: &str = "ReactVirtualized__Table__row";
const DEFAULT_SETTINGS_FILE: &str = "order-alert.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioSettings {
    pub enabled: bool,
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            volume: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertSettings {
    pub stdout: bool,
    pub log: bool,
    pub audio: AudioSettings,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            stdout: true,
            log: true,
            audio: AudioSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchSettings {
    /// Classes identifying the order list.
    pub container_marker: String,
    /// Classes identifying one order row inside the list.
    pub row_marker: String,
    /// How long a click keeps the next change attributed to the user.
    pub intent_window_ms: u64,
    /// Quiet period before an alert goes out.
    pub notify_debounce_ms: u64,
    /// Retry period while the order list is not on the page.
    pub search_interval_ms: u64,
    pub actionable_tags: Vec<String>,
    pub actionable_roles: Vec<String>,
    /// Clear the intent flag on mutations that leave the row count unchanged.
    pub consume_intent_on_unchanged: bool,
    /// Go back to searching when the order list is removed from the page.
    pub reattach_on_removal: bool,
    pub alerts: AlertSettings,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            container_marker: DEFAULT_CONTAINER_MARKER.into(),
            row_marker: DEFAULT_ROW_MARKER.into(),
            intent_window_ms: 1000,
            notify_debounce_ms: 500,
            search_interval_ms: 1000,
            actionable_tags: vec!["BUTTON".into()],
            actionable_roles: vec!["button".into()],
            consume_intent_on_unchanged: true,
            reattach_on_removal: false,
            alerts: AlertSettings::default(),
        }
    }
}

impl WatchSettings {
    pub fn intent_window(&self) -> Duration {
        Duration::from_millis(self.intent_window_ms)
    }

    pub fn notify_debounce(&self) -> Duration {
        Duration::from_millis(self.notify_debounce_ms)
    }

    pub fn search_interval(&self) -> Duration {
        // A zero period would make `tokio::time::interval` panic.
        Duration::from_millis(self.search_interval_ms.max(1))
    }
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    data: WatchSettings,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing file yields defaults; a malformed
    /// one is reported and replaced by defaults.
    pub fn load(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring malformed settings in {}: {err}; using defaults",
                    path.display()
                );
                WatchSettings::default()
            })
        } else {
            WatchSettings::default()
        };

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// Resolves the settings path from the first CLI argument, then
    /// `ORDER_ALERT_SETTINGS`, then `order-alert.json` in the working directory.
    pub fn discover(cli_arg: Option<String>) -> Result<Self> {
        let path = cli_arg
            .or_else(|| std::env::var("ORDER_ALERT_SETTINGS").ok())
            .map(PathBuf::from);

        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::in_memory(WatchSettings::default()))
                }
            }
        }
    }

    pub fn in_memory(data: WatchSettings) -> Self {
        Self { path: None, data }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn settings(&self) -> &WatchSettings {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_the_order_table() {
        let settings = WatchSettings::default();
        assert_eq!(settings.intent_window(), Duration::from_millis(1000));
        assert_eq!(settings.notify_debounce(), Duration::from_millis(500));
        assert_eq!(settings.search_interval(), Duration::from_millis(1000));
        assert_eq!(settings.row_marker, "ReactVirtualized__Table__row");
        assert!(settings.consume_intent_on_unchanged);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.settings(), &WatchSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"notifyDebounceMs": 250, "alerts": {"audio": {"enabled": true}}}"#,
        )
        .unwrap();

        let store = SettingsStore::load(path).unwrap();
        let settings = store.settings();
        assert_eq!(settings.notify_debounce_ms, 250);
        assert_eq!(settings.intent_window_ms, 1000);
        assert!(settings.alerts.audio.enabled);
        assert_eq!(settings.alerts.audio.volume, 0.8);
        assert!(settings.alerts.stdout);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::load(path).unwrap();
        assert_eq!(store.settings(), &WatchSettings::default());
    }

    #[test]
    fn zero_search_interval_is_clamped() {
        let settings = WatchSettings {
            search_interval_ms: 0,
            ..WatchSettings::default()
        };
        assert_eq!(settings.search_interval(), Duration::from_millis(1));
    }
}
