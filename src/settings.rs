//! Breakout settings and preferences
//!
//! Persisted as one JSON blob. Fields missing from a stored blob take their
//! defaults, so older saves keep loading after new settings are added.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Which desktop keys steer the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DesktopKeyMode {
    /// A and D
    #[default]
    Ad,
    /// Arrow keys
    Arrows,
    Both,
}

impl DesktopKeyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesktopKeyMode::Ad => "ad",
            DesktopKeyMode::Arrows => "arrows",
            DesktopKeyMode::Both => "both",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ad" | "a/d" => Some(DesktopKeyMode::Ad),
            "arrows" => Some(DesktopKeyMode::Arrows),
            "both" => Some(DesktopKeyMode::Both),
            _ => None,
        }
    }

    /// A/D steer in this mode
    pub fn letters(&self) -> bool {
        matches!(self, DesktopKeyMode::Ad | DesktopKeyMode::Both)
    }

    /// Arrow keys steer in this mode
    pub fn arrows(&self) -> bool {
        matches!(self, DesktopKeyMode::Arrows | DesktopKeyMode::Both)
    }
}

/// Breakout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // === Audio ===
    pub music_on: bool,
    /// Music volume (0.0 - 1.0)
    pub music_vol: f32,
    pub sfx_on: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_vol: f32,

    // === Controls ===
    /// On-screen left/right hold buttons
    pub show_touch_buttons: bool,
    pub desktop_keys: DesktopKeyMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_on: true,
            music_vol: 0.6,
            sfx_on: true,
            sfx_vol: 0.7,
            show_touch_buttons: false,
            desktop_keys: DesktopKeyMode::Ad,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "tenebris_breakout_settings_v1";

    /// Effective sound effect gain (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_on {
            self.sfx_vol.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings merged over defaults; malformed data yields defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(mut settings)) => {
                settings.music_vol = settings.music_vol.clamp(0.0, 1.0);
                settings.sfx_vol = settings.sfx_vol.clamp(0.0, 1.0);
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Discarding stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.music_on && s.sfx_on);
        assert_eq!(s.music_vol, 0.6);
        assert_eq!(s.sfx_vol, 0.7);
        assert!(!s.show_touch_buttons);
        assert_eq!(s.desktop_keys, DesktopKeyMode::Ad);
    }

    #[test]
    fn test_partial_blob_merges_over_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"sfxOn":false,"desktopKeys":"both"}"#)
            .unwrap();
        let s = Settings::load(&store);
        assert!(!s.sfx_on);
        assert_eq!(s.desktop_keys, DesktopKeyMode::Both);
        assert!(s.music_on);
        assert_eq!(s.music_vol, 0.6);
    }

    #[test]
    fn test_malformed_blob_gives_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());

        store
            .set(Settings::STORAGE_KEY, r#"{"desktopKeys":"joystick"}"#)
            .unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_round_trip() {
        let mut store = MemoryStore::new();
        let mut s = Settings::default();
        s.music_vol = 0.25;
        s.desktop_keys = DesktopKeyMode::Arrows;
        s.save(&mut store);

        let raw = store.get(Settings::STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"musicVol\":0.25"));
        assert!(raw.contains("\"desktopKeys\":\"arrows\""));
        assert_eq!(Settings::load(&store), s);
    }

    #[test]
    fn test_volume_clamped_on_load() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, r#"{"musicVol":3.0}"#).unwrap();
        assert_eq!(Settings::load(&store).music_vol, 1.0);
    }

    #[test]
    fn test_key_modes() {
        assert!(DesktopKeyMode::Ad.letters() && !DesktopKeyMode::Ad.arrows());
        assert!(DesktopKeyMode::Both.letters() && DesktopKeyMode::Both.arrows());
        assert_eq!(DesktopKeyMode::from_str("ARROWS"), Some(DesktopKeyMode::Arrows));
        assert_eq!(DesktopKeyMode::Both.as_str(), "both");
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let mut s = Settings::default();
        s.sfx_on = false;
        assert_eq!(s.effective_sfx_volume(), 0.0);
        s.sfx_on = true;
        s.sfx_vol = 0.4;
        assert_eq!(s.effective_sfx_volume(), 0.4);
    }
}
