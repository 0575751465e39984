//! Player preferences
//!
//! Persisted as JSON in LocalStorage. The simulation never reads these
//! directly; it receives the [`SimConfig`] projection.

use serde::{Deserialize, Serialize};

use crate::tuning::{MAX_TAPS_LIMIT, SimConfig};

/// Player preferences, as edited in the settings panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Looping background pad
    pub bgm: bool,
    /// Encouragement jingles after a pop
    pub sound_feedback: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,

    // === Gameplay ===
    /// Upper bound for how many taps a bubble can need
    pub max_taps_to_pop: u32,
    /// Rise speed level (1 - 5, 2 is normal)
    pub bubble_speed: u32,
    /// Size level (1 - 5, 3 is normal)
    pub bubble_size: u32,
    /// Minimum time between spawns (ms)
    pub spawn_interval_ms: u32,
    /// Population cap
    pub max_bubbles: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bgm: false,
            sound_feedback: true,
            volume: 0.7,

            max_taps_to_pop: 1,
            bubble_speed: 2,
            bubble_size: 3,
            spawn_interval_ms: 2000,
            max_bubbles: 10,
        }
    }
}

/// Slider ranges shown in the settings panel
pub const SPEED_LEVELS: (u32, u32) = (1, 5);
pub const SIZE_LEVELS: (u32, u32) = (1, 5);
pub const SPAWN_INTERVAL_RANGE_MS: (u32, u32) = (500, 3000);
pub const MAX_BUBBLES_RANGE: (u32, u32) = (5, 20);

/// Level at which speed/size multipliers are 1.0
const NORMAL_SPEED_LEVEL: f32 = 2.0;
const NORMAL_SIZE_LEVEL: f32 = 3.0;

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bubble-tap-settings";

    /// Clamp every field into the range the panel allows
    pub fn sanitized(self) -> Self {
        let volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Self::default().volume
        };
        Self {
            volume,
            max_taps_to_pop: self.max_taps_to_pop.clamp(1, MAX_TAPS_LIMIT),
            bubble_speed: self.bubble_speed.clamp(SPEED_LEVELS.0, SPEED_LEVELS.1),
            bubble_size: self.bubble_size.clamp(SIZE_LEVELS.0, SIZE_LEVELS.1),
            spawn_interval_ms: self
                .spawn_interval_ms
                .clamp(SPAWN_INTERVAL_RANGE_MS.0, SPAWN_INTERVAL_RANGE_MS.1),
            max_bubbles: self
                .max_bubbles
                .clamp(MAX_BUBBLES_RANGE.0, MAX_BUBBLES_RANGE.1),
            ..self
        }
    }

    /// Speed multiplier applied to new bubbles
    pub fn speed_scale(&self) -> f32 {
        self.bubble_speed as f32 / NORMAL_SPEED_LEVEL
    }

    /// Radius multiplier applied to new bubbles
    pub fn size_scale(&self) -> f32 {
        self.bubble_size as f32 / NORMAL_SIZE_LEVEL
    }

    /// The part of the settings the simulation consumes
    pub fn sim_config(&self) -> SimConfig {
        let s = self.clone().sanitized();
        SimConfig {
            max_taps: s.max_taps_to_pop,
            max_bubbles: s.max_bubbles as usize,
            spawn_cooldown_ms: f64::from(s.spawn_interval_ms),
            speed_scale: s.speed_scale(),
            size_scale: s.size_scale(),
        }
    }

    /// Parse stored JSON; anything unreadable yields defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(json) = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            log::info!("Loaded settings from LocalStorage");
            return Self::from_json(&json);
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_ok() {
                    log::info!("Settings saved");
                } else {
                    log::warn!("Failed to write settings");
                }
            }
            Err(e) => log::error!("Failed to serialize settings: {}", e),
        }
    }

    /// Forget stored settings and return defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn reset() -> Self {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(Self::STORAGE_KEY);
        }
        log::info!("Settings reset to defaults");
        Self::default()
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings persistence is browser-only ({})", Self::STORAGE_KEY);
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn reset() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_map_to_default_sim_config() {
        assert_eq!(Settings::default().sim_config(), SimConfig::default());
    }

    #[test]
    fn test_levels_scale_around_normal() {
        let s = Settings {
            bubble_speed: 4,
            bubble_size: 1,
            ..Default::default()
        };
        assert_eq!(s.speed_scale(), 2.0);
        assert!((s.size_scale() - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_sanitized_clamps() {
        let s = Settings {
            volume: 3.0,
            max_taps_to_pop: 0,
            bubble_speed: 9,
            bubble_size: 0,
            spawn_interval_ms: 10,
            max_bubbles: 500,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.volume, 1.0);
        assert_eq!(s.max_taps_to_pop, 1);
        assert_eq!(s.bubble_speed, 5);
        assert_eq!(s.bubble_size, 1);
        assert_eq!(s.spawn_interval_ms, 500);
        assert_eq!(s.max_bubbles, 20);

        let nan = Settings {
            volume: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(nan.volume, 0.7);
    }

    #[test]
    fn test_sim_config_projection() {
        let s = Settings {
            max_taps_to_pop: 3,
            spawn_interval_ms: 1000,
            max_bubbles: 15,
            ..Default::default()
        };
        let config = s.sim_config();
        assert_eq!(config.max_taps, 3);
        assert_eq!(config.max_bubbles, 15);
        assert_eq!(config.spawn_cooldown_ms, 1000.0);
    }

    #[test]
    fn test_json_missing_fields_use_defaults() {
        let s = Settings::from_json(r#"{"bgm": true, "max_bubbles": 99}"#);
        assert!(s.bgm);
        assert_eq!(s.max_bubbles, 20);
        assert_eq!(s.volume, 0.7);
        assert!(s.sound_feedback);
    }

    #[test]
    fn test_unparsable_json_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let s = Settings {
            bgm: true,
            volume: 0.25,
            max_taps_to_pop: 4,
            ..Default::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json), s);
    }
}
