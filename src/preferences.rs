/// Player audio settings, persisted as JSON by the host.
/// Volumes are whole steps from 0 (muted) to 10.

use serde::{Deserialize, Serialize};

pub const MAX_VOLUME: u8 = 10;
pub const DEFAULT_VOLUME: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_volume")]
    pub sfx_volume: u8,
    #[serde(default = "default_volume")]
    pub music_volume: u8,
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sfx_volume: DEFAULT_VOLUME,
            music_volume: DEFAULT_VOLUME,
        }
    }
}

impl Preferences {
    pub fn set_sfx_volume(&mut self, volume: i64) {
        self.sfx_volume = clamp_volume(volume);
    }

    pub fn set_music_volume(&mut self, volume: i64) {
        self.music_volume = clamp_volume(volume);
    }

    /// Linear gain in [0, 1] for the audio bus
    pub fn sfx_gain(&self) -> f64 {
        f64::from(self.sfx_volume) / f64::from(MAX_VOLUME)
    }

    pub fn music_gain(&self) -> f64 {
        f64::from(self.music_volume) / f64::from(MAX_VOLUME)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse saved settings. Missing fields take the default and
    /// out-of-range values are clamped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let prefs: Preferences = serde_json::from_str(json)?;
        Ok(Self {
            sfx_volume: prefs.sfx_volume.min(MAX_VOLUME),
            music_volume: prefs.music_volume.min(MAX_VOLUME),
        })
    }
}

fn clamp_volume(volume: i64) -> u8 {
    // Fits in u8 after the clamp
    volume.clamp(0, i64::from(MAX_VOLUME)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_half_volume() {
        let prefs = Preferences::default();
        assert_eq!(prefs.sfx_volume, 5);
        assert_eq!(prefs.music_volume, 5);
        assert_eq!(prefs.sfx_gain(), 0.5);
    }

    #[test]
    fn test_setters_clamp() {
        let mut prefs = Preferences::default();
        prefs.set_sfx_volume(14);
        prefs.set_music_volume(-3);
        assert_eq!(prefs.sfx_volume, MAX_VOLUME);
        assert_eq!(prefs.music_volume, 0);
        assert_eq!(prefs.music_gain(), 0.0);
    }

    #[test]
    fn test_json_save_and_load() {
        let mut prefs = Preferences::default();
        prefs.set_sfx_volume(7);
        let json = prefs.to_json().unwrap();
        assert_eq!(Preferences::from_json(&json).unwrap(), prefs);
    }

    #[test]
    fn test_load_fills_missing_and_clamps() {
        let prefs = Preferences::from_json(r#"{"music_volume": 200}"#).unwrap();
        assert_eq!(prefs.sfx_volume, DEFAULT_VOLUME);
        assert_eq!(prefs.music_volume, MAX_VOLUME);
        assert!(Preferences::from_json("not json").is_err());
    }
}
