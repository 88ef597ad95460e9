//! Configuration management for the sound core
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling tuning without recompilation. Volume defaults and host
//! parameters can be adjusted via the config file per title.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete sound-core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    pub playback: PlaybackConfig,
    pub host: HostConfig,
}

/// Playback and volume defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Global master volume factor applied to every sound
    pub master_volume: f32,
    /// Number of mixing-group channels the soundboard manages
    pub channel_count: u8,
    /// Initial volume factor of each channel group
    pub channel_volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            // Eight groups covers the usual sfx/music/voice/ambience split
            // with room for per-scene groups.
            channel_count: 8,
            channel_volume: 1.0,
        }
    }
}

/// Platform host parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Output sample rate requested from the platform, in Hz
    pub sample_rate: u32,
    /// Upper bound on simultaneously loaded players
    pub max_players: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            max_players: 32,
        }
    }
}

impl Default for SoundConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            host: HostConfig::default(),
        }
    }
}

impl SoundConfig {
    /// Load configuration from a JSON file
    ///
    /// Missing or malformed files fall back to the defaults; the reason is
    /// logged but never surfaced as an error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration on Android
    ///
    /// Asset-manager backed loading is routed through the engine shell;
    /// until a title overrides it, the defaults apply.
    #[cfg(target_os = "android")]
    pub fn load() -> Self {
        log::info!("[Config] Using default configuration");
        Self::default()
    }

    /// Load configuration for non-Android platforms
    #[cfg(not(target_os = "android"))]
    pub fn load() -> Self {
        Self::load_from_file("assets/sound_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SoundConfig::default();
        assert_eq!(config.playback.master_volume, 1.0);
        assert_eq!(config.playback.channel_count, 8);
        assert_eq!(config.host.sample_rate, 44100);
        assert_eq!(config.host.max_players, 32);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SoundConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: SoundConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.playback.master_volume, config.playback.master_volume);
        assert_eq!(parsed.playback.channel_count, config.playback.channel_count);
        assert_eq!(parsed.host.sample_rate, config.host.sample_rate);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = SoundConfig::load_from_file("/no/such/sound_config.json");
        assert_eq!(config.playback.channel_count, 8);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sound_config.json");
        std::fs::write(
            &path,
            r#"{
                "playback": { "master_volume": 0.5, "channel_count": 4, "channel_volume": 0.8 },
                "host": { "sample_rate": 48000, "max_players": 16 }
            }"#,
        )
        .unwrap();

        let config = SoundConfig::load_from_file(&path);
        assert_eq!(config.playback.master_volume, 0.5);
        assert_eq!(config.playback.channel_count, 4);
        assert_eq!(config.host.sample_rate, 48000);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sound_config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = SoundConfig::load_from_file(&path);
        assert_eq!(config.playback.master_volume, 1.0);
    }
}
