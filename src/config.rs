//! Soundboard configuration.
//!
//! Stored as YAML in the user's config directory, by default
//! ~/.config/soundboard/config.yaml. Every section falls back to its defaults
//! field by field, so a partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::playback::{AdvanceMode, PlaybackSettings, SweepMode};
use crate::pipeline::timeline::{ScalePolicy, TimelineScale};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder scanned for clips
    pub sounds_dir: PathBuf,
    /// JSON file mapping clip file names to "#rrggbb" colors
    pub color_map: PathBuf,
    /// Clip file extension, matched case-insensitively
    pub extension: String,
    pub grid: GridConfig,
    pub timeline: TimelineConfig,
    pub playback: PlaybackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sounds_dir: PathBuf::from("./sounds"),
            color_map: PathBuf::from("color_map.json"),
            extension: "wav".to_string(),
            grid: GridConfig::default(),
            timeline: TimelineConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

/// Pad grid dimensions. Clips beyond `columns * rows` get no pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: usize,
    pub rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { columns: 6, rows: 6 }
    }
}

impl GridConfig {
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub columns_per_second: f64,
    pub scale: ScalePolicy,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            columns_per_second: 10.0,
            scale: ScalePolicy::Shared,
        }
    }
}

impl TimelineConfig {
    pub fn scale(&self) -> TimelineScale {
        TimelineScale {
            columns_per_second: self.columns_per_second.max(1.0),
            policy: self.scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub advance: AdvanceMode,
    pub sweep: SweepMode,
    pub sweep_frame_ms: u64,
    pub busy_poll_ms: u64,
    /// Hover time before a pad previews its clip
    pub preview_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            advance: AdvanceMode::Timer,
            sweep: SweepMode::Timeline,
            sweep_frame_ms: 30,
            busy_poll_ms: 100,
            preview_delay_ms: 2000,
        }
    }
}

impl PlaybackConfig {
    pub fn settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            advance: self.advance,
            sweep: self.sweep,
            sweep_frame: self.sweep_frame_ms.max(1) as f64 / 1000.0,
            busy_poll: self.busy_poll_ms.max(1) as f64 / 1000.0,
        }
    }

    pub fn preview_delay(&self) -> f64 {
        self.preview_delay_ms as f64 / 1000.0
    }
}

/// Returns: ~/.config/soundboard/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("soundboard")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> Config {
    log::info!("load_config: loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: config file doesn't exist, using defaults");
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
            Ok(config) => {
                log::info!(
                    "load_config: sounds in {:?}, {:?} scale, {:?} advance",
                    config.sounds_dir,
                    config.timeline.scale,
                    config.playback.advance
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: failed to parse config: {}, using defaults", e);
                Config::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: failed to read config file: {}, using defaults", e);
            Config::default()
        }
    }
}

/// Save configuration to a YAML file, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_yaml::to_string(config)?)?;
    log::info!("save_config: saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extension, "wav");
        assert_eq!(config.grid.capacity(), 36);
        assert_eq!(config.timeline.scale, ScalePolicy::Shared);
        assert_eq!(config.playback.advance, AdvanceMode::Timer);
        assert_eq!(config.playback.preview_delay(), 2.0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "timeline:\n  scale: per_track\nplayback:\n  advance: busy_poll\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.timeline.scale, ScalePolicy::PerTrack);
        assert_eq!(config.timeline.columns_per_second, 10.0);
        assert_eq!(config.playback.advance, AdvanceMode::BusyPoll);
        assert_eq!(config.playback.sweep_frame_ms, 30);
        assert_eq!(config.grid, GridConfig::default());
    }

    #[test]
    fn test_settings_are_in_seconds() {
        let settings = PlaybackConfig::default().settings();
        assert_eq!(settings.sweep_frame, 0.03);
        assert_eq!(settings.busy_poll, 0.1);
        assert_eq!(settings.sweep, SweepMode::Timeline);
    }

    #[test]
    fn test_missing_or_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(&dir.path().join("nope.yaml")), Config::default());

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "grid: [not, a, map").unwrap();
        assert_eq!(load_config(&bad), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.sounds_dir = PathBuf::from("/tmp/clips");
        config.playback.sweep = SweepMode::PerClip;

        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path), config);
    }
}
