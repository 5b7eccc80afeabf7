//! Application settings with persistence
//!
//! Settings are saved to `~/.config/vantage/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vantage_core::TimeConfig;
use vantage_game::StageConfig;

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stage: StageConfig,
    pub time: TimeConfig,
    pub demo: DemoSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vantage"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the config directory, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file, or return defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Headless demo run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSettings {
    /// Frames spent on each scripted input phase
    pub frames_per_phase: u32,
    /// Simulated wall-clock time between frames, in seconds
    pub frame_time: f32,
    /// Log the poses every this many frames
    pub log_interval: u32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            frames_per_phase: 90,
            frame_time: 1.0 / 60.0,
            log_interval: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use vantage_game::CameraMode;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [demo]
            frames_per_phase = 10
            frame_time = 0.02
            log_interval = 5

            [stage]
            camera_mode = "free"
            "#,
        )
        .unwrap();

        assert_eq!(settings.demo.frames_per_phase, 10);
        assert_eq!(settings.stage.camera_mode, CameraMode::Free);
        assert_eq!(settings.time.max_delta_time, 0.1);
        assert_eq!(settings.stage.orbit.max_radius, 40.0);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/vantage/settings.toml"));
        assert_eq!(settings.demo.log_interval, DemoSettings::default().log_interval);
        assert_eq!(settings.stage.camera_mode, CameraMode::Orbit);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir()
            .join(format!("vantage-settings-{}", std::process::id()))
            .join("settings.toml");

        let mut settings = Settings::default();
        settings.stage.role.keyboard_speed = 7.5;
        settings.demo.frames_per_phase = 3;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.stage.role.keyboard_speed, 7.5);
        assert_eq!(loaded.demo.frames_per_phase, 3);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
