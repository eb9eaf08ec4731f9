//! Optional TOML config for the desktop simulator

use std::path::Path;

use morii::{PlaybackMode, Settings};
use serde::Deserialize;

use crate::error::{Result, SimulatorError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub window: WindowConfig,
    pub playback: PlaybackConfig,
    pub audio: AudioConfig,
    pub simulation: Settings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            scale: 1,
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub mode: PlaybackMode,
    pub day: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Added on top of each voice's own level
    pub master_db: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            master_db: 0.0,
        }
    }
}

impl SimulatorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|message| SimulatorError::Config {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Simulation settings with the viewport taken from the window size
    pub fn settings(&self) -> Settings {
        Settings {
            viewport_width: self.window.width as f32,
            viewport_height: self.window.height as f32,
            ..self.simulation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = SimulatorConfig::parse("").unwrap();
        assert_eq!(config.window.fps, 30);
        assert_eq!(config.playback.mode, PlaybackMode::Interactive);
        assert!(config.audio.enabled);
        assert_eq!(config.simulation, Settings::default());
    }

    #[test]
    fn partial_tables_override_fields() {
        let config = SimulatorConfig::parse(
            r#"
            [window]
            width = 800
            height = 600

            [playback]
            mode = "cinematic"
            day = 2

            [audio]
            enabled = false

            [simulation]
            max_speed = 3.0
            rng_seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.fps, 30);
        assert_eq!(config.playback.mode, PlaybackMode::Cinematic);
        assert_eq!(config.playback.day, 2);
        assert!(!config.audio.enabled);
        assert_eq!(config.simulation.max_speed, 3.0);
        assert_eq!(config.simulation.rng_seed, 7);
        assert_eq!(config.simulation.drag, 0.995);

        let settings = config.settings();
        assert_eq!(settings.viewport_width, 800.0);
        assert_eq!(settings.viewport_height, 600.0);
    }

    #[test]
    fn bad_mode_is_rejected() {
        let err = SimulatorConfig::parse("[playback]\nmode = \"slideshow\"").unwrap_err();
        assert!(err.contains("slideshow") || err.contains("variant"), "{err}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimulatorConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, SimulatorError::Io(_)));
    }
}
