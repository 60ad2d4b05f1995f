use crate::settings::FieldSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CELL_WIDTH: f32 = 8.0;
pub const DEFAULT_CELL_HEIGHT: f32 = 16.0;
pub const DEFAULT_DOT_THRESHOLD: f32 = 0.12;

/// Bounds on logical pixels per terminal cell, on either axis
pub const MIN_CELL_SIZE: f32 = 1.0;
pub const MAX_CELL_SIZE: f32 = 64.0;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Particle field settings
    pub settings: FieldSettings,
    /// Logical pixels per terminal cell, horizontally
    pub cell_width: f32,
    /// Logical pixels per terminal cell, vertically
    pub cell_height: f32,
    /// Brightness a pixel needs to light a Braille dot (0.0-1.0)
    pub dot_threshold: f32,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create config directory: {}", e))?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Default config location, e.g. ~/.config/particle-field/config.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("particle-field").join("config.json"))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.settings.validate()?;
        let cell_range = MIN_CELL_SIZE..=MAX_CELL_SIZE;
        if !(cell_range.contains(&self.cell_width) && cell_range.contains(&self.cell_height)) {
            return Err(format!(
                "Cell size must be between {} and {}",
                MIN_CELL_SIZE, MAX_CELL_SIZE
            ));
        }
        if !(0.0..1.0).contains(&self.dot_threshold) {
            return Err("Dot threshold must be in [0, 1)".to_string());
        }
        Ok(())
    }

    /// Adjust dot threshold within bounds
    pub fn adjust_dot_threshold(&mut self, delta: f32) {
        self.dot_threshold = (self.dot_threshold + delta).clamp(0.0, 0.9);
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            settings: FieldSettings::default(),
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            dot_threshold: DEFAULT_DOT_THRESHOLD,
        }
    }
}
