//! Baker settings with persistence
//!
//! Settings are read from `~/.config/vatbake/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};
use vat_bake::BakeConfig;

/// All baker settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub export: ExportSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vatbake"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the config directory, or return defaults if not found.
    ///
    /// Runs before logging is configured, so nothing is logged here; call
    /// [`LoadOutcome::log`] once a subscriber is installed.
    pub fn load() -> (Self, LoadOutcome) {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => (Self::default(), LoadOutcome::NoConfigDir),
        }
    }

    pub fn load_from(path: &Path) -> (Self, LoadOutcome) {
        if !path.exists() {
            return (Self::default(), LoadOutcome::Missing(path.to_path_buf()));
        }

        let parsed = fs::read_to_string(path)
            .map_err(|e| format!("failed to read settings file: {e}"))
            .and_then(|content| {
                toml::from_str(&content).map_err(|e| format!("failed to parse settings: {e}"))
            });
        match parsed {
            Ok(settings) => (settings, LoadOutcome::Loaded(path.to_path_buf())),
            Err(reason) => (
                Self::default(),
                LoadOutcome::Invalid {
                    path: path.to_path_buf(),
                    reason,
                },
            ),
        }
    }

    /// Naming and shader configuration handed to the baker
    pub fn bake_config(&self) -> BakeConfig {
        BakeConfig {
            export_root: self.export.root.clone(),
            shader: self.export.shader.clone(),
            materials_folder: self.export.materials_folder.clone(),
            textures_folder: self.export.textures_folder.clone(),
            mesh_folder: self.export.mesh_folder.clone(),
            object_suffix: self.export.object_suffix.clone(),
        }
    }
}

/// How [`Settings::load`] arrived at its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(PathBuf),
    Missing(PathBuf),
    NoConfigDir,
    Invalid { path: PathBuf, reason: String },
}

impl LoadOutcome {
    /// Report the outcome through the installed subscriber
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => info!("Loaded settings from {:?}", path),
            Self::Missing(path) => info!("No settings file at {:?}, using defaults", path),
            Self::NoConfigDir => warn!("Could not determine config directory, using defaults"),
            Self::Invalid { path, reason } => {
                warn!("Ignoring settings file {:?}: {}, using defaults", path, reason)
            }
        }
    }
}

/// Export naming
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Top-level export folder
    pub root: String,
    /// Shader assigned to baked materials
    pub shader: String,
    pub materials_folder: String,
    pub textures_folder: String,
    pub mesh_folder: String,
    /// Appended to the model name to name the baked object
    pub object_suffix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        let config = BakeConfig::default();
        Self {
            root: config.export_root,
            shader: config.shader,
            materials_folder: config.materials_folder,
            textures_folder: config.textures_folder,
            mesh_folder: config.mesh_folder,
            object_suffix: config.object_suffix,
        }
    }
}

/// Where baked assets are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory the export root is created in
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// One of trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl LoggingSettings {
    /// Parsed level, `INFO` when unrecognized
    pub fn level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}
