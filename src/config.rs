//! Configuration file support for the viewer.
//!
//! Settings are plain serde structs with per-field defaults, so a partial
//! file (or `{}`) loads with the built-in values for everything it omits.

use serde::{Deserialize, Serialize};

use crate::color_utils::Rgba;
use crate::constants;

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Drawing surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Surface width in CSS pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Surface height in CSS pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Background fill as `#RRGGBB`
    #[serde(default = "default_background")]
    pub background: String,
    /// Fraction of the surface a loaded image is fitted into
    #[serde(default = "default_fit_margin")]
    pub image_fit_margin: f32,
}

fn default_width() -> u32 {
    constants::canvas::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    constants::canvas::DEFAULT_HEIGHT
}

fn default_background() -> String {
    constants::canvas::BACKGROUND.to_string()
}

fn default_fit_margin() -> f32 {
    constants::canvas::IMAGE_FIT_MARGIN
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            image_fit_margin: default_fit_margin(),
        }
    }
}

/// Zoom limits and step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    #[serde(default = "default_min_zoom")]
    pub min: f32,
    #[serde(default = "default_max_zoom")]
    pub max: f32,
    /// Additive step of the zoom in/out controls
    #[serde(default = "default_zoom_step")]
    pub step: f32,
    /// Base of the exponential wheel zoom
    #[serde(default = "default_wheel_base")]
    pub wheel_base: f32,
}

fn default_min_zoom() -> f32 {
    constants::zoom::MIN
}

fn default_max_zoom() -> f32 {
    constants::zoom::MAX
}

fn default_zoom_step() -> f32 {
    constants::zoom::STEP
}

fn default_wheel_base() -> f32 {
    constants::zoom::WHEEL_BASE
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: default_min_zoom(),
            max: default_max_zoom(),
            step: default_zoom_step(),
            wheel_base: default_wheel_base(),
        }
    }
}

/// Viewer configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub zoom: ZoomConfig,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            canvas: CanvasConfig::default(),
            zoom: ZoomConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl ViewerConfig {
    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if !(zoom.min > 0.0 && zoom.min <= 1.0 && zoom.max >= 1.0) {
            return Err(ConfigError::invalid(format!(
                "zoom bounds [{}, {}] must be positive and include 1.0",
                zoom.min, zoom.max
            )));
        }
        if !(zoom.step > 0.0) {
            return Err(ConfigError::invalid(format!(
                "zoom step must be positive, got {}",
                zoom.step
            )));
        }
        if !(zoom.wheel_base > 0.0 && zoom.wheel_base < 1.0) {
            return Err(ConfigError::invalid(format!(
                "wheel base must be in (0, 1), got {}",
                zoom.wheel_base
            )));
        }
        let margin = self.canvas.image_fit_margin;
        if !(margin > 0.0 && margin <= 1.0) {
            return Err(ConfigError::invalid(format!(
                "image fit margin must be in (0, 1], got {}",
                margin
            )));
        }
        if Rgba::from_hex(&self.canvas.background).is_none() {
            return Err(ConfigError::invalid(format!(
                "background '{}' is not a #RRGGBB color",
                self.canvas.background
            )));
        }
        Ok(())
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "medview-config.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // XDG config directory, falling back to ~/.config
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("medview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("medview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from the default path, falling back to defaults when the file is
    /// missing or unreadable.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load config file {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Save configuration to a file, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// LocalStorage key for WASM config persistence.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "medview-config";

    /// Load configuration from localStorage, falling back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load_or_default() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(Self::LOCALSTORAGE_KEY).ok().flatten());

        match stored {
            Some(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Failed to parse config from localStorage: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Save configuration to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| ConfigError::StorageError("localStorage not available".to_string()))?;

        storage
            .set_item(Self::LOCALSTORAGE_KEY, &self.to_json()?)
            .map_err(|e| {
                ConfigError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;
        log::info!("Saved configuration to localStorage");
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is outside its allowed range
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ConfigError {
    fn invalid(message: String) -> Self {
        Self::InvalidValue(message)
    }
}
