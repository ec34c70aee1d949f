use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::{Path, PathBuf}};

pub const ID: &str = "corner-notifications";

/// Raw corner index used by `notify_location`.
pub const TOP_LEFT: u32 = 0;
pub const BOTTOM_LEFT: u32 = 1;
pub const TOP_RIGHT: u32 = 2;
pub const BOTTOM_RIGHT: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationsConfig {
    /// Default expiration in seconds, -1 means never expire.
    #[serde(default = "default_expire_timeout")]
    pub expire_timeout: i32,
    /// Opacity of a displayed notification, 0.0 to 1.0.
    #[serde(default = "default_initial_opacity")]
    pub initial_opacity: f64,
    /// Corner the notifications stack from. Kept raw so that a bad value
    /// is rejected when laying out instead of when loading.
    #[serde(default = "default_notify_location")]
    pub notify_location: u32,
    #[serde(default = "default_true")]
    pub do_fadeout: bool,
    #[serde(default)]
    pub do_slideout: bool,
    /// Pin notifications to the primary monitor instead of the one under the pointer.
    #[serde(default)]
    pub primary_monitor: bool,
    #[serde(default)]
    pub do_not_disturb: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            expire_timeout: default_expire_timeout(),
            initial_opacity: default_initial_opacity(),
            notify_location: default_notify_location(),
            do_fadeout: default_true(),
            do_slideout: false,
            primary_monitor: false,
            do_not_disturb: false,
        }
    }
}

// Default value helpers for serde
const fn default_true() -> bool {
    true
}

const fn default_expire_timeout() -> i32 {
    10
}

const fn default_initial_opacity() -> f64 {
    0.9
}

const fn default_notify_location() -> u32 {
    BOTTOM_RIGHT
}

/// A single pushed settings update.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Double(f64),
}

#[derive(Debug)]
pub enum ConfigError {
    /// The config directory could not be determined
    NoConfigDir,
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    UnknownKey(String),
    /// The value has the wrong type or is out of range for the key
    InvalidValue { key: String, value: SettingValue },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine the config directory"),
            ConfigError::Io(path, e) => write!(f, "Failed to read {}: {}", path.display(), e),
            ConfigError::Parse(path, e) => write!(f, "Failed to parse {}: {}", path.display(), e),
            ConfigError::UnknownKey(key) => write!(f, "Unknown setting '{}'", key),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value {:?} for setting '{}'", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl NotificationsConfig {
    /// Load the user's config, falling back to defaults if it is missing or broken.
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!("{}, using default settings", err);
                return Self::default();
            }
        };

        if !path.exists() {
            tracing::debug!("No config at {}, using default settings", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{}, using default settings", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.initial_opacity = config.initial_opacity.clamp(0.0, 1.0);
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(ID).join("config.toml"))
    }

    /// Default expiration in milliseconds; -1 stays -1 (never).
    pub fn expire_timeout_default_ms(&self) -> i32 {
        if self.expire_timeout == -1 {
            -1
        } else {
            self.expire_timeout.saturating_mul(1000)
        }
    }

    /// Apply one key/value update. On error the config is left unchanged.
    pub fn apply(&mut self, key: &str, value: SettingValue) -> Result<(), ConfigError> {
        let invalid = |value: SettingValue| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        };

        match (key, value) {
            ("expire-timeout", SettingValue::Int(secs)) => {
                self.expire_timeout =
                    i32::try_from(secs).map_err(|_| invalid(SettingValue::Int(secs)))?;
            }
            ("initial-opacity", SettingValue::Double(opacity)) => {
                self.initial_opacity = opacity.clamp(0.0, 1.0);
            }
            ("notify-location", SettingValue::Int(location)) => {
                self.notify_location =
                    u32::try_from(location).map_err(|_| invalid(SettingValue::Int(location)))?;
            }
            ("do-fadeout", SettingValue::Bool(b)) => self.do_fadeout = b,
            ("do-slideout", SettingValue::Bool(b)) => self.do_slideout = b,
            ("primary-monitor", SettingValue::Bool(b)) => self.primary_monitor = b,
            // stored as an integer by older settings backends
            ("primary-monitor", SettingValue::Int(i)) => self.primary_monitor = i == 1,
            ("do-not-disturb", SettingValue::Bool(b)) => self.do_not_disturb = b,
            (
                "expire-timeout" | "initial-opacity" | "notify-location" | "do-fadeout"
                | "do-slideout" | "primary-monitor" | "do-not-disturb",
                value,
            ) => return Err(invalid(value)),
            (key, _) => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        Ok(())
    }
}
