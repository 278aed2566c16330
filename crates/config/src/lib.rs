//! Persisted assistant configuration.
//!
//! A single JSON file under the user config directory. Every field has a
//! default, so a partial file overlays the defaults and a missing file means
//! "all defaults".
//!
//! Platform-specific paths:
//! - macOS: ~/Library/Application Support/murmur/config.json
//! - Linux: ~/.config/murmur/config.json
//! - Windows: %APPDATA%/murmur/config.json

use murmur_recognition::ListeningMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default wake phrase.
pub const DEFAULT_WAKE_PHRASE: &str = "open the one";

/// Config file name inside the app config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Errors raised while loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no config directory available on this platform")]
    NoConfigDir,

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Read once at monitor startup; when false the monitor never starts.
    pub wake_word_enabled: bool,
    pub wake_phrase: String,
    pub listening_mode: ListeningMode,
    pub timing: TimingConfig,
    pub ai: AiConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_word_enabled: true,
            wake_phrase: DEFAULT_WAKE_PHRASE.to_string(),
            listening_mode: ListeningMode::Passive,
            timing: TimingConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

/// Monitor timing knobs, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub detection_cooldown_ms: u64,
    pub restart_delay_ms: u64,
    pub error_threshold: u32,
    pub long_cooldown_ms: u64,
    pub resume_grace_ms: u64,
    pub health_check_interval_ms: u64,
    pub wake_lock_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            detection_cooldown_ms: 5_000,
            restart_delay_ms: 1_000,
            error_threshold: 3,
            long_cooldown_ms: 10_000,
            resume_grace_ms: 500,
            health_check_interval_ms: 60_000,
            wake_lock_timeout_ms: 10 * 60 * 1_000,
        }
    }
}

impl TimingConfig {
    pub fn detection_cooldown(&self) -> Duration {
        Duration::from_millis(self.detection_cooldown_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn long_cooldown(&self) -> Duration {
        Duration::from_millis(self.long_cooldown_ms)
    }

    pub fn resume_grace(&self) -> Duration {
        Duration::from_millis(self.resume_grace_ms)
    }

    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }

    pub fn wake_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.wake_lock_timeout_ms)
    }
}

/// Remote AI collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// OpenAI-compatible API base URL.
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key. Keys are never stored in the file.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "anthropic/claude-3-haiku".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_secs: 10,
        }
    }
}

impl AiConfig {
    /// API key from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

impl AssistantConfig {
    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::info!(
            path = %path.display(),
            wake_word_enabled = config.wake_word_enabled,
            "Loaded config"
        );
        Ok(config)
    }

    /// Load from the default location.
    pub fn load() -> ConfigResult<Self> {
        let path = default_config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the monitor cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.wake_phrase.trim().is_empty() {
            return Err(ConfigError::Invalid("wake_phrase must not be empty".into()));
        }
        if self.timing.error_threshold == 0 {
            return Err(ConfigError::Invalid(
                "timing.error_threshold must be at least 1".into(),
            ));
        }
        if self.timing.health_check_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "timing.health_check_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Default config path (`<config_dir>/murmur/config.json`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("murmur").join(CONFIG_FILE_NAME))
}
