//! Configuration for the callback layer
//!
//! A small TOML-backed config struct controlling the registry's
//! memory-vs-speed trade-off and the game-thread task queue capacity.
//!
//! # Example
//!
//! ```ignore
//! use soundlink_core::config::CallbackConfig;
//!
//! let config = CallbackConfig::load_from("configs/soundlink.toml").unwrap_or_default();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Policy for per-game-object package sets after removals
///
/// `MemoryUsage` erases a set as soon as it empties; `Speed` keeps empty
/// sets (with reserved capacity from registration) so that objects which
/// post events repeatedly never reallocate. The right choice is
/// workload-dependent, so it is a runtime option rather than a build-time
/// constant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizePolicy {
    /// Erase empty package sets immediately
    #[default]
    MemoryUsage,
    /// Keep empty sets with reserved capacity
    Speed,
}

/// Callback layer configuration.
///
/// Loaded from `soundlink.toml` by the host, or constructed in code for
/// embedded use. All fields have defaults so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackConfig {
    /// Package-set retention policy after removals
    pub optimize: OptimizePolicy,

    /// Expected simultaneously playing events per game object; used as the
    /// set reservation size under the `Speed` policy
    pub reserve_size: usize,

    /// Capacity of the game-thread task queue used for deferred delegate
    /// execution
    pub task_queue_capacity: usize,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            optimize: OptimizePolicy::default(),
            reserve_size: 8,
            task_queue_capacity: 1024,
        }
    }
}

impl CallbackConfig {
    /// Load config from a file, creating a default one if missing.
    pub fn load_from<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded callback config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default callback config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to a file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved callback config to {:?}", path);
        Ok(())
    }
}
