//! Registry configuration
//!
//! Read from `~/.config/keymacro/config.yaml`; fixed once a registry is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Dispatch and diagnostics options for a `MacroRegistry`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Suppress the event's default action for every dispatched match
    #[serde(default = "default_suppress_default", alias = "suppressDefault")]
    pub suppress_default: bool,
    /// Stop the event's propagation for every dispatched match
    #[serde(default, alias = "suppressPropagation")]
    pub suppress_propagation: bool,
    /// Emit log lines for lifecycle and dispatch events
    #[serde(default)]
    pub diagnostics: bool,
}

fn default_suppress_default() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            suppress_default: default_suppress_default(),
            suppress_propagation: false,
            diagnostics: false,
        }
    }
}

impl RegistryConfig {
    pub fn with_suppress_default(mut self, suppress_default: bool) -> Self {
        self.suppress_default = suppress_default;
        self
    }

    pub fn with_suppress_propagation(mut self, suppress_propagation: bool) -> Self {
        self.suppress_propagation = suppress_propagation;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Parse config from a YAML string; missing keys take their defaults
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load config from the user config directory, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
