//! Command-line argument parsing for the replay binary
//!
//! Supports:
//! - Choosing the macro definitions and registry config files
//! - Listing registered macros as JSON
//! - Replaying a scripted key-down sequence

use clap::Parser;
use std::path::PathBuf;

use crate::config::RegistryConfig;

/// Replay scripted key presses against a set of keyboard macros
#[derive(Parser, Debug)]
#[command(
    name = "keymacro",
    version,
    about = "Replay key presses against keyboard macros"
)]
pub struct CliArgs {
    /// Key-down script (YAML, or JSON by extension)
    #[arg(value_name = "EVENTS")]
    pub events: Option<PathBuf>,

    /// Macro definitions file [default: ~/.config/keymacro/macros.yaml]
    #[arg(short = 'm', long, value_name = "FILE")]
    pub macros: Option<PathBuf>,

    /// Registry config file [default: ~/.config/keymacro/config.yaml]
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log registry lifecycle and dispatch events
    #[arg(short = 'd', long)]
    pub diagnostics: bool,

    /// Print the registered macros as JSON
    #[arg(short = 'l', long)]
    pub list: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub macros_path: PathBuf,
    pub events_path: Option<PathBuf>,
    pub registry: RegistryConfig,
    pub list: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into replay configuration
    pub fn into_config(self) -> Result<ReplayConfig, String> {
        let macros_path = match self.macros {
            Some(path) => path,
            None => crate::config_paths::macros_file()
                .ok_or_else(|| "No config directory available; pass --macros".to_string())?,
        };

        if self.events.is_none() && !self.list {
            return Err("Nothing to do: pass an events script or --list".to_string());
        }

        let registry = match &self.config {
            Some(path) => RegistryConfig::load_from(path),
            None => RegistryConfig::load(),
        };
        // The flag can only turn diagnostics on
        let registry = registry.with_diagnostics(registry.diagnostics || self.diagnostics);

        Ok(ReplayConfig {
            macros_path,
            events_path: self.events,
            registry,
            list: self.list,
        })
    }
}
