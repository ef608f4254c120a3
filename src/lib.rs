//! keymacro - keyboard macro registry
//!
//! This crate binds named actions to key chords and dispatches them when a
//! matching key-down event arrives from the host (the browser window, or the
//! in-memory `KeyEventBus` on native targets).

pub mod bus;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod registry;
pub mod tracing;

// Re-export commonly used types
pub use bus::{KeyEventBus, SyntheticKeyEvent};
pub use config::RegistryConfig;
pub use registry::{Chord, MacroAction, MacroRegistry, Modifiers, RegistryError};
