//! Keyboard macro registry
//!
//! This module binds named actions to key chords and runs them on key-down:
//! - Keeps macros in registration order, keyed by a unique id
//! - Matches the event key case-insensitively and every modifier exactly
//! - Never fires for key presses inside input, textarea or select elements
//! - Isolates each action behind its own fault boundary
//!
//! # Architecture
//!
//! ```text
//! host keydown → KeyHandler → MacroRegistry::dispatch() → MacroAction(s)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let bus = Rc::new(KeyEventBus::new());
//! let registry = MacroRegistry::with_defaults(bus.clone());
//! registry.register("save", "ctrl+s".parse()?, MacroAction::infallible(save), None)?;
//! registry.start();
//! ```

mod config;
mod error;
mod event;
mod record;
#[allow(clippy::module_inception)]
mod registry;
mod types;
#[cfg(target_arch = "wasm32")]
mod web_adapter;

pub use config::{load_macro_file, parse_chord, parse_macro_yaml, MacroDef, MacroFileError};
pub use error::{ActionFault, RegistryError};
pub use event::{
    is_text_entry_kind, same_handler, KeyEvent, KeyEventTarget, KeyHandler, KEYDOWN,
    TEXT_ENTRY_KINDS,
};
pub use record::{ActionResult, MacroAction, MacroRecord, MacroSummary, MacroUpdate};
pub use registry::{DispatchReport, MacroRegistry};
pub use types::{Chord, Modifiers};
#[cfg(target_arch = "wasm32")]
pub use web_adapter::{window_registry, WebKeyEvent, WindowKeyTarget};
