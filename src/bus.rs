//! In-memory key-down event source for native hosts, replays and tests
//!
//! `KeyEventBus` stands in for the browser window: registries attach their
//! handler to it and `emit` delivers an event to every attached handler.
//! `SyntheticKeyEvent` records how often each suppression was requested.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::path::Path;

use serde::Deserialize;

use crate::registry::{
    parse_chord, same_handler, KeyEvent, KeyEventTarget, KeyHandler, MacroFileError, Modifiers,
};

/// An event target that delivers events synchronously to attached handlers
///
/// Unlike the DOM, the bus does not collapse duplicate registrations of the
/// same handler, so `listener_count` exposes double attaches.
#[derive(Default)]
pub struct KeyEventBus {
    listeners: RefCell<Vec<KeyHandler>>,
}

impl KeyEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently attached handlers
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver an event to every attached handler; returns how many ran
    pub fn emit(&self, event: &dyn KeyEvent) -> usize {
        // Handlers may attach or detach while the event is delivered
        let listeners = self.listeners.borrow().clone();
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }
}

impl KeyEventTarget for KeyEventBus {
    fn add_keydown_listener(&self, handler: &KeyHandler) -> bool {
        self.listeners.borrow_mut().push(handler.clone());
        true
    }

    fn remove_keydown_listener(&self, handler: &KeyHandler) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(pos) = listeners.iter().position(|l| same_handler(l, handler)) {
            listeners.remove(pos);
        }
    }
}

impl std::fmt::Debug for KeyEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// An owned key-down event
#[derive(Debug, Clone, Default)]
pub struct SyntheticKeyEvent {
    pub key: String,
    pub mods: Modifiers,
    /// Originating element kind, e.g. `"div"` or `"input"`
    pub target: Option<String>,
    default_prevented: Cell<u32>,
    propagation_stopped: Cell<u32>,
}

impl SyntheticKeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    /// Set the originating element kind
    pub fn on(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get() > 0
    }

    pub fn default_prevented_count(&self) -> u32 {
        self.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get() > 0
    }

    pub fn propagation_stopped_count(&self) -> u32 {
        self.propagation_stopped.get()
    }
}

impl KeyEvent for SyntheticKeyEvent {
    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.key)
    }

    fn modifiers(&self) -> Modifiers {
        self.mods
    }

    fn target_kind(&self) -> Option<Cow<'_, str>> {
        self.target.as_deref().map(Cow::Borrowed)
    }

    fn prevent_default(&self) {
        self.default_prevented.set(self.default_prevented.get() + 1);
    }

    fn stop_propagation(&self) {
        self.propagation_stopped.set(self.propagation_stopped.get() + 1);
    }
}

/// Root structure of an event script file
#[derive(Debug, Deserialize)]
struct EventScript {
    #[serde(default)]
    events: Vec<ScriptedKey>,
}

/// A single scripted key press, e.g. `{ keys: ctrl+S, target: div }`
///
/// `keys` uses chord syntax; the base key's case is kept as written so
/// scripts can exercise case-insensitive matching.
#[derive(Debug, Deserialize)]
struct ScriptedKey {
    keys: String,
    #[serde(default)]
    target: Option<String>,
}

/// Load a key-down script from a YAML or JSON file (chosen by extension)
pub fn load_event_script(path: &Path) -> Result<Vec<SyntheticKeyEvent>, MacroFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| MacroFileError::IoError(e.to_string()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let script: EventScript =
            serde_json::from_str(&content).map_err(|e| MacroFileError::ParseError(e.to_string()))?;
        script_events(script)
    } else {
        parse_event_script(&content)
    }
}

/// Parse a key-down script from a YAML string
pub fn parse_event_script(yaml: &str) -> Result<Vec<SyntheticKeyEvent>, MacroFileError> {
    let script: EventScript =
        serde_yaml::from_str(yaml).map_err(|e| MacroFileError::ParseError(e.to_string()))?;
    script_events(script)
}

fn script_events(script: EventScript) -> Result<Vec<SyntheticKeyEvent>, MacroFileError> {
    script
        .events
        .into_iter()
        .map(|scripted| {
            let chord = parse_chord(&scripted.keys)?;
            let mut event = SyntheticKeyEvent::new(chord.key).with_mods(chord.mods);
            event.target = scripted.target;
            Ok(event)
        })
        .collect()
}
