//! MacroRegistry: stores macros and dispatches key-down events to them

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::config::MacroDef;
use super::error::RegistryError;
use super::event::{KeyEvent, KeyEventTarget, KeyHandler};
use super::record::{MacroAction, MacroRecord, MacroSummary, MacroUpdate};
use super::types::Chord;
use crate::config::RegistryConfig;

/// Macro table keyed by id, in registration order
type MacroTable = IndexMap<String, MacroRecord>;

/// Outcome of dispatching one key-down event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// The event came from a text-entry element and was not processed
    pub ignored: bool,
    /// Ids of the macros whose actions ran, in dispatch order
    pub fired: Vec<String>,
    /// Ids of the macros whose actions faulted (a subset of `fired`)
    pub faulted: Vec<String>,
}

impl DispatchReport {
    /// Whether any macro matched the event
    pub fn handled(&self) -> bool {
        !self.fired.is_empty()
    }
}

/// Registry of keyboard macros bound to a host's key-down stream
///
/// All methods take `&self`: the registry lives on the host's single event
/// thread, and actions may call back into it while a dispatch is running.
pub struct MacroRegistry {
    macros: Rc<RefCell<MacroTable>>,
    config: RegistryConfig,
    target: Rc<dyn KeyEventTarget>,
    /// Bound once at construction; every attach and detach uses this handle
    handler: KeyHandler,
    listening: Cell<bool>,
}

impl MacroRegistry {
    /// Create an empty, non-listening registry
    pub fn new(target: Rc<dyn KeyEventTarget>, config: RegistryConfig) -> Self {
        let macros = Rc::new(RefCell::new(MacroTable::new()));
        let handler = bind_handler(Rc::downgrade(&macros), config);

        Self {
            macros,
            config,
            target,
            handler,
            listening: Cell::new(false),
        }
    }

    /// Create a registry with the default configuration
    pub fn with_defaults(target: Rc<dyn KeyEventTarget>) -> Self {
        Self::new(target, RegistryConfig::default())
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Register a new enabled macro
    ///
    /// Fails with `DuplicateId` if the id is taken; the registry is unchanged.
    pub fn register(
        &self,
        id: impl Into<String>,
        chord: Chord,
        action: impl Into<MacroAction>,
        description: Option<&str>,
    ) -> Result<String, RegistryError> {
        let record = MacroRecord::new(id, chord, action.into())
            .with_description(description.map(str::to_string));
        self.insert(record)
    }

    /// Register a macro loaded from a definition file, keeping its enabled flag
    pub fn register_def(
        &self,
        def: MacroDef,
        action: impl Into<MacroAction>,
    ) -> Result<String, RegistryError> {
        let mut record =
            MacroRecord::new(def.id, def.chord, action.into()).with_description(def.description);
        record.enabled = def.enabled;
        self.insert(record)
    }

    fn insert(&self, record: MacroRecord) -> Result<String, RegistryError> {
        let mut macros = self.macros.borrow_mut();
        if macros.contains_key(&record.id) {
            return Err(RegistryError::DuplicateId(record.id));
        }

        if self.config.diagnostics {
            tracing::info!(macro_id = %record.id, chord = %record.chord, "Registered macro");
        }

        let id = record.id.clone();
        macros.insert(id.clone(), record);
        Ok(id)
    }

    /// Remove a macro; returns false if no such id
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.macros.borrow_mut().shift_remove(id).is_some();
        if removed && self.config.diagnostics {
            tracing::info!(macro_id = %id, "Unregistered macro");
        }
        removed
    }

    /// Enable a macro; returns false if no such id
    pub fn enable(&self, id: &str) -> bool {
        self.set_enabled(id, |_| true)
    }

    /// Disable a macro; returns false if no such id
    pub fn disable(&self, id: &str) -> bool {
        self.set_enabled(id, |_| false)
    }

    /// Flip a macro's enabled flag; returns false if no such id
    pub fn toggle(&self, id: &str) -> bool {
        self.set_enabled(id, |enabled| !enabled)
    }

    fn set_enabled(&self, id: &str, next: impl FnOnce(bool) -> bool) -> bool {
        let mut macros = self.macros.borrow_mut();
        let Some(record) = macros.get_mut(id) else {
            return false;
        };

        record.enabled = next(record.enabled);
        if self.config.diagnostics {
            tracing::info!(macro_id = %id, enabled = record.enabled, "Macro state changed");
        }
        true
    }

    /// Snapshot of one macro
    pub fn get(&self, id: &str) -> Option<MacroRecord> {
        self.macros.borrow().get(id).cloned()
    }

    /// Snapshot of all macros in registration order
    pub fn get_all(&self) -> Vec<MacroRecord> {
        self.macros.borrow().values().cloned().collect()
    }

    /// Serializable listing of all macros in registration order
    pub fn summaries(&self) -> Vec<MacroSummary> {
        self.macros
            .borrow()
            .values()
            .map(MacroRecord::summary)
            .collect()
    }

    /// Apply a partial update to a macro; returns false if no such id
    pub fn update(&self, id: &str, update: MacroUpdate) -> bool {
        let mut macros = self.macros.borrow_mut();
        let Some(record) = macros.get_mut(id) else {
            return false;
        };

        update.apply_to(record);
        if self.config.diagnostics {
            tracing::info!(
                macro_id = %id,
                chord = %record.chord,
                enabled = record.enabled,
                "Updated macro"
            );
        }
        true
    }

    /// Remove every macro; the listening state is unaffected
    pub fn clear(&self) {
        let mut macros = self.macros.borrow_mut();
        if self.config.diagnostics {
            tracing::info!(count = macros.len(), "Cleared macros");
        }
        macros.clear();
    }

    pub fn len(&self) -> usize {
        self.macros.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.borrow().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.macros.borrow().contains_key(id)
    }

    /// Attach the key-down handler; no-op if already listening
    pub fn start(&self) {
        if self.listening.get() {
            return;
        }

        if !self.target.add_keydown_listener(&self.handler) {
            tracing::warn!("Event target refused the keydown handler; not listening");
            return;
        }
        self.listening.set(true);
        if self.config.diagnostics {
            tracing::info!("Macro registry listening for keydown");
        }
    }

    /// Detach the key-down handler; no-op if not listening
    pub fn stop(&self) {
        if !self.listening.get() {
            return;
        }

        self.target.remove_keydown_listener(&self.handler);
        self.listening.set(false);
        if self.config.diagnostics {
            tracing::info!("Macro registry stopped listening");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.get()
    }

    /// Run the dispatch algorithm for one event
    ///
    /// This is the same path the attached handler takes; hosts that deliver
    /// events themselves can call it directly.
    pub fn dispatch(&self, event: &dyn KeyEvent) -> DispatchReport {
        dispatch_event(&self.macros, self.config, event)
    }
}

impl Drop for MacroRegistry {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacroRegistry")
            .field("macros", &self.macros.borrow().len())
            .field("config", &self.config)
            .field("listening", &self.listening.get())
            .finish()
    }
}

/// Build the single handler handed to the event target
///
/// Holds the table weakly so a target that outlives the registry does not
/// keep it alive.
fn bind_handler(macros: Weak<RefCell<MacroTable>>, config: RegistryConfig) -> KeyHandler {
    Rc::new(move |event: &dyn KeyEvent| {
        if let Some(macros) = macros.upgrade() {
            dispatch_event(&macros, config, event);
        }
    })
}

fn dispatch_event(
    macros: &RefCell<MacroTable>,
    config: RegistryConfig,
    event: &dyn KeyEvent,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    if event.from_text_entry() {
        if config.diagnostics {
            tracing::debug!(key = %event.key(), "Ignoring keydown from text entry element");
        }
        report.ignored = true;
        return report;
    }

    let key = event.key();
    let mods = event.modifiers();

    // Only ids are collected up front; each record is looked up again right
    // before it runs so changes made by earlier actions are honored
    let candidates: Vec<String> = macros
        .borrow()
        .values()
        .filter(|record| record.enabled && record.chord.matches(&key, mods))
        .map(|record| record.id.clone())
        .collect();

    for id in candidates {
        // The borrow ends before the action runs so it can mutate the registry
        let action = match macros.borrow().get(&id) {
            Some(record) if record.enabled && record.chord.matches(&key, mods) => {
                record.action.clone()
            }
            _ => {
                if config.diagnostics {
                    tracing::debug!(macro_id = %id, "Skipping macro changed during dispatch");
                }
                continue;
            }
        };

        if config.suppress_default {
            event.prevent_default();
        }
        if config.suppress_propagation {
            event.stop_propagation();
        }

        if config.diagnostics {
            tracing::info!(macro_id = %id, key = %key, "Dispatching macro");
        }

        if let Err(fault) = action.invoke() {
            tracing::error!(macro_id = %id, error = %fault, "Macro action faulted");
            report.faulted.push(id.clone());
        }
        report.fired.push(id);
    }

    report
}
