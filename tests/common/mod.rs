//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use keymacro::{KeyEventBus, MacroAction, MacroRegistry, RegistryConfig};

/// Create a registry attached to a fresh bus, not yet listening
pub fn test_registry(config: RegistryConfig) -> (Rc<KeyEventBus>, MacroRegistry) {
    let bus = Rc::new(KeyEventBus::new());
    let registry = MacroRegistry::new(bus.clone(), config);
    (bus, registry)
}

/// Create an action that counts its invocations
pub fn counting_action() -> (Rc<Cell<u32>>, MacroAction) {
    let count = Rc::new(Cell::new(0));
    let action = {
        let count = count.clone();
        MacroAction::infallible(move || count.set(count.get() + 1))
    };
    (count, action)
}
