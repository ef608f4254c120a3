//! Host boundary: key-down events and the event target they arrive on

use std::borrow::Cow;
use std::rc::Rc;

use super::types::Modifiers;

/// Name of the host event the registry listens to
pub const KEYDOWN: &str = "keydown";

/// Element kinds whose key presses are normal typing and never trigger macros
pub const TEXT_ENTRY_KINDS: [&str; 3] = ["input", "textarea", "select"];

/// A single key-down event as delivered by the host
pub trait KeyEvent {
    /// Key name as reported by the host (`"s"`, `"S"`, `"Enter"`, ...)
    fn key(&self) -> Cow<'_, str>;

    /// Modifier state at the time of the key press
    fn modifiers(&self) -> Modifiers;

    /// Kind (tag name) of the element the event originated from, if any
    fn target_kind(&self) -> Option<Cow<'_, str>>;

    /// Suppress the host's default action for this event
    fn prevent_default(&self);

    /// Stop the event from propagating further
    fn stop_propagation(&self);

    /// Whether the event came from a text-entry element
    fn from_text_entry(&self) -> bool {
        self.target_kind()
            .is_some_and(|kind| is_text_entry_kind(&kind))
    }
}

/// Check an element kind against the text-entry kinds (case-insensitive)
pub fn is_text_entry_kind(kind: &str) -> bool {
    TEXT_ENTRY_KINDS
        .iter()
        .any(|entry| entry.eq_ignore_ascii_case(kind))
}

/// The bound key-down callback a registry hands to its event target
pub type KeyHandler = Rc<dyn Fn(&dyn KeyEvent)>;

/// Check whether two handles refer to the same bound handler
pub fn same_handler(a: &KeyHandler, b: &KeyHandler) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A process-wide source of key-down events
///
/// Detaching must remove exactly the handler previously attached, so callers
/// pass the same `KeyHandler` to both methods.
pub trait KeyEventTarget {
    /// Attach a handler; returns false if the host refused the subscription
    fn add_keydown_listener(&self, handler: &KeyHandler) -> bool;

    fn remove_keydown_listener(&self, handler: &KeyHandler);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_entry_kinds_case_insensitive() {
        assert!(is_text_entry_kind("input"));
        assert!(is_text_entry_kind("INPUT"));
        assert!(is_text_entry_kind("TextArea"));
        assert!(is_text_entry_kind("SELECT"));
        assert!(!is_text_entry_kind("div"));
        assert!(!is_text_entry_kind("button"));
        assert!(!is_text_entry_kind(""));
    }

    #[test]
    fn test_same_handler_compares_identity() {
        let a: KeyHandler = Rc::new(|_event: &dyn KeyEvent| {});
        let b: KeyHandler = Rc::new(|_event: &dyn KeyEvent| {});
        let a2 = a.clone();

        assert!(same_handler(&a, &a2));
        assert!(!same_handler(&a, &b));
    }
}
