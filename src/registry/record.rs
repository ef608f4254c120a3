//! Macro records: a chord bound to an action, plus partial updates

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use serde::Serialize;

use super::error::ActionFault;
use super::types::Chord;

/// Return type of a macro action
pub type ActionResult = anyhow::Result<()>;

/// A no-argument callback run when a macro's chord is pressed
///
/// Cloning shares the same callback.
#[derive(Clone)]
pub struct MacroAction(Rc<dyn Fn() -> ActionResult>);

impl MacroAction {
    /// Wrap a fallible callback
    pub fn new(action: impl Fn() -> ActionResult + 'static) -> Self {
        Self(Rc::new(action))
    }

    /// Wrap a callback that cannot fail
    pub fn infallible(action: impl Fn() + 'static) -> Self {
        Self::new(move || {
            action();
            Ok(())
        })
    }

    /// Run the callback inside a fault boundary
    ///
    /// Both an `Err` return and a panic become an `ActionFault`.
    pub fn invoke(&self) -> Result<(), ActionFault> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.0)())) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ActionFault::Failed(e)),
            Err(payload) => Err(ActionFault::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Check whether two handles share the same callback
    pub fn ptr_eq(&self, other: &MacroAction) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl<F> From<F> for MacroAction
where
    F: Fn() -> ActionResult + 'static,
{
    fn from(action: F) -> Self {
        Self::new(action)
    }
}

impl fmt::Debug for MacroAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MacroAction(..)")
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A registered macro
#[derive(Debug, Clone)]
pub struct MacroRecord {
    /// Unique, immutable identifier
    pub id: String,
    pub chord: Chord,
    pub action: MacroAction,
    pub description: Option<String>,
    pub enabled: bool,
}

impl MacroRecord {
    /// Create an enabled record
    pub fn new(id: impl Into<String>, chord: Chord, action: MacroAction) -> Self {
        Self {
            id: id.into(),
            chord,
            action,
            description: None,
            enabled: true,
        }
    }

    /// Set the description (builder pattern)
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Serializable view of this record without the action
    pub fn summary(&self) -> MacroSummary {
        MacroSummary {
            id: self.id.clone(),
            chord: self.chord.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
        }
    }
}

/// Listing entry for a registered macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroSummary {
    pub id: String,
    pub chord: Chord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
}

/// A partial replacement of a record's fields
///
/// Fields left as `None` are untouched. The id cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct MacroUpdate {
    pub chord: Option<Chord>,
    pub action: Option<MacroAction>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub enabled: Option<bool>,
}

impl MacroUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chord(mut self, chord: Chord) -> Self {
        self.chord = Some(chord);
        self
    }

    pub fn action(mut self, action: impl Into<MacroAction>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Whether this update would change nothing
    pub fn is_empty(&self) -> bool {
        self.chord.is_none()
            && self.action.is_none()
            && self.description.is_none()
            && self.enabled.is_none()
    }

    /// Apply the present fields onto a record
    pub(crate) fn apply_to(self, record: &mut MacroRecord) {
        if let Some(chord) = self.chord {
            record.chord = chord;
        }
        if let Some(action) = self.action {
            record.action = action;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(enabled) = self.enabled {
            record.enabled = enabled;
        }
    }
}
