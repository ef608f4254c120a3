//! Registry error types

use std::fmt;

/// Errors surfaced to callers of the registry API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A macro with this id is already registered
    DuplicateId(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateId(id) => {
                write!(f, "Macro id already registered: {}", id)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// A fault raised by a macro action during dispatch
///
/// Caught at the per-action boundary and logged; never returned to the host.
#[derive(Debug)]
pub enum ActionFault {
    /// The action returned an error
    Failed(anyhow::Error),
    /// The action panicked
    Panicked(String),
}

impl fmt::Display for ActionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionFault::Failed(e) => write!(f, "action failed: {:#}", e),
            ActionFault::Panicked(msg) => write!(f, "action panicked: {}", msg),
        }
    }
}

impl std::error::Error for ActionFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActionFault::Failed(e) => {
                let source: &(dyn std::error::Error + 'static) = e.as_ref();
                Some(source)
            }
            ActionFault::Panicked(_) => None,
        }
    }
}
