//! Adapter binding the registry to the browser's `window` keydown stream

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::event::{same_handler, KeyEvent, KeyEventTarget, KeyHandler, KEYDOWN};
use super::registry::MacroRegistry;
use super::types::Modifiers;
use crate::config::RegistryConfig;

type KeydownClosure = Closure<dyn Fn(web_sys::KeyboardEvent)>;

/// A `web_sys::KeyboardEvent` seen through the `KeyEvent` trait
pub struct WebKeyEvent(pub web_sys::KeyboardEvent);

impl KeyEvent for WebKeyEvent {
    fn key(&self) -> Cow<'_, str> {
        Cow::Owned(self.0.key())
    }

    fn modifiers(&self) -> Modifiers {
        Modifiers::new(
            self.0.ctrl_key(),
            self.0.alt_key(),
            self.0.shift_key(),
            self.0.meta_key(),
        )
    }

    fn target_kind(&self) -> Option<Cow<'_, str>> {
        self.0
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .map(|element| Cow::Owned(element.tag_name()))
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn stop_propagation(&self) {
        self.0.stop_propagation();
    }
}

/// One handler's JS closure and whether it is currently on the target
struct BoundClosure {
    handler: KeyHandler,
    closure: KeydownClosure,
    attached: bool,
}

/// Keydown listeners attached to a DOM event target (normally `window`)
///
/// Each handler is wrapped in exactly one JS closure the first time it is
/// attached. The closure stays cached across detach and re-attach, so a
/// start/stop loop reuses it and the target only frees closures on drop.
pub struct WindowKeyTarget {
    target: web_sys::EventTarget,
    closures: RefCell<Vec<BoundClosure>>,
}

impl WindowKeyTarget {
    /// Listen on the global `window`; `None` outside a browser context
    pub fn window() -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self::new(window.into()))
    }

    pub fn new(target: web_sys::EventTarget) -> Self {
        Self {
            target,
            closures: RefCell::new(Vec::new()),
        }
    }

    /// JS function for a handler, creating its closure on first use
    fn function_for(&self, handler: &KeyHandler) -> js_sys::Function {
        let mut closures = self.closures.borrow_mut();
        if let Some(bound) = closures.iter().find(|b| same_handler(&b.handler, handler)) {
            return bound.closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        }

        let bound = handler.clone();
        let closure = KeydownClosure::new(move |event: web_sys::KeyboardEvent| {
            bound(&WebKeyEvent(event));
        });
        let function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        closures.push(BoundClosure {
            handler: handler.clone(),
            closure,
            attached: false,
        });
        function
    }

    fn set_attached(&self, handler: &KeyHandler, attached: bool) {
        if let Some(bound) = self
            .closures
            .borrow_mut()
            .iter_mut()
            .find(|b| same_handler(&b.handler, handler))
        {
            bound.attached = attached;
        }
    }
}

impl KeyEventTarget for WindowKeyTarget {
    fn add_keydown_listener(&self, handler: &KeyHandler) -> bool {
        // No borrow is held while calling into JS
        let function = self.function_for(handler);
        if let Err(e) = self.target.add_event_listener_with_callback(KEYDOWN, &function) {
            tracing::warn!("Failed to add keydown listener: {:?}", e);
            return false;
        }

        self.set_attached(handler, true);
        true
    }

    fn remove_keydown_listener(&self, handler: &KeyHandler) {
        let function = {
            let closures = self.closures.borrow();
            let Some(bound) = closures
                .iter()
                .find(|b| b.attached && same_handler(&b.handler, handler))
            else {
                return;
            };
            bound.closure.as_ref().unchecked_ref::<js_sys::Function>().clone()
        };

        if let Err(e) = self.target.remove_event_listener_with_callback(KEYDOWN, &function) {
            tracing::warn!("Failed to remove keydown listener: {:?}", e);
        }
        // The closure itself stays cached; an action may be detaching the
        // very listener that is running it
        self.set_attached(handler, false);
    }
}

impl Drop for WindowKeyTarget {
    fn drop(&mut self) {
        for bound in self.closures.get_mut().drain(..) {
            if bound.attached {
                let _ = self
                    .target
                    .remove_event_listener_with_callback(KEYDOWN, bound.closure.as_ref().unchecked_ref());
            }
        }
    }
}

/// Create a registry bound to the browser window
pub fn window_registry(config: RegistryConfig) -> Option<MacroRegistry> {
    let target = WindowKeyTarget::window()?;
    Some(MacroRegistry::new(Rc::new(target), config))
}
