//! Process-wide input hooks.
//!
//! Widgets that need to observe input outside their own area (global key
//! presses, clicks anywhere on the page) register a [`Hook`] with the host's
//! [`HookRegistry`]. The host only routes a global event to a widget while
//! the corresponding hook is registered.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A global event stream a widget can subscribe to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Window-level key presses.
    KeyDown,
    /// Window-level key releases.
    KeyUp,
    /// Page-level mouse presses, wherever they land.
    DocumentMouseDown,
}

impl Hook {
    pub const ALL: [Hook; 3] = [Hook::KeyDown, Hook::KeyUp, Hook::DocumentMouseDown];
}

/// Registration surface for global hooks.
pub trait HookRegistry {
    fn register(&mut self, hook: Hook);
    fn deregister(&mut self, hook: Hook);
}

/// A cloneable registry shared between the host and its widgets.
///
/// Registrations are counted; the host routes an event when the count for
/// its hook is non-zero.
#[derive(Clone, Debug, Default)]
pub struct SharedHooks {
    counts: Rc<RefCell<HashMap<Hook, usize>>>,
}

impl SharedHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live registrations for `hook`.
    pub fn count(&self, hook: Hook) -> usize {
        self.counts.borrow().get(&hook).copied().unwrap_or(0)
    }

    /// Whether at least one registration for `hook` is live.
    pub fn is_registered(&self, hook: Hook) -> bool {
        self.count(hook) > 0
    }
}

impl HookRegistry for SharedHooks {
    fn register(&mut self, hook: Hook) {
        *self.counts.borrow_mut().entry(hook).or_insert(0) += 1;
    }

    fn deregister(&mut self, hook: Hook) {
        let mut counts = self.counts.borrow_mut();
        if let Some(n) = counts.get_mut(&hook) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                counts.remove(&hook);
            }
        }
    }
}
