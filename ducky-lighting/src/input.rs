//! Key event delivery and the engine clock.
//!
//! Press/release events arrive from a global input hook on a thread the
//! engine does not control. The [`EventBus`] is the hand-off point: the
//! hook calls [`EventBus::dispatch`], registered subscribers (reactive
//! envelopes) get the event. The subscriber list is read-copied out of
//! the lock before delivery, so hooks may be added or removed while an
//! event is in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::debug;

/// Engine timebase: seconds since the clock was created.
///
/// Both frame composition and event timestamps use the same clock, so
/// decay math never mixes timebases.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed since the clock was created.
    pub fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A raw key event as delivered by the input hook.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// Scan code in the hook's code space.
    pub scan_code: i32,
    /// The hook's (lowercase) name for the key, e.g. `"right alt"`.
    pub name: String,
    /// Set when the event came from the numeric keypad.
    pub is_keypad: bool,
    pub kind: KeyEventKind,
    /// Engine-clock timestamp, seconds.
    pub time: f64,
}

/// A subscriber callback for key events.
pub type KeyHook = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

/// Handle for removing a registered hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookId(u64);

/// Lock-guarded subscriber registry for key events.
pub struct EventBus {
    hooks: RwLock<Vec<(HookId, KeyHook)>>,
    next_id: AtomicU64,
    clock: Clock,
}

impl EventBus {
    pub fn new(clock: Clock) -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            clock,
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Register a subscriber; events dispatched after this call reach it.
    pub fn add_hook(&self, hook: KeyHook) -> HookId {
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.hooks.write().push((id, hook));
        id
    }

    pub fn add_hooks<I>(&self, hooks: I) -> Vec<HookId>
    where
        I: IntoIterator<Item = KeyHook>,
    {
        hooks.into_iter().map(|hook| self.add_hook(hook)).collect()
    }

    pub fn remove_hooks(&self, ids: &[HookId]) {
        self.hooks.write().retain(|(id, _)| !ids.contains(id));
        debug!(removed = ids.len(), "removed key hooks");
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.read().len()
    }

    /// Deliver an event to every currently-registered subscriber.
    ///
    /// The list is cloned out of the lock first; a subscriber may
    /// register or remove hooks without deadlocking delivery.
    pub fn dispatch(&self, event: &KeyEvent) {
        let hooks: Vec<KeyHook> = self
            .hooks
            .read()
            .iter()
            .map(|(_, hook)| Arc::clone(hook))
            .collect();
        for hook in hooks {
            hook(event);
        }
    }

    /// Build an event stamped with the bus clock and dispatch it.
    pub fn emit(&self, scan_code: i32, name: &str, is_keypad: bool, kind: KeyEventKind) {
        let event = KeyEvent {
            scan_code,
            name: name.to_string(),
            is_keypad,
            kind,
            time: self.clock.now(),
        };
        self.dispatch(&event);
    }
}
