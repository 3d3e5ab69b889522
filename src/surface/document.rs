//! Per-Document State
//!
//! The only mutable runtime state in the system: one idempotency flag and one
//! modifier-key flag per top-level browsing context. Both are created fresh
//! for every new document and discarded with it; they are never copied to or
//! shared with another document.

/// Mutable flags scoped to exactly one document/browsing context.
///
/// Mirrors on the Rust side the two globals the compiled script maintains
/// in-page, so the host can consult them without evaluating script.
#[derive(Debug, Default)]
pub struct DocumentState {
    applied: bool,
    modifier_held: bool,
}

impl DocumentState {
    /// Fresh state for a newly created document. Both flags start cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-set the idempotency guard.
    ///
    /// Returns `true` on the first call for this document; every later call
    /// returns `false`, meaning the override steps must be skipped entirely.
    pub fn mark_applied(&mut self) -> bool {
        if self.applied {
            return false;
        }
        self.applied = true;
        true
    }

    /// Whether the overrides have been applied to this document.
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Control modifier pressed.
    pub fn modifier_down(&mut self) {
        self.modifier_held = true;
    }

    /// Control modifier released.
    pub fn modifier_up(&mut self) {
        self.modifier_held = false;
    }

    /// The window lost focus; a held modifier can no longer be observed, so
    /// the flag is cleared.
    pub fn window_blurred(&mut self) {
        self.modifier_held = false;
    }

    /// Whether the Control modifier is currently held in this document.
    pub fn modifier_held(&self) -> bool {
        self.modifier_held
    }
}
