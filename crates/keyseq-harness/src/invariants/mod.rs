//! Invariant checking over recorded event streams.
//!
//! Invariants are properties every dispatched stream must satisfy regardless
//! of which sequence produced it. They verify WHAT must be true, not
//! specific scenarios.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! registry.assert_all(&dispatcher.events(), "after ctrl+a");
//! ```

mod checks;

pub use checks::{KeyPressFollowsKeyDown, KeyUpMatchesKeyDown, ModifierConsistency, RepeatNeverKeyUp};
use keyseq_core::KeyboardEvent;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies an invariant in violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    /// Modifier flags match the modifier down/up history.
    ModifierConsistency,
    /// Every keyup releases a key that is down.
    KeyUpMatchesKeyDown,
    /// Every keypress immediately follows a keydown of the same key.
    KeyPressFollowsKeyDown,
    /// Repeat events are never keyups.
    RepeatNeverKeyUp,
}

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant was violated.
    pub invariant: InvariantKind,
    /// Index of the offending event in the stream.
    pub index: usize,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} at event {}: {}", self.invariant, self.index, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against a dispatched stream.
pub trait Invariant: Send + Sync {
    /// Invariant identity for error reporting.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against `events`, in dispatch order.
    fn check(&self, events: &[KeyboardEvent]) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard stream invariants.
    ///
    /// Includes:
    /// - [`ModifierConsistency`]
    /// - [`KeyUpMatchesKeyDown`]
    /// - [`KeyPressFollowsKeyDown`]
    /// - [`RepeatNeverKeyUp`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(ModifierConsistency);
        registry.add(KeyUpMatchesKeyDown);
        registry.add(KeyPressFollowsKeyDown);
        registry.add(RepeatNeverKeyUp);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against `events`.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, events: &[KeyboardEvent]) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(events).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking with every violation on failure.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, events: &[KeyboardEvent], context: &str) {
        if let Err(violations) = self.check_all(events) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
