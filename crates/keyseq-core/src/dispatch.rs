//! Dispatch seam between the interpreter and a UI binding.
//!
//! The [`Dispatcher`] trait decouples event generation from how a keyboard
//! event object is actually built and injected. A browser binding, a TUI
//! test backend and the simulation harness all implement it, so the same
//! [`crate::Interpreter`] drives each of them.

use std::{fmt, future::Future};

use crate::KeyboardEvent;

/// Injects keyboard events into elements.
///
/// # Implementations
///
/// - **Simulation**: records events with virtual timestamps
/// - **CLI**: writes events to a stream
/// - **UI binding**: constructs a native event object and fires it
pub trait Dispatcher: Send {
    /// Element handle events are dispatched at.
    type Element: Clone + Send + Sync;

    /// Binding-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Dispatch one event at `element`.
    ///
    /// The returned future resolves once the binding has delivered the
    /// event; listener reactions may still be pending.
    fn dispatch(
        &mut self,
        element: Self::Element,
        event: KeyboardEvent,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Where events are dispatched.
///
/// A resolver is invoked on every dispatch and never cached, so the element
/// may change between events (for example after a re-render).
pub enum Target<E> {
    /// A fixed element.
    Element(E),
    /// Produces the current element on each dispatch.
    Resolver(Box<dyn Fn() -> E + Send + Sync>),
}

impl<E: Clone> Target<E> {
    /// Target a fixed element.
    pub fn element(element: E) -> Self {
        Self::Element(element)
    }

    /// Target whatever `resolve` returns at dispatch time.
    pub fn resolver(resolve: impl Fn() -> E + Send + Sync + 'static) -> Self {
        Self::Resolver(Box::new(resolve))
    }

    /// Current element.
    pub fn resolve(&self) -> E {
        match self {
            Self::Element(element) => element.clone(),
            Self::Resolver(resolve) => resolve(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Target<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => f.debug_tuple("Element").field(element).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}
