//! Run event emitter port.
//!
//! Abstracts how progress leaves the core so the orchestrator never couples
//! to a transport (terminal redraw, IPC, websocket). Emission happens
//! synchronously on the orchestrator's control task; implementations that
//! need thread affinity must hop threads themselves.

use std::sync::Arc;

use crate::events::RunEvent;

/// Port for emitting run events.
///
/// `emit` must not block for long - it sits on the control path between two
/// output lines of a live process.
pub trait RunEventEmitterPort: Send + Sync {
    /// Emit one event.
    fn emit(&self, event: RunEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// Lets holders of `Box<dyn RunEventEmitterPort>` clone without the
    /// underlying type implementing `Clone`.
    fn clone_box(&self) -> Box<dyn RunEventEmitterPort>;
}

impl Clone for Box<dyn RunEventEmitterPort> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Emitter that discards all events - tests and headless embedding.
#[derive(Debug, Clone, Default)]
pub struct NoopRunEmitter;

impl NoopRunEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RunEventEmitterPort for NoopRunEmitter {
    fn emit(&self, _event: RunEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn RunEventEmitterPort> {
        Box::new(self.clone())
    }
}

/// Emitter that forwards every event to a closure.
///
/// The simplest way for an embedder to observe a run without writing a port
/// implementation of its own.
#[derive(Clone)]
pub struct CallbackEmitter {
    callback: Arc<dyn Fn(RunEvent) + Send + Sync>,
}

impl CallbackEmitter {
    /// Wrap a closure as an emitter.
    pub fn new(callback: impl Fn(RunEvent) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }
}

impl RunEventEmitterPort for CallbackEmitter {
    fn emit(&self, event: RunEvent) {
        (self.callback)(event);
    }

    fn clone_box(&self) -> Box<dyn RunEventEmitterPort> {
        Box::new(self.clone())
    }
}
