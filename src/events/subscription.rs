// src/events/subscription.rs
//
// Explicit cancellation handle for live listeners.

use std::fmt;

/// A live listener registration.
///
/// The owner must release it on scope exit: either call [`Subscription::cancel`]
/// or let it drop. The release closure runs exactly once either way.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing behind it.
    pub fn inert() -> Self {
        Self { release: None }
    }

    /// Stop further callbacks and release the listener.
    pub fn cancel(mut self) {
        self.release_now();
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
