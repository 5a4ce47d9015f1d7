//! # Topic construction options.
//!
//! Provides [`TopicOptions`] — optional lifecycle hooks and an external
//! shutdown binding, applied at topic construction.
//!
//! ## Hooks
//! - **on_close**: fired exactly once, after the topic is fully closed and
//!   every accepted message has been delivered.
//! - **on_subscribe**: fired after each successful subscription, with the new
//!   subscriber count.
//!
//! Hooks run on the topic's own task (the coordination task for
//! [`AsyncTopic`](crate::AsyncTopic), the caller's task for
//! [`SyncTopic`](crate::SyncTopic)); keep them short and non-blocking.
//!
//! ## Example
//! ```rust
//! use hubbub::TopicOptions;
//!
//! let opts = TopicOptions::new()
//!     .with_on_close(|| println!("topic closed"))
//!     .with_on_subscribe(|count| println!("{count} subscribers"));
//! # let _ = opts;
//! ```

use tokio_util::sync::CancellationToken;

/// Hook fired once when close completes.
pub type CloseHook = Box<dyn Fn() + Send + Sync>;

/// Hook fired after each successful subscription with the new count.
pub type SubscribeHook = Box<dyn Fn(usize) + Send + Sync>;

/// Optional lifecycle hooks and shutdown binding for a topic.
///
/// All fields default to "not set"; construct with [`TopicOptions::new`] (or
/// `Default`) and chain `with_*` builders.
#[derive(Default)]
pub struct TopicOptions {
    pub(crate) on_close: Option<CloseHook>,
    pub(crate) on_subscribe: Option<SubscribeHook>,
    pub(crate) shutdown: Option<CancellationToken>,
}

impl TopicOptions {
    /// Creates empty options (no hooks, no shutdown binding).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook invoked exactly once when close completes.
    ///
    /// For an [`AsyncTopic`](crate::AsyncTopic) this means after the drain
    /// phase: every message accepted before closing has been delivered.
    pub fn with_on_close<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Registers a hook invoked after every successful subscription.
    ///
    /// Receives the subscriber count including the new subscriber. Across M
    /// sequential subscriptions the observed counts are strictly increasing
    /// `1..=M`.
    pub fn with_on_subscribe<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_subscribe = Some(Box::new(f));
        self
    }

    /// Binds the topic lifetime to an external [`CancellationToken`].
    ///
    /// Cancelling the token closes the topic as if `close()` had been called.
    /// The watcher task lives until the token fires or the topic closes on
    /// its own.
    ///
    /// Only honored by [`AsyncTopic`](crate::AsyncTopic).
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Fires the on-subscribe hook, if set.
    pub(crate) fn notify_subscribed(&self, count: usize) {
        if let Some(hook) = &self.on_subscribe {
            hook(count);
        }
    }

    /// Fires the on-close hook, if set.
    ///
    /// Callers are responsible for the once-per-lifetime guarantee.
    pub(crate) fn notify_closed(&self) {
        if let Some(hook) = &self.on_close {
            hook();
        }
    }
}

impl std::fmt::Debug for TopicOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicOptions")
            .field("on_close", &self.on_close.is_some())
            .field("on_subscribe", &self.on_subscribe.is_some())
            .field("shutdown", &self.shutdown.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_default_has_no_hooks() {
        let opts = TopicOptions::new();
        assert!(opts.on_close.is_none());
        assert!(opts.on_subscribe.is_none());
        assert!(opts.shutdown.is_none());
    }

    #[test]
    fn test_notify_fires_registered_hooks() {
        let closed = Arc::new(AtomicUsize::new(0));
        let counts = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&closed);
        let s = Arc::clone(&counts);
        let opts = TopicOptions::new()
            .with_on_close(move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .with_on_subscribe(move |count| {
                s.store(count, Ordering::SeqCst);
            });

        opts.notify_subscribed(3);
        opts.notify_closed();

        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert_eq!(counts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_notify_without_hooks_is_noop() {
        let opts = TopicOptions::new();
        opts.notify_subscribed(1);
        opts.notify_closed();
    }
}
