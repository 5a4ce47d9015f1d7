//! # Synchronous topic.
//!
//! [`SyncTopic`] broadcasts messages under a mutex: `publish` runs the whole
//! delivery round on the caller's task and returns only after every current
//! subscriber has processed the message.
//!
//! ## Rules
//! - **Back-pressure propagates to the publisher**: a slow subscriber slows
//!   `publish` down directly. That is the defining property of this variant;
//!   wrap slow subscribers in [`Buffered`](crate::Buffered) to decouple them.
//! - **Strict publish order**: rounds serialize under the lock, so a
//!   subscriber observes messages in exactly the order they were published.
//! - **Close is immediate**: there is no hand-off queue, hence nothing to
//!   drain. `close` waits only for an in-flight round to finish.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::TopicError;
use crate::options::TopicOptions;
use crate::subscribers::BoxSubscriber;
use crate::topics::delivery::deliver;
use crate::topics::topic::Topic;

/// Mutex-guarded broadcast topic; publishing and subscribing block.
pub struct SyncTopic<T> {
    subscribers: Mutex<Vec<BoxSubscriber<T>>>,
    closed: AtomicBool,
    options: TopicOptions,
}

impl<T> SyncTopic<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an empty topic with default options.
    pub fn new() -> Self {
        Self::with_options(TopicOptions::new())
    }

    /// Creates an empty topic with the given options.
    ///
    /// `TopicOptions::with_shutdown` is not honored by this variant; call
    /// [`Topic::close`] explicitly.
    pub fn with_options(options: TopicOptions) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            options,
        }
    }

    /// Returns `true` once the topic no longer accepts requests.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl<T> Default for SyncTopic<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Topic<T> for SyncTopic<T>
where
    T: Clone + Send + 'static,
{
    /// Broadcasts `msg` to all subscribers, blocking for the full round.
    async fn publish(&self, msg: T) -> Result<(), TopicError> {
        if self.is_closed() {
            return Err(TopicError::Closed);
        }

        let mut subscribers = self.subscribers.lock().await;
        // The topic may have closed while this caller waited on the lock.
        if self.is_closed() {
            return Err(TopicError::Closed);
        }
        deliver(msg, &mut subscribers).await;
        Ok(())
    }

    /// Appends a subscriber and fires the on-subscribe hook with the new
    /// count.
    async fn subscribe(&self, subscriber: BoxSubscriber<T>) -> Result<(), TopicError> {
        if self.is_closed() {
            return Err(TopicError::Closed);
        }

        let mut subscribers = self.subscribers.lock().await;
        if self.is_closed() {
            return Err(TopicError::Closed);
        }
        subscribers.push(subscriber);
        self.options.notify_subscribed(subscribers.len());
        Ok(())
    }

    /// Marks the topic closed and fires the close hook exactly once.
    ///
    /// Takes the subscriber lock, so an in-flight delivery round completes
    /// before the topic reports closed. Safe to call concurrently.
    async fn close(&self) {
        let mut subscribers = self.subscribers.lock().await;

        // First closer wins the hook; everyone returns with the flag set.
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("sync topic closed");
            subscribers.clear();
            self.options.notify_closed();
        }
    }
}
