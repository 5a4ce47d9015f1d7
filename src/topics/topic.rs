//! # Topic trait.
//!
//! The broadcast-channel capability both engines implement: publish a
//! message, register a subscriber, close with drain.

use async_trait::async_trait;

use crate::error::TopicError;
use crate::subscribers::BoxSubscriber;

/// A broadcast channel for messages of type `T`.
///
/// Implemented by [`SyncTopic`](crate::SyncTopic) (publish blocks for the
/// full delivery round) and [`AsyncTopic`](crate::AsyncTopic) (publish only
/// waits for hand-off acceptance).
///
/// ### Lifecycle
/// A topic is open until the first `close` call (or bound external
/// cancellation); after that, `publish` and `subscribe` return
/// [`TopicError::Closed`] without blocking, and `close` returns once every
/// already-accepted message has been delivered.
#[async_trait]
pub trait Topic<T>: Send + Sync
where
    T: Clone + Send + 'static,
{
    /// Broadcasts a message to all current subscribers.
    ///
    /// Returns `Ok(())` once the message is accepted. Accepted messages are
    /// never dropped: they reach every subscriber registered at the moment
    /// the message is processed.
    async fn publish(&self, msg: T) -> Result<(), TopicError>;

    /// Registers a subscriber for future messages.
    async fn subscribe(&self, subscriber: BoxSubscriber<T>) -> Result<(), TopicError>;

    /// Closes the topic and waits until it is fully closed.
    ///
    /// Idempotent and safe to call concurrently: every caller returns only
    /// after the drain completes and the close hook (if any) has fired.
    async fn close(&self);
}
