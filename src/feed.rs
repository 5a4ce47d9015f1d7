//! # Push-to-pull adapter.
//!
//! [`feed`] converts a subscription into a pull-style sequence: each
//! published message is relayed into a single-slot channel and consumed with
//! [`Feed::next`] (or via the [`futures::Stream`] impl).
//!
//! ## Architecture
//! ```text
//! delivery round ──► relay subscriber ──► [slot, cap 1] ──► Feed::next()
//!                         │
//!                         └─ send fails (Feed dropped) → returns false,
//!                            removed from the topic on the next round
//! ```
//!
//! ## Rules
//! - **Unbuffered** (`buffered = false`): the delivery round blocks on each
//!   message until the consumer pulls it or the feed is dropped.
//! - **Buffered** (`buffered = true`): the relay is wrapped in
//!   [`Buffered`](crate::Buffered); the round never waits on the consumer,
//!   at the cost of unbounded backlog memory.
//! - The sequence ends (`None`) when the topic closes; dropping the feed
//!   unsubscribes the relay. A finished or abandoned feed is not
//!   restartable — call [`feed`] again for a fresh subscription.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TopicError;
use crate::subscribers::{Buffered, Subscriber};
use crate::topics::Topic;

/// Subscribes a relay callback on `topic` and returns the pull side.
///
/// With `buffered = true` the relay is decoupled from the delivery round via
/// [`Buffered`](crate::Buffered).
///
/// ## Example
/// ```rust,no_run
/// # async fn demo() -> Result<(), hubbub::TopicError> {
/// use hubbub::{feed, AsyncTopic, Topic};
///
/// let topic = AsyncTopic::<String>::new();
/// let mut feed = feed(&topic, false).await?;
///
/// while let Some(msg) = feed.next().await {
///     println!("got {msg}");
/// }
/// // None: the topic closed.
/// # Ok(())
/// # }
/// ```
pub async fn feed<T, S>(topic: &S, buffered: bool) -> Result<Feed<T>, TopicError>
where
    T: Clone + Send + 'static,
    S: Topic<T> + ?Sized,
{
    let (tx, rx) = mpsc::channel(1);
    let relay = Relay { slot: tx };

    if buffered {
        topic.subscribe(Box::new(Buffered::new(relay))).await?;
    } else {
        topic.subscribe(Box::new(relay)).await?;
    }

    Ok(Feed { slot: rx })
}

/// Pull handle over a topic subscription.
///
/// Ends when the topic closes; dropping it unsubscribes the backing relay on
/// the next delivery round.
pub struct Feed<T> {
    slot: mpsc::Receiver<T>,
}

impl<T> Feed<T> {
    /// Pulls the next message, or `None` once the topic has closed.
    pub async fn next(&mut self) -> Option<T> {
        self.slot.recv().await
    }
}

impl<T> futures::Stream for Feed<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.slot.poll_recv(cx)
    }
}

/// The subscriber side of a feed: blocks its round on the single slot until
/// the consumer pulls or the feed is dropped.
struct Relay<T> {
    slot: mpsc::Sender<T>,
}

#[async_trait]
impl<T: Send + 'static> Subscriber<T> for Relay<T> {
    async fn process(&mut self, msg: T) -> bool {
        // A closed slot means the consumer dropped the feed: unsubscribe.
        self.slot.send(msg).await.is_ok()
    }
}
