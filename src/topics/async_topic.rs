//! # Asynchronous topic.
//!
//! [`AsyncTopic`] decouples publishers and subscribers from delivery: a
//! single coordination task exclusively owns the subscriber set, and every
//! `publish`/`subscribe` request reaches it through a depth-1 hand-off queue.
//! No lock is ever taken around delivery.
//!
//! ## Architecture
//! ```text
//! publish(msg) ──► gate clone ──► detached send ──► [publish queue, cap 1] ─┐
//!                                                                           ├─► coordination task
//! subscribe(fn) ─► gate clone ──► detached send ──► [subscribe queue, cap 1]┘   (owns Vec<subscriber>,
//!                                                                                runs delivery rounds)
//! close() ───► drop gate senders ───► queues stop accepting ───► drain ───► on_close ───► done
//! ```
//!
//! ## Rules
//! - **Accepted means delivered**: a successful `publish` hands its message
//!   to a detached sender that keeps the queue alive until the hand-off
//!   lands; the drain phase consumes everything still queued at close time.
//! - **Callers never wait for delivery**: `publish`/`subscribe` return once
//!   the request is accepted, not once it is processed.
//! - **No ordering guarantee**: the hand-off runs on detached tasks, so
//!   messages reach subscribers in the order the coordination task dequeues
//!   them, which can differ from publish order even for a single publisher.
//!   Use [`SyncTopic`](crate::SyncTopic) when strict order matters.
//! - **Close is idempotent and race-free**: the first caller drops the gate
//!   senders; every caller waits on the same completion token.
//!
//! ## Fairness
//! The coordination task selects between the two queues without priority
//! (`tokio::select!` polls branches in random order). Under sustained load on
//! one queue the other is not starvation-proof beyond that; this is a
//! documented limitation, not a correctness bug.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::TopicError;
use crate::options::TopicOptions;
use crate::subscribers::BoxSubscriber;
use crate::topics::delivery::deliver;
use crate::topics::topic::Topic;

/// Hand-off senders; dropping them marks both queues finished-accepting.
struct Gates<T> {
    publish: mpsc::Sender<T>,
    subscribe: mpsc::Sender<BoxSubscriber<T>>,
}

struct Shared<T> {
    /// `None` once closing has begun.
    gates: Mutex<Option<Gates<T>>>,
    /// Cancelled by the coordination task after the drain completes.
    done: CancellationToken,
}

/// Queue-mediated broadcast topic; publishing and subscribing are decoupled
/// from delivery.
///
/// Cheap to clone: clones share the same topic.
///
/// ### Notes
/// - Must be created inside a tokio runtime (spawns the coordination task).
/// - Dropping the last handle without `close()` also shuts the topic down,
///   but without waiting for the drain.
pub struct AsyncTopic<T> {
    shared: Arc<Shared<T>>,
}

impl<T> AsyncTopic<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a topic with default options and spawns its coordination task.
    pub fn new() -> Self {
        Self::with_options(TopicOptions::new())
    }

    /// Creates a topic with the given options.
    ///
    /// If [`TopicOptions::with_shutdown`] was set, cancelling that token
    /// closes the topic as if [`Topic::close`] had been called.
    pub fn with_options(mut options: TopicOptions) -> Self {
        let (publish_tx, publish_rx) = mpsc::channel(1);
        let (subscribe_tx, subscribe_rx) = mpsc::channel(1);
        let done = CancellationToken::new();
        let shutdown = options.shutdown.take();

        let shared = Arc::new(Shared {
            gates: Mutex::new(Some(Gates {
                publish: publish_tx,
                subscribe: subscribe_tx,
            })),
            done: done.clone(),
        });

        tokio::spawn(run(publish_rx, subscribe_rx, options, done.clone()));

        if let Some(token) = shutdown {
            // Weak handle: an abandoned topic is still torn down by the
            // usual drop path even if the token never fires.
            let weak = Arc::downgrade(&shared);
            tokio::spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => {
                        if let Some(shared) = weak.upgrade() {
                            shared.gates.lock().await.take();
                        }
                    }
                    _ = done.cancelled() => {}
                }
            });
        }

        Self { shared }
    }
}

impl<T> Default for AsyncTopic<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for AsyncTopic<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

#[async_trait]
impl<T> Topic<T> for AsyncTopic<T>
where
    T: Clone + Send + 'static,
{
    /// Accepts `msg` for broadcast without waiting for delivery.
    ///
    /// The hand-off to the coordination task happens on a detached task, so
    /// the caller is never queued behind a full publish queue.
    async fn publish(&self, msg: T) -> Result<(), TopicError> {
        let gate = {
            let gates = self.shared.gates.lock().await;
            match gates.as_ref() {
                Some(gates) => gates.publish.clone(),
                None => return Err(TopicError::Closed),
            }
        };

        // The cloned sender keeps the queue alive until the hand-off lands,
        // so the drain phase cannot miss this message.
        tokio::spawn(async move {
            let _ = gate.send(msg).await;
        });
        Ok(())
    }

    /// Accepts a subscriber without waiting for registration.
    async fn subscribe(&self, subscriber: BoxSubscriber<T>) -> Result<(), TopicError> {
        let gate = {
            let gates = self.shared.gates.lock().await;
            match gates.as_ref() {
                Some(gates) => gates.subscribe.clone(),
                None => return Err(TopicError::Closed),
            }
        };

        tokio::spawn(async move {
            let _ = gate.send(subscriber).await;
        });
        Ok(())
    }

    /// Closes the topic and waits for the drain to complete.
    ///
    /// The first caller drops the gate senders, which stops acceptance of
    /// new requests; every caller (first or not) then waits until all
    /// already-accepted messages have been delivered and the close hook has
    /// fired.
    async fn close(&self) {
        self.shared.gates.lock().await.take();
        self.shared.done.cancelled().await;
    }
}

/// Coordination task: sole owner of the subscriber set.
///
/// Selects fairly between the two queues while they accept requests, then
/// drains whatever was already accepted, fires the close hook once, and
/// signals completion.
async fn run<T>(
    mut publish_rx: mpsc::Receiver<T>,
    mut subscribe_rx: mpsc::Receiver<BoxSubscriber<T>>,
    options: TopicOptions,
    done: CancellationToken,
) where
    T: Clone + Send + 'static,
{
    // Close callers block on this token; the guard cancels it even if this
    // task unwinds (a user hook may panic), so close can never hang.
    let _guard = done.drop_guard();

    let mut subscribers: Vec<BoxSubscriber<T>> = Vec::new();
    let mut accepting_subscribe = true;
    let mut accepting_publish = true;

    while accepting_subscribe || accepting_publish {
        tokio::select! {
            subscriber = subscribe_rx.recv(), if accepting_subscribe => match subscriber {
                Some(subscriber) => {
                    subscribers.push(subscriber);
                    trace!(count = subscribers.len(), "subscriber registered");
                    options.notify_subscribed(subscribers.len());
                }
                None => accepting_subscribe = false,
            },
            msg = publish_rx.recv(), if accepting_publish => match msg {
                Some(msg) => deliver(msg, &mut subscribers).await,
                None => accepting_publish = false,
            },
        }
    }

    debug!("async topic drained and closed");
    // Dropping the set tears down Buffered pipelines and feed relays.
    drop(subscribers);
    options.notify_closed();
}
