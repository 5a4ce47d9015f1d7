//! # Subscriber trait.
//!
//! Provides [`Subscriber`] — the capability a topic invokes for every
//! delivered message.
//!
//! ## Contract
//! - [`Subscriber::process`] receives each message and returns `true` to keep
//!   receiving, `false` to unsubscribe permanently.
//! - A subscriber is never invoked concurrently with itself by the same
//!   topic: each delivery round runs subscribers one at a time, and rounds
//!   for one topic never overlap.
//! - There is no error channel: a subscriber that hits an internal failure
//!   returns `false` and reports the failure out of band.
//!
//! ## Closures
//! Any `FnMut(T) -> bool` closure is a subscriber:
//!
//! ```rust
//! use hubbub::BoxSubscriber;
//!
//! let mut seen = 0u32;
//! let sub: BoxSubscriber<u32> = Box::new(move |msg: u32| {
//!     seen += msg;
//!     seen < 100
//! });
//! # let _ = sub;
//! ```
//!
//! For the common "always continue" / "consume one" shapes, prefer the
//! wrappers in [`crate::subscribers`]: [`forever`](crate::forever),
//! [`once`](crate::once), [`noop`](crate::noop).

use async_trait::async_trait;
use futures::FutureExt;
use tracing::warn;

/// A registered callback with a boolean continuation signal.
///
/// Implementations take `&mut self`: the owning topic guarantees exclusive,
/// serialized access, so subscriber state needs no internal locking.
#[async_trait]
pub trait Subscriber<T>: Send + 'static {
    /// Processes one message.
    ///
    /// Returns `true` to stay subscribed, `false` to be removed from all
    /// subsequent delivery rounds.
    async fn process(&mut self, msg: T) -> bool;
}

/// Owned subscriber handle, as stored in a topic's subscriber set.
pub type BoxSubscriber<T> = Box<dyn Subscriber<T>>;

#[async_trait]
impl<T, F> Subscriber<T> for F
where
    T: Send + 'static,
    F: FnMut(T) -> bool + Send + 'static,
{
    async fn process(&mut self, msg: T) -> bool {
        (self)(msg)
    }
}

/// Invokes a subscriber with panic isolation: a panicking subscriber is
/// treated as having returned `false`.
///
/// The delivery task hosts the whole subscriber set; a panic must not take it
/// down with every other subscriber (and wedge `close` callers waiting on the
/// drain). `AssertUnwindSafe` is sound here because the subscriber is
/// unsubscribed immediately after, so its possibly-inconsistent state is
/// never observed again.
pub(crate) async fn process_isolated<T: Send + 'static>(
    subscriber: &mut BoxSubscriber<T>,
    msg: T,
) -> bool {
    match std::panic::AssertUnwindSafe(subscriber.process(msg))
        .catch_unwind()
        .await
    {
        Ok(keep) => keep,
        Err(panic_err) => {
            let info = {
                let any = &*panic_err;
                if let Some(msg) = any.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = any.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                }
            };
            warn!(panic = %info, "subscriber panicked; unsubscribing");
            false
        }
    }
}
