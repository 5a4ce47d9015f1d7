//! # Backpressure-absorbing subscriber wrapper.
//!
//! Provides [`Buffered`] — wraps any [`Subscriber`] so that a slow or
//! unavailable consumer never blocks the delivery round it is part of.
//!
//! ## Architecture
//! ```text
//! delivery round
//!     │ process(msg)
//!     ▼
//! forwarder ──► [relay, cap 1] ──► queueing stage ──► [slot, cap 1] ──► worker
//!     ▲                            (VecDeque backlog,                     │
//!     │                             unbounded)                            ▼
//!     └───────────── dead token ◄──────── inner returned false ── inner.process(msg)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish side**: the forwarder only waits for the relay
//!   hand-off, never for the wrapped subscriber.
//! - **FIFO**: messages reach the wrapped subscriber in hand-off order.
//! - **Unsubscription propagates**: when the wrapped subscriber returns
//!   `false`, the worker cancels the `dead` token; subsequent forwarding
//!   attempts return `false` so the topic removes the wrapper too, instead of
//!   feeding a dead pipeline.
//! - **No task leak**: dropping the wrapper (topic close, or removal after
//!   `false`) closes the relay; the queueing stage flushes the accepted
//!   backlog to the worker and both tasks exit.
//!
//! ## Memory
//! The backlog is unbounded by design. If the wrapped subscriber processes
//! messages slower than they arrive, the backlog grows without limit; bounding
//! it is the caller's policy decision.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::subscribers::{process_isolated, BoxSubscriber, Subscriber};

/// Decouples a wrapped [`Subscriber`] from the delivery round that feeds it.
///
/// The wrapped subscriber runs on a dedicated worker task; the delivery
/// engine only ever waits for a bounded hand-off.
///
/// ### Notes
/// - Must be created inside a tokio runtime (spawns two tasks).
/// - Per-wrapper FIFO is preserved; see module docs for the full rules.
pub struct Buffered<T> {
    relay: mpsc::Sender<T>,
    dead: CancellationToken,
}

impl<T: Send + 'static> Buffered<T> {
    /// Wraps `inner`, spawning its queueing stage and worker tasks.
    pub fn new<S>(inner: S) -> Self
    where
        S: Subscriber<T>,
    {
        Self::from_boxed(Box::new(inner))
    }

    /// Like [`Buffered::new`], for an already-boxed subscriber.
    pub fn from_boxed(inner: BoxSubscriber<T>) -> Self {
        let (relay_tx, relay_rx) = mpsc::channel(1);
        let (slot_tx, slot_rx) = mpsc::channel(1);
        let dead = CancellationToken::new();

        tokio::spawn(pump(relay_rx, slot_tx));
        tokio::spawn(drive(slot_rx, inner, dead.clone()));

        Self {
            relay: relay_tx,
            dead,
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Subscriber<T> for Buffered<T> {
    /// Forwarder role: hands the message to the queueing stage.
    ///
    /// Suspends until the relay accepts the message or the wrapped subscriber
    /// is known to have unsubscribed, whichever comes first.
    async fn process(&mut self, msg: T) -> bool {
        if self.dead.is_cancelled() {
            return false;
        }
        tokio::select! {
            res = self.relay.send(msg) => res.is_ok(),
            _ = self.dead.cancelled() => false,
        }
    }
}

/// Queueing stage: owns the backlog, keeps at most one message in flight
/// toward the worker.
async fn pump<T: Send>(mut relay: mpsc::Receiver<T>, slot: mpsc::Sender<T>) {
    let mut backlog: VecDeque<T> = VecDeque::new();

    loop {
        if backlog.is_empty() {
            match relay.recv().await {
                Some(msg) => backlog.push_back(msg),
                None => break,
            }
        } else {
            tokio::select! {
                incoming = relay.recv() => match incoming {
                    Some(msg) => backlog.push_back(msg),
                    None => break,
                },
                permit = slot.reserve() => match permit {
                    Ok(permit) => {
                        if let Some(msg) = backlog.pop_front() {
                            permit.send(msg);
                        }
                    }
                    // Worker unsubscribed; remaining backlog is discarded.
                    Err(_) => {
                        trace!(dropped = backlog.len(), "buffered pipeline dead, dropping backlog");
                        return;
                    }
                },
            }
        }
    }

    // Upstream dropped the forwarder; flush what was already accepted.
    while let Some(msg) = backlog.pop_front() {
        if slot.send(msg).await.is_err() {
            return;
        }
    }
}

/// Worker role: feeds the wrapped subscriber one message at a time.
///
/// A panicking inner subscriber is treated as an unsubscribe, so the `dead`
/// token still fires and the forwarder gets removed from its topic.
async fn drive<T: Send + 'static>(
    mut slot: mpsc::Receiver<T>,
    mut inner: BoxSubscriber<T>,
    dead: CancellationToken,
) {
    while let Some(msg) = slot.recv().await {
        if !process_isolated(&mut inner, msg).await {
            trace!("buffered subscriber unsubscribed");
            dead.cancel();
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::{forever, once};
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_buffered_once() {
        let (feedback_tx, mut feedback_rx) = mpsc::channel::<i32>(1);
        let mut sub = Buffered::new(once(move |msg: i32| {
            // Buffered channel means no blocking.
            let _ = feedback_tx.try_send(msg);
        }));

        assert!(sub.process(1234).await);

        let got = timeout(Duration::from_secs(1), feedback_rx.recv())
            .await
            .expect("expected feedback value by now");
        assert_eq!(got, Some(1234));

        // Unsubscription propagates to the forwarder asynchronously.
        let mut removed = false;
        for _ in 0..100 {
            if !sub.process(4321).await {
                removed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(removed, "forwarder should observe the unsubscription");
    }

    #[tokio::test]
    async fn test_buffered_absorbs_choke_point() {
        const MSG_COUNT: usize = 100;

        // Capacity-1 feedback channel creates a choke point to force
        // messages into the backlog.
        let (feedback_tx, mut feedback_rx) = mpsc::channel::<usize>(1);
        let mut sub = Buffered::new(ChokedInner { tx: feedback_tx });

        for i in 0..MSG_COUNT {
            let accepted = timeout(Duration::from_secs(1), sub.process(i))
                .await
                .expect("forwarder must not block on the slow consumer");
            assert!(accepted);
        }

        let mut seen = Vec::with_capacity(MSG_COUNT);
        for _ in 0..MSG_COUNT {
            let got = timeout(Duration::from_secs(1), feedback_rx.recv())
                .await
                .expect("expected all feedback values by now")
                .expect("pipeline ended early");
            seen.push(got);
        }
        // Per-wrapper FIFO.
        assert_eq!(seen, (0..MSG_COUNT).collect::<Vec<_>>());
    }

    struct ChokedInner {
        tx: mpsc::Sender<usize>,
    }

    #[async_trait]
    impl Subscriber<usize> for ChokedInner {
        async fn process(&mut self, msg: usize) -> bool {
            self.tx.send(msg).await.is_ok()
        }
    }

    #[tokio::test]
    async fn test_forwarder_bounded_while_inner_blocked() {
        // Inner blocks forever on its first message.
        let stuck = CancellationToken::new();
        let gate = stuck.clone();
        let mut sub = Buffered::new(BlockedInner { gate });

        assert!(sub.process(1).await);
        // Second hand-off must complete while the inner subscriber is still
        // stuck on the first message.
        let accepted = timeout(Duration::from_secs(1), sub.process(2))
            .await
            .expect("forwarder must return within bounded time");
        assert!(accepted);

        stuck.cancel();
    }

    struct BlockedInner {
        gate: CancellationToken,
    }

    #[async_trait]
    impl Subscriber<i32> for BlockedInner {
        async fn process(&mut self, _msg: i32) -> bool {
            self.gate.cancelled().await;
            true
        }
    }

    #[tokio::test]
    async fn test_drop_flushes_accepted_backlog() {
        const MSG_COUNT: usize = 10;

        let (feedback_tx, mut feedback_rx) = mpsc::channel::<usize>(1);
        let mut sub = Buffered::new(ChokedInner { tx: feedback_tx });

        for i in 0..MSG_COUNT {
            assert!(sub.process(i).await);
        }
        drop(sub);

        // Every accepted message still reaches the wrapped subscriber.
        for i in 0..MSG_COUNT {
            let got = timeout(Duration::from_secs(1), feedback_rx.recv())
                .await
                .expect("expected flushed value by now");
            assert_eq!(got, Some(i));
        }
        // Then the pipeline tears down.
        let end = timeout(Duration::from_secs(1), feedback_rx.recv())
            .await
            .expect("pipeline should close after the flush");
        assert_eq!(end, None);
    }

    #[tokio::test]
    async fn test_worker_panic_unsubscribes_forwarder() {
        let mut sub = Buffered::new(|_msg: i32| -> bool { panic!("inner blew up") });

        assert!(sub.process(1).await);

        // The worker catches the panic, cancels the dead token, and the
        // forwarder starts refusing messages.
        let mut removed = false;
        for _ in 0..100 {
            if !sub.process(2).await {
                removed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(removed, "forwarder should observe the worker's panic");
    }

    #[tokio::test]
    async fn test_forever_wrapper_through_buffer() {
        let (feedback_tx, mut feedback_rx) = mpsc::channel::<i32>(8);
        let mut sub = Buffered::new(forever(move |msg: i32| {
            let _ = feedback_tx.try_send(msg);
        }));

        for i in 0..3 {
            assert!(sub.process(i).await);
        }
        for i in 0..3 {
            let got = timeout(Duration::from_secs(1), feedback_rx.recv())
                .await
                .expect("expected feedback value by now");
            assert_eq!(got, Some(i));
        }
    }
}
