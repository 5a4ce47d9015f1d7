//! # Delivery engine.
//!
//! One delivery round: invoke every currently-registered subscriber exactly
//! once for a single message and compact the survivors in place.
//!
//! ## Algorithm
//! Two cursors, `next` at the front and `last` at the final index. Scan
//! forward from `next`; on a `false` return, scan backward from `last`
//! invoking each unvisited subscriber until one survives or the cursors
//! meet, then backfill slot `next` with that survivor (swap-remove). A single
//! pass, O(n) invocations, O(1) extra space.
//!
//! ## Rules
//! - Each subscriber runs exactly once per round.
//! - A subscriber returning `false` is dropped from the set.
//! - A subscriber that panics is caught and treated as returning `false`;
//!   the round and the task hosting it carry on.
//! - Survivor order is **not** stable: a removed front slot may be backfilled
//!   by a tail subscriber. All-true rounds keep count and front-to-back
//!   invocation order.

use crate::subscribers::{process_isolated, BoxSubscriber};

/// Delivers `msg` to every subscriber once, keeping only those that returned
/// `true`. Compacts `subscribers` in place.
pub(crate) async fn deliver<T>(msg: T, subscribers: &mut Vec<BoxSubscriber<T>>)
where
    T: Clone + Send + 'static,
{
    if subscribers.is_empty() {
        return;
    }

    let mut next = 0;
    let mut last = subscribers.len() - 1;

    while next <= last {
        if !process_isolated(&mut subscribers[next], msg.clone()).await {
            while last > next && !process_isolated(&mut subscribers[last], msg.clone()).await {
                last -= 1;
            }

            if last <= next {
                break;
            }

            subscribers.swap(next, last);
            last -= 1;
        }
        next += 1;
    }

    subscribers.truncate(next);
}
