//! # hubbub
//!
//! **hubbub** is an in-process publish/subscribe primitive for Rust.
//!
//! Multiple producers broadcast typed messages to a dynamic set of
//! subscriber callbacks, with two delivery disciplines and an explicit,
//! race-free shutdown protocol that guarantees no accepted message is lost.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌────────────┐  ┌────────────┐  ┌────────────┐
//!  │ producer 1 │  │ producer 2 │  │ producer N │
//!  └─────┬──────┘  └─────┬──────┘  └─────┬──────┘
//!        │ publish       │               │
//!        ▼               ▼               ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │ Topic                                                     │
//! │  - SyncTopic: mutex-guarded, publish blocks for the round │
//! │  - AsyncTopic: coordination task owns the subscriber set, │
//! │    publish/subscribe hand off through depth-1 queues      │
//! │  - delivery: once-per-round invocation, swap-remove       │
//! │    compaction of unsubscribed callbacks                   │
//! └──────┬──────────────────┬───────────────────┬─────────────┘
//!        ▼                  ▼                   ▼
//!  plain subscriber   Buffered(subscriber)   feed(topic, _)
//!  (runs inside the   (own worker task,      (pull handle /
//!   delivery round)    unbounded backlog)     Stream)
//! ```
//!
//! ### Shutdown
//! ```text
//! close()
//!   ├─► stop accepting publish/subscribe (callers get TopicError::Closed)
//!   ├─► drain: every already-accepted message is still delivered
//!   ├─► on_close hook fires exactly once
//!   └─► all close() callers return (idempotent, concurrency-safe)
//! ```
//!
//! ## Features
//! | Area            | Description                                               | Key items                             |
//! |-----------------|-----------------------------------------------------------|---------------------------------------|
//! | **Topics**      | Broadcast engines with sync/async delivery disciplines.   | [`Topic`], [`SyncTopic`], [`AsyncTopic`] |
//! | **Subscribers** | Boolean-continuation callbacks and intent wrappers.       | [`Subscriber`], [`forever`], [`once`], [`noop`] |
//! | **Buffering**   | Decouple a slow consumer from the delivery round.         | [`Buffered`]                          |
//! | **Feeds**       | Pull-style consumption of a subscription.                 | [`feed`], [`Feed`]                    |
//! | **Lifecycle**   | Close/subscribe hooks, external shutdown binding.         | [`TopicOptions`]                      |
//! | **Errors**      | One domain error: the topic is closed.                    | [`TopicError`]                        |
//!
//! ## Example
//! ```rust,no_run
//! use hubbub::{forever, AsyncTopic, Buffered, Topic, TopicOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), hubbub::TopicError> {
//!     let topic = AsyncTopic::<String>::with_options(
//!         TopicOptions::new().with_on_subscribe(|count| println!("{count} subscribers")),
//!     );
//!
//!     // Runs inside the delivery round.
//!     topic
//!         .subscribe(Box::new(forever(|msg: String| println!("fast: {msg}"))))
//!         .await?;
//!
//!     // Runs on its own worker task; never slows the round down.
//!     topic
//!         .subscribe(Box::new(Buffered::new(forever(|msg: String| {
//!             std::thread::sleep(std::time::Duration::from_millis(50));
//!             println!("slow: {msg}");
//!         }))))
//!         .await?;
//!
//!     topic.publish("hello".to_string()).await?;
//!     topic.close().await; // waits for the drain
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//! - Accepted messages are never dropped: the async topic drains its queue
//!   before reporting closed.
//! - Within one round, each subscriber is invoked exactly once; returning
//!   `false` removes it from all later rounds.
//! - `close()` is idempotent and safe to call concurrently; the close hook
//!   fires exactly once per topic lifetime.
//! - [`SyncTopic`] delivers in strict publish order. [`AsyncTopic`] does not
//!   guarantee ordering: subscribers see messages in the order its
//!   coordination task dequeues them.
//!
//! ## Non-goals
//! No persistence, no cross-process transport, no subscriber prioritization,
//! and no bounded-memory backpressure: [`Buffered`]'s backlog is
//! intentionally unbounded, bounding it is the caller's policy decision.

mod error;
mod feed;
mod options;
mod subscribers;
mod topics;

// ---- Public re-exports ----

pub use error::TopicError;
pub use feed::{feed, Feed};
pub use options::{CloseHook, SubscribeHook, TopicOptions};
pub use subscribers::{forever, noop, once, BoxSubscriber, Buffered, Subscriber};
pub use topics::{AsyncTopic, SyncTopic, Topic};
