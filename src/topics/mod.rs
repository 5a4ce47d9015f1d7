//! # Topics: the broadcast engines.
//!
//! Two engines implement the [`Topic`] trait over the same delivery
//! algorithm:
//!
//! - [`SyncTopic`] — mutex-guarded; `publish` blocks for the full delivery
//!   round, back-pressure reaches the publisher.
//! - [`AsyncTopic`] — a coordination task owns the subscriber set; `publish`
//!   and `subscribe` only wait for hand-off acceptance.
//!
//! The shared round logic lives in `delivery`: one invocation per subscriber
//! per message, swap-remove compaction of the survivors.

mod async_topic;
mod delivery;
mod sync_topic;
mod topic;

pub use async_topic::AsyncTopic;
pub use sync_topic::SyncTopic;
pub use topic::Topic;
