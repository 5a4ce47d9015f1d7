//! Error types used by topics.
//!
//! The crate has exactly one domain error: [`TopicError::Closed`], returned by
//! `publish` and `subscribe` once a topic has begun or finished closing.
//!
//! Subscriber callbacks have no error channel of their own: a subscriber that
//! wants to signal an internal failure returns `false` (self-unsubscribing)
//! and reports the failure out of band.

use thiserror::Error;

/// # Errors produced by topic operations.
///
/// `publish` and `subscribe` fail only when the topic is no longer accepting
/// requests. `close` never fails.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicError {
    /// The topic has begun or finished closing; no new messages or
    /// subscribers are accepted.
    #[error("topic is closed")]
    Closed,
}

impl TopicError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use hubbub::TopicError;
    ///
    /// assert_eq!(TopicError::Closed.as_label(), "topic_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TopicError::Closed => "topic_closed",
        }
    }
}
