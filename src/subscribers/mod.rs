//! # Subscribers: the callback side of a topic.
//!
//! This module groups the [`Subscriber`] capability trait, the intent-naming
//! wrappers ([`forever`], [`once`], [`noop`]), and the backpressure-absorbing
//! [`Buffered`] decorator.
//!
//! ## Quick reference
//! - **Plain closures**: any `FnMut(T) -> bool` is a subscriber.
//! - **Wrappers**: fix the continuation signal so intent is explicit.
//! - **Buffered**: moves the wrapped subscriber onto its own worker task so a
//!   slow consumer never stalls a delivery round.

mod buffered;
mod subscriber;
mod wrappers;

pub use buffered::Buffered;
pub use subscriber::{BoxSubscriber, Subscriber};
pub use wrappers::{forever, noop, once};

pub(crate) use subscriber::process_isolated;
