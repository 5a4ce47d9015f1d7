//! # Subscriber wrappers with a fixed continuation signal.
//!
//! Small adapters that make intent explicit instead of scattering literal
//! `true`/`false` returns through subscriber bodies:
//!
//! - [`forever`] — consume every message, never unsubscribe.
//! - [`once`] — consume exactly one message, then unsubscribe.
//! - [`noop`] — consume nothing, never unsubscribe (testing aid).

use crate::subscribers::Subscriber;

/// Wraps `f` into a subscriber that never stops consuming messages.
///
/// Helps avoid subscribers that always return `true`.
///
/// ## Example
/// ```rust
/// use hubbub::forever;
///
/// let sub = forever(|msg: String| println!("{msg}"));
/// # let _ = sub;
/// ```
pub fn forever<T, F>(mut f: F) -> impl Subscriber<T>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    move |msg: T| {
        f(msg);
        true
    }
}

/// Wraps `f` into a subscriber that consumes only one message.
///
/// Helps avoid subscribers that always return `false`.
pub fn once<T, F>(mut f: F) -> impl Subscriber<T>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    move |msg: T| {
        f(msg);
        false
    }
}

/// Returns a subscriber that does absolutely nothing, forever.
///
/// Mostly useful for testing.
pub fn noop<T>() -> impl Subscriber<T>
where
    T: Send + 'static,
{
    |_msg: T| true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forever_always_continues() {
        let (sender, receiver) = std::sync::mpsc::channel::<i32>();
        let mut sub = forever(move |msg: i32| {
            let _ = sender.send(msg);
        });

        for i in 0..3 {
            assert!(sub.process(i).await);
        }

        let seen: Vec<i32> = receiver.try_iter().collect();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_once_stops_after_first() {
        let (sender, receiver) = std::sync::mpsc::channel::<i32>();
        let mut sub = once(move |msg: i32| {
            let _ = sender.send(msg);
        });

        assert!(!sub.process(42).await);
        assert_eq!(receiver.try_recv(), Ok(42));
    }

    #[tokio::test]
    async fn test_noop_continues() {
        let mut sub = noop::<i32>();
        assert!(sub.process(7).await);
        assert!(sub.process(8).await);
    }
}
