//! Time and delay abstraction
//!
//! The original flow leans on wall-clock timers for everything transient
//! (reset restart, connection-test delay, toast dismissal). Routing those
//! through a trait lets tests substitute an instant clock instead of
//! sleeping.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

/// Production clock backed by tokio timers.
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(tokio::time::sleep(duration))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::InstantClock;
    use super::*;

    #[tokio::test]
    async fn instant_clock_resolves_without_waiting() {
        let clock = InstantClock;
        let before = std::time::Instant::now();
        clock.sleep(Duration::from_secs(3600)).await;
        assert!(before.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn tokio_clock_sleeps() {
        let clock = TokioClock;
        let before = std::time::Instant::now();
        clock.sleep(Duration::from_millis(20)).await;
        assert!(before.elapsed() >= Duration::from_millis(20));
    }
}
