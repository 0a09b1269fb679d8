//! Poll-until-ready helper
//!
//! Replaces hand-written busy-wait loops (link status, sensor conversion)
//! with one routine that takes the poll interval and an optional timeout.

use core::future::Future;

use embedded_hal_async::delay::DelayNs;

/// Something that can be asked whether it is ready yet
pub trait ReadyCheck {
    /// Check readiness once
    fn is_ready(&mut self) -> impl Future<Output = bool>;

    /// Called after every interval that ended still not ready
    fn on_pending(&mut self, _attempt: u32) {}
}

/// How long and how often to poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaitPolicy {
    /// Pause between two checks
    pub interval_ms: u32,
    /// Total time budget; `None` polls forever
    pub timeout_ms: Option<u32>,
}

impl WaitPolicy {
    /// Poll every `interval_ms` with no deadline
    pub const fn forever(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            timeout_ms: None,
        }
    }

    /// Poll every `interval_ms` for at most `timeout_ms`
    pub const fn bounded(interval_ms: u32, timeout_ms: u32) -> Self {
        Self {
            interval_ms,
            timeout_ms: Some(timeout_ms),
        }
    }
}

/// Wait errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitError {
    /// The check was still not ready when the budget ran out
    Timeout,
}

impl core::fmt::Display for WaitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "Timed out waiting for readiness"),
        }
    }
}

impl core::error::Error for WaitError {}

/// Poll `check` until it reports ready
///
/// The check runs first, so an already ready check returns without
/// sleeping. Returns the number of intervals waited.
pub async fn wait_until<P, D>(
    check: &mut P,
    delay: &mut D,
    policy: WaitPolicy,
) -> Result<u32, WaitError>
where
    P: ReadyCheck,
    D: DelayNs,
{
    let mut attempts: u32 = 0;
    let mut waited_ms: u32 = 0;
    loop {
        if check.is_ready().await {
            return Ok(attempts);
        }
        if let Some(timeout_ms) = policy.timeout_ms {
            if waited_ms >= timeout_ms {
                return Err(WaitError::Timeout);
            }
        }
        delay.delay_ms(policy.interval_ms).await;
        waited_ms = waited_ms.saturating_add(policy.interval_ms);
        attempts = attempts.saturating_add(1);
        check.on_pending(attempts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TickDelay;
    use embassy_futures::block_on;

    struct Countdown {
        remaining: u32,
        pending_calls: u32,
    }

    impl ReadyCheck for Countdown {
        async fn is_ready(&mut self) -> bool {
            if self.remaining == 0 {
                return true;
            }
            self.remaining -= 1;
            false
        }

        fn on_pending(&mut self, attempt: u32) {
            self.pending_calls = attempt;
        }
    }

    #[test]
    fn test_ready_check_does_not_sleep() {
        let mut check = Countdown {
            remaining: 0,
            pending_calls: 0,
        };
        let mut delay = TickDelay::default();
        let waited = block_on(wait_until(&mut check, &mut delay, WaitPolicy::forever(1000)));
        assert_eq!(waited, Ok(0));
        assert!(delay.calls.is_empty());
    }

    #[test]
    fn test_waits_until_ready() {
        let mut check = Countdown {
            remaining: 3,
            pending_calls: 0,
        };
        let mut delay = TickDelay::default();
        let waited = block_on(wait_until(&mut check, &mut delay, WaitPolicy::forever(1000)));
        assert_eq!(waited, Ok(3));
        assert_eq!(delay.calls, [1000, 1000, 1000]);
        assert_eq!(check.pending_calls, 3);
    }

    #[test]
    fn test_bounded_wait_times_out() {
        let mut check = Countdown {
            remaining: u32::MAX,
            pending_calls: 0,
        };
        let mut delay = TickDelay::default();
        let waited = block_on(wait_until(&mut check, &mut delay, WaitPolicy::bounded(10, 50)));
        assert_eq!(waited, Err(WaitError::Timeout));
        assert_eq!(delay.total_ms(), 50);
    }
}
