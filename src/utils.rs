// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::thread;
use std::time::Duration;

/// Bounded polling wait for an external asynchronous event.
///
/// Evaluates `predicate` up to `retries + 1` times with a fixed `interval`
/// between attempts. Returns `true` as soon as the predicate holds and
/// `false` once the retry ceiling is exceeded; the caller treats that as a
/// terminal failure for the operation, not a retryable one.
pub fn poll_until(
    retries: u32,
    interval: Duration,
    mut predicate: impl FnMut() -> bool,
) -> bool {
    for attempt in 0..=retries {
        if predicate() {
            return true;
        }
        if attempt < retries {
            thread::sleep(interval);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn returns_true_as_soon_as_the_predicate_holds() {
        let attempts = AtomicU32::new(0);
        let ok = poll_until(10, Duration::from_millis(1), || {
            attempts.fetch_add(1, Ordering::SeqCst) >= 2
        });
        assert!(ok);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn exceeding_the_ceiling_is_terminal() {
        let attempts = AtomicU32::new(0);
        let ok = poll_until(3, Duration::from_millis(1), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            false
        });
        assert!(!ok);
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }
}
