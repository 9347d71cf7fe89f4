// DayzWatch - app/service.rs
//
// Fixed-cadence poll loop.
//
// Architecture:
//   - One tick runs to completion before the next starts; ticks never overlap
//     because the loop is single-threaded.
//   - Each tick reads "now" afresh from the injected clock; drift between
//     ticks is acceptable since the window anchors to the observed instant.
//   - An `Arc<AtomicBool>` cancel flag (set by the Ctrl-C handler) stops the
//     loop. The sleep is split into CANCEL_CHECK_INTERVAL_MS slices so a
//     shutdown request is honoured promptly; a running tick is never cut short.

use crate::util::constants::CANCEL_CHECK_INTERVAL_MS;
use chrono::{DateTime, TimeZone};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Drives ticks on a sleep-based interval.
#[derive(Debug, Clone)]
pub struct PollService {
    interval: Duration,
}

impl PollService {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Tick until `cancel` is set. Returns the number of ticks run.
    ///
    /// `clock` is called exactly once per tick and its value passed to `tick`.
    pub fn run<Tz, C, T>(&self, mut clock: C, cancel: &AtomicBool, mut tick: T) -> u64
    where
        Tz: TimeZone,
        C: FnMut() -> DateTime<Tz>,
        T: FnMut(&DateTime<Tz>),
    {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Starting log monitoring service"
        );

        let mut ticks: u64 = 0;
        while !cancel.load(Ordering::SeqCst) {
            let now = clock();
            tick(&now);
            ticks += 1;

            if sleep_interruptible(self.interval, cancel) {
                break;
            }
        }

        tracing::info!(ticks, "Log monitoring service stopped");
        ticks
    }
}

/// Sleep for `total`, waking every CANCEL_CHECK_INTERVAL_MS to look at
/// `cancel`. Returns true if the sleep was cut short by cancellation.
fn sleep_interruptible(total: Duration, cancel: &AtomicBool) -> bool {
    let slice = Duration::from_millis(CANCEL_CHECK_INTERVAL_MS);
    let mut remaining = total;
    while !remaining.is_zero() {
        if cancel.load(Ordering::SeqCst) {
            return true;
        }
        let step = remaining.min(slice);
        std::thread::sleep(step);
        remaining -= step;
    }
    cancel.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_run_reads_clock_once_per_tick_until_cancelled() {
        let cancel = AtomicBool::new(false);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 5).unwrap();
        let mut calls = 0i64;
        let mut seen = Vec::new();

        let ticks = PollService::new(Duration::ZERO).run(
            || {
                calls += 1;
                start + TimeDelta::minutes(calls)
            },
            &cancel,
            |now| {
                seen.push(now.clone());
                if seen.len() == 3 {
                    cancel.store(true, Ordering::SeqCst);
                }
            },
        );

        assert_eq!(ticks, 3);
        assert_eq!(calls, 3);
        assert_eq!(seen[0], start + TimeDelta::minutes(1));
        assert_eq!(seen[2], start + TimeDelta::minutes(3));
    }

    #[test]
    fn test_run_does_not_tick_when_already_cancelled() {
        let cancel = AtomicBool::new(true);
        let ticks = PollService::new(Duration::ZERO).run(Utc::now, &cancel, |_| {
            panic!("no tick expected");
        });
        assert_eq!(ticks, 0);
    }

    #[test]
    fn test_cancel_interrupts_long_sleep() {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::SeqCst);
        });

        let started = Instant::now();
        let ticks = PollService::new(Duration::from_secs(60)).run(Utc::now, &cancel, |_| {});
        assert_eq!(ticks, 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_sleep_interruptible_runs_to_completion() {
        let cancel = AtomicBool::new(false);
        let started = Instant::now();
        assert!(!sleep_interruptible(Duration::from_millis(20), &cancel));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
