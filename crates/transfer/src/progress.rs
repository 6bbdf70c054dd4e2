use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Window over which the transfer rate is averaged.
const RATE_WINDOW: Duration = Duration::from_secs(5);

/// Snapshot of a running transfer, emitted once per chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferProgress {
    /// Bytes moved so far.
    pub total_bytes: u64,
    /// Bytes in the chunk that produced this snapshot.
    pub chunk_bytes: u64,
    /// Average rate over the recent window (0.0 until two chunks arrived).
    pub bytes_per_second: f64,
}

/// Accumulates a running byte total and its recent transfer rate.
#[derive(Debug)]
pub struct ProgressMeter {
    total: u64,
    window: Duration,
    samples: VecDeque<(Instant, u64)>,
}

impl Default for ProgressMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressMeter {
    pub fn new() -> Self {
        Self::with_window(RATE_WINDOW)
    }

    /// Creates a meter averaging the rate over `window`.
    fn with_window(window: Duration) -> Self {
        Self {
            total: 0,
            window,
            samples: VecDeque::new(),
        }
    }

    /// Records `bytes` more and returns the updated snapshot.
    pub fn record(&mut self, bytes: u64) -> TransferProgress {
        self.record_at(Instant::now(), bytes)
    }

    fn record_at(&mut self, now: Instant, bytes: u64) -> TransferProgress {
        self.total += bytes;
        self.samples.push_back((now, bytes));
        if let Some(cutoff) = now.checked_sub(self.window) {
            while self.samples.len() > 2
                && self.samples.front().is_some_and(|(t, _)| *t < cutoff)
            {
                self.samples.pop_front();
            }
        }

        TransferProgress {
            total_bytes: self.total,
            chunk_bytes: bytes,
            bytes_per_second: self.rate(),
        }
    }

    /// Bytes recorded so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Bytes per second across the retained samples.
    ///
    /// The first sample only marks the start of the window, so its bytes
    /// are not counted.
    fn rate(&self) -> f64 {
        let (Some((first, _)), Some((last, _))) = (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        let elapsed = last.duration_since(*first);
        if elapsed.is_zero() {
            return 0.0;
        }
        let moved: u64 = self.samples.iter().skip(1).map(|(_, b)| b).sum();
        moved as f64 / elapsed.as_secs_f64()
    }
}
