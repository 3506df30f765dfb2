use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// External progress / cancellation collaborator.
///
/// The driver only consults it at record boundaries, at the cadence set by
/// [`YieldPolicy`]; it never dictates scheduling.
pub trait Progress {
    /// Whether the collaborator wants a progress report now.
    fn should_yield(&mut self) -> bool;

    /// `current` of `max` input bytes have been consumed.
    fn report_progress(&mut self, current: usize, max: usize);

    /// Whether the caller has asked the parse to stop.
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn should_yield(&mut self) -> bool {
        (**self).should_yield()
    }

    fn report_progress(&mut self, current: usize, max: usize) {
        (**self).report_progress(current, max);
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn should_yield(&mut self) -> bool {
        false
    }

    fn report_progress(&mut self, _current: usize, _max: usize) {}
}

/// Shared cancellation switch; clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Progress for CancelFlag {
    fn should_yield(&mut self) -> bool {
        false
    }

    fn report_progress(&mut self, _current: usize, _max: usize) {}

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// How often the driver stops at a record boundary to consult its
/// [`Progress`]: after `every_records` records or once `interval` has
/// elapsed, whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldPolicy {
    pub every_records: usize,
    pub interval: Duration,
}

impl Default for YieldPolicy {
    fn default() -> Self {
        Self {
            every_records: 64,
            interval: Duration::from_millis(16),
        }
    }
}

impl YieldPolicy {
    /// Consults the collaborator after every record.
    pub fn every_record() -> Self {
        Self {
            every_records: 1,
            interval: Duration::ZERO,
        }
    }

    pub fn with_every_records(mut self, records: usize) -> Self {
        self.every_records = records.max(1);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Tracks when the next yield point is due.
#[derive(Debug)]
pub(crate) struct YieldClock {
    policy: YieldPolicy,
    records: usize,
    last: Instant,
}

impl YieldClock {
    pub(crate) fn new(policy: YieldPolicy) -> Self {
        Self {
            policy,
            records: 0,
            last: Instant::now(),
        }
    }

    /// Counts one completed record; true when a yield point is due.
    pub(crate) fn tick(&mut self) -> bool {
        self.records += 1;
        if self.records < self.policy.every_records && self.last.elapsed() < self.policy.interval {
            return false;
        }
        self.records = 0;
        self.last = Instant::now();
        true
    }
}
