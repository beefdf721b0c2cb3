use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use crate::foundation::error::{BlobError, BlobResult};

/// Handle for one refresh subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// Timing source behind the frame loop (display refresh, timer, or a test harness).
pub trait RefreshSource {
    fn subscribe(&mut self) -> BlobResult<SubscriptionId>;

    /// Releases `id`. Unknown or already released ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Waits for the next refresh delivered to `id` and returns the time since the previous one.
    /// `None` means the source will not fire again for this subscription.
    fn next_refresh(&mut self, id: SubscriptionId) -> Option<Duration>;
}

/// Refresh signals pushed by hand. Lets tests drive the loop deterministically and observe
/// subscription bookkeeping.
#[derive(Debug, Default)]
pub struct ManualRefresh {
    pending: VecDeque<Duration>,
    active: BTreeSet<SubscriptionId>,
    next_id: u64,
    subscribed_total: u64,
    refuse_subscriptions: bool,
}

impl ManualRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, delta: Duration) {
        self.pending.push_back(delta);
    }

    pub fn push_many(&mut self, n: usize, delta: Duration) {
        self.pending.extend(std::iter::repeat_n(delta, n));
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn active_subscriptions(&self) -> usize {
        self.active.len()
    }

    pub fn subscribed_total(&self) -> u64 {
        self.subscribed_total
    }

    /// Makes every later `subscribe` fail, as a display without a refresh signal would.
    pub fn refuse_subscriptions(&mut self, refuse: bool) {
        self.refuse_subscriptions = refuse;
    }
}

impl RefreshSource for ManualRefresh {
    fn subscribe(&mut self) -> BlobResult<SubscriptionId> {
        if self.refuse_subscriptions {
            return Err(BlobError::resource("refresh signal unavailable"));
        }
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribed_total += 1;
        self.active.insert(id);
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.active.remove(&id);
    }

    fn next_refresh(&mut self, id: SubscriptionId) -> Option<Duration> {
        if !self.active.contains(&id) {
            return None;
        }
        self.pending.pop_front()
    }
}

/// Wall-clock pacing at a fixed rate, optionally limited to a number of refreshes.
#[derive(Debug)]
pub struct FixedRate {
    interval: Duration,
    remaining: Option<u64>,
    active: Option<SubscriptionId>,
    last: Option<Instant>,
    next_id: u64,
}

impl FixedRate {
    pub fn new(fps: f64, limit: Option<u64>) -> BlobResult<Self> {
        Ok(Self {
            interval: interval_for(fps)?,
            remaining: limit,
            active: None,
            last: None,
            next_id: 0,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl RefreshSource for FixedRate {
    fn subscribe(&mut self) -> BlobResult<SubscriptionId> {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.active = Some(id);
        self.last = Some(Instant::now());
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if self.active == Some(id) {
            self.active = None;
            self.last = None;
        }
    }

    fn next_refresh(&mut self, id: SubscriptionId) -> Option<Duration> {
        if self.active != Some(id) || !take_one(&mut self.remaining) {
            return None;
        }
        let now = Instant::now();
        let last = self.last.unwrap_or(now);
        let due = last + self.interval;
        if due > now {
            std::thread::sleep(due - now);
        }
        let fired = Instant::now();
        self.last = Some(fired);
        Some(fired.duration_since(last))
    }
}

/// Fires immediately with a constant nominal delta. Used for offline rendering.
#[derive(Debug)]
pub struct Unpaced {
    interval: Duration,
    remaining: Option<u64>,
    active: Option<SubscriptionId>,
    next_id: u64,
}

impl Unpaced {
    pub fn new(fps: f64, limit: Option<u64>) -> BlobResult<Self> {
        Ok(Self {
            interval: interval_for(fps)?,
            remaining: limit,
            active: None,
            next_id: 0,
        })
    }
}

impl RefreshSource for Unpaced {
    fn subscribe(&mut self) -> BlobResult<SubscriptionId> {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.active = Some(id);
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if self.active == Some(id) {
            self.active = None;
        }
    }

    fn next_refresh(&mut self, id: SubscriptionId) -> Option<Duration> {
        if self.active != Some(id) || !take_one(&mut self.remaining) {
            return None;
        }
        Some(self.interval)
    }
}

fn interval_for(fps: f64) -> BlobResult<Duration> {
    if !fps.is_finite() || fps <= 0.0 || fps > 1000.0 {
        return Err(BlobError::config(format!("fps must be in (0, 1000], got {fps}")));
    }
    Ok(Duration::from_secs_f64(1.0 / fps))
}

fn take_one(remaining: &mut Option<u64>) -> bool {
    match remaining {
        None => true,
        Some(0) => false,
        Some(n) => {
            *n -= 1;
            true
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/refresh.rs"]
mod tests;
