use std::time::Duration;

use crate::foundation::error::BlobResult;
use crate::schedule::refresh::{RefreshSource, SubscriptionId};

/// Lifecycle of a [`Scheduler`]. There is no paused state: stopping releases the subscription and
/// starting again takes a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Timing information handed to both halves of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameContext {
    /// Zero-based index of this frame since the scheduler was created.
    pub frame: u64,
    /// Time since the previous refresh.
    pub delta: Duration,
    /// Sum of all deltas delivered so far, including this one.
    pub elapsed: Duration,
}

/// Work performed once per refresh: `update` then `render`, never interleaved with another pair.
pub trait FrameTask {
    fn update(&mut self, ctx: &FrameContext) -> BlobResult<()>;
    fn render(&mut self, ctx: &FrameContext) -> BlobResult<()>;
}

/// Single-threaded update/render loop driven by a [`RefreshSource`].
///
/// A frame whose update or render fails is logged and skipped; the loop keeps going.
pub struct Scheduler<S: RefreshSource, T: FrameTask> {
    source: S,
    task: T,
    state: SchedulerState,
    subscription: Option<SubscriptionId>,
    frames: u64,
    skipped: u64,
    elapsed: Duration,
}

impl<S: RefreshSource, T: FrameTask> Scheduler<S, T> {
    pub fn new(source: S, task: T) -> Self {
        Self {
            source,
            task,
            state: SchedulerState::Idle,
            subscription: None,
            frames: 0,
            skipped: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Frames attempted (including skipped ones).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames whose update or render returned an error.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn task_mut(&mut self) -> &mut T {
        &mut self.task
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Subscribes to the refresh source and enters `Running`. A no-op while already running.
    pub fn start(&mut self) -> BlobResult<()> {
        if self.state == SchedulerState::Running {
            return Ok(());
        }
        let id = self.source.subscribe()?;
        self.subscription = Some(id);
        self.state = SchedulerState::Running;
        tracing::debug!(subscription = id.0, "scheduler started");
        Ok(())
    }

    /// Releases the subscription and enters `Stopped`. Idempotent.
    pub fn stop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
            tracing::debug!(subscription = id.0, frames = self.frames, "scheduler stopped");
        }
        self.state = SchedulerState::Stopped;
    }

    /// Runs one update/render pair if running. Returns whether a frame was attempted.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }
        self.elapsed += delta;
        let ctx = FrameContext {
            frame: self.frames,
            delta,
            elapsed: self.elapsed,
        };
        self.frames += 1;

        let result = self
            .task
            .update(&ctx)
            .and_then(|()| self.task.render(&ctx));
        if let Err(e) = result {
            self.skipped += 1;
            tracing::warn!(frame = ctx.frame, error = %e, "frame skipped");
        }
        true
    }

    /// Pumps refreshes until the source runs dry, the scheduler is stopped, or `max_frames`
    /// frames have run. Returns the number of frames attempted by this call.
    pub fn run(&mut self, max_frames: Option<u64>) -> u64 {
        let mut ran = 0u64;
        while self.state == SchedulerState::Running && max_frames.is_none_or(|m| ran < m) {
            let Some(id) = self.subscription else { break };
            let Some(delta) = self.source.next_refresh(id) else {
                break;
            };
            if self.tick(delta) {
                ran += 1;
            }
        }
        ran
    }
}

impl<S: RefreshSource, T: FrameTask> Drop for Scheduler<S, T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: RefreshSource + std::fmt::Debug, T: FrameTask> std::fmt::Debug for Scheduler<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("source", &self.source)
            .field("state", &self.state)
            .field("frames", &self.frames)
            .field("skipped", &self.skipped)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
