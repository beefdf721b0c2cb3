use super::*;
use crate::foundation::error::BlobError;
use crate::schedule::refresh::ManualRefresh;

#[derive(Default)]
struct Recorder {
    calls: Vec<(&'static str, u64)>,
    fail_update_on: Option<u64>,
    fail_render_on: Option<u64>,
}

impl FrameTask for Recorder {
    fn update(&mut self, ctx: &FrameContext) -> BlobResult<()> {
        if self.fail_update_on == Some(ctx.frame) {
            return Err(BlobError::render("update failed"));
        }
        self.calls.push(("update", ctx.frame));
        Ok(())
    }

    fn render(&mut self, ctx: &FrameContext) -> BlobResult<()> {
        if self.fail_render_on == Some(ctx.frame) {
            return Err(BlobError::render("render failed"));
        }
        self.calls.push(("render", ctx.frame));
        Ok(())
    }
}

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn idle_scheduler_ignores_ticks() {
    let mut s = Scheduler::new(ManualRefresh::new(), Recorder::default());
    assert_eq!(s.state(), SchedulerState::Idle);
    assert!(!s.tick(FRAME));
    assert!(s.task().calls.is_empty());
}

#[test]
fn each_refresh_runs_update_then_render() {
    let mut s = Scheduler::new(ManualRefresh::new(), Recorder::default());
    s.source_mut().push_many(3, FRAME);
    s.start().unwrap();
    assert_eq!(s.run(None), 3);
    assert_eq!(
        s.task().calls,
        vec![
            ("update", 0),
            ("render", 0),
            ("update", 1),
            ("render", 1),
            ("update", 2),
            ("render", 2),
        ]
    );
}

#[test]
fn double_stop_is_harmless_and_halts_frames() {
    let mut s = Scheduler::new(ManualRefresh::new(), Recorder::default());
    s.source_mut().push_many(10, FRAME);
    s.start().unwrap();
    s.run(Some(2));
    s.stop();
    s.stop();
    assert_eq!(s.state(), SchedulerState::Stopped);
    assert_eq!(s.source().active_subscriptions(), 0);

    let before = s.task().calls.len();
    assert_eq!(s.run(None), 0);
    assert!(!s.tick(FRAME));
    assert_eq!(s.task().calls.len(), before);
}

#[test]
fn restart_takes_a_fresh_subscription() {
    let mut s = Scheduler::new(ManualRefresh::new(), Recorder::default());
    s.start().unwrap();
    s.start().unwrap();
    assert_eq!(s.source().subscribed_total(), 1);
    s.stop();
    s.start().unwrap();
    assert_eq!(s.source().subscribed_total(), 2);
    assert_eq!(s.source().active_subscriptions(), 1);
}

#[test]
fn failed_subscription_leaves_scheduler_idle() {
    let mut src = ManualRefresh::new();
    src.refuse_subscriptions(true);
    let mut s = Scheduler::new(src, Recorder::default());
    assert!(s.start().is_err());
    assert_eq!(s.state(), SchedulerState::Idle);
}

#[test]
fn faulty_frames_are_skipped_and_loop_continues() {
    let task = Recorder {
        fail_update_on: Some(1),
        fail_render_on: Some(2),
        ..Recorder::default()
    };
    let mut s = Scheduler::new(ManualRefresh::new(), task);
    s.source_mut().push_many(4, FRAME);
    s.start().unwrap();
    assert_eq!(s.run(None), 4);
    assert_eq!(s.frames(), 4);
    assert_eq!(s.skipped(), 2);
    let renders: Vec<u64> = s
        .task()
        .calls
        .iter()
        .filter(|(k, _)| *k == "render")
        .map(|(_, f)| *f)
        .collect();
    assert_eq!(renders, vec![0, 3]);
}

#[test]
fn elapsed_accumulates_deltas() {
    struct Clock(Vec<FrameContext>);
    impl FrameTask for Clock {
        fn update(&mut self, ctx: &FrameContext) -> BlobResult<()> {
            self.0.push(*ctx);
            Ok(())
        }
        fn render(&mut self, _ctx: &FrameContext) -> BlobResult<()> {
            Ok(())
        }
    }
    let mut s = Scheduler::new(ManualRefresh::new(), Clock(Vec::new()));
    s.source_mut().push(Duration::from_millis(10));
    s.source_mut().push(Duration::from_millis(20));
    s.start().unwrap();
    s.run(None);
    let seen = &s.task().0;
    assert_eq!(seen[1].elapsed, Duration::from_millis(30));
    assert_eq!(seen[1].delta, Duration::from_millis(20));
}

#[test]
fn drop_releases_subscription() {
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked(Rc<Cell<i32>>);
    impl RefreshSource for Tracked {
        fn subscribe(&mut self) -> BlobResult<SubscriptionId> {
            self.0.set(self.0.get() + 1);
            Ok(SubscriptionId(0))
        }
        fn unsubscribe(&mut self, _id: SubscriptionId) {
            self.0.set(self.0.get() - 1);
        }
        fn next_refresh(&mut self, _id: SubscriptionId) -> Option<Duration> {
            None
        }
    }

    let live = Rc::new(Cell::new(0));
    {
        let mut s = Scheduler::new(Tracked(Rc::clone(&live)), Recorder::default());
        s.start().unwrap();
        assert_eq!(live.get(), 1);
    }
    assert_eq!(live.get(), 0);
}
