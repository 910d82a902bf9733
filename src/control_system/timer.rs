use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::shared_data::IntersectionEvent;

/// Identifies one scheduled phase advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Schedules delayed phase advances.
///
/// A fired timer does not call back into the controller directly; it is
/// delivered as [`IntersectionEvent::TimerFired`] carrying its handle, so the
/// controller can tell a live timer from a stale one.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Idempotent: fired, cancelled and absent handles are all fine.
    fn cancel(&mut self, handle: Option<TimerHandle>);
}

/// Real-time scheduler: one sleeping tokio task per timer.
pub struct TokioScheduler {
    next_id: u64,
    events: UnboundedSender<IntersectionEvent>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(events: UnboundedSender<IntersectionEvent>) -> Self {
        Self {
            next_id: 0,
            events,
            tasks: HashMap::new(),
        }
    }

    /// Timers that have neither fired nor been cancelled.
    pub fn outstanding(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        // Drop bookkeeping for timers that already fired.
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            if events.send(IntersectionEvent::TimerFired(handle)).is_err() {
                log::debug!("Timer {:?} fired after the event loop closed", handle);
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: Option<TimerHandle>) {
        if let Some(task) = handle.and_then(|h| self.tasks.remove(&h)) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

/// Offline scheduler: timers sit in memory until fired explicitly.
///
/// Logical time only moves when a timer is fired, which makes phase
/// sequences reproducible in tests and benchmarks.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    elapsed: Duration,
    pending: BTreeMap<TimerHandle, Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Logical time consumed by fired timers so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Removes the earliest-due pending timer and returns it with its delay.
    pub fn fire_next(&mut self) -> Option<(TimerHandle, Duration)> {
        let handle = self
            .pending
            .iter()
            .min_by_key(|(handle, due)| (**due, **handle))
            .map(|(handle, _)| *handle)?;
        let due = self.pending.remove(&handle)?;
        let delay = due.saturating_sub(self.elapsed);
        self.elapsed = self.elapsed.max(due);
        Some((handle, delay))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.insert(handle, self.elapsed + delay);
        handle
    }

    fn cancel(&mut self, handle: Option<TimerHandle>) {
        if let Some(handle) = handle {
            self.pending.remove(&handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn manual_cancel_is_idempotent() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule(Duration::from_millis(100));
        scheduler.cancel(Some(handle));
        scheduler.cancel(Some(handle));
        scheduler.cancel(None);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn manual_fires_in_due_order_and_tracks_time() {
        let mut scheduler = ManualScheduler::new();
        let slow = scheduler.schedule(Duration::from_millis(400));
        let fast = scheduler.schedule(Duration::from_millis(200));

        assert_eq!(scheduler.fire_next(), Some((fast, Duration::from_millis(200))));
        assert_eq!(scheduler.fire_next(), Some((slow, Duration::from_millis(200))));
        assert_eq!(scheduler.elapsed(), Duration::from_millis(400));
        assert_eq!(scheduler.fire_next(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_posts_its_handle() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        let handle = scheduler.schedule(Duration::from_millis(50));

        match rx.recv().await {
            Some(IntersectionEvent::TimerFired(fired)) => assert_eq!(fired, handle),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        let cancelled = scheduler.schedule(Duration::from_millis(50));
        scheduler.cancel(Some(cancelled));
        scheduler.cancel(Some(cancelled));
        let live = scheduler.schedule(Duration::from_millis(100));

        match rx.recv().await {
            Some(IntersectionEvent::TimerFired(fired)) => assert_eq!(fired, live),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
