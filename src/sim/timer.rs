//! Cancellable deferred tasks driven by simulation time
//!
//! Nothing here sleeps. The owner advances the scheduler by the tick's `dt`
//! and receives whatever came due.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

#[derive(Debug)]
struct Pending<T> {
    handle: TimerHandle,
    due: f32,
    task: T,
}

/// Deferred task queue
#[derive(Debug)]
pub struct Scheduler<T> {
    now: f32,
    next_handle: u32,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_handle: 1,
            pending: Vec::new(),
        }
    }

    /// Run `task` once `delay` seconds of simulated time have passed
    pub fn schedule(&mut self, delay: f32, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Pending {
            handle,
            due: self.now + delay.max(0.0),
            task,
        });
        handle
    }

    /// Cancel one task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance the clock and take every task now due, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt;

        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;

        // Stable: equal deadlines run in scheduling order
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|p| p.task).collect()
    }
}
