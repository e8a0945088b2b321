//! Deferred task scheduling on the host's single UI thread.
//!
//! Overlay components never block: work that must wait for a layout pass or
//! a wall-clock delay is posted to a [`TaskQueue`] and runs serially on the
//! one event-processing thread. Every submission returns a [`TaskHandle`]
//! cancellation token, so a component being torn down can withdraw its
//! in-flight work instead of relying on the callback to notice.
//!
//! Two implementations are provided: [`PumpedTaskQueue`] for real hosts,
//! driven from the host's event loop, and [`VirtualTaskQueue`] for tests,
//! which advances virtual time deterministically instead of sleeping.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_time::{Duration, Instant};

pub type Task = Box<dyn FnOnce()>;

/// Schedules work for later execution on the UI thread.
pub trait TaskQueue {
    /// Schedules `task` to run at the next opportunity.
    fn post(&self, task: Task) -> TaskHandle;

    /// Schedules `task` to run no earlier than `delay_ms` milliseconds
    /// from now.
    fn post_delayed(&self, task: Task, delay_ms: u64) -> TaskHandle;
}

/// Cancellation token for a scheduled task.
///
/// Cloning the handle observes the same task; cancelling any clone prevents
/// the task from running if it has not run yet.
#[derive(Clone)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
    finished: Rc<Cell<bool>>,
}

impl TaskHandle {
    fn new() -> Self {
        Self {
            cancelled: Rc::new(Cell::new(false)),
            finished: Rc::new(Cell::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// True once the task has run to completion.
    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }

    fn mark_finished(&self) {
        self.finished.set(true);
    }
}

struct ScheduledTask {
    due_ms: u64,
    seq: u64,
    handle: TaskHandle,
    task: Task,
}

/// Deterministic virtual-time queue for tests.
///
/// Nothing runs until [`advance`](Self::advance) is called; tasks then run
/// in (due time, submission order). A task scheduled from inside a running
/// task participates in the same `advance` call if it is already due, which
/// models "post a further tick" chains without wall-clock sleeps.
pub struct VirtualTaskQueue {
    state: RefCell<VirtualState>,
}

struct VirtualState {
    now_ms: u64,
    seq: u64,
    tasks: Vec<ScheduledTask>,
}

impl VirtualTaskQueue {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(VirtualState {
                now_ms: 0,
                seq: 0,
                tasks: Vec::new(),
            }),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    pub fn has_pending(&self) -> bool {
        !self.state.borrow().tasks.is_empty()
    }

    /// Moves virtual time forward by `ms` and runs every task that becomes
    /// due, in order.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now_ms + ms;
        loop {
            // The borrow must not be held while the task runs: tasks are
            // allowed to schedule more work on this queue.
            let next = {
                let mut state = self.state.borrow_mut();
                let due_index = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.seq))
                    .map(|(index, _)| index);
                match due_index {
                    Some(index) => {
                        let task = state.tasks.remove(index);
                        state.now_ms = state.now_ms.max(task.due_ms);
                        Some(task)
                    }
                    None => None,
                }
            };
            let Some(scheduled) = next else { break };
            if scheduled.handle.is_cancelled() {
                log::trace!("dropping cancelled task due at {}ms", scheduled.due_ms);
                continue;
            }
            (scheduled.task)();
            scheduled.handle.mark_finished();
        }
        self.state.borrow_mut().now_ms = target;
    }

    fn schedule(&self, task: Task, delay_ms: u64) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut state = self.state.borrow_mut();
        let due_ms = state.now_ms + delay_ms;
        let seq = state.seq;
        state.seq += 1;
        state.tasks.push(ScheduledTask {
            due_ms,
            seq,
            handle: handle.clone(),
            task,
        });
        handle
    }
}

impl Default for VirtualTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue for VirtualTaskQueue {
    fn post(&self, task: Task) -> TaskHandle {
        self.schedule(task, 0)
    }

    fn post_delayed(&self, task: Task, delay_ms: u64) -> TaskHandle {
        self.schedule(task, delay_ms)
    }
}

struct PumpedTask {
    due: Instant,
    seq: u64,
    handle: TaskHandle,
    task: Task,
}

/// Wall-clock queue for real hosts.
///
/// The host's event loop calls [`pump`](Self::pump) once per tick; every
/// task whose deadline has passed runs there, in deadline order.
pub struct PumpedTaskQueue {
    state: RefCell<PumpedState>,
}

struct PumpedState {
    seq: u64,
    tasks: Vec<PumpedTask>,
}

impl PumpedTaskQueue {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(PumpedState {
                seq: 0,
                tasks: Vec::new(),
            }),
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.state.borrow().tasks.is_empty()
    }

    /// Runs every task that is due. Call from the host's event loop.
    pub fn pump(&self) {
        let now = Instant::now();
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due_index = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= now)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(index, _)| index);
                due_index.map(|index| state.tasks.remove(index))
            };
            let Some(scheduled) = next else { break };
            if scheduled.handle.is_cancelled() {
                log::trace!("dropping cancelled task");
                continue;
            }
            (scheduled.task)();
            scheduled.handle.mark_finished();
        }
    }

    fn schedule(&self, task: Task, delay: Duration) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut state = self.state.borrow_mut();
        let seq = state.seq;
        state.seq += 1;
        state.tasks.push(PumpedTask {
            due: Instant::now() + delay,
            seq,
            handle: handle.clone(),
            task,
        });
        handle
    }
}

impl Default for PumpedTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue for PumpedTaskQueue {
    fn post(&self, task: Task) -> TaskHandle {
        self.schedule(task, Duration::ZERO)
    }

    fn post_delayed(&self, task: Task, delay_ms: u64) -> TaskHandle {
        self.schedule(task, Duration::from_millis(delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(log: &Rc<RefCell<Vec<&'static str>>>, entry: &'static str) -> Task {
        let log = log.clone();
        Box::new(move || log.borrow_mut().push(entry))
    }

    #[test]
    fn nothing_runs_before_time_advances() {
        let queue = VirtualTaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        queue.post(record(&log, "posted"));
        assert!(log.borrow().is_empty());

        queue.advance(0);
        assert_eq!(*log.borrow(), vec!["posted"]);
    }

    #[test]
    fn tasks_run_in_due_then_submission_order() {
        let queue = VirtualTaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        queue.post_delayed(record(&log, "late"), 100);
        queue.post(record(&log, "first"));
        queue.post(record(&log, "second"));

        queue.advance(100);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
    }

    #[test]
    fn delayed_task_waits_for_its_deadline() {
        let queue = VirtualTaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        queue.post_delayed(record(&log, "late"), 100);

        queue.advance(99);
        assert!(log.borrow().is_empty());
        queue.advance(1);
        assert_eq!(*log.borrow(), vec!["late"]);
    }

    #[test]
    fn cancelled_task_never_runs() {
        let queue = VirtualTaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let handle = queue.post_delayed(record(&log, "cancelled"), 10);
        handle.cancel();

        queue.advance(10);
        assert!(log.borrow().is_empty());
        assert!(!handle.is_finished());
    }

    #[test]
    fn task_scheduled_by_running_task_joins_same_advance() {
        let queue = Rc::new(VirtualTaskQueue::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let inner_log = log.clone();
        let inner_queue = queue.clone();
        queue.post_delayed(
            Box::new(move || {
                inner_log.borrow_mut().push("outer");
                inner_queue.post(record(&inner_log, "inner"));
            }),
            100,
        );

        queue.advance(100);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn handle_reports_completion() {
        let queue = VirtualTaskQueue::new();
        let handle = queue.post(Box::new(|| {}));
        assert!(!handle.is_finished());
        queue.advance(0);
        assert!(handle.is_finished());
        assert!(!queue.has_pending());
    }

    #[test]
    fn pumped_queue_runs_due_tasks_only() {
        let queue = PumpedTaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        queue.post(record(&log, "immediate"));
        queue.post_delayed(record(&log, "delayed"), 60_000);

        queue.pump();
        assert_eq!(*log.borrow(), vec!["immediate"]);
        assert!(queue.has_pending());
    }
}
