//! Scheduler - Cooperative event loop for deferred work.
//!
//! Everything runs on one thread. Handlers run to completion; anything that must
//! happen "later" (debounced completion, reading caret state after a key event
//! settles) is queued here and runs when the host advances the clock.
//!
//! The clock is virtual. Tests move it explicitly; a terminal front end moves it
//! by the real time elapsed between polls.
//!
//! # Pattern
//!
//! - `defer(delay, task)` queues a task `delay` after the current time
//! - `next_turn(task)` queues with zero delay (runs on the next advance)
//! - Tasks due at the same time run in the order they were queued
//! - Tasks queued while advancing run in the same advance if they fall due
//!
//! # Example
//!
//! ```ignore
//! use spark_pin::state::scheduler;
//! use std::time::Duration;
//!
//! let handle = scheduler::defer(Duration::from_millis(50), || println!("later"));
//! scheduler::advance(Duration::from_millis(10)); // nothing yet
//! scheduler::advance(Duration::from_millis(40)); // prints "later"
//!
//! // Or cancel before it fires
//! handle.cancel();
//! ```

use std::cell::RefCell;
use std::time::Duration;

// =============================================================================
// EVENT LOOP STATE
// =============================================================================

type Task = Box<dyn FnOnce()>;

struct Scheduled {
    id: u64,
    due: Duration,
    task: Task,
}

struct EventLoop {
    /// Virtual time since the loop was created/reset
    now: Duration,
    /// Monotonic id, also the FIFO tiebreak for equal due times
    next_id: u64,
    queue: Vec<Scheduled>,
}

impl EventLoop {
    fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: Vec::new(),
        }
    }

    /// Remove and return the earliest task due at or before `limit`.
    fn pop_due(&mut self, limit: Duration) -> Option<Scheduled> {
        let position = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= limit)
            .min_by_key(|(_, s)| (s.due, s.id))
            .map(|(i, _)| i)?;
        Some(self.queue.swap_remove(position))
    }
}

thread_local! {
    static EVENT_LOOP: RefCell<EventLoop> = RefCell::new(EventLoop::new());
}

// =============================================================================
// TASK HANDLE
// =============================================================================

/// Handle to a queued task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskHandle {
    id: u64,
}

impl TaskHandle {
    /// Drop the task if it has not run yet. Returns true if it was removed.
    pub fn cancel(self) -> bool {
        EVENT_LOOP.with(|el| {
            let mut el = el.borrow_mut();
            let before = el.queue.len();
            el.queue.retain(|s| s.id != self.id);
            el.queue.len() != before
        })
    }

    /// Check if the task is still queued.
    pub fn is_pending(self) -> bool {
        EVENT_LOOP.with(|el| el.borrow().queue.iter().any(|s| s.id == self.id))
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Queue a task to run `delay` after the current virtual time.
pub fn defer<F>(delay: Duration, task: F) -> TaskHandle
where
    F: FnOnce() + 'static,
{
    EVENT_LOOP.with(|el| {
        let mut el = el.borrow_mut();
        let id = el.next_id;
        el.next_id += 1;
        let due = el.now + delay;
        el.queue.push(Scheduled {
            id,
            due,
            task: Box::new(task),
        });
        TaskHandle { id }
    })
}

/// Queue a task for the next turn of the loop.
pub fn next_turn<F>(task: F) -> TaskHandle
where
    F: FnOnce() + 'static,
{
    defer(Duration::ZERO, task)
}

/// Move the clock forward, running every task that falls due.
///
/// Returns the number of tasks run.
pub fn advance(elapsed: Duration) -> usize {
    let target = EVENT_LOOP.with(|el| el.borrow().now + elapsed);
    let mut ran = 0;

    loop {
        // Pop outside the task call: tasks may queue more work
        let next = EVENT_LOOP.with(|el| {
            let mut el = el.borrow_mut();
            let next = el.pop_due(target);
            if let Some(ref scheduled) = next {
                el.now = el.now.max(scheduled.due);
            }
            next
        });

        match next {
            Some(scheduled) => {
                tracing::trace!(task = scheduled.id, "running deferred task");
                (scheduled.task)();
                ran += 1;
            }
            None => break,
        }
    }

    EVENT_LOOP.with(|el| el.borrow_mut().now = target);
    ran
}

/// Run queued tasks until none are left, moving the clock as needed.
///
/// Returns the number of tasks run.
pub fn run_until_idle() -> usize {
    let mut ran = 0;
    while let Some(due) = next_due() {
        let elapsed = due.saturating_sub(now());
        ran += advance(elapsed);
    }
    ran
}

/// Current virtual time.
pub fn now() -> Duration {
    EVENT_LOOP.with(|el| el.borrow().now)
}

/// Due time of the earliest queued task.
pub fn next_due() -> Option<Duration> {
    EVENT_LOOP.with(|el| el.borrow().queue.iter().map(|s| s.due).min())
}

/// Number of queued tasks.
pub fn pending_count() -> usize {
    EVENT_LOOP.with(|el| el.borrow().queue.len())
}

/// Drop every queued task and rewind the clock (for testing).
pub fn reset_scheduler() {
    // Take the queue out first: dropping tasks may drop widgets that touch the loop
    let dropped = EVENT_LOOP.with(|el| {
        let mut el = el.borrow_mut();
        el.now = Duration::ZERO;
        el.next_id = 0;
        std::mem::take(&mut el.queue)
    });
    drop(dropped);
}

// =============================================================================
// TESTS
// =============================================================================
