//! Completion - Debounced code assembly.
//!
//! Every edit that might complete the code schedules an assembly. Rapid edits
//! coalesce: scheduling again supersedes the pending assembly, so only the most
//! recent one runs (last-scheduled-wins).
//!
//! - [`Debouncer`] - Supersede-able deferred task on the scheduler
//! - [`assemble`] - Concatenate non-empty box values
//! - [`complete_code`] - Assembled code, if it fills the configured length

use std::cell::Cell;
use std::time::Duration;

use super::scheduler::{self, TaskHandle};

/// Default delay between the last edit and code assembly.
pub const COMPLETION_DEBOUNCE: Duration = Duration::from_millis(50);

// =============================================================================
// Debouncer
// =============================================================================

/// Runs only the most recently scheduled task after a fixed delay.
pub struct Debouncer {
    delay: Duration,
    pending: Cell<Option<TaskHandle>>,
}

impl Debouncer {
    /// Create a debouncer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Cell::new(None),
        }
    }

    /// Schedule `task`, superseding any pending one.
    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + 'static,
    {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        self.pending.set(Some(scheduler::defer(self.delay, task)));
    }

    /// Drop the pending task, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
    }

    /// Check if a task is waiting to run.
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some_and(TaskHandle::is_pending)
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(COMPLETION_DEBOUNCE)
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Concatenate the non-empty values, in box order.
pub fn assemble<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter(|v| !v.as_ref().is_empty())
        .fold(String::new(), |mut code, v| {
            code.push_str(v.as_ref());
            code
        })
}

/// The assembled code when it is at least `code_length` characters long.
pub fn complete_code<I, S>(values: I, code_length: usize) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let code = assemble(values);
    (code.chars().count() >= code_length).then_some(code)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scheduler::{advance, reset_scheduler};
    use std::rc::Rc;

    fn setup() {
        reset_scheduler();
    }

    #[test]
    fn test_assemble_skips_empty() {
        assert_eq!(assemble(["1", "", "3", "4"]), "134");
        assert_eq!(assemble(Vec::<String>::new()), "");
    }

    #[test]
    fn test_complete_code_requires_full_length() {
        assert_eq!(complete_code(["1", "2", "3", "4"], 4), Some("1234".to_string()));
        assert_eq!(complete_code(["1", "", "3", "4"], 4), None);
        assert_eq!(complete_code(["1", "2"], 4), None);
    }

    #[test]
    fn test_debouncer_runs_after_delay() {
        setup();

        let count = Rc::new(Cell::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(50));

        let count_clone = count.clone();
        debouncer.schedule(move || count_clone.set(count_clone.get() + 1));
        assert!(debouncer.is_pending());

        advance(Duration::from_millis(49));
        assert_eq!(count.get(), 0);

        advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_debouncer_last_scheduled_wins() {
        setup();

        let seen = Rc::new(Cell::new(0));
        let debouncer = Debouncer::default();

        for n in 1..=3 {
            let seen = seen.clone();
            debouncer.schedule(move || seen.set(n));
            advance(Duration::from_millis(20));
        }
        assert_eq!(seen.get(), 0);

        advance(COMPLETION_DEBOUNCE);
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn test_debouncer_cancel() {
        setup();

        let count = Rc::new(Cell::new(0));
        let debouncer = Debouncer::default();
        let count_clone = count.clone();
        debouncer.schedule(move || count_clone.set(count_clone.get() + 1));

        debouncer.cancel();
        advance(Duration::from_millis(100));
        assert_eq!(count.get(), 0);
    }
}
