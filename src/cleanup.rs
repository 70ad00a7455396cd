//! Deferred cleanup actions
//!
//! Workflows that create temporary resources register how to undo them on a
//! [`CleanupScope`] owned by the caller. Actions run in reverse registration
//! order exactly once: when the scope is released with an outcome, or when it
//! is dropped without one (early return or unwind), which counts as failure.

use tracing::debug;

/// When a deferred action should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Run whatever the outcome
    Always,
    /// Run only if the workflow failed
    OnFailure,
}

type Action = Box<dyn FnOnce() + Send>;

/// Caller-owned list of deferred actions
#[derive(Default)]
pub struct CleanupScope {
    actions: Vec<(Trigger, Action)>,
}

impl CleanupScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action that runs on every exit path
    pub fn defer(&mut self, action: impl FnOnce() + Send + 'static) {
        self.actions.push((Trigger::Always, Box::new(action)));
    }

    /// Registers an action that only runs when the workflow fails
    pub fn defer_on_failure(&mut self, action: impl FnOnce() + Send + 'static) {
        self.actions.push((Trigger::OnFailure, Box::new(action)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs the actions applicable to the outcome, newest first
    pub fn release(mut self, failed: bool) {
        self.run(failed);
    }

    fn run(&mut self, failed: bool) {
        let actions = std::mem::take(&mut self.actions);
        debug!(
            "Running {} deferred cleanup action(s), failed: {}",
            actions.len(),
            failed
        );

        for (trigger, action) in actions.into_iter().rev() {
            if trigger == Trigger::Always || failed {
                action();
            }
        }
    }
}

impl Drop for CleanupScope {
    fn drop(&mut self) {
        if !self.actions.is_empty() {
            self.run(true);
        }
    }
}

/// Runs `body` with a fresh scope and releases it according to the result
pub fn scoped<T, E>(body: impl FnOnce(&mut CleanupScope) -> Result<T, E>) -> Result<T, E> {
    let mut scope = CleanupScope::new();
    let result = body(&mut scope);
    scope.release(result.is_err());
    result
}
