//! Task Node (C2): per-node join state for the recursion tree.
//!
//! A node never exists as a single concrete struct in this implementation —
//! there is no long-lived `TaskNode` value sitting in a dequeue. Instead each
//! node's input is captured directly into the closure ([`crate::pool::Job`])
//! that runs its body, and its join state (where its result goes, and for
//! internal nodes the pending-children counter) is represented by
//! [`ResultSink`] and [`ParentJoin`]. This mirrors the original source's
//! scoped child-result buffers: a parent's `Vec<R>` and counter live exactly
//! as long as its children do, and are dropped the moment the last child's
//! result has been folded into `combine`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

use crate::error::DacError;

/// Where a finished task's result is reported.
///
/// The root reports to a [`Completion`] that the blocked caller is waiting
/// on; every other node reports to its parent's [`ParentJoin`] at a fixed
/// positional index (the order `divide` produced it in).
pub enum ResultSink<R> {
    Root(std::sync::Arc<Completion<R>>),
    Child {
        parent: std::sync::Arc<ParentJoin<R>>,
        index: usize,
    },
}

impl<R> Clone for ResultSink<R> {
    fn clone(&self) -> Self {
        match self {
            ResultSink::Root(c) => ResultSink::Root(std::sync::Arc::clone(c)),
            ResultSink::Child { parent, index } => ResultSink::Child {
                parent: std::sync::Arc::clone(parent),
                index: *index,
            },
        }
    }
}

/// Join state for one internal (non-leaf) task.
///
/// `results[i]` is written exactly once, by the child at position `i`, under
/// `results`' mutex. `pending` starts at the branch factor `k` and is
/// decremented with `Release` ordering by each child as it publishes; the
/// child whose `fetch_sub` observes the pre-decrement value `1` (i.e. the
/// transition to zero) is the sole owner of the combine continuation — this
/// is the "+1 trick" from the original TBB backend, simplified because the
/// parent is never itself scheduled until its counter is primed.
pub struct ParentJoin<R> {
    results: Mutex<Vec<R>>,
    pending: AtomicUsize,
    sink: ResultSink<R>,
}

impl<R> ParentJoin<R> {
    pub fn new(branch_factor: usize, sink: ResultSink<R>) -> Self
    where
        R: Default,
    {
        let mut results = Vec::with_capacity(branch_factor);
        results.resize_with(branch_factor, R::default);
        Self {
            results: Mutex::new(results),
            pending: AtomicUsize::new(branch_factor),
            sink,
        }
    }

    /// Record child `index`'s result and report whether this call observed
    /// the counter's transition to zero (i.e. whether the caller now owns
    /// the combine continuation, and the completed child vector).
    pub fn publish(&self, index: usize, value: R) -> Option<Vec<R>> {
        {
            let mut results = self.results.lock().unwrap();
            results[index] = value;
        }
        if self.pending.fetch_sub(1, Ordering::Release) == 1 {
            // Pairs with the Release above: everything written to `results`
            // by every child happens-before this thread reads it back.
            std::sync::atomic::fence(Ordering::Acquire);
            let drained = std::mem::take(&mut *self.results.lock().unwrap());
            Some(drained)
        } else {
            None
        }
    }

    pub fn sink(&self) -> &ResultSink<R> {
        &self.sink
    }
}

/// The signal the blocked [`crate::skeleton`] caller waits on.
///
/// Exactly one of `result` or `fault` is ever written, and it is written
/// exactly once, under `state`'s mutex, before `ready` is set and `cvar` is
/// notified.
pub struct Completion<R> {
    state: Mutex<CompletionState<R>>,
    cvar: Condvar,
}

enum CompletionState<R> {
    Pending,
    Done(R),
    Fault(DacError),
}

impl<R> Completion<R> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CompletionState::Pending),
            cvar: Condvar::new(),
        }
    }

    pub fn complete(&self, value: R) {
        let mut state = self.state.lock().unwrap();
        if matches!(*state, CompletionState::Pending) {
            *state = CompletionState::Done(value);
            self.cvar.notify_all();
        }
    }

    pub fn fail(&self, err: DacError) {
        let mut state = self.state.lock().unwrap();
        if matches!(*state, CompletionState::Pending) {
            *state = CompletionState::Fault(err);
            self.cvar.notify_all();
        }
    }

    /// Block until the root either completes or faults, then consume the
    /// outcome. Panics if called more than once (the outcome is `take`n).
    pub fn wait(&self) -> Result<R, DacError> {
        let mut state = self.state.lock().unwrap();
        while matches!(*state, CompletionState::Pending) {
            state = self.cvar.wait(state).unwrap();
        }
        match std::mem::replace(&mut *state, CompletionState::Pending) {
            CompletionState::Done(value) => Ok(value),
            CompletionState::Fault(err) => Err(DacError::RootFault(Box::new(err))),
            CompletionState::Pending => unreachable!("loop only exits once not pending"),
        }
    }
}

impl<R> Default for Completion<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn parent_join_fires_once_all_children_publish() {
        let sink = ResultSink::Root(Arc::new(Completion::<i32>::new()));
        let join = ParentJoin::new(3, sink);

        assert!(join.publish(0, 10).is_none());
        assert!(join.publish(1, 20).is_none());
        let drained = join.publish(2, 30).expect("third publish completes the join");
        assert_eq!(drained, vec![10, 20, 30]);
    }

    #[test]
    fn single_child_branch_factor_one() {
        let sink = ResultSink::Root(Arc::new(Completion::<i32>::new()));
        let join = ParentJoin::new(1, sink);
        let drained = join.publish(0, 42).expect("one child completes immediately");
        assert_eq!(drained, vec![42]);
    }

    #[test]
    fn completion_done_roundtrip() {
        let completion = Completion::new();
        completion.complete(7);
        assert_eq!(completion.wait().unwrap(), 7);
    }

    #[test]
    fn completion_fault_roundtrip() {
        let completion: Completion<i32> = Completion::new();
        completion.fail(DacError::MalformedDivide);
        match completion.wait() {
            Err(DacError::RootFault(inner)) => {
                assert!(matches!(*inner, DacError::MalformedDivide));
            }
            other => panic!("expected RootFault, got {other:?}"),
        }
    }

    #[test]
    fn first_outcome_wins() {
        let completion = Completion::new();
        completion.complete(1);
        completion.fail(DacError::InvalidDegree); // ignored, already resolved
        assert_eq!(completion.wait().unwrap(), 1);
    }
}
