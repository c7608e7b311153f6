//! Recursive Executor (C4): the per-task algorithm run on a worker thread.
//!
//! Evaluate `is_base`; if it holds, run `solve_base` and publish the result
//! upward. Otherwise divide, prime the parent join with the branch factor,
//! submit every child, and return to the worker loop — the current thread
//! does not block waiting for its children, it just goes and executes
//! whatever is next on top of its own deque (very often one of the children
//! it just pushed).

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::callbacks::DacCallbacks;
use crate::error::DacError;
use crate::pool::{Job, PoolHandle};
use crate::task::{Completion, ParentJoin, ResultSink};

/// Shared, read-only state for one [`crate::compute`] invocation: the
/// callback bundle, the fault slot every task consults before doing real
/// work, and the root's completion signal.
pub(crate) struct Invocation<P, R, C> {
    pub callbacks: C,
    pub fault: std::sync::OnceLock<DacError>,
    pub root: Arc<Completion<R>>,
    _marker: std::marker::PhantomData<fn(P)>,
}

impl<P, R, C> Invocation<P, R, C>
where
    C: DacCallbacks<P, R>,
{
    pub fn new(callbacks: C) -> Self {
        Self {
            callbacks,
            fault: std::sync::OnceLock::new(),
            root: Arc::new(Completion::new()),
            _marker: std::marker::PhantomData,
        }
    }

    /// Record the first fault seen and wake the blocked caller. Later faults
    /// on independent subtrees are silently dropped — first fault wins.
    fn record_fault(&self, err: DacError) {
        if self.fault.set(clone_for_record(&err)).is_ok() {
            tracing::debug!(error = %err, "recording first fault for this invocation");
            self.root.fail(err);
        }
    }
}

// `DacError` doesn't implement `Clone` (it wraps itself recursively in
// `RootFault`); we only ever need the *first* fault stored once, so build a
// fresh value for the `OnceLock` and move the original into the completion
// signal.
fn clone_for_record(err: &DacError) -> DacError {
    match err {
        DacError::InvalidDegree => DacError::InvalidDegree,
        DacError::MalformedDivide => DacError::MalformedDivide,
        DacError::CallbackFault(msg) => DacError::CallbackFault(msg.clone()),
        DacError::RootFault(inner) => DacError::RootFault(Box::new(clone_for_record(inner))),
    }
}

/// Build the job for one task node and hand it to `pool`: submitted to the
/// caller's local deque if the caller is itself a worker, or the global
/// injector otherwise. The very first submission (the root, from
/// [`crate::skeleton`]) always lands on the injector since no worker thread
/// is running yet to own a local deque; every recursive call happens from
/// inside `run_task`, which *is* running on a worker thread, so it lands
/// locally.
pub(crate) fn submit_task<P, R, C>(
    invocation: Arc<Invocation<P, R, C>>,
    pool: PoolHandle,
    input: P,
    sink: ResultSink<R>,
) where
    P: Send + 'static,
    R: Send + Default + 'static,
    C: DacCallbacks<P, R> + Send + Sync + 'static,
{
    let pool_for_job = pool.clone();
    let job: Job = Box::new(move || run_task(invocation, pool_for_job, input, sink));
    pool.submit(job);
}

fn run_task<P, R, C>(invocation: Arc<Invocation<P, R, C>>, pool: PoolHandle, input: P, sink: ResultSink<R>)
where
    P: Send + 'static,
    R: Send + Default + 'static,
    C: DacCallbacks<P, R> + Send + Sync + 'static,
{
    // A fault anywhere in the tree means the caller has already been (or is
    // about to be) woken up with an error; abandon this node's work rather
    // than doing a combine no one will observe.
    if invocation.fault.get().is_some() {
        return;
    }

    let callbacks = &invocation.callbacks;

    let is_base = match panic::catch_unwind(AssertUnwindSafe(|| callbacks.is_base(&input))) {
        Ok(b) => b,
        Err(payload) => {
            invocation.record_fault(DacError::from_panic(payload));
            return;
        }
    };

    if is_base {
        let result = match panic::catch_unwind(AssertUnwindSafe(|| callbacks.solve_base(input))) {
            Ok(r) => r,
            Err(payload) => {
                invocation.record_fault(DacError::from_panic(payload));
                return;
            }
        };
        publish(&invocation, &pool, sink, result);
        return;
    }

    let children = match panic::catch_unwind(AssertUnwindSafe(|| callbacks.divide(input))) {
        Ok(c) => c,
        Err(payload) => {
            invocation.record_fault(DacError::from_panic(payload));
            return;
        }
    };

    if children.is_empty() {
        invocation.record_fault(DacError::MalformedDivide);
        return;
    }

    let join = Arc::new(ParentJoin::new(children.len(), sink));
    for (index, child_input) in children.into_iter().enumerate() {
        let child_sink = ResultSink::Child {
            parent: Arc::clone(&join),
            index,
        };
        submit_task(
            Arc::clone(&invocation),
            pool.clone(),
            child_input,
            child_sink,
        );
    }
    // Do not wait here: the worker returns to its loop and picks up the next
    // ready job, which is typically one of the children just pushed onto its
    // own local deque.
}

/// Report a finished value to its sink, folding it into the parent's
/// combine step (and recursing upward) if this was the last child to
/// publish.
fn publish<P, R, C>(invocation: &Arc<Invocation<P, R, C>>, pool: &PoolHandle, sink: ResultSink<R>, value: R)
where
    P: Send + 'static,
    R: Send + Default + 'static,
    C: DacCallbacks<P, R> + Send + Sync + 'static,
{
    match sink {
        ResultSink::Root(completion) => completion.complete(value),
        ResultSink::Child { parent, index } => {
            if let Some(children) = parent.publish(index, value) {
                let callbacks = &invocation.callbacks;
                let combine_result = panic::catch_unwind(AssertUnwindSafe(|| {
                    let mut out = R::default();
                    callbacks.combine(children, &mut out);
                    out
                }));
                match combine_result {
                    Ok(out) => publish(invocation, pool, parent.sink().clone(), out),
                    Err(payload) => invocation.record_fault(DacError::from_panic(payload)),
                }
            }
        }
    }
}
