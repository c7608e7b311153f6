//! Skeleton Entry (C5): the public façade.
//!
//! [`compute`] is the one-shot entry point: it builds a fresh worker pool,
//! seeds the root task, blocks until the root's result (or first fault) is
//! ready, tears the pool down, and returns. [`Skeleton`] is the same
//! contract with the pool kept alive across multiple invocations, for
//! callers who would otherwise pay thread spawn/join cost on every call.

use std::sync::Arc;

use crate::callbacks::DacCallbacks;
use crate::error::DacError;
use crate::executor::{submit_task, Invocation};
use crate::pool::WorkerPool;
use crate::task::ResultSink;

/// Run one divide-and-conquer computation to completion.
///
/// Blocks the calling thread until `root`'s result has been produced by the
/// recursion tree, then returns it. `degree` is the number of worker
/// threads; `degree == 0` is rejected as [`DacError::InvalidDegree`] before
/// any task is created.
///
/// # Example
///
/// ```
/// use dac_core::{compute, FnCallbacks};
///
/// let callbacks = FnCallbacks::new(
///     |n: u32| vec![n - 1, n - 2],
///     |n: &u32| *n <= 2,
///     |_n: u32| 1u32,
///     |children: Vec<u32>, out: &mut u32| *out = children.iter().sum(),
/// );
/// let result = compute(callbacks, 10u32, 4).unwrap();
/// assert_eq!(result, 55);
/// ```
pub fn compute<P, R, C>(callbacks: C, root: P, degree: usize) -> Result<R, DacError>
where
    P: Send + 'static,
    R: Send + Default + 'static,
    C: DacCallbacks<P, R> + Send + Sync + 'static,
{
    let span = tracing::debug_span!("dac_compute", degree);
    let _enter = span.enter();

    let mut pool = WorkerPool::new(degree)?;
    let invocation = Arc::new(Invocation::new(callbacks));
    let completion = Arc::clone(&invocation.root);

    let job_pool_handle = pool.handle();
    submit_task(invocation, job_pool_handle, root, ResultSink::Root(completion.clone()));

    let outcome = completion.wait();
    pool.shutdown();
    outcome
}

/// A [`compute`]-equivalent front end that keeps its worker pool alive
/// across calls, so repeated invocations don't pay the thread spawn/join
/// cost each time. Concurrent invocations on one `Skeleton` from different
/// caller threads are serialized by the pool's own contention, not
/// rejected; each call still gets its own completion signal and fault slot,
/// so they cannot observe each other's faults or results.
pub struct Skeleton {
    pool: WorkerPool,
}

impl Skeleton {
    /// Create a skeleton whose pool has `degree` worker threads.
    pub fn new(degree: usize) -> Result<Self, DacError> {
        Ok(Self {
            pool: WorkerPool::new(degree)?,
        })
    }

    /// Number of worker threads backing this skeleton.
    pub fn degree(&self) -> usize {
        self.pool.degree()
    }

    /// Run one computation on the shared pool and block for its result.
    pub fn compute<P, R, C>(&self, callbacks: C, root: P) -> Result<R, DacError>
    where
        P: Send + 'static,
        R: Send + Default + 'static,
        C: DacCallbacks<P, R> + Send + Sync + 'static,
    {
        let invocation = Arc::new(Invocation::new(callbacks));
        let completion = Arc::clone(&invocation.root);
        submit_task(invocation, self.pool.handle(), root, ResultSink::Root(completion.clone()));
        completion.wait()
    }
}
