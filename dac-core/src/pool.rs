//! Worker Pool (C3): a fixed-size set of OS threads sharing a work-stealing
//! task dequeue, built on [`crossbeam_deque`].
//!
//! # Work-stealing algorithm
//!
//! Each worker thread runs a loop with the following priority:
//! 1. Pop from its own local LIFO deque (cheapest — no contention, and keeps
//!    depth-first recursion cache-local on the thread that spawned it).
//! 2. Steal a batch from the global [`Injector`] (root submissions and
//!    overflow land here).
//! 3. Steal from a randomly chosen peer worker's [`Stealer`] (FIFO at the
//!    stolen end, so peers take the coarsest, near-the-root work first).
//! 4. Park briefly to avoid busy-spinning, then retry.
//!
//! A job spawned from *inside* a running job (i.e. a divide-and-conquer
//! child) is pushed onto the current thread's own local deque via a
//! thread-local handle, realizing "submit lands on the submitting worker's
//! local queue" without threading a queue handle through every callback.
//! Jobs submitted from outside any worker thread (the external caller's root
//! submission) fall back to the global injector.

use crossbeam_deque::{Injector, Steal, Stealer, Worker};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::DacError;

/// A unit of scheduled work. Boxed and type-erased so the pool itself need
/// not be generic over the problem/result types of any particular
/// divide-and-conquer invocation.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

thread_local! {
    static LOCAL_QUEUE: RefCell<Option<Worker<Job>>> = const { RefCell::new(None) };
}

/// A handle workers and running jobs use to submit new work. Cheap to clone
/// (an `Arc` around the global injector).
#[derive(Clone)]
pub struct PoolHandle {
    injector: Arc<Injector<Job>>,
}

impl PoolHandle {
    /// Submit a job. Lands on the calling thread's local deque if it is a
    /// pool worker, otherwise on the global injector.
    pub fn submit(&self, job: Job) {
        let mut job = Some(job);
        LOCAL_QUEUE.with(|cell| {
            if let Some(worker) = cell.borrow().as_ref() {
                if let Some(j) = job.take() {
                    worker.push(j);
                }
            }
        });
        if let Some(job) = job {
            self.injector.push(job);
        }
    }
}

/// Fixed-size pool of OS worker threads with per-thread work-stealing
/// dequeues.
pub struct WorkerPool {
    injector: Arc<Injector<Job>>,
    handles: Vec<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    degree: usize,
}

impl WorkerPool {
    /// Create a pool of `degree` worker threads. `degree` must be `>= 1`.
    pub fn new(degree: usize) -> Result<Self, DacError> {
        if degree == 0 {
            return Err(DacError::InvalidDegree);
        }

        let injector = Arc::new(Injector::<Job>::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut locals = Vec::with_capacity(degree);
        let mut stealers = Vec::with_capacity(degree);
        for _ in 0..degree {
            let w = Worker::new_fifo();
            stealers.push(w.stealer());
            locals.push(w);
        }
        let stealers = Arc::new(stealers);

        let mut handles = Vec::with_capacity(degree);
        for (idx, local) in locals.into_iter().enumerate() {
            let injector = Arc::clone(&injector);
            let stealers = Arc::clone(&stealers);
            let shutdown = Arc::clone(&shutdown);
            let jh = thread::Builder::new()
                .name(format!("dac-worker-{idx}"))
                .spawn(move || worker_loop(idx, local, injector, stealers, shutdown))
                .expect("failed to spawn dac worker thread");
            handles.push(jh);
        }

        tracing::debug!(degree, "worker pool started");
        Ok(Self {
            injector,
            handles,
            shutdown,
            degree,
        })
    }

    /// Number of worker threads in this pool.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// A cheap, cloneable handle for submitting jobs (including from within
    /// a running job).
    pub fn handle(&self) -> PoolHandle {
        PoolHandle {
            injector: Arc::clone(&self.injector),
        }
    }

    /// Submit a job directly to the global injector (used for root
    /// submission from the caller's own thread).
    pub fn submit_root(&self, job: Job) {
        self.injector.push(job);
    }

    /// Signal shutdown and join every worker thread. Any jobs still sitting
    /// in a queue at this point are abandoned, not executed — by the time
    /// `shutdown` is called the root has already completed or faulted, so
    /// nothing of consequence remains (see `DESIGN.md`).
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        for jh in self.handles.drain(..) {
            let _ = jh.join();
        }
        tracing::debug!("worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            self.shutdown();
        }
    }
}

/// Simple per-thread xorshift32 PRNG for picking a random peer to steal
/// from. A dedicated dependency would be overkill for one call site.
fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

fn worker_loop(
    idx: usize,
    local: Worker<Job>,
    injector: Arc<Injector<Job>>,
    stealers: Arc<Vec<Stealer<Job>>>,
    shutdown: Arc<AtomicBool>,
) {
    LOCAL_QUEUE.with(|cell| *cell.borrow_mut() = Some(local));
    let mut rng_state: u32 = (idx as u32).wrapping_mul(2_654_435_761).max(1);

    loop {
        if shutdown.load(Ordering::Acquire) {
            break;
        }

        if let Some(job) = pop_next(&injector, &stealers, idx, &mut rng_state) {
            job();
            continue;
        }

        thread::park_timeout(Duration::from_millis(1));
    }

    LOCAL_QUEUE.with(|cell| *cell.borrow_mut() = None);
}

fn pop_next(
    injector: &Arc<Injector<Job>>,
    stealers: &Arc<Vec<Stealer<Job>>>,
    idx: usize,
    rng_state: &mut u32,
) -> Option<Job> {
    // 1. Local deque.
    let local_hit = LOCAL_QUEUE.with(|cell| cell.borrow().as_ref().and_then(|w| w.pop()));
    if local_hit.is_some() {
        return local_hit;
    }

    // 2. Global injector, stealing a batch into the local deque.
    loop {
        let outcome =
            LOCAL_QUEUE.with(|cell| cell.borrow().as_ref().map(|w| injector.steal_batch_and_pop(w)));
        match outcome {
            Some(Steal::Success(job)) => return Some(job),
            Some(Steal::Retry) => {
                thread::yield_now();
                continue;
            }
            Some(Steal::Empty) | None => break,
        }
    }

    // 3. A random peer's stealer.
    let num_peers = stealers.len();
    if num_peers > 0 {
        let start = xorshift32(rng_state) as usize % num_peers;
        for offset in 0..num_peers {
            let peer = (start + offset) % num_peers;
            if peer == idx {
                continue;
            }
            match stealers[peer].steal() {
                Steal::Success(job) => {
                    tracing::trace!(thief = idx, victim = peer, "stole a task");
                    return Some(job);
                }
                Steal::Retry | Steal::Empty => continue,
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn degree_zero_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(DacError::InvalidDegree)));
    }

    #[test]
    fn degree_one_runs_one_thread() {
        let pool = WorkerPool::new(1).unwrap();
        assert_eq!(pool.degree(), 1);
    }

    #[test]
    fn jobs_submitted_externally_all_run() {
        let mut pool = WorkerPool::new(4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let n = 500;
        for _ in 0..n {
            let counter = Arc::clone(&counter);
            pool.submit_root(Box::new(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }));
        }
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while counter.load(Ordering::Relaxed) < n && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(counter.load(Ordering::Relaxed), n);
        pool.shutdown();
    }

    #[test]
    fn handle_submit_from_outside_worker_uses_injector() {
        let mut pool = WorkerPool::new(2).unwrap();
        let handle = pool.handle();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter2 = Arc::clone(&counter);
        handle.submit(Box::new(move || {
            counter2.fetch_add(1, Ordering::Relaxed);
        }));
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while counter.load(Ordering::Relaxed) < 1 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(counter.load(Ordering::Relaxed), 1);
        pool.shutdown();
    }

    #[test]
    fn jobs_can_spawn_further_jobs_via_handle() {
        let mut pool = WorkerPool::new(2).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = pool.handle();
        let handle2 = handle.clone();
        let counter2 = Arc::clone(&counter);
        handle.submit(Box::new(move || {
            counter2.fetch_add(1, Ordering::Relaxed);
            let counter3 = Arc::clone(&counter2);
            handle2.submit(Box::new(move || {
                counter3.fetch_add(1, Ordering::Relaxed);
            }));
        }));
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while counter.load(Ordering::Relaxed) < 2 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(counter.load(Ordering::Relaxed), 2);
        pool.shutdown();
    }
}
