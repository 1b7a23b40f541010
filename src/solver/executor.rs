//! Execution substrates for search tasks.
//!
//! The search core only needs two primitives: start a job running
//! independently, and block until a started job has produced its outcome.
//! [`Executor::spawn`] provides the first, [`TaskHandle::join`] the second.
//!
//! - [`InlineExecutor`] defers each job until it is joined and runs it on the
//!   joining thread. Single threaded and fully deterministic.
//! - [`ThreadExecutor`] starts one OS thread per job.
//! - [`PoolExecutor`] runs jobs on a fixed-size rayon pool.
//!
//! Jobs never join other jobs. A search task hands its unjoined children back
//! in its [`TaskOutput`] and the caller that owns the search joins the whole
//! tree, so no worker ever blocks and no stack grows with the number of tasks.
//!
//! A panic inside a job is re-raised on the thread that joins it.

use crate::error::SolveError;
use crate::solver::task::TaskOutput;
use crossbeam_channel::{bounded, Receiver};
use std::fmt;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

/// What a finished search task yields.
pub type TaskOutcome = Result<TaskOutput, SolveError>;

/// A unit of work handed to an executor.
pub type Job = Box<dyn FnOnce() -> TaskOutcome + Send + 'static>;

/// Something that can start search tasks.
pub trait Executor: Send + Sync + fmt::Debug {
    /// Begin running `job` and return a handle to its outcome.
    fn spawn(&self, job: Job) -> TaskHandle;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Backing implementation of a [`TaskHandle`].
pub trait Joinable: Send {
    fn join(self: Box<Self>) -> TaskOutcome;
}

/// Handle to a spawned job.
pub struct TaskHandle {
    inner: Box<dyn Joinable>,
}

impl TaskHandle {
    pub fn new(inner: impl Joinable + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Block until the job has finished and return its outcome.
    ///
    /// # Panics
    ///
    /// Resumes the job's panic if it had one.
    pub fn join(self) -> TaskOutcome {
        self.inner.join()
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").finish_non_exhaustive()
    }
}

// --- Inline ---

/// Runs each job lazily on the thread that joins it.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

struct Deferred(Job);

impl Joinable for Deferred {
    fn join(self: Box<Self>) -> TaskOutcome {
        (self.0)()
    }
}

impl Executor for InlineExecutor {
    fn spawn(&self, job: Job) -> TaskHandle {
        TaskHandle::new(Deferred(job))
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}

// --- One thread per task ---

/// Starts a dedicated OS thread for every job.
#[derive(Debug, Default)]
pub struct ThreadExecutor {
    spawned: AtomicUsize,
}

impl ThreadExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

struct Threaded(JoinHandle<TaskOutcome>);

impl Joinable for Threaded {
    fn join(self: Box<Self>) -> TaskOutcome {
        self.0.join().unwrap_or_else(|payload| resume_unwind(payload))
    }
}

impl Executor for ThreadExecutor {
    fn spawn(&self, job: Job) -> TaskHandle {
        let id = self.spawned.fetch_add(1, Ordering::Relaxed);
        let spawned = thread::Builder::new()
            .name(format!("amazed-task-{id}"))
            .spawn(job);

        match spawned {
            Ok(handle) => TaskHandle::new(Threaded(handle)),
            Err(e) => {
                tracing::warn!(task = id, error = %e, "failed to start task thread");
                TaskHandle::new(Ready(Err(SolveError::Spawn(e))))
            }
        }
    }

    fn name(&self) -> &'static str {
        "threads"
    }
}

struct Ready(TaskOutcome);

impl Joinable for Ready {
    fn join(self: Box<Self>) -> TaskOutcome {
        self.0
    }
}

// --- Rayon pool ---

/// Runs jobs on a fixed-size rayon thread pool.
///
/// Handles are meant to be joined from outside the pool. Jobs run to
/// completion without waiting on each other, so any number of queued jobs
/// drains on any number of workers.
#[derive(Debug)]
pub struct PoolExecutor {
    pool: rayon::ThreadPool,
}

impl PoolExecutor {
    /// Build a pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> Result<Self, SolveError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("amazed-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }
}

struct Pooled(Receiver<thread::Result<TaskOutcome>>);

impl Joinable for Pooled {
    fn join(self: Box<Self>) -> TaskOutcome {
        match self.0.recv() {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(payload)) => resume_unwind(payload),
            Err(_) => Err(SolveError::TaskLost),
        }
    }
}

impl Executor for PoolExecutor {
    fn spawn(&self, job: Job) -> TaskHandle {
        let (tx, rx) = bounded(1);
        self.pool.spawn(move || {
            // rayon aborts on an uncaught panic; carry it to the joiner instead
            let _ = tx.send(catch_unwind(AssertUnwindSafe(job)));
        });
        TaskHandle::new(Pooled(rx))
    }

    fn name(&self) -> &'static str {
        "pool"
    }
}
