//! Configuration for solver runs.

use crate::error::SolveError;
use crate::solver::executor::{Executor, InlineExecutor, PoolExecutor, ThreadExecutor};
use std::sync::Arc;

/// Execution substrate selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutorKind {
    /// Deferred, single-threaded execution (deterministic)
    Inline,
    /// One OS thread per search task
    Threads,
    /// Fixed-size worker pool
    #[default]
    Pool,
}

impl std::fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutorKind::Inline => write!(f, "inline"),
            ExecutorKind::Threads => write!(f, "threads"),
            ExecutorKind::Pool => write!(f, "pool"),
        }
    }
}

impl std::str::FromStr for ExecutorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inline" | "sequential" => Ok(ExecutorKind::Inline),
            "threads" | "thread" => Ok(ExecutorKind::Threads),
            "pool" | "rayon" => Ok(ExecutorKind::Pool),
            _ => Err(format!(
                "Unknown executor: '{}'. Valid options: inline, threads, pool",
                s
            )),
        }
    }
}

/// Configuration for a solver run.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Node expansions between forks (at least 1, `usize::MAX` never forks)
    pub fork_after: usize,
    /// Substrate that runs the search tasks
    pub executor: ExecutorKind,
    /// Worker threads for the pool substrate
    pub workers: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            fork_after: 4,
            executor: ExecutorKind::default(),
            workers: num_cpus::get(),
        }
    }
}

impl SolverConfig {
    /// Fork a child task every `fork_after` expansions.
    pub fn with_fork_after(mut self, fork_after: usize) -> Self {
        self.fork_after = fork_after.max(1);
        self
    }

    /// Disable forking: the root task searches alone.
    pub fn sequential(mut self) -> Self {
        self.fork_after = usize::MAX;
        self
    }

    pub fn with_executor(mut self, executor: ExecutorKind) -> Self {
        self.executor = executor;
        self
    }

    /// Set the pool size (at least 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_workers_option(mut self, workers: Option<usize>) -> Self {
        if let Some(workers) = workers {
            self.workers = workers.max(1);
        }
        self
    }

    /// Whether the configuration ever forks.
    pub fn forks(&self) -> bool {
        self.fork_after != usize::MAX
    }

    /// Build the configured execution substrate.
    pub fn build_executor(&self) -> Result<Arc<dyn Executor>, SolveError> {
        let executor: Arc<dyn Executor> = match self.executor {
            ExecutorKind::Inline => Arc::new(InlineExecutor),
            ExecutorKind::Threads => Arc::new(ThreadExecutor::new()),
            ExecutorKind::Pool => Arc::new(PoolExecutor::new(self.workers)?),
        };
        Ok(executor)
    }
}
