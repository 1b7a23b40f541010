//! Parallel fork/join depth-first search.
//!
//! A search starts with one root task seeded at the maze start. Tasks expand
//! nodes depth first and periodically fork part of their frontier into child
//! tasks that run on an injected [`Executor`]. All tasks of one search share a
//! [`SharedSearchState`]: a visited set that hands each node to exactly one
//! task, a write-once predecessor map, and a termination flag raised by the
//! first task to reach a goal.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use amazed::maze::GraphMaze;
//! use amazed::solver::{ExecutorKind, Solver, SolverConfig};
//!
//! let maze = GraphMaze::new(3, 0)?.with_chain(&[0, 1, 2])?.with_goal(2)?;
//! let config = SolverConfig::default()
//!     .with_fork_after(1)
//!     .with_executor(ExecutorKind::Inline);
//!
//! let report = Solver::new(Arc::new(maze), config)?.run()?;
//! assert_eq!(report.path, Some(vec![0, 1, 2]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod executor;
pub mod path;
pub mod result;
pub mod state;
mod task;

pub use config::{ExecutorKind, SolverConfig};
pub use executor::{
    Executor, InlineExecutor, Job, Joinable, PoolExecutor, TaskHandle, TaskOutcome, ThreadExecutor,
};
pub use path::{path_from_to, Path};
pub use result::{SearchStatistics, SolveReport};
pub use state::SharedSearchState;
pub use task::TaskOutput;

use crate::error::SolveError;
use crate::maze::Maze;
use std::sync::Arc;
use std::time::Instant;
use task::{join_tree, SearchContext, SearchTask};

/// Runs fork/join searches over one maze.
pub struct Solver {
    maze: Arc<dyn Maze>,
    executor: Arc<dyn Executor>,
    fork_after: usize,
}

impl Solver {
    /// Create a solver with the executor described by `config`.
    pub fn new(maze: Arc<dyn Maze>, config: SolverConfig) -> Result<Self, SolveError> {
        let executor = config.build_executor()?;
        Ok(Self::with_executor(maze, config.fork_after, executor))
    }

    /// Create a solver on a caller-provided execution substrate.
    pub fn with_executor(maze: Arc<dyn Maze>, fork_after: usize, executor: Arc<dyn Executor>) -> Self {
        Self {
            maze,
            executor,
            fork_after: fork_after.max(1),
        }
    }

    /// Run one complete search with fresh shared state.
    ///
    /// With [`InlineExecutor`] the reported path is the same on every run.
    /// Threaded substrates always report a valid path when one exists, but
    /// which tasks win the claim races varies between runs, and so can the
    /// path.
    ///
    /// # Panics
    ///
    /// A broken predecessor chain, or a panic raised by the maze inside a
    /// task, is re-raised here after the termination flag is set.
    pub fn run(&self) -> Result<SolveReport, SolveError> {
        self.run_with_state(Arc::new(SharedSearchState::new()))
    }

    fn run_with_state(&self, state: Arc<SharedSearchState>) -> Result<SolveReport, SolveError> {
        let started = Instant::now();
        let ctx = Arc::new(SearchContext {
            maze: Arc::clone(&self.maze),
            state: Arc::clone(&state),
            executor: Arc::clone(&self.executor),
            fork_after: self.fork_after,
        });

        tracing::info!(
            executor = self.executor.name(),
            fork_after = self.fork_after,
            start = self.maze.start(),
            "starting search"
        );

        let root = SearchTask::root(ctx);
        tracing::debug!(task = root.id(), "spawning root task");
        let handle = self
            .executor
            .spawn(Box::new(move || -> TaskOutcome { Ok(root.run()) }));
        let path = join_tree(&state, handle)?;

        let mut statistics = state.statistics();
        statistics.elapsed_time = started.elapsed();

        match &path {
            Some(p) => tracing::info!(len = p.len(), tasks = statistics.tasks_spawned, "path found"),
            None => tracing::info!(tasks = statistics.tasks_spawned, "no path found"),
        }

        Ok(SolveReport {
            path,
            statistics,
            state,
        })
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("start", &self.maze.start())
            .field("executor", &self.executor.name())
            .field("fork_after", &self.fork_after)
            .finish()
    }
}

/// Search `maze` on the default worker pool, forking every `fork_after`
/// expansions. `Ok(None)` means no goal is reachable.
///
/// The pool guarantees a valid path, not the same one on every call: tasks
/// race for nodes, and the winner decides which branch the path follows.
/// Use a [`Solver`] on an [`InlineExecutor`] when runs must be reproducible.
pub fn solve(maze: Arc<dyn Maze>, fork_after: usize) -> Result<Option<Path>, SolveError> {
    let config = SolverConfig::default().with_fork_after(fork_after);
    Ok(Solver::new(maze, config)?.run()?.path)
}
