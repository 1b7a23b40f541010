//! Search tasks: the depth-first loop and its fork/join logic.
//!
//! Every task owns a private frontier stack. Each time the fork counter
//! reaches the configured threshold and the frontier holds more than one
//! entry, the entry just below the top is handed to a new child task, which
//! runs on the executor while the parent keeps going.
//!
//! A task that runs out of work (or sees the termination flag) returns its
//! goal, if it reached one, together with its still running children.
//! [`join_tree`] then joins every task's children in spawn order and splices
//! the first child route found onto the parent's route to that child's
//! starting node. The joins happen on the caller's thread with an explicit
//! stack, so neither the spawn tree depth nor the number of live tasks ends
//! up on any thread's call stack.

use crate::error::SolveError;
use crate::maze::{Maze, NodeId};
use crate::solver::executor::{Executor, TaskHandle, TaskOutcome};
use crate::solver::path::{extend_to_start, Path};
use crate::solver::state::{SharedSearchState, StopOnPanic};
use std::sync::Arc;
use tracing::{debug, trace};

/// Everything the tasks of one search tree share.
pub(crate) struct SearchContext {
    pub maze: Arc<dyn Maze>,
    pub state: Arc<SharedSearchState>,
    pub executor: Arc<dyn Executor>,
    pub fork_after: usize,
}

/// A node waiting on a frontier, with the node whose expansion pushed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    node: NodeId,
    from: Option<NodeId>,
}

#[derive(Debug)]
struct Child {
    id: u64,
    junction: NodeId,
    handle: TaskHandle,
}

/// What a task leaves behind once its own frontier is done: the goal it
/// claimed, if any, and the children it forked, still to be joined.
#[derive(Debug)]
pub struct TaskOutput {
    id: u64,
    local_start: NodeId,
    goal: Option<NodeId>,
    children: Vec<Child>,
}

impl TaskOutput {
    /// The node this task was seeded with.
    pub fn local_start(&self) -> NodeId {
        self.local_start
    }

    /// The goal this task claimed itself.
    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    /// Children forked by this task.
    pub fn children(&self) -> usize {
        self.children.len()
    }

    #[cfg(test)]
    pub(crate) fn leaf(local_start: NodeId, goal: Option<NodeId>) -> Self {
        Self {
            id: 0,
            local_start,
            goal,
            children: Vec::new(),
        }
    }
}

/// One depth-first frontier plus the children it has forked.
pub(crate) struct SearchTask {
    ctx: Arc<SearchContext>,
    id: u64,
    local_start: NodeId,
    frontier: Vec<FrontierEntry>,
    fork_counter: usize,
    children: Vec<Child>,
}

impl SearchTask {
    /// The task seeded with the maze start.
    pub fn root(ctx: Arc<SearchContext>) -> Self {
        let start = ctx.maze.start();
        Self::seeded(
            ctx,
            FrontierEntry {
                node: start,
                from: None,
            },
        )
    }

    fn seeded(ctx: Arc<SearchContext>, seed: FrontierEntry) -> Self {
        let id = ctx.state.next_task_id();
        Self {
            ctx,
            id,
            local_start: seed.node,
            frontier: vec![seed],
            fork_counter: 0,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Search until the frontier is exhausted or a goal is found.
    ///
    /// A panic raises the termination flag before it unwinds out of here.
    pub fn run(mut self) -> TaskOutput {
        let state = Arc::clone(&self.ctx.state);
        let _stop = StopOnPanic(&state);
        let _span = tracing::debug_span!("task", id = self.id, start = self.local_start).entered();

        let goal = self.search();
        if !self.children.is_empty() {
            trace!(children = self.children.len(), "frontier done, children pending");
        }

        TaskOutput {
            id: self.id,
            local_start: self.local_start,
            goal,
            children: self.children,
        }
    }

    fn search(&mut self) -> Option<NodeId> {
        let maze = Arc::clone(&self.ctx.maze);
        let state = Arc::clone(&self.ctx.state);
        let player = maze.new_player(self.local_start);

        while !self.frontier.is_empty() {
            if state.is_done() {
                trace!(pending = self.frontier.len(), "termination observed, abandoning frontier");
                break;
            }

            self.fork_counter = self.fork_counter.saturating_add(1);
            if self.fork_counter >= self.ctx.fork_after && self.frontier.len() > 1 {
                self.fork();
                self.fork_counter = 0;
            }

            let Some(current) = self.frontier.pop() else {
                break;
            };

            if !state.try_visit(current.node) {
                trace!(node = current.node, "node already claimed");
                continue;
            }
            if let Some(from) = current.from {
                state.record_predecessor(current.node, from);
            }
            if current.node != self.local_start {
                maze.move_player(player, current.node);
            }

            self.expand(&*maze, &state, current.node);

            if maze.has_goal(current.node) {
                if state.mark_done() {
                    debug!(node = current.node, "goal found");
                } else {
                    debug!(node = current.node, "goal found after termination was signalled");
                }
                return Some(current.node);
            }
        }

        None
    }

    fn expand(&mut self, maze: &dyn Maze, state: &SharedSearchState, node: NodeId) {
        state.note_expanded();
        for next in maze.neighbors(node) {
            if !state.is_visited(next) {
                self.frontier.push(FrontierEntry {
                    node: next,
                    from: Some(node),
                });
            }
        }
    }

    /// Detach the entry below the top of the frontier into a new child task.
    fn fork(&mut self) {
        let entry = self.frontier.remove(self.frontier.len() - 2);
        let child = SearchTask::seeded(Arc::clone(&self.ctx), entry);
        let child_id = child.id;
        self.ctx.state.note_fork();
        debug!(child = child_id, junction = entry.node, "forking child task");

        let handle = self
            .ctx
            .executor
            .spawn(Box::new(move || -> TaskOutcome { Ok(child.run()) }));
        self.children.push(Child {
            id: child_id,
            junction: entry.node,
            handle,
        });
    }
}

/// A joined task whose children are still being worked through.
struct Frame {
    id: u64,
    local_start: NodeId,
    /// Goal-first route from this task's own goal or its first successful child.
    route: Option<Vec<NodeId>>,
    children: std::vec::IntoIter<Child>,
}

impl Frame {
    fn new(state: &SharedSearchState, output: TaskOutput) -> Self {
        let route = output.goal.map(|goal| {
            let mut route = vec![goal];
            extend_to_start(state, output.local_start, &mut route);
            route
        });
        if !output.children.is_empty() {
            debug!(task = output.id, children = output.children.len(), "joining children");
        }
        Self {
            id: output.id,
            local_start: output.local_start,
            route,
            children: output.children.into_iter(),
        }
    }

    /// Take over a finished child's route unless this task already has one.
    fn adopt(&mut self, state: &SharedSearchState, child: Frame) {
        if self.route.is_some() {
            return;
        }
        if let Some(mut route) = child.route {
            extend_to_start(state, self.local_start, &mut route);
            debug!(task = self.id, child = child.id, len = route.len(), "child route spliced");
            self.route = Some(route);
        }
    }
}

/// Join the task behind `root` and, depth first, every task it forked.
///
/// Each task's result is its own path if it reached a goal, otherwise the
/// first child path in spawn order extended back to the task's start. All
/// children are joined even after a path is known. The first substrate error
/// wins over any path.
pub(crate) fn join_tree(state: &SharedSearchState, root: TaskHandle) -> Result<Option<Path>, SolveError> {
    let _stop = StopOnPanic(state);
    let mut stack = vec![Frame::new(state, root.join()?)];
    let mut first_error = None;
    let mut found = None;

    while let Some(top) = stack.last_mut() {
        if let Some(child) = top.children.next() {
            match child.handle.join() {
                Ok(output) => {
                    debug_assert_eq!(output.local_start, child.junction);
                    stack.push(Frame::new(state, output));
                }
                Err(e) => {
                    debug!(child = child.id, error = %e, "child failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
            continue;
        }

        let Some(finished) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.adopt(state, finished),
            None => found = finished.route,
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(found.map(|mut route| {
            route.reverse();
            route
        })),
    }
}
