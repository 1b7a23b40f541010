//! State shared by every task of one search tree.

use crate::maze::NodeId;
use crate::solver::result::SearchStatistics;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Visited set, predecessor map and termination flag of one search.
///
/// All mutation is insert-if-absent or write-once, so tasks never need to
/// hold a lock across two operations.
#[derive(Debug, Default)]
pub struct SharedSearchState {
    visited: DashSet<NodeId>,
    predecessor: DashMap<NodeId, NodeId>,
    done: AtomicBool,
    counters: Counters,
}

#[derive(Debug, Default)]
struct Counters {
    tasks_spawned: AtomicU64,
    nodes_expanded: AtomicU64,
    lost_races: AtomicU64,
    forks: AtomicU64,
}

impl SharedSearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `node` for expansion. Returns false if another task got there first.
    pub fn try_visit(&self, node: NodeId) -> bool {
        let claimed = self.visited.insert(node);
        if !claimed {
            self.counters.lost_races.fetch_add(1, Ordering::Relaxed);
        }
        claimed
    }

    /// Whether `node` has been claimed by any task.
    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.contains(&node)
    }

    /// Record that `node` was first reached from `from`.
    ///
    /// Write-once: a second write for the same node keeps the first value.
    /// Only the task that won [`try_visit`](Self::try_visit) for `node` calls
    /// this, so a conflicting write is a logic error.
    pub fn record_predecessor(&self, node: NodeId, from: NodeId) {
        debug_assert_ne!(node, from, "node {node} cannot be its own predecessor");
        match self.predecessor.entry(node) {
            Entry::Occupied(existing) => {
                debug_assert_eq!(
                    *existing.get(),
                    from,
                    "predecessor of {node} rewritten from {} to {from}",
                    existing.get()
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(from);
            }
        }
    }

    /// The node that first reached `node`, if any.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessor.get(&node).map(|p| *p.value())
    }

    /// Check if some task already found a goal.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    /// Signal every task to stop. Returns true for the first caller only.
    pub fn mark_done(&self) -> bool {
        !self.done.swap(true, Ordering::SeqCst)
    }

    /// Allocate an id for a new task; ids count up from 0 (the root).
    pub(crate) fn next_task_id(&self) -> u64 {
        self.counters.tasks_spawned.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn note_fork(&self) {
        self.counters.forks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn note_expanded(&self) {
        self.counters.nodes_expanded.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the diagnostic counters.
    pub fn statistics(&self) -> SearchStatistics {
        SearchStatistics {
            tasks_spawned: self.counters.tasks_spawned.load(Ordering::Relaxed),
            forks: self.counters.forks.load(Ordering::Relaxed),
            nodes_expanded: self.counters.nodes_expanded.load(Ordering::Relaxed),
            lost_races: self.counters.lost_races.load(Ordering::Relaxed),
            nodes_visited: self.visited.len() as u64,
            ..Default::default()
        }
    }
}

/// Raises the termination flag when dropped during a panic, so the rest of
/// the search winds down instead of running on behind an unwinding thread.
pub(crate) struct StopOnPanic<'a>(pub &'a SharedSearchState);

impl Drop for StopOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() && self.0.mark_done() {
            tracing::debug!("task panicked, termination signalled");
        }
    }
}
