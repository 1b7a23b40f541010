//! Search result types and statistics

use crate::maze::NodeId;
use crate::solver::path::Path;
use crate::solver::state::SharedSearchState;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a complete search run.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Path from the maze start to a goal, if one was found.
    pub path: Option<Path>,
    /// Statistics from the search
    pub statistics: SearchStatistics,
    /// Final shared state of the search tree
    pub state: Arc<SharedSearchState>,
}

impl SolveReport {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// The node from which `node` was claimed during the search.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.state.predecessor(node)
    }
}

/// Statistics from a search operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Tasks created, including the root task
    pub tasks_spawned: u64,
    /// Nodes detached from a frontier into a child task
    pub forks: u64,
    /// Nodes claimed through the visited set
    pub nodes_visited: u64,
    /// Nodes whose neighbors were examined
    pub nodes_expanded: u64,
    /// Claims lost to another task
    pub lost_races: u64,
}

impl SearchStatistics {
    /// Nodes expanded per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes_expanded as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Tasks spawned: {}\n", self.tasks_spawned));
        s.push_str(&format!("Forks: {}\n", self.forks));
        s.push_str(&format!("Nodes visited: {}\n", self.nodes_visited));
        s.push_str(&format!("Nodes expanded: {}\n", self.nodes_expanded));
        s.push_str(&format!("Lost races: {}\n", self.lost_races));
        s.push_str(&format!("Throughput: {:.0} nodes/sec\n", self.throughput()));
        s
    }
}
