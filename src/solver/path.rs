//! Path reconstruction from the shared predecessor map.
//!
//! While subtrees are joined, paths are kept goal first. Splicing a child's
//! route onto its parent then only has to keep walking backwards from the
//! child's starting node, which is already the last entry, so the junction
//! appears once and nothing below it is copied again.

use crate::maze::NodeId;
use crate::solver::state::SharedSearchState;

/// Ordered node ids from a start node to a goal node.
pub type Path = Vec<NodeId>;

/// Walk the predecessor map backwards from `node` to `local_start`.
///
/// Returns the nodes from `local_start` to `node` inclusive, or `None` if the
/// chain runs out before reaching `local_start`.
pub fn path_from_to(state: &SharedSearchState, local_start: NodeId, node: NodeId) -> Option<Path> {
    let mut route = vec![node];
    if !walk_back(state, local_start, &mut route) {
        return None;
    }
    route.reverse();
    Some(route)
}

fn walk_back(state: &SharedSearchState, local_start: NodeId, route: &mut Vec<NodeId>) -> bool {
    let Some(&last) = route.last() else {
        return false;
    };
    let mut current = last;
    while current != local_start {
        match state.predecessor(current) {
            Some(previous) => {
                route.push(previous);
                current = previous;
            }
            None => return false,
        }
    }
    true
}

/// Extend a goal-first `route` backwards until it reaches `local_start`.
///
/// The walk resumes from the last node of `route`.
///
/// # Panics
///
/// If the chain runs out first. Every node on a task's route was claimed
/// inside that task's subtree, so a broken chain is an invariant violation.
pub(crate) fn extend_to_start(state: &SharedSearchState, local_start: NodeId, route: &mut Vec<NodeId>) {
    let from = route.last().copied();
    if !walk_back(state, local_start, route) {
        panic!(
            "predecessor chain from {from:?} never reaches local start {local_start}; \
             node was claimed outside this task's subtree"
        );
    }
}
