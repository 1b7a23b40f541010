//! Adjacency-list maze.

use crate::error::MazeError;
use crate::maze::{Maze, NodeId};
use std::collections::{BTreeSet, HashSet};

/// Maze defined by an explicit list of undirected edges.
#[derive(Debug, Clone)]
pub struct GraphMaze {
    start: NodeId,
    goals: HashSet<NodeId>,
    adjacency: Vec<BTreeSet<NodeId>>,
}

impl GraphMaze {
    /// Create a maze with `node_count` nodes and no edges.
    pub fn new(node_count: usize, start: NodeId) -> Result<Self, MazeError> {
        if start >= node_count {
            return Err(MazeError::UnknownNode(start));
        }
        Ok(Self {
            start,
            goals: HashSet::new(),
            adjacency: vec![BTreeSet::new(); node_count],
        })
    }

    /// Add an undirected edge. Self loops are ignored.
    pub fn with_edge(mut self, a: NodeId, b: NodeId) -> Result<Self, MazeError> {
        self.check(a)?;
        self.check(b)?;
        if a != b {
            self.adjacency[a].insert(b);
            self.adjacency[b].insert(a);
        }
        Ok(self)
    }

    /// Add a chain of edges `nodes[0] - nodes[1] - ...`.
    pub fn with_chain(mut self, nodes: &[NodeId]) -> Result<Self, MazeError> {
        for pair in nodes.windows(2) {
            self = self.with_edge(pair[0], pair[1])?;
        }
        Ok(self)
    }

    /// Mark `node` as a goal.
    pub fn with_goal(mut self, node: NodeId) -> Result<Self, MazeError> {
        self.check(node)?;
        self.goals.insert(node);
        Ok(self)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether `a` and `b` share an edge.
    pub fn is_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.get(a).is_some_and(|n| n.contains(&b))
    }

    fn check(&self, node: NodeId) -> Result<(), MazeError> {
        if node < self.adjacency.len() {
            Ok(())
        } else {
            Err(MazeError::UnknownNode(node))
        }
    }
}

impl Maze for GraphMaze {
    fn start(&self) -> NodeId {
        self.start
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        self.adjacency
            .get(node)
            .map(|n| n.iter().copied().collect())
            .unwrap_or_default()
    }

    fn has_goal(&self, node: NodeId) -> bool {
        self.goals.contains(&node)
    }
}
