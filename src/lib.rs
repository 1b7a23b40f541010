//! Parallel fork/join depth-first maze solving.
//!
//! - [`maze`]: the graphs being searched (character maps, adjacency lists,
//!   and a seeded generator)
//! - [`solver`]: the fork/join search engine and its execution substrates
//! - [`error`]: error types for both

pub mod error;
pub mod maze;
pub mod solver;

pub use error::{MazeError, SolveError};
pub use maze::{GraphMaze, GridMaze, Maze, NodeId, PlayerId};
pub use solver::{solve, ExecutorKind, Path, SolveReport, Solver, SolverConfig};
