//! Error types for maze loading and solving.
//!
//! A missing path is not an error: the solver reports it as `None`.
//! Broken predecessor chains are invariant violations and panic instead;
//! that panic reaches the caller of the solver rather than becoming a
//! [`SolveError`].

use thiserror::Error;

/// Errors raised while building or parsing a maze.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    /// The map contained no rows.
    #[error("maze map is empty")]
    Empty,

    /// The map has no `@` start cell.
    #[error("maze map has no start cell '@'")]
    MissingStart,

    /// The map has more than one `@` start cell.
    #[error("maze map has more than one start cell (second at line {line}, column {column})")]
    MultipleStarts { line: usize, column: usize },

    /// A glyph that is not part of the map format.
    #[error("unknown glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph {
        glyph: char,
        line: usize,
        column: usize,
    },

    /// A node id that does not belong to the maze.
    #[error("node {0} is outside the maze")]
    UnknownNode(usize),

    /// Generator dimensions too small to hold a start and a goal.
    #[error("maze dimensions {width}x{height} are too small (minimum 3x3)")]
    TooSmall { width: usize, height: usize },
}

/// Errors raised by the execution substrate while running a search.
#[derive(Error, Debug)]
pub enum SolveError {
    /// A search task finished without delivering its outcome.
    #[error("search task was dropped before delivering a result")]
    TaskLost,

    /// The OS refused to start a task thread.
    #[error("failed to start task thread")]
    Spawn(#[source] std::io::Error),

    /// The worker pool could not be created.
    #[error("failed to build worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
