//! Maze graphs consumed by the solver.
//!
//! The solver only needs a start node, neighbor lookup and a goal test. The
//! player hooks let a maze observe which cells each search task walks over;
//! they never influence the search itself.
//!
//! - [`GridMaze`]: character maps (`*` walls, `@` start, `$` goals)
//! - [`GraphMaze`]: explicit adjacency lists
//! - [`generate`]: seeded random grid mazes

pub mod generate;
pub mod graph;
pub mod grid;

pub use generate::generate;
pub use graph::GraphMaze;
pub use grid::GridMaze;

/// Opaque identifier of a maze position.
pub type NodeId = usize;

/// Token handed out by [`Maze::new_player`] to animate one task's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub usize);

/// Graph interface the solver searches over.
pub trait Maze: Send + Sync {
    /// The node every search starts from.
    fn start(&self) -> NodeId;

    /// Adjacent nodes of `node`, without duplicates.
    ///
    /// The order must be stable across calls; the solver's fork decisions
    /// and therefore the path it reports depend on it.
    fn neighbors(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether `node` is a goal.
    fn has_goal(&self, node: NodeId) -> bool;

    /// Place a new player on `node`.
    fn new_player(&self, _node: NodeId) -> PlayerId {
        PlayerId(0)
    }

    /// Record that `player` moved to `node`.
    fn move_player(&self, _player: PlayerId, _node: NodeId) {}
}
