//! Character-map mazes.
//!
//! Map format, one row per line:
//!
//! ```text
//! *********
//! *@  *   *
//! * * * * *
//! *   *  $*
//! *********
//! ```
//!
//! `*` is a wall, a space or `.` is floor, `@` is the single start cell and
//! `$` marks a goal. Short rows are padded with walls. The node id of a cell
//! is `row * width + column`.

use crate::error::MazeError;
use crate::maze::{Maze, NodeId, PlayerId};
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Wall,
    Floor,
    Start,
    Goal,
}

impl Cell {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '*' => Some(Cell::Wall),
            ' ' | '.' => Some(Cell::Floor),
            '@' => Some(Cell::Start),
            '$' => Some(Cell::Goal),
            _ => None,
        }
    }

    fn glyph(self) -> char {
        match self {
            Cell::Wall => '*',
            Cell::Floor => ' ',
            Cell::Start => '@',
            Cell::Goal => '$',
        }
    }

    fn is_open(self) -> bool {
        self != Cell::Wall
    }
}

/// Grid maze loaded from a character map.
///
/// Besides the graph itself the maze tracks every player handed out to the
/// solver and the cells each one visited, which drivers use to report how
/// the work was split.
#[derive(Debug)]
pub struct GridMaze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: NodeId,
    next_player: AtomicUsize,
    moves: AtomicU64,
    trails: DashMap<PlayerId, Vec<NodeId>>,
}

impl GridMaze {
    /// Parse a map from text.
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(MazeError::Empty);
        }

        let height = lines.len();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut cells = vec![Cell::Wall; width * height];
        let mut start = None;

        for (row, line) in lines.iter().enumerate() {
            for (col, glyph) in line.chars().enumerate() {
                let cell = Cell::from_glyph(glyph).ok_or(MazeError::UnknownGlyph {
                    glyph,
                    line: row + 1,
                    column: col + 1,
                })?;
                let id = row * width + col;
                if cell == Cell::Start {
                    if start.is_some() {
                        return Err(MazeError::MultipleStarts {
                            line: row + 1,
                            column: col + 1,
                        });
                    }
                    start = Some(id);
                }
                cells[id] = cell;
            }
        }

        let start = start.ok_or(MazeError::MissingStart)?;

        Ok(Self {
            width,
            height,
            cells,
            start,
            next_player: AtomicUsize::new(0),
            moves: AtomicU64::new(0),
            trails: DashMap::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row and column of a node.
    pub fn coordinates(&self, node: NodeId) -> (usize, usize) {
        (node / self.width, node % self.width)
    }

    /// All goal nodes in id order.
    pub fn goals(&self) -> Vec<NodeId> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Goal)
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether `node` is a floor, start or goal cell.
    pub fn is_open(&self, node: NodeId) -> bool {
        self.cells.get(node).is_some_and(|c| c.is_open())
    }

    /// Total number of player moves recorded so far.
    pub fn moves(&self) -> u64 {
        self.moves.load(Ordering::Relaxed)
    }

    /// Number of players handed out so far.
    pub fn players(&self) -> usize {
        self.next_player.load(Ordering::Relaxed)
    }

    /// Cells visited by `player`, in move order, starting with its spawn cell.
    pub fn trail(&self, player: PlayerId) -> Vec<NodeId> {
        self.trails
            .get(&player)
            .map(|t| t.value().clone())
            .unwrap_or_default()
    }

    /// Render the map with `path` cells marked `+`.
    pub fn render(&self, path: &[NodeId]) -> String {
        let mut glyphs: Vec<char> = self.cells.iter().map(|c| c.glyph()).collect();
        for &node in path {
            if self.cells.get(node) == Some(&Cell::Floor) {
                glyphs[node] = '+';
            }
        }

        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in glyphs.chunks(self.width) {
            let line: String = row.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

impl Maze for GridMaze {
    fn start(&self) -> NodeId {
        self.start
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        if !self.is_open(node) {
            return Vec::new();
        }
        let (row, col) = self.coordinates(node);
        let mut result = Vec::with_capacity(4);

        // up, right, down, left
        if row > 0 {
            result.push(node - self.width);
        }
        if col + 1 < self.width {
            result.push(node + 1);
        }
        if row + 1 < self.height {
            result.push(node + self.width);
        }
        if col > 0 {
            result.push(node - 1);
        }

        result.retain(|&n| self.is_open(n));
        result
    }

    fn has_goal(&self, node: NodeId) -> bool {
        self.cells.get(node) == Some(&Cell::Goal)
    }

    fn new_player(&self, node: NodeId) -> PlayerId {
        let player = PlayerId(self.next_player.fetch_add(1, Ordering::Relaxed));
        self.trails.insert(player, vec![node]);
        player
    }

    fn move_player(&self, player: PlayerId, node: NodeId) {
        self.moves.fetch_add(1, Ordering::Relaxed);
        self.trails.entry(player).or_default().push(node);
    }
}

impl fmt::Display for GridMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&[]))
    }
}
