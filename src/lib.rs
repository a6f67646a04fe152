use std::ops::Index;

use serde::{Deserialize, Serialize};

pub mod drive;
mod fmt;
mod parse;
pub mod solver;

pub use parse::parse_mazes;
pub use solver::{Snapshot, Solver, Status};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MazeError {
    MalformedMaze(Malformed),
    OutOfBounds(Pos),
    AlreadyRunning,
    Unsolvable,
}

impl std::error::Error for MazeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Malformed {
    Empty,
    Ragged {
        row: usize,
        width: usize,
        expected: usize,
    },
    Missing(Cell),
    Duplicate(Cell),
}

impl From<Malformed> for MazeError {
    fn from(kind: Malformed) -> Self {
        Self::MalformedMaze(kind)
    }
}

/// An immutable rectangular maze.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    height: usize,
    width: usize,
    grid: Box<[Cell]>,
}

impl Index<Pos> for Grid {
    type Output = Cell;
    fn index(&self, pos: Pos) -> &Self::Output {
        &self.grid[pos.0 * self.width + pos.1]
    }
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self, MazeError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(Malformed::Empty.into());
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Malformed::Ragged {
                row,
                width: cells.len(),
                expected: width,
            }
            .into());
        }
        Ok(Self {
            height: rows.len(),
            width,
            grid: rows.into_iter().flatten().collect(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let idx_iter = std::iter::successors(Some(Pos(0, 0)), |&Pos(row, col)| {
            Some(if col + 1 < self.width {
                Pos(row, col + 1)
            } else {
                Pos(row + 1, 0)
            })
        });
        idx_iter.zip(self.grid.iter().copied())
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 < self.height && pos.1 < self.width
    }

    pub fn cell_at(&self, pos: Pos) -> Result<Cell, MazeError> {
        if !self.contains(pos) {
            return Err(MazeError::OutOfBounds(pos));
        }
        Ok(self[pos])
    }

    /// The neighbour of `pos` one step towards `dir`, if it lies inside the grid.
    pub fn sibling_pos(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = pos.0.checked_add_signed(dr)?;
        let col = pos.1.checked_add_signed(dc)?;
        let pos = Pos(row, col);
        self.contains(pos).then_some(pos)
    }

    pub fn find_start(&self) -> Result<Pos, MazeError> {
        self.find_unique(Cell::Start)
    }

    pub fn find_end(&self) -> Result<Pos, MazeError> {
        self.find_unique(Cell::End)
    }

    // Duplicates are rejected rather than resolved to the first match.
    fn find_unique(&self, target: Cell) -> Result<Pos, MazeError> {
        let mut found = self.cells().filter(|&(_, cell)| cell == target);
        let (pos, _) = found.next().ok_or(Malformed::Missing(target))?;
        if found.next().is_some() {
            return Err(Malformed::Duplicate(target).into());
        }
        Ok(pos)
    }
}

/// `(row, col)`, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos(pub usize, pub usize);

impl Pos {
    pub fn manhattan(self, other: Pos) -> usize {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Wall,
    Path,
    Start,
    End,
}

impl Cell {
    pub fn is_open(self) -> bool {
        self != Cell::Wall
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Base traversal order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn delta(self) -> (isize, isize) {
        const DELTAS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        DELTAS[self as usize]
    }
}
