use std::fmt;

use fxhash::FxHashSet;

use crate::{Cell, Direction, Grid, Malformed, MazeError, Solver, Status};

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, cell) in self.cells() {
            write!(f, "{cell}")?;
            if pos.1 + 1 == self.width() {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_path = self.path().iter().copied().collect::<FxHashSet<_>>();
        let active = self.status() != Status::Idle;
        for (pos, cell) in self.grid().cells() {
            if active && pos == self.current_position() {
                f.write_str("@")?;
            } else if on_path.contains(&pos) {
                f.write_str("*")?;
            } else if self.is_visited(pos) {
                f.write_str("~")?;
            } else {
                write!(f, "{cell}")?;
            }
            if pos.1 + 1 == self.grid().width() {
                f.write_str("\n")?;
            }
        }
        writeln!(f, "{}", self.status())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Wall => f.write_str("#"),
            Cell::Path => f.write_str("."),
            Cell::Start => f.write_str("S"),
            Cell::End => f.write_str("E"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("idle"),
            Status::Running => f.write_str("running"),
            Status::Solved => f.write_str("solved"),
            Status::Unsolvable => f.write_str("unsolvable"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("U"),
            Direction::Down => f.write_str("D"),
            Direction::Left => f.write_str("L"),
            Direction::Right => f.write_str("R"),
        }
    }
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::MalformedMaze(kind) => write!(f, "Malformed maze: {kind}"),
            MazeError::OutOfBounds(pos) => write!(f, "Position {pos:?} is out of bounds"),
            MazeError::AlreadyRunning => f.write_str("Solver is already running"),
            MazeError::Unsolvable => f.write_str("No path from start to end"),
        }
    }
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformed::Empty => f.write_str("empty grid"),
            Malformed::Ragged {
                row,
                width,
                expected,
            } => write!(f, "row {row} has width {width}, expecting width {expected}"),
            Malformed::Missing(cell) => write!(f, "missing {cell:?} cell"),
            Malformed::Duplicate(cell) => write!(f, "multiple {cell:?} cells"),
        }
    }
}
