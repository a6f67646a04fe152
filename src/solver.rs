//! Incremental depth-first search over a [`Grid`], one move per [`Solver::step`].

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{Direction, Grid, MazeError, Pos};

type IndexSet<K> = indexmap::IndexSet<K, fxhash::FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Running,
    Solved,
    Unsolvable,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Solved | Self::Unsolvable)
    }
}

/// Run state of one maze. Owned by whoever displays that maze; never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solver {
    grid: Grid,
    start: Pos,
    end: Pos,
    status: Status,
    current: Pos,
    path: Vec<Pos>,
    visited: IndexSet<Pos>,
    last_direction: Option<Direction>,
}

/// Plain-data copy of the run state, for renderers that want to serialize it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: Status,
    pub current: Pos,
    pub path: Vec<Pos>,
    pub visited: Vec<Pos>,
    pub last_direction: Option<Direction>,
}

impl Solver {
    pub fn new(grid: Grid) -> Result<Self, MazeError> {
        let start = grid.find_start()?;
        let end = grid.find_end()?;
        Ok(Self {
            grid,
            start,
            end,
            status: Status::Idle,
            current: start,
            path: Vec::new(),
            visited: IndexSet::default(),
            last_direction: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start_pos(&self) -> Pos {
        self.start
    }

    pub fn end_pos(&self) -> Pos {
        self.end
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_position(&self) -> Pos {
        self.current
    }

    /// The DFS stack, from the start cell to the current position.
    pub fn path(&self) -> &[Pos] {
        &self.path
    }

    /// Every cell entered during this run, in the order it was first entered.
    pub fn visited(&self) -> impl ExactSizeIterator<Item = Pos> + '_ {
        self.visited.iter().copied()
    }

    pub fn is_visited(&self, pos: Pos) -> bool {
        self.visited.contains(&pos)
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Upper bound on the number of steps any run can take: every cell is
    /// advanced onto at most once and backtracked from at most once.
    pub fn step_bound(&self) -> usize {
        2 * self.grid.height() * self.grid.width()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            current: self.current,
            path: self.path.clone(),
            visited: self.visited().collect(),
            last_direction: self.last_direction,
        }
    }

    /// Begin a fresh run. Allowed from any status but `Running`.
    pub fn start(&mut self) -> Result<(), MazeError> {
        if self.status == Status::Running {
            return Err(MazeError::AlreadyRunning);
        }
        self.clear();
        self.path.push(self.start);
        self.visited.insert(self.start);
        self.status = Status::Running;
        tracing::debug!(start = ?self.start, end = ?self.end, "run started");
        Ok(())
    }

    pub fn reset(&mut self) {
        if self.status != Status::Idle {
            tracing::debug!(status = ?self.status, "reset");
        }
        self.clear();
        self.status = Status::Idle;
    }

    fn clear(&mut self) {
        self.current = self.start;
        self.path.clear();
        self.visited.clear();
        self.last_direction = None;
    }

    /// Perform a single move: advance to the first open unvisited neighbour,
    /// or retreat one cell along the path. A no-op unless `Running`.
    ///
    /// Emptying the path returns [`MazeError::Unsolvable`] once and leaves the
    /// solver in [`Status::Unsolvable`] with the agent back on the start cell.
    pub fn step(&mut self) -> Result<Status, MazeError> {
        #[cfg(feature = "coz")]
        coz::scope!("Step");

        if self.status != Status::Running {
            return Ok(self.status);
        }

        if self.current == self.end {
            return Ok(self.finish());
        }

        // Keep going straight when possible.
        let mut order = ArrayVec::<Direction, 4>::new();
        order.extend(self.last_direction);
        order.extend(
            Direction::ALL
                .into_iter()
                .filter(|&dir| Some(dir) != self.last_direction),
        );

        for dir in order {
            let Some(target) = self.grid.sibling_pos(self.current, dir) else {
                continue;
            };
            if !self.grid.cell_at(target)?.is_open() || self.visited.contains(&target) {
                continue;
            }

            tracing::trace!(from = ?self.current, to = ?target, ?dir, "advance");
            self.path.push(target);
            self.visited.insert(target);
            self.current = target;
            self.last_direction = Some(dir);

            #[cfg(feature = "coz")]
            coz::progress!("Advance");

            if target == self.end {
                return Ok(self.finish());
            }
            return Ok(Status::Running);
        }

        // Dead end.
        let from = self.path.pop();
        match self.path.last() {
            Some(&prev) => {
                tracing::trace!(?from, to = ?prev, "backtrack");
                self.current = prev;
                Ok(Status::Running)
            }
            None => {
                tracing::debug!(visited = self.visited.len(), "no path to the end cell");
                self.current = self.start;
                self.status = Status::Unsolvable;
                Err(MazeError::Unsolvable)
            }
        }
    }

    fn finish(&mut self) -> Status {
        tracing::debug!(
            path_len = self.path.len(),
            visited = self.visited.len(),
            "reached the end cell"
        );
        self.status = Status::Solved;
        self.status
    }
}
