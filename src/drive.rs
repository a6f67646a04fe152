use std::ops::ControlFlow;

use crate::{MazeError, Solver, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// `Running` when `on_step` stopped the run early.
    pub status: Status,
    pub steps: usize,
}

/// Drive `solver` one non-overlapping `step()` at a time, until it reaches a
/// terminal status or `on_step` breaks.
///
/// A solver that is not already running gets a fresh run first. `on_step` is
/// called after every step, once the mutation is complete; it is the place to
/// render, to sleep for a fixed cadence, or to cancel. A cancelled solver is
/// left `Running` and can be resumed by another `run` or cleared with `reset`.
pub fn run(
    solver: &mut Solver,
    mut on_step: impl FnMut(&Solver) -> ControlFlow<()>,
) -> Result<Outcome, MazeError> {
    if solver.status() != Status::Running {
        solver.start()?;
    }

    let bound = solver.step_bound();
    let mut steps = 0;
    loop {
        let status = match solver.step() {
            Ok(status) => status,
            Err(MazeError::Unsolvable) => Status::Unsolvable,
            Err(err) => return Err(err),
        };
        steps += 1;
        let flow = on_step(solver);

        if status.is_terminal() || flow.is_break() {
            if !status.is_terminal() {
                tracing::debug!(steps, "run cancelled");
            }
            return Ok(Outcome { status, steps });
        }
        debug_assert!(steps <= bound, "exceeded {bound} steps");
    }
}
