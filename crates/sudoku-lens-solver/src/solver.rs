use crate::grid::SIZE;
use crate::{Grid, SolveError};
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Complete `grid` by depth-first search in row-major order, trying 1..=9.
///
/// Givens are validated first. The result is the first completion in that
/// search order, so it is deterministic even for puzzles with many solutions.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(grid), fields(givens = grid.count_filled())))]
pub fn solve(grid: &Grid) -> Result<Grid, SolveError> {
    grid.validate()?;

    let mut work = *grid;
    let mut nodes = 0u64;
    if fill_from(&mut work, 0, &mut nodes) {
        debug!("solved after {nodes} placements");
        Ok(work)
    } else {
        debug!("exhausted after {nodes} placements");
        Err(SolveError::Unsatisfiable)
    }
}

/// Status form of [`solve`]: the completed grid and `true`, or the input and `false`.
pub fn solve_grid(grid: &Grid) -> (Grid, bool) {
    match solve(grid) {
        Ok(solved) => (solved, true),
        Err(_) => (*grid, false),
    }
}

fn fill_from(grid: &mut Grid, start: usize, nodes: &mut u64) -> bool {
    let Some(idx) = (start..SIZE * SIZE).find(|&i| grid.get(i / SIZE, i % SIZE) == 0) else {
        return true;
    };
    let (row, col) = (idx / SIZE, idx % SIZE);

    for value in 1..=9 {
        if grid.allows(row, col, value) {
            grid.set(row, col, value);
            *nodes += 1;
            if fill_from(grid, idx + 1, nodes) {
                return true;
            }
        }
    }
    grid.set(row, col, 0);
    false
}
