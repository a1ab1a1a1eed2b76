//! Exact sudoku solver.
//!
//! ```
//! use sudoku_lens_solver::{solve, Grid};
//!
//! let solved = solve(&Grid::empty()).expect("empty grid is solvable");
//! assert!(solved.is_complete());
//! assert!(solved.validate().is_ok());
//! ```

mod error;
mod grid;
mod solver;

pub use error::{GridParseError, SolveError};
pub use grid::{Grid, BOX, SIZE};
pub use solver::{solve, solve_grid};
