use crate::{GridParseError, SolveError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SIZE: usize = 9;
pub const BOX: usize = 3;

/// 9x9 sudoku grid, `0` marks an unknown cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid(pub [[u8; SIZE]; SIZE]);

impl Grid {
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.0[row][col] = value;
    }

    pub fn rows(&self) -> &[[u8; SIZE]; SIZE] {
        &self.0
    }

    pub fn count_filled(&self) -> usize {
        self.0.iter().flatten().filter(|&&v| v != 0).count()
    }

    pub fn is_complete(&self) -> bool {
        self.count_filled() == SIZE * SIZE
    }

    /// Whether `value` can go at `(row, col)` without repeating in the row,
    /// column or box. The cell itself is ignored.
    pub fn allows(&self, row: usize, col: usize, value: u8) -> bool {
        let (br, bc) = (row / BOX * BOX, col / BOX * BOX);
        for i in 0..SIZE {
            if i != col && self.0[row][i] == value {
                return false;
            }
            if i != row && self.0[i][col] == value {
                return false;
            }
            let (r, c) = (br + i / BOX, bc + i % BOX);
            if (r, c) != (row, col) && self.0[r][c] == value {
                return false;
            }
        }
        true
    }

    /// Check the givens: every value in `0..=9` and no non-zero value repeats.
    pub fn validate(&self) -> Result<(), SolveError> {
        for (row, line) in self.0.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value > 9 {
                    return Err(SolveError::OutOfRange { row, col, value });
                }
                if value != 0 && !self.allows(row, col, value) {
                    return Err(SolveError::InvalidInput { row, col, value });
                }
            }
        }
        Ok(())
    }
}

impl From<[[u8; SIZE]; SIZE]> for Grid {
    fn from(rows: [[u8; SIZE]; SIZE]) -> Self {
        Self(rows)
    }
}

/// Whitespace-separated digits, row-major. Line breaks are not significant.
impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != SIZE * SIZE {
            return Err(GridParseError::WrongCellCount {
                found: tokens.len(),
            });
        }
        let mut grid = Grid::empty();
        for (index, token) in tokens.into_iter().enumerate() {
            let value = token
                .parse::<u8>()
                .ok()
                .filter(|v| *v <= 9)
                .ok_or_else(|| GridParseError::InvalidToken {
                    index,
                    token: token.to_string(),
                })?;
            grid.set(index / SIZE, index % SIZE, value);
        }
        Ok(grid)
    }
}

/// One row per line, cells separated by a space.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.0 {
            for (col, v) in line.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{v}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_back() {
        let text = "5 3 0 0 7 0 0 0 0\n".repeat(9);
        let grid: Grid = text.parse().expect("81 digits");
        assert_eq!(grid.get(8, 4), 7);
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn rejects_bad_tokens_and_counts() {
        assert_eq!(
            "1 2 3".parse::<Grid>(),
            Err(GridParseError::WrongCellCount { found: 3 })
        );
        let mut text = "0 ".repeat(80);
        text.push('x');
        assert!(matches!(
            text.parse::<Grid>(),
            Err(GridParseError::InvalidToken { index: 80, .. })
        ));
    }

    #[test]
    fn box_conflict_is_detected() {
        let mut grid = Grid::empty();
        grid.set(0, 0, 4);
        grid.set(2, 2, 4);
        assert_eq!(
            grid.validate(),
            Err(SolveError::InvalidInput {
                row: 0,
                col: 0,
                value: 4
            })
        );
    }

    #[test]
    fn out_of_range_value_is_detected() {
        let mut grid = Grid::empty();
        grid.set(3, 5, 12);
        assert_eq!(
            grid.validate(),
            Err(SolveError::OutOfRange {
                row: 3,
                col: 5,
                value: 12
            })
        );
    }
}
