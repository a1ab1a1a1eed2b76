#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("digit {value} at ({row}, {col}) repeats in its row, column or box")]
    InvalidInput { row: usize, col: usize, value: u8 },
    #[error("value {value} at ({row}, {col}) is not in 0..=9")]
    OutOfRange { row: usize, col: usize, value: u8 },
    #[error("puzzle has no solution")]
    Unsatisfiable,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    #[error("expected 81 cells, found {found}")]
    WrongCellCount { found: usize },
    #[error("cell {index}: {token:?} is not a digit 0..=9")]
    InvalidToken { index: usize, token: String },
}
