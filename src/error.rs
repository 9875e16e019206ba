use thiserror::Error;

#[derive(Error, Debug)]
pub enum FittsForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Size Mismatch: {symbols} symbols but {positions} positions")]
    SizeMismatch { symbols: usize, positions: usize },

    #[error("Unknown Symbol: '{0}' is not part of the layout")]
    UnknownSymbol(char),

    #[error("Duplicate Symbol: '{0}' appears more than once")]
    DuplicateSymbol(char),

    #[error("Duplicate Position: ({x}, {y}) is assigned more than once")]
    DuplicatePosition { x: f64, y: f64 },

    #[error("Invalid Parameter: {0}")]
    InvalidParameter(String),
}

pub type FfResult<T> = Result<T, FittsForgeError>;
