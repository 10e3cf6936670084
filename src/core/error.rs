use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Cell vector length {actual} does not match grid size {expected}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("No vacant location found after {attempts} random draws")]
    NoVacantLocation { attempts: usize },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
