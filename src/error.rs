use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    #[error("Grid size ({0}) must be finite and greater than zero")]
    InvalidGridSize(f32),

    #[error("Map size ({0}) must be between 1 and 32768 cells")]
    InvalidMapSize(i32),
}

pub type Result<T> = std::result::Result<T, GridError>;
