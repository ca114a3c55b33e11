use thiserror::Error;

/// Errors that can occur while constructing or running a detector
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to allocate a working buffer of {elements} samples")]
    AllocationFailure { elements: usize },

    #[error("Failed to parse options: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeatureError>;
