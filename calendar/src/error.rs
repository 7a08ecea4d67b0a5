use thiserror::Error;

/// Errors surfaced by the calendar core.
///
/// State transitions themselves never fail; these cover integration mistakes
/// and bad input handed to the controller or the options loader.
#[derive(Debug, Error)]
pub enum PickerError {
    #[error("no active date picker: pane views must be built from a live picker instance")]
    MissingContext,

    #[error("Invalid month: {0}. Must be between 0 and 11")]
    InvalidMonth(u32),

    #[error("invalid picker options: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PickerError>;
