use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file '{path}' is invalid: {reason}")]
    InvalidSettings { path: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type WatchResult<T> = Result<T, WatchError>;
