use std::path::PathBuf;

use thiserror::Error;

pub type VisionResult<T> = Result<T, VisionError>;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("failed to read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image {name} is {bytes} bytes, above the {max_bytes} byte upload limit")]
    ImageTooLarge {
        name: String,
        bytes: usize,
        max_bytes: usize,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("vision service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("annotation of image #{index} failed with code {code}: {message}")]
    Annotation {
        index: usize,
        code: i32,
        message: String,
    },

    #[error("sent {expected} requests but received {actual} responses")]
    BatchSizeMismatch { expected: usize, actual: usize },
}

impl VisionError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }
}
