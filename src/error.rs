use crate::capture::CaptureError;
use html::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed tree: {0}")]
    Tree(#[from] TreeError),
    #[error("invalid capture: {0}")]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
