use thiserror::Error;

/// The error taxonomy surfaced across the HTTP and CLI boundaries.
///
/// `ParseSkip` (a malformed individual row or cell) is deliberately absent:
/// it is never propagated, the offending row is silently dropped and
/// logged at `debug` instead. See the module docs on `skud` and `tabell`.
#[derive(Error, Debug)]
pub enum ReconError {
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not parse input: {0}")]
    ParseFatal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReconError {
    /// HTTP status code this error should be surfaced with.
    pub fn status_code(&self) -> u16 {
        match self {
            ReconError::BadInput(_) => 400,
            ReconError::Transport(_) | ReconError::ParseFatal(_) | ReconError::Other(_) => 500,
        }
    }

    /// CLI exit code convention: 0 ok, 2 bad input, 1 everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReconError::BadInput(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconError>;
