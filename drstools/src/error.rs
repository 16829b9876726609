//! Failures that abort a conversion
//!
//! A recording that ends partway through an event is not an error: the
//! conversion stops and reports the events it completed. Everything here
//! leaves the output incomplete and must be surfaced to the user.

use crate::convert::State;
use crate::cursor::StreamError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("truncated file header")]
    Header(#[source] StreamError),
    #[error("truncated time calibration for channel {channel}")]
    Calibration {
        channel: usize,
        #[source]
        source: StreamError,
    },
    #[error("read failed in event {event}")]
    Io {
        event: u64,
        #[source]
        source: StreamError,
    },
    #[error("converter is {found:?}, cannot {action}")]
    InvalidState { found: State, action: &'static str },
    #[error(transparent)]
    Sink(anyhow::Error),
}

impl Error {
    /// True for errors caused by a recording too short to be calibrated
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Header(_) | Error::Calibration { .. })
    }
}
