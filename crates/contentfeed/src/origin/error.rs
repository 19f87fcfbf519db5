use thiserror::Error;

/// Failures talking to an origin service.
///
/// Never surfaces past the origin guard, which turns every variant into
/// `Fetched::Unavailable` or a degraded cache read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OriginError {
    #[error("Connect to {addr} failed: {reason}")]
    Connect { addr: String, reason: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Remote error: {0}")]
    Remote(String),
    #[error("Origin call timed out")]
    Timeout,
}

impl From<std::io::Error> for OriginError {
    fn from(err: std::io::Error) -> Self {
        OriginError::Transport(err.to_string())
    }
}

impl From<prost::DecodeError> for OriginError {
    fn from(err: prost::DecodeError) -> Self {
        OriginError::Protocol(err.to_string())
    }
}
