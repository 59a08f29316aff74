use thiserror::Error;

/// Failures while decoding an SDP datagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The datagram is shorter than the fixed SDP header.
    #[error("malformed packet: {len} bytes, header needs {need}")]
    MalformedPacket { len: usize, need: usize },

    /// The header declares more payload than the datagram carries.
    #[error("truncated payload: {declared} items declared, room for {available}")]
    TruncatedPayload { declared: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
