use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Packet(#[from] sdp::Error),

    #[error("failed to bind UDP port {port} on any address family")]
    SocketBind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to load configuration from {}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: ConfigSource,
    },

    #[error("failed to send control packet")]
    Send(#[source] io::Error),

    #[error("failed to start receiver runtime")]
    Runtime(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigSource {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, Error>;
