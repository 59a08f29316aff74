use std::net::SocketAddr;

use sdp::SdpHeader;

use crate::history::RowClock;

/// One decoded datagram handed from the receiver to a sink.
#[derive(Debug, Clone, Copy)]
pub struct Datagram<'a> {
    pub header: SdpHeader,
    /// The whole datagram, header included.
    pub bytes: &'a [u8],
    pub source: SocketAddr,
    /// History row for the receive time; zero for sinks without a clock.
    pub row: usize,
}

/// Shared state written by the receiver thread and read by the render loop.
///
/// Implementations must never block the caller of `on_datagram`.
pub trait SampleSink: Send + Sync {
    /// Clock used to derive [`Datagram::row`].
    fn row_clock(&self) -> Option<RowClock> {
        None
    }

    /// Called once the remote board's address is known.
    fn on_board_known(&self) {}

    /// Applies a datagram and returns the number of samples stored.
    fn on_datagram(&self, dgram: &Datagram<'_>) -> sdp::Result<usize>;

    /// Returns whether anything changed since the last call, and clears the flag.
    fn take_dirty(&self) -> bool;
}
