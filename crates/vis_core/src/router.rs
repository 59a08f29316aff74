use std::{
    fmt,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    time::Instant,
};

use sdp::SdpHeader;

use crate::{
    board::BoardLink,
    metrics::ReceiverMetrics,
    sink::{Datagram, SampleSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReceiverState {
    Unbound = 0,
    Listening = 1,
    Decoding = 2,
    Dispatching = 3,
    Closed = 4,
}

impl ReceiverState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Listening,
            2 => Self::Decoding,
            3 => Self::Dispatching,
            4 => Self::Closed,
            _ => Self::Unbound,
        }
    }
}

/// Receiver state readable from other threads.
#[derive(Debug, Default)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn get(&self) -> ReceiverState {
        ReceiverState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, state: ReceiverState) {
        self.0.store(state as u8, Ordering::Release)
    }
}

/// What happened to one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Hello,
    Malformed,
    Applied(usize),
    Rejected,
}

/// Per-datagram pipeline: hello filter, board latch, decode, dispatch.
pub struct PacketRouter {
    sink: Arc<dyn SampleSink>,
    board: Arc<BoardLink>,
    metrics: ReceiverMetrics,
    state: Arc<StateCell>,
}

impl fmt::Debug for PacketRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketRouter")
            .field("board", &self.board)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

impl PacketRouter {
    pub fn new(sink: Arc<dyn SampleSink>, board: Arc<BoardLink>, metrics: ReceiverMetrics) -> Self {
        if board.address_known() {
            sink.on_board_known();
        }
        Self {
            sink,
            board,
            metrics,
            state: Arc::new(StateCell::default()),
        }
    }

    pub fn state(&self) -> Arc<StateCell> {
        self.state.clone()
    }

    pub fn metrics(&self) -> &ReceiverMetrics {
        &self.metrics
    }

    pub fn route(&self, bytes: &[u8], source: SocketAddr, now: Instant) -> Routed {
        self.metrics.datagrams_received.inc();
        if sdp::is_hello(bytes) {
            self.metrics.hellos_skipped.inc();
            tracing::trace!(%source, "skipping hello from unbooted board");
            return Routed::Hello;
        }

        match self.board.observe(source) {
            Ok(Some(peer)) => {
                tracing::info!(%peer, "packet received from board, return path latched");
                self.sink.on_board_known();
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(%source, error = %e, "failed to open sender socket"),
        }

        self.state.set(ReceiverState::Decoding);
        let header = match SdpHeader::decode(bytes) {
            Ok(h) => h,
            Err(e) => {
                self.metrics.decode_failures.inc();
                tracing::debug!(%source, error = %e, "dropping datagram");
                return Routed::Malformed;
            }
        };

        let row = self.sink.row_clock().map_or(0, |c| c.row_at(now));
        self.state.set(ReceiverState::Dispatching);
        let dgram = Datagram {
            header,
            bytes,
            source,
            row,
        };
        match self.sink.on_datagram(&dgram) {
            Ok(n) => {
                self.metrics.samples_applied.inc_by(n as u64);
                Routed::Applied(n)
            }
            Err(e) => {
                self.metrics.decode_failures.inc();
                tracing::debug!(%source, command = header.command, error = %e, "dropping datagram");
                Routed::Rejected
            }
        }
    }
}
