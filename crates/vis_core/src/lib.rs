//! Shared machinery for the SpiNNaker visualisers.
//!
//! A receiver thread decodes board datagrams into a [`SampleSink`]; the render
//! loop reads the same sink every frame. Sinks hold their data in per-element
//! atomics so neither side ever waits on the other.

pub mod atomic;
pub mod board;
pub mod canvas;
pub mod config;
pub mod error;
pub mod grid;
pub mod heat;
pub mod history;
pub mod metrics;
pub mod raytrace;
pub mod receiver;
pub mod router;
pub mod sender;
pub mod sink;

pub use board::BoardLink;
pub use canvas::{Canvas, Font, Rgb};
pub use config::VisConfig;
pub use error::{ConfigSource, Error, Result};
pub use grid::{Grid, Orientation};
pub use heat::HeatSink;
pub use history::{HistoryRing, RowClock};
pub use metrics::ReceiverMetrics;
pub use raytrace::PixelAccumulator;
pub use receiver::{bind_listener, spawn, ReceiverHandle};
pub use router::{PacketRouter, ReceiverState, Routed};
pub use sender::{CommandSender, SendOutcome};
pub use sink::{Datagram, SampleSink};
